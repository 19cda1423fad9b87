//! Scoring core for typing practice on code snippets.
//!
//! `session` turns typed input into a [`session::result::SessionResult`];
//! `engine` folds results into a user's XP, level, streak and achievements.
//! `snippets` and `store` are the bundled snippet catalogue and JSON
//! persistence used by the `codetype` binary.

pub mod config;
pub mod engine;
pub mod session;
pub mod snippets;
pub mod store;
