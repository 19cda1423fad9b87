pub mod achievements;
pub mod history;
pub mod progress;
pub mod scoring;

pub use progress::{SessionOutcome, UserProgress, apply_session};
