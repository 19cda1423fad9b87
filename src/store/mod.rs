pub mod json_store;
pub mod memory;
pub mod schema;

use std::fmt::{self, Write as _};

use anyhow::Result;
use chrono::NaiveDate;

use crate::engine::progress::{SessionOutcome, UserProgress, apply_session};
use crate::session::result::SessionResult;

/// Whose progress is being stored. Guests share one anonymous bucket.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum UserKey {
    Guest,
    User(String),
}

impl UserKey {
    pub fn from_option(id: Option<&str>) -> Self {
        match id {
            Some(id) if !id.trim().is_empty() => UserKey::User(id.trim().to_string()),
            _ => UserKey::Guest,
        }
    }

    /// File-safe name for this key. Bytes outside `[A-Za-z0-9-]` (including
    /// `_` itself) become `_xx` hex escapes, so distinct ids never share a slug.
    pub fn slug(&self) -> String {
        match self {
            UserKey::Guest => "guest".to_string(),
            UserKey::User(id) => {
                let mut slug = String::from("user-");
                for byte in id.bytes() {
                    if byte.is_ascii_alphanumeric() || byte == b'-' {
                        slug.push(byte as char);
                    } else {
                        let _ = write!(slug, "_{byte:02x}");
                    }
                }
                slug
            }
        }
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserKey::Guest => f.write_str("guest"),
            UserKey::User(id) => f.write_str(id),
        }
    }
}

pub trait ProgressRepository {
    /// Stored progress, or a fresh default if the user has none yet.
    fn load_progress(&self, user: &UserKey) -> Result<UserProgress>;

    fn save_progress(&self, user: &UserKey, progress: &UserProgress) -> Result<()>;

    fn reset_progress(&self, user: &UserKey) -> Result<()> {
        self.save_progress(user, &UserProgress::default())
    }
}

/// Load, fold in one session, and persist before returning the outcome.
pub fn apply_and_save<R: ProgressRepository + ?Sized>(
    repo: &R,
    user: &UserKey,
    result: &SessionResult,
    today: NaiveDate,
) -> Result<SessionOutcome> {
    let progress = repo.load_progress(user)?;
    let outcome = apply_session(&progress, result, today);
    repo.save_progress(user, &outcome.progress)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key_from_option() {
        assert_eq!(UserKey::from_option(None), UserKey::Guest);
        assert_eq!(UserKey::from_option(Some("  ")), UserKey::Guest);
        assert_eq!(
            UserKey::from_option(Some(" ada ")),
            UserKey::User("ada".to_string())
        );
    }

    #[test]
    fn test_slug_is_file_safe() {
        assert_eq!(UserKey::Guest.slug(), "guest");
        assert_eq!(
            UserKey::User("../me@example.com".to_string()).slug(),
            "user-_2e_2e_2fme_40example_2ecom"
        );
        assert_eq!(UserKey::User("a-b_c9".to_string()).slug(), "user-a-b_5fc9");
    }

    #[test]
    fn test_slugs_never_collide() {
        let dotted = UserKey::User("ann.lee".to_string()).slug();
        let underscored = UserKey::User("ann_lee".to_string()).slug();
        assert_ne!(dotted, underscored);

        // An id spelling out an escape stays distinct from the escaped byte.
        assert_ne!(
            UserKey::User("a_2eb".to_string()).slug(),
            UserKey::User("a.b".to_string()).slug()
        );
        assert_ne!(UserKey::User("guest".to_string()).slug(), UserKey::Guest.slug());
    }
}
