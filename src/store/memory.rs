use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::Result;

use crate::engine::progress::UserProgress;
use crate::store::{ProgressRepository, UserKey};

/// Non-durable repository, for tests and hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    progress: RefCell<HashMap<UserKey, UserProgress>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.progress.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.progress.borrow().is_empty()
    }
}

impl ProgressRepository for MemoryStore {
    fn load_progress(&self, user: &UserKey) -> Result<UserProgress> {
        Ok(self
            .progress
            .borrow()
            .get(user)
            .cloned()
            .unwrap_or_default())
    }

    fn save_progress(&self, user: &UserKey, progress: &UserProgress) -> Result<()> {
        self.progress
            .borrow_mut()
            .insert(user.clone(), progress.clone());
        Ok(())
    }
}
