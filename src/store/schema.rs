use serde::{Deserialize, Serialize};

use crate::engine::history::SessionRecord;
use crate::engine::progress::UserProgress;
use crate::snippets::SnippetRotation;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressData {
    pub schema_version: u32,
    #[serde(flatten)]
    pub progress: UserProgress,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            progress: UserProgress::default(),
        }
    }
}

impl ProgressData {
    pub fn new(progress: UserProgress) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            progress,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    pub sessions: Vec<SessionRecord>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RotationData {
    pub schema_version: u32,
    pub used: SnippetRotation,
}

impl Default for RotationData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            used: SnippetRotation::default(),
        }
    }
}

/// Anything stored in a versioned envelope.
pub trait Versioned {
    fn schema_version(&self) -> u32;
}

impl Versioned for ProgressData {
    fn schema_version(&self) -> u32 {
        self.schema_version
    }
}

impl Versioned for HistoryData {
    fn schema_version(&self) -> u32 {
        self.schema_version
    }
}

impl Versioned for RotationData {
    fn schema_version(&self) -> u32 {
        self.schema_version
    }
}
