use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};

use crate::engine::history::{self, SessionRecord};
use crate::engine::progress::{SessionOutcome, UserProgress};
use crate::snippets::SnippetRotation;
use crate::store::schema::{
    HistoryData, ProgressData, RotationData, SCHEMA_VERSION, Versioned,
};
use crate::store::{ProgressRepository, UserKey, apply_and_save};

const ROTATION_FILE: &str = "used_snippets.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating data dir {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn progress_file(user: &UserKey) -> String {
        format!("progress-{}.json", user.slug())
    }

    fn history_file(user: &UserKey) -> String {
        format!("history-{}.json", user.slug())
    }

    /// Missing files load as the default. Unreadable or stale files are errors
    /// so a bad file is never silently overwritten with fresh progress.
    fn load<T: DeserializeOwned + Default + Versioned>(&self, name: &str) -> Result<T> {
        let path = self.file_path(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let data: T = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        if data.schema_version() != SCHEMA_VERSION {
            bail!(
                "Unsupported schema version in {}: {} (expected {})",
                path.display(),
                data.schema_version(),
                SCHEMA_VERSION
            );
        }
        Ok(data)
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_history(&self, user: &UserKey) -> Result<Vec<SessionRecord>> {
        let data: HistoryData = self.load(&Self::history_file(user))?;
        Ok(data.sessions)
    }

    pub fn save_history(&self, user: &UserKey, sessions: &[SessionRecord]) -> Result<()> {
        let data = HistoryData {
            schema_version: SCHEMA_VERSION,
            sessions: sessions.to_vec(),
        };
        self.save(&Self::history_file(user), &data)
    }

    /// Fold `record.result` into the user's progress and append the record to
    /// their history. History is read before anything is written, so an
    /// unreadable history file fails the call with progress untouched.
    pub fn record_session(
        &self,
        user: &UserKey,
        record: SessionRecord,
        today: NaiveDate,
        limit: usize,
    ) -> Result<SessionOutcome> {
        let mut sessions = self.load_history(user)?;
        let outcome = apply_and_save(self, user, &record.result, today)?;
        history::push_bounded(&mut sessions, record, limit);
        self.save_history(user, &sessions)?;
        Ok(outcome)
    }

    pub fn clear_history(&self, user: &UserKey) -> Result<()> {
        self.save_history(user, &[])
    }

    pub fn load_rotation(&self) -> Result<SnippetRotation> {
        let data: RotationData = self.load(ROTATION_FILE)?;
        Ok(data.used)
    }

    pub fn save_rotation(&self, rotation: &SnippetRotation) -> Result<()> {
        let data = RotationData {
            schema_version: SCHEMA_VERSION,
            used: rotation.clone(),
        };
        self.save(ROTATION_FILE, &data)
    }
}

impl ProgressRepository for JsonStore {
    fn load_progress(&self, user: &UserKey) -> Result<UserProgress> {
        let data: ProgressData = self.load(&Self::progress_file(user))?;
        Ok(data.progress)
    }

    fn save_progress(&self, user: &UserKey, progress: &UserProgress) -> Result<()> {
        self.save(&Self::progress_file(user), &ProgressData::new(progress.clone()))
    }
}
