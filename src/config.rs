use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::snippets::Difficulty;

pub const MIN_SESSION_SECS: u32 = 15;
pub const MAX_SESSION_SECS: u32 = 600;
pub const MAX_HISTORY_LIMIT: usize = 5000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_session_duration_secs")]
    pub session_duration_secs: u32,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Optional JSON snippet library used instead of the bundled one.
    #[serde(default)]
    pub snippets_file: Option<String>,
}

fn default_session_duration_secs() -> u32 {
    60
}
fn default_language() -> String {
    "javascript".to_string()
}
fn default_history_limit() -> usize {
    500
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("codetype")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_duration_secs: default_session_duration_secs(),
            language: default_language(),
            difficulty: Difficulty::default(),
            history_limit: default_history_limit(),
            data_dir: default_data_dir(),
            snippets_file: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("codetype")
            .join("config.toml")
    }

    /// Clamp numeric settings into range and fall back to the default language
    /// when the configured one has no snippets.
    pub fn validate(&mut self, valid_languages: &[&str]) {
        self.session_duration_secs = self
            .session_duration_secs
            .clamp(MIN_SESSION_SECS, MAX_SESSION_SECS);
        self.history_limit = self.history_limit.clamp(1, MAX_HISTORY_LIMIT);
        self.language = self.language.trim().to_lowercase();
        if !valid_languages.contains(&self.language.as_str()) {
            log::warn!(
                "unknown language {:?}, using {}",
                self.language,
                default_language()
            );
            self.language = default_language();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.session_duration_secs, 60);
        assert_eq!(config.language, "javascript");
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.history_limit, 500);
        assert!(config.data_dir.contains("codetype"));
        assert!(config.snippets_file.is_none());
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
session_duration_secs = 120
language = "rust"
difficulty = "hard"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session_duration_secs, 120);
        assert_eq!(config.language, "rust");
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.history_limit, 500);
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.language = "python".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.language, "python");
        assert_eq!(loaded.data_dir, config.data_dir);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.session_duration_secs, 60);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.session_duration_secs = 1;
        config.history_limit = 0;
        config.language = "cobol".to_string();
        config.validate(&["javascript", "python"]);
        assert_eq!(config.session_duration_secs, MIN_SESSION_SECS);
        assert_eq!(config.history_limit, 1);
        assert_eq!(config.language, "javascript");

        config.session_duration_secs = 10_000;
        config.history_limit = 1_000_000;
        config.validate(&["javascript"]);
        assert_eq!(config.session_duration_secs, MAX_SESSION_SECS);
        assert_eq!(config.history_limit, MAX_HISTORY_LIMIT);
    }

    #[test]
    fn test_validate_normalizes_case() {
        let mut config = Config::default();
        config.language = " Python ".to_string();
        config.validate(&["javascript", "python"]);
        assert_eq!(config.language, "python");
    }
}
