pub mod rotation;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use rotation::SnippetRotation;

#[derive(Embed)]
#[folder = "assets/snippets/"]
struct SnippetAssets;

const BUNDLED_LIBRARY: &str = "library.json";

#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("no snippets found for {language} - {difficulty}")]
    NoSnippets {
        language: String,
        difficulty: Difficulty,
    },
    #[error("bundled snippet library is missing")]
    MissingBundle,
    #[error("failed to read snippet library: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse snippet library: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub language: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub code: String,
}

/// Snippets grouped by language key, then difficulty.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetLibrary {
    languages: BTreeMap<String, BTreeMap<Difficulty, Vec<Snippet>>>,
}

impl SnippetLibrary {
    pub fn builtin() -> Result<Self, SnippetError> {
        let file = SnippetAssets::get(BUNDLED_LIBRARY).ok_or(SnippetError::MissingBundle)?;
        Ok(serde_json::from_slice(file.data.as_ref())?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnippetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SnippetError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn languages(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }

    pub fn snippets(&self, language: &str, difficulty: Difficulty) -> &[Snippet] {
        self.languages
            .get(language)
            .and_then(|by_difficulty| by_difficulty.get(&difficulty))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find(&self, id: &str) -> Option<&Snippet> {
        self.languages
            .values()
            .flat_map(|by_difficulty| by_difficulty.values())
            .flatten()
            .find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_library_loads() {
        let library = SnippetLibrary::builtin().unwrap();
        for language in ["javascript", "python", "typescript", "java", "rust"] {
            assert!(library.languages().contains(&language), "missing {language}");
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                let snippets = library.snippets(language, difficulty);
                assert!(!snippets.is_empty(), "no {language} {difficulty} snippets");
                for snippet in snippets {
                    assert_eq!(snippet.language, language);
                    assert_eq!(snippet.difficulty, difficulty);
                    assert!(!snippet.code.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let library = SnippetLibrary::builtin().unwrap();
        let mut seen = std::collections::HashSet::new();
        for by_difficulty in library.languages.values() {
            for snippet in by_difficulty.values().flatten() {
                assert!(seen.insert(snippet.id.clone()), "duplicate id {}", snippet.id);
            }
        }
    }

    #[test]
    fn test_unknown_language_has_no_snippets() {
        let library = SnippetLibrary::builtin().unwrap();
        assert!(library.snippets("cobol", Difficulty::Easy).is_empty());
    }

    #[test]
    fn test_from_json_and_find() {
        let json = r#"{
            "go": {
                "easy": [
                    {"id": "go-e-1", "language": "go", "difficulty": "easy",
                     "description": "Print", "code": "fmt.Println(\"hi\")"}
                ]
            }
        }"#;
        let library = SnippetLibrary::from_json(json).unwrap();
        assert_eq!(library.languages(), vec!["go"]);
        assert_eq!(library.find("go-e-1").unwrap().description, "Print");
        assert!(library.find("go-e-2").is_none());
    }
}
