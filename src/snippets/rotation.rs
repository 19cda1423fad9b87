use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::snippets::{Difficulty, Snippet, SnippetError, SnippetLibrary};

/// Upper bound on remembered ids per language/difficulty pair.
const MAX_RECENT: usize = 10;

/// Recently served snippet ids, keyed by `<language>_<difficulty>`, so a pick
/// avoids repeating until the pool runs dry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetRotation {
    used: BTreeMap<String, Vec<String>>,
}

fn rotation_key(language: &str, difficulty: Difficulty) -> String {
    format!("{language}_{difficulty}")
}

impl SnippetRotation {
    pub fn pick<'a, R: Rng + ?Sized>(
        &mut self,
        library: &'a SnippetLibrary,
        language: &str,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<&'a Snippet, SnippetError> {
        let snippets = library.snippets(language, difficulty);
        if snippets.is_empty() {
            return Err(SnippetError::NoSnippets {
                language: language.to_string(),
                difficulty,
            });
        }

        let key = rotation_key(language, difficulty);
        let used = self.used.entry(key).or_default();

        let mut available: Vec<&Snippet> = snippets
            .iter()
            .filter(|s| !used.contains(&s.id))
            .collect();
        if available.is_empty() {
            log::warn!("every {language} {difficulty} snippet was used recently, resetting");
            used.clear();
            available = snippets.iter().collect();
        }

        let selected = available[rng.gen_range(0..available.len())];
        used.push(selected.id.clone());

        let max_history = (snippets.len() - 1).min(MAX_RECENT);
        if used.len() > max_history {
            let excess = used.len() - max_history;
            used.drain(..excess);
        }

        log::debug!("picked snippet {} for {language} {difficulty}", selected.id);
        Ok(selected)
    }

    pub fn recent(&self, language: &str, difficulty: Difficulty) -> &[String] {
        self.used
            .get(&rotation_key(language, difficulty))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn reset(&mut self, language: &str, difficulty: Difficulty) {
        if let Some(used) = self.used.get_mut(&rotation_key(language, difficulty)) {
            used.clear();
        }
    }

    pub fn clear(&mut self) {
        self.used.clear();
    }
}
