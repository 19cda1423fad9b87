use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::session::result::SessionResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharCategory {
    Letters,
    Numbers,
    Symbols,
    Whitespace,
}

impl CharCategory {
    pub fn of(ch: char) -> Self {
        if ch.is_ascii_alphabetic() {
            CharCategory::Letters
        } else if ch.is_ascii_digit() {
            CharCategory::Numbers
        } else if ch.is_whitespace() {
            CharCategory::Whitespace
        } else {
            CharCategory::Symbols
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTally {
    pub correct: usize,
    pub total: usize,
}

impl CategoryTally {
    pub fn accuracy(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.correct as f64 / self.total as f64 * 100.0).round() as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharStatus {
    Correct,
    Incorrect,
    Missing,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparedChar {
    pub index: usize,
    pub target: Option<char>,
    pub typed: Option<char>,
    pub status: CharStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceRating {
    Excellent,
    Good,
    Average,
    KeepPracticing,
}

impl PerformanceRating {
    pub fn from_result(result: &SessionResult) -> Self {
        let (wpm, accuracy) = (result.wpm, result.accuracy);
        if wpm >= 60 && accuracy >= 95 {
            PerformanceRating::Excellent
        } else if wpm >= 40 && accuracy >= 90 {
            PerformanceRating::Good
        } else if wpm >= 25 && accuracy >= 80 {
            PerformanceRating::Average
        } else {
            PerformanceRating::KeepPracticing
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceRating::Excellent => "Excellent",
            PerformanceRating::Good => "Good",
            PerformanceRating::Average => "Average",
            PerformanceRating::KeepPracticing => "Keep Practicing",
        }
    }
}

/// Post-session breakdown shown alongside the headline numbers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionAnalysis {
    pub categories: BTreeMap<CharCategory, CategoryTally>,
    pub comparison: Vec<ComparedChar>,
    pub missed: BTreeMap<char, u32>,
    pub words_typed: u64,
    pub time_used_secs: u32,
    pub errors_per_minute: f64,
    pub rating: PerformanceRating,
}

impl SessionAnalysis {
    pub fn new(target: &str, typed: &str, result: &SessionResult) -> Self {
        let target: Vec<char> = target.chars().collect();
        let typed: Vec<char> = typed.chars().collect();

        let mut categories: BTreeMap<CharCategory, CategoryTally> = [
            CharCategory::Letters,
            CharCategory::Numbers,
            CharCategory::Symbols,
            CharCategory::Whitespace,
        ]
        .into_iter()
        .map(|c| (c, CategoryTally::default()))
        .collect();
        let mut missed = BTreeMap::new();

        for (&expected, &actual) in target.iter().zip(typed.iter()) {
            let tally = categories.entry(CharCategory::of(expected)).or_default();
            tally.total += 1;
            if expected == actual {
                tally.correct += 1;
            } else {
                *missed.entry(expected).or_insert(0) += 1;
            }
        }

        let comparison = (0..target.len().max(typed.len()))
            .map(|index| {
                let t = target.get(index).copied();
                let u = typed.get(index).copied();
                let status = match u {
                    None => CharStatus::Missing,
                    Some(u) if Some(u) == t => CharStatus::Correct,
                    Some(_) => CharStatus::Incorrect,
                };
                ComparedChar {
                    index,
                    target: t,
                    typed: u,
                    status,
                }
            })
            .collect();

        let time_used_secs = result
            .original_duration_secs
            .saturating_sub(result.time_left_secs);
        let errors_per_minute = if time_used_secs == 0 {
            0.0
        } else {
            result.incorrect_chars as f64 / (time_used_secs as f64 / 60.0)
        };

        Self {
            categories,
            comparison,
            missed,
            words_typed: result.words_typed(),
            time_used_secs,
            errors_per_minute,
            rating: PerformanceRating::from_result(result),
        }
    }
}
