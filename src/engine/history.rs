use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::session::result::SessionResult;
use crate::snippets::Difficulty;

const TOP_MISSED_LIMIT: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    pub recorded_at: DateTime<Utc>,
    pub language: String,
    pub difficulty: Difficulty,
    pub result: SessionResult,
    #[serde(default)]
    pub missed: BTreeMap<char, u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Day,
    Week,
    Month,
    All,
}

impl Timeframe {
    fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Timeframe::Day => Some(now - Duration::hours(24)),
            Timeframe::Week => Some(now - Duration::days(7)),
            Timeframe::Month => Some(now - Duration::days(30)),
            Timeframe::All => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_sessions: usize,
    pub avg_wpm: u32,
    pub avg_accuracy: u32,
    pub total_time_secs: u64,
    pub best_wpm: u32,
    pub top_missed: Vec<(char, u32)>,
}

impl HistorySummary {
    /// Aggregate the records inside `timeframe`. Returns `None` when the window
    /// holds no sessions.
    pub fn from_records(
        records: &[SessionRecord],
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let cutoff = timeframe.cutoff(now);
        let window: Vec<&SessionRecord> = records
            .iter()
            .filter(|r| cutoff.is_none_or(|c| r.recorded_at >= c))
            .collect();
        if window.is_empty() {
            return None;
        }

        let n = window.len() as f64;
        let avg_wpm = window.iter().map(|r| r.result.wpm as f64).sum::<f64>() / n;
        let avg_accuracy = window.iter().map(|r| r.result.accuracy as f64).sum::<f64>() / n;
        let total_time: f64 = window.iter().map(|r| r.result.elapsed_secs).sum();
        let best_wpm = window.iter().map(|r| r.result.wpm).max().unwrap_or(0);

        let mut missed: BTreeMap<char, u32> = BTreeMap::new();
        for record in &window {
            for (&ch, &count) in &record.missed {
                *missed.entry(ch).or_insert(0) += count;
            }
        }
        let mut top_missed: Vec<(char, u32)> = missed.into_iter().collect();
        // Stable sort keeps ties in char order.
        top_missed.sort_by(|a, b| b.1.cmp(&a.1));
        top_missed.truncate(TOP_MISSED_LIMIT);

        Some(Self {
            total_sessions: window.len(),
            avg_wpm: avg_wpm.round() as u32,
            avg_accuracy: avg_accuracy.round() as u32,
            total_time_secs: total_time.round() as u64,
            best_wpm,
            top_missed,
        })
    }
}

/// Append a record, dropping the oldest ones beyond `limit`.
pub fn push_bounded(history: &mut Vec<SessionRecord>, record: SessionRecord, limit: usize) {
    history.push(record);
    if history.len() > limit {
        let excess = history.len() - limit;
        history.drain(..excess);
    }
}
