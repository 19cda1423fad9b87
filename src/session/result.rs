use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters per "word" in the WPM convention.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Shortest elapsed time used for WPM so an instant finish can't divide by ~0.
pub const MIN_ELAPSED_SECS: f64 = 1.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("typed input is {typed} chars but the target is only {target}")]
    InvalidInputLength { typed: usize, target: usize },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub total_chars: usize,
    pub accuracy: u32,
    pub wpm: u32,
    pub elapsed_secs: f64,
    pub completed: bool,
    pub time_left_secs: u32,
    pub original_duration_secs: u32,
}

impl SessionResult {
    pub fn is_perfect(&self) -> bool {
        self.accuracy == 100
    }

    pub fn words_typed(&self) -> u64 {
        (self.correct_chars / CHARS_PER_WORD as usize) as u64
    }
}

/// Score what has been typed so far against the target snippet.
///
/// Only the attempted prefix is scored: target characters past the end of
/// `typed` are neither correct nor errors. Calling this repeatedly on a growing
/// prefix gives the live WPM/accuracy readout.
pub fn score(
    target: &str,
    typed: &str,
    elapsed_secs: f64,
    time_left_secs: u32,
    original_duration_secs: u32,
) -> Result<SessionResult, ScoreError> {
    let target_len = target.chars().count();
    let typed_len = typed.chars().count();
    if typed_len > target_len {
        log::warn!("rejecting typed input of {typed_len} chars for a {target_len} char target");
        return Err(ScoreError::InvalidInputLength {
            typed: typed_len,
            target: target_len,
        });
    }

    let correct_chars = typed
        .chars()
        .zip(target.chars())
        .filter(|(t, e)| t == e)
        .count();
    let total_chars = typed_len;
    let incorrect_chars = total_chars - correct_chars;

    let elapsed_secs = clamp_elapsed(elapsed_secs);

    let result = SessionResult {
        correct_chars,
        incorrect_chars,
        total_chars,
        accuracy: accuracy_percent(correct_chars, total_chars),
        wpm: words_per_minute(correct_chars, elapsed_secs),
        elapsed_secs,
        completed: typed == target,
        time_left_secs,
        original_duration_secs,
    };
    log::debug!(
        "scored session: {}/{} correct, {} wpm, {}% accuracy",
        result.correct_chars,
        result.total_chars,
        result.wpm,
        result.accuracy
    );
    Ok(result)
}

fn clamp_elapsed(elapsed_secs: f64) -> f64 {
    if elapsed_secs.is_finite() {
        elapsed_secs.max(MIN_ELAPSED_SECS)
    } else {
        MIN_ELAPSED_SECS
    }
}

/// Rounded percentage of correct characters. Nothing typed scores 0, not 100.
pub fn accuracy_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round() as u32
}

pub fn words_per_minute(correct: usize, elapsed_secs: f64) -> u32 {
    let minutes = clamp_elapsed(elapsed_secs) / 60.0;
    ((correct as f64 / CHARS_PER_WORD) / minutes).round() as u32
}
