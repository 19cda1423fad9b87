use serde::{Deserialize, Serialize};

use crate::session::result::{self, ScoreError, SessionResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterObservation {
    pub expected: char,
    pub typed: char,
    pub correct: bool,
    pub position: usize,
}

impl CharacterObservation {
    pub fn new(expected: char, typed: char, position: usize) -> Self {
        Self {
            expected,
            typed,
            correct: typed == expected,
            position,
        }
    }
}

/// One timed attempt at a snippet. Tracks the typed prefix as a list of
/// observations; the caller owns the clock and passes elapsed time in.
pub struct TypingSession {
    target: Vec<char>,
    observations: Vec<CharacterObservation>,
    duration_secs: u32,
}

impl TypingSession {
    pub fn new(text: &str, duration_secs: u32) -> Self {
        Self {
            target: text.chars().collect(),
            observations: Vec::new(),
            duration_secs,
        }
    }

    pub fn target_text(&self) -> String {
        self.target.iter().collect()
    }

    pub fn typed_text(&self) -> String {
        self.observations.iter().map(|o| o.typed).collect()
    }

    pub fn observations(&self) -> &[CharacterObservation] {
        &self.observations
    }

    pub fn cursor(&self) -> usize {
        self.observations.len()
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn is_complete(&self) -> bool {
        self.cursor() >= self.target.len()
    }

    pub fn is_expired(&self, elapsed_secs: f64) -> bool {
        elapsed_secs >= self.duration_secs as f64
    }

    pub fn time_left_secs(&self, elapsed_secs: f64) -> u32 {
        let left = self.duration_secs as f64 - elapsed_secs.max(0.0);
        left.max(0.0).ceil() as u32
    }

    /// Record a keystroke at the cursor. Input past the end of the target is
    /// dropped and yields `None`.
    pub fn type_char(&mut self, ch: char) -> Option<CharacterObservation> {
        if self.is_complete() {
            return None;
        }
        let position = self.cursor();
        let observation = CharacterObservation::new(self.target[position], ch, position);
        self.observations.push(observation);
        Some(observation)
    }

    pub fn backspace(&mut self) {
        self.observations.pop();
    }

    /// Replace the whole input, e.g. from a text field. Characters beyond the
    /// target length are discarded.
    pub fn set_input(&mut self, text: &str) {
        self.observations = text
            .chars()
            .zip(self.target.iter())
            .enumerate()
            .map(|(position, (typed, &expected))| {
                CharacterObservation::new(expected, typed, position)
            })
            .collect();
    }

    pub fn live_result(&self, elapsed_secs: f64) -> Result<SessionResult, ScoreError> {
        result::score(
            &self.target_text(),
            &self.typed_text(),
            elapsed_secs,
            self.time_left_secs(elapsed_secs),
            self.duration_secs,
        )
    }

    /// Final result, on time-out or when the whole snippet has been typed.
    pub fn finish(&self, elapsed_secs: f64) -> Result<SessionResult, ScoreError> {
        let elapsed_secs = elapsed_secs.min(self.duration_secs as f64);
        self.live_result(elapsed_secs)
    }
}
