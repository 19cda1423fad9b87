use serde::{Deserialize, Serialize};

use crate::session::result::SessionResult;

/// XP per level step: reaching level `L + 1` takes `L² * XP_PER_LEVEL_STEP`.
pub const XP_PER_LEVEL_STEP: u64 = 50;

pub fn session_xp(result: &SessionResult) -> u64 {
    let wpm = result.wpm as u64;
    let accuracy = result.accuracy;
    let mut xp = 0;

    if result.completed || result.correct_chars > 0 {
        xp += 10;
    }

    xp += wpm;

    xp += match accuracy {
        95.. => 50,
        90..=94 => 30,
        80..=89 => 15,
        70..=79 => 5,
        _ => 0,
    };

    xp += match wpm {
        80.. => 40,
        60..=79 => 25,
        40..=59 => 10,
        _ => 0,
    };

    if accuracy == 100 && wpm >= 40 {
        xp += 100;
    }

    if result.completed {
        xp += 25;
    }

    xp
}

/// `floor(sqrt(xp / 50)) + 1`, in integer arithmetic so threshold values land
/// exactly on their level.
pub fn level_from_xp(total_xp: u64) -> u32 {
    let quotient = total_xp / XP_PER_LEVEL_STEP;
    let mut root = (quotient as f64).sqrt() as u64;
    while root * root > quotient {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= quotient {
        root += 1;
    }
    root as u32 + 1
}

pub fn xp_for_level(level: u32) -> u64 {
    (level as u64).pow(2) * XP_PER_LEVEL_STEP
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub current_level_xp: u64,
    pub next_level_xp: u64,
    pub percent: f64,
}

impl LevelProgress {
    pub fn from_xp(total_xp: u64) -> Self {
        let level = level_from_xp(total_xp);
        let current_level_xp = xp_for_level(level - 1);
        let next_level_xp = xp_for_level(level);
        let span = (next_level_xp - current_level_xp) as f64;
        let percent = (total_xp - current_level_xp) as f64 / span * 100.0;
        Self {
            level,
            current_level_xp,
            next_level_xp,
            percent,
        }
    }

    pub fn xp_to_next_level(&self, total_xp: u64) -> u64 {
        self.next_level_xp.saturating_sub(total_xp)
    }
}
