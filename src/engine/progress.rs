use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::achievements::{ACHIEVEMENTS, AchievementDefinition, AchievementId};
use crate::engine::scoring::{self, LevelProgress};
use crate::session::result::SessionResult;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total_sessions: u32,
    pub total_words_typed: u64,
    pub total_time_secs: f64,
    pub best_wpm: u32,
    pub best_accuracy: u32,
    pub perfect_sessions: u32,
    pub streak_days: u32,
    #[serde(default)]
    pub best_streak: u32,
    pub last_session_date: Option<NaiveDate>,
}

impl ProgressStats {
    /// Stats after one more session on `today`.
    pub fn fold(&self, result: &SessionResult, today: NaiveDate) -> Self {
        let streak_days = next_streak(self.last_session_date, self.streak_days, today);
        Self {
            total_sessions: self.total_sessions + 1,
            total_words_typed: self.total_words_typed + result.words_typed(),
            total_time_secs: self.total_time_secs + result.elapsed_secs,
            best_wpm: self.best_wpm.max(result.wpm),
            best_accuracy: self.best_accuracy.max(result.accuracy),
            perfect_sessions: self.perfect_sessions + u32::from(result.is_perfect()),
            streak_days,
            best_streak: self.best_streak.max(streak_days),
            last_session_date: Some(today),
        }
    }
}

/// Calendar-day streak: practising yesterday extends it, practising again
/// today leaves it alone, anything else starts over at 1.
fn next_streak(last: Option<NaiveDate>, streak: u32, today: NaiveDate) -> u32 {
    match last {
        Some(last) if last == today => streak,
        Some(last) if today.pred_opt() == Some(last) => streak + 1,
        _ => 1,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub total_xp: u64,
    pub stats: ProgressStats,
    pub achievements: BTreeSet<AchievementId>,
}

impl UserProgress {
    pub fn level(&self) -> u32 {
        scoring::level_from_xp(self.total_xp)
    }

    pub fn level_progress(&self) -> LevelProgress {
        LevelProgress::from_xp(self.total_xp)
    }

    pub fn has_achievement(&self, id: AchievementId) -> bool {
        self.achievements.contains(&id)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Debug)]
pub struct SessionOutcome {
    /// Session XP plus rewards of achievements unlocked by this session.
    pub earned_xp: u64,
    pub progress: UserProgress,
    pub newly_unlocked: Vec<&'static AchievementDefinition>,
}

impl SessionOutcome {
    pub fn level(&self) -> u32 {
        self.progress.level()
    }
}

/// Fold one finished session into a user's progress.
///
/// Each call counts as a new session, so the caller must apply a given result
/// at most once. Achievements already held are never granted again.
pub fn apply_session(
    progress: &UserProgress,
    result: &SessionResult,
    today: NaiveDate,
) -> SessionOutcome {
    let old_stats = &progress.stats;
    let new_stats = old_stats.fold(result, today);

    let mut achievements = progress.achievements.clone();
    let mut newly_unlocked = Vec::new();
    let mut earned_xp = scoring::session_xp(result);

    for def in ACHIEVEMENTS {
        if def.is_met(old_stats, &new_stats) && achievements.insert(def.id) {
            log::info!("achievement unlocked: {} (+{} xp)", def.id, def.xp_reward);
            earned_xp += def.xp_reward;
            newly_unlocked.push(def);
        }
    }

    let new_progress = UserProgress {
        total_xp: progress.total_xp + earned_xp,
        stats: new_stats,
        achievements,
    };

    let (old_level, new_level) = (progress.level(), new_progress.level());
    if new_level > old_level {
        log::info!("level up: {old_level} -> {new_level}");
    }
    log::debug!(
        "applied session: +{earned_xp} xp, total {}",
        new_progress.total_xp
    );

    SessionOutcome {
        earned_xp,
        progress: new_progress,
        newly_unlocked,
    }
}
