use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::progress::ProgressStats;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstRace,
    TenRaces,
    FiftyRaces,
    Perfect,
    SpeedDemon,
    WeekStreak,
}

impl AchievementId {
    pub fn as_str(self) -> &'static str {
        match self {
            AchievementId::FirstRace => "first_race",
            AchievementId::TenRaces => "ten_races",
            AchievementId::FiftyRaces => "fifty_races",
            AchievementId::Perfect => "perfect",
            AchievementId::SpeedDemon => "speed_demon",
            AchievementId::WeekStreak => "week_streak",
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct AchievementDefinition {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub xp_reward: u64,
    /// Called with `(old_stats, new_stats)` after a session has been folded in.
    pub predicate: fn(&ProgressStats, &ProgressStats) -> bool,
}

impl fmt::Debug for AchievementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AchievementDefinition")
            .field("id", &self.id)
            .field("xp_reward", &self.xp_reward)
            .finish_non_exhaustive()
    }
}

impl AchievementDefinition {
    pub fn is_met(&self, old: &ProgressStats, new: &ProgressStats) -> bool {
        (self.predicate)(old, new)
    }
}

/// Evaluated in this order; unlocks are reported in the same order.
pub const ACHIEVEMENTS: &[AchievementDefinition] = &[
    AchievementDefinition {
        id: AchievementId::FirstRace,
        name: "First Steps",
        description: "Complete your first race",
        xp_reward: 50,
        predicate: |_, new| new.total_sessions == 1,
    },
    AchievementDefinition {
        id: AchievementId::TenRaces,
        name: "Getting Started",
        description: "Complete 10 races",
        xp_reward: 100,
        predicate: |old, new| new.total_sessions == 10 && old.total_sessions < 10,
    },
    AchievementDefinition {
        id: AchievementId::FiftyRaces,
        name: "Dedicated Typer",
        description: "Complete 50 races",
        xp_reward: 250,
        predicate: |old, new| new.total_sessions == 50 && old.total_sessions < 50,
    },
    AchievementDefinition {
        id: AchievementId::Perfect,
        name: "Perfectionist",
        description: "100% accuracy in a race",
        xp_reward: 150,
        predicate: |old, new| new.perfect_sessions == 1 && old.perfect_sessions == 0,
    },
    AchievementDefinition {
        id: AchievementId::SpeedDemon,
        name: "Speed Demon",
        description: "Reach 60 WPM",
        xp_reward: 200,
        predicate: |old, new| new.best_wpm >= 60 && old.best_wpm < 60,
    },
    AchievementDefinition {
        id: AchievementId::WeekStreak,
        name: "Week Warrior",
        description: "7 day streak",
        xp_reward: 300,
        predicate: |old, new| new.streak_days == 7 && old.streak_days < 7,
    },
];

pub fn find(id: AchievementId) -> Option<&'static AchievementDefinition> {
    ACHIEVEMENTS.iter().find(|def| def.id == id)
}
