//! Level table and achievement catalog.

use super::state::SessionState;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A progression tier unlocked by accumulated XP.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Level {
    level: u32,
    xp_threshold: f64,
    rewards: &'static [&'static str],
}

impl Level {
    /// Returns the level number.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Returns the XP needed to reach this level.
    pub fn xp_threshold(&self) -> f64 {
        self.xp_threshold
    }

    /// Returns the cosmetic rewards listed for this level.
    pub fn rewards(&self) -> &'static [&'static str] {
        self.rewards
    }
}

/// Ordered level table. Thresholds are strictly increasing.
pub const LEVELS: [Level; 5] = [
    Level {
        level: 1,
        xp_threshold: 0.0,
        rewards: &["Basic facts"],
    },
    Level {
        level: 2,
        xp_threshold: 100.0,
        rewards: &["Intermediate facts", "New avatars"],
    },
    Level {
        level: 3,
        xp_threshold: 300.0,
        rewards: &["Advanced facts", "Special themes"],
    },
    Level {
        level: 4,
        xp_threshold: 600.0,
        rewards: &["Rare facts", "Visual effects"],
    },
    Level {
        level: 5,
        xp_threshold: 1000.0,
        rewards: &["Every fact", "Every reward"],
    },
];

/// Returns the level a session should move to after an XP change.
///
/// Picks the highest level whose threshold is covered by `xp` and that is
/// above `current`. `None` means no change.
#[instrument]
pub fn level_up(current: u32, xp: f64) -> Option<u32> {
    LEVELS
        .iter()
        .filter(|entry| entry.xp_threshold <= xp && entry.level > current)
        .map(|entry| entry.level)
        .max()
}

/// Returns the highest level covered by `xp`.
#[instrument]
pub fn level_for_xp(xp: f64) -> u32 {
    level_up(0, xp).unwrap_or(1)
}

/// Score that earns [`Achievement::CatMaster`].
pub const CAT_MASTER_SCORE: u64 = 1000;
/// Streak that earns [`Achievement::PerfectStreak`].
pub const PERFECT_STREAK: u32 = 10;
/// Games played that earn [`Achievement::Survivor`].
pub const SURVIVOR_GAMES: u32 = 5;
/// Other achievements needed for [`Achievement::Collector`].
pub const COLLECTOR_COUNT: usize = 5;
/// Quick games needed for [`Achievement::TimeMaster`].
pub const TIME_MASTER_GAMES: u32 = 10;
/// A game shorter than this many seconds of play counts as quick.
pub const QUICK_GAME_SECONDS: u32 = 300;

/// One-way unlockable badges. Ids are stable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum Achievement {
    /// Complete a first game.
    FirstStep,
    /// Reach 1000 points.
    CatMaster,
    /// Answer 10 facts in a row correctly.
    PerfectStreak,
    /// Play 5 games.
    Survivor,
    /// Unlock 5 other achievements.
    Collector,
    /// Complete 10 games in under 5 minutes each.
    TimeMaster,
}

impl Achievement {
    /// Returns the stable catalog id.
    pub fn id(self) -> u32 {
        match self {
            Self::FirstStep => 1,
            Self::CatMaster => 2,
            Self::PerfectStreak => 3,
            Self::Survivor => 4,
            Self::Collector => 5,
            Self::TimeMaster => 6,
        }
    }

    /// Looks up an achievement by catalog id.
    pub fn from_id(id: u32) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|achievement| achievement.id() == id)
    }

    /// Returns the display title.
    pub fn title(self) -> &'static str {
        match self {
            Self::FirstStep => "First Step",
            Self::CatMaster => "Cat Master",
            Self::PerfectStreak => "Perfect Streak",
            Self::Survivor => "Survivor",
            Self::Collector => "Collector",
            Self::TimeMaster => "Time Master",
        }
    }

    /// Returns the unlock condition as shown to players.
    pub fn description(self) -> &'static str {
        match self {
            Self::FirstStep => "Complete your first game",
            Self::CatMaster => "Reach 1000 points",
            Self::PerfectStreak => "Answer 10 facts in a row",
            Self::Survivor => "Play 5 games",
            Self::Collector => "Unlock 5 achievements",
            Self::TimeMaster => "Complete 10 games in under 5 minutes",
        }
    }

    /// Evaluates the unlock predicate against session stats.
    pub fn is_earned(self, state: &SessionState) -> bool {
        match self {
            Self::FirstStep => state.games_played() >= 1,
            Self::CatMaster => state.score() >= CAT_MASTER_SCORE,
            Self::PerfectStreak => state.best_streak() >= PERFECT_STREAK,
            Self::Survivor => state.games_played() >= SURVIVOR_GAMES,
            Self::Collector => {
                state
                    .unlocked_achievements()
                    .iter()
                    .filter(|unlocked| **unlocked != Self::Collector)
                    .count()
                    >= COLLECTOR_COUNT
            }
            Self::TimeMaster => state.quick_games() >= TIME_MASTER_GAMES,
        }
    }
}

impl std::fmt::Display for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}", self.id(), self.title())
    }
}
