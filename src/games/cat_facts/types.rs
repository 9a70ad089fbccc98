//! Core domain types for the cat-fact quiz.

use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Seconds on the clock at the start of every turn.
pub const TURN_SECONDS: u32 = 30;

/// Seconds added by the extra-time power-up.
pub const EXTRA_TIME_SECONDS: u32 = 15;

/// Upper bound for the turn clock (base turn plus one extension).
pub const MAX_TURN_SECONDS: u32 = TURN_SECONDS + EXTRA_TIME_SECONDS;

/// Lives at the start of every game.
pub const STARTING_LIVES: u8 = 3;

/// A single cat fact as served by the facts API.
///
/// The wire format is `{ "fact": "...", "length": 42 }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Fact {
    /// Statement shown to the player.
    #[serde(rename = "fact")]
    text: String,
    /// Length reported by the source (not necessarily `text.len()`).
    length: usize,
}

impl Fact {
    /// Creates a fact whose length is the character count of its text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self { text, length }
    }

    /// Returns the statement text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the reported length.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A pre-fetched batch of facts the session draws from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
pub struct FactBatch {
    facts: Vec<Fact>,
}

impl FactBatch {
    /// Creates a batch from a list of facts.
    pub fn new(facts: Vec<Fact>) -> Self {
        Self { facts }
    }

    /// Returns the number of facts.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if the batch holds no facts.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Returns the fact at `index`.
    pub fn get(&self, index: usize) -> Option<&Fact> {
        self.facts.get(index)
    }

    /// Iterates over the facts in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Fact> {
        self.facts.iter()
    }
}

impl<'a> IntoIterator for &'a FactBatch {
    type Item = &'a Fact;
    type IntoIter = std::slice::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}

/// Game difficulty. Scales base points and XP gain.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// 10 base points, 1x XP.
    #[default]
    Easy,
    /// 15 base points, 1.5x XP.
    Medium,
    /// 20 base points, 2x XP.
    Hard,
}

impl Difficulty {
    /// Points awarded for any correct answer before bonuses.
    #[instrument]
    pub fn base_points(self) -> u64 {
        match self {
            Self::Easy => 10,
            Self::Medium => 15,
            Self::Hard => 20,
        }
    }

    /// Multiplier applied to points when converting them to XP.
    #[instrument]
    pub fn xp_multiplier(self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Medium => 1.5,
            Self::Hard => 2.0,
        }
    }
}

/// Single-use consumables available during a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PowerUpKind {
    /// Adds fifteen seconds to the turn clock.
    ExtraTime,
    /// Doubles the current score.
    DoublePoints,
    /// Replaces the current fact and restarts the clock.
    SkipQuestion,
}

/// Remaining uses per power-up kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUpInventory {
    extra_time: u32,
    double_points: u32,
    skip_question: u32,
}

impl PowerUpInventory {
    /// Uses of each kind granted at the start of every game.
    pub const DEFAULT_ALLOTMENT: u32 = 1;

    /// Creates an inventory with explicit counts.
    pub fn new(extra_time: u32, double_points: u32, skip_question: u32) -> Self {
        Self {
            extra_time,
            double_points,
            skip_question,
        }
    }

    /// Returns the remaining uses of `kind`.
    pub fn remaining(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::ExtraTime => self.extra_time,
            PowerUpKind::DoublePoints => self.double_points,
            PowerUpKind::SkipQuestion => self.skip_question,
        }
    }

    /// Consumes one use of `kind`. Returns false if none were left.
    pub fn consume(&mut self, kind: PowerUpKind) -> bool {
        let slot = match kind {
            PowerUpKind::ExtraTime => &mut self.extra_time,
            PowerUpKind::DoublePoints => &mut self.double_points,
            PowerUpKind::SkipQuestion => &mut self.skip_question,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

impl Default for PowerUpInventory {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ALLOTMENT,
            Self::DEFAULT_ALLOTMENT,
            Self::DEFAULT_ALLOTMENT,
        )
    }
}

/// Lifecycle phase of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum SessionPhase {
    /// Waiting for `start`.
    #[default]
    NotStarted,
    /// A turn is live and the clock runs.
    Playing,
    /// Clock frozen, answers rejected.
    Paused,
    /// Game over; aggregates folded in.
    Ended,
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum EndCause {
    /// The turn clock reached zero.
    Timeout,
    /// The last life was lost.
    LivesExhausted,
    /// The player ended the game.
    Quit,
}
