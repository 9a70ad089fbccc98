//! Session state snapshot.
//!
//! Fields are private to the game module; only [`super::rules`] changes
//! them, and only by producing a new value per transition.

use super::action::EffectToken;
use super::progression::Achievement;
use super::types::{
    Difficulty, EndCause, Fact, PowerUpInventory, STARTING_LIVES, SessionPhase, TURN_SECONDS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything a session knows, per game and across games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    // Per game
    pub(super) phase: SessionPhase,
    pub(super) end_cause: Option<EndCause>,
    pub(super) score: u64,
    pub(super) lives: u8,
    pub(super) streak: u32,
    pub(super) time_left: u32,
    pub(super) current_fact: Option<Fact>,
    pub(super) grading: Option<bool>,
    pub(super) power_ups: PowerUpInventory,
    pub(super) elapsed_seconds: u32,

    // Across games
    pub(super) difficulty: Difficulty,
    pub(super) high_score: u64,
    pub(super) games_played: u32,
    pub(super) quick_games: u32,
    pub(super) total_points: u64,
    pub(super) best_streak: u32,
    pub(super) xp: f64,
    pub(super) current_level: u32,
    pub(super) correct_answers: u32,
    pub(super) total_answers: u32,
    pub(super) accuracy: u32,
    pub(super) unlocked: BTreeSet<Achievement>,

    // Effect bookkeeping
    pub(super) generation: u64,
    pub(super) turn: u64,
}

impl SessionState {
    /// Creates a fresh state with a known high score.
    pub fn new(difficulty: Difficulty, high_score: u64) -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            end_cause: None,
            score: 0,
            lives: STARTING_LIVES,
            streak: 0,
            time_left: TURN_SECONDS,
            current_fact: None,
            grading: None,
            power_ups: PowerUpInventory::default(),
            elapsed_seconds: 0,
            difficulty,
            high_score,
            games_played: 0,
            quick_games: 0,
            total_points: 0,
            best_streak: 0,
            xp: 0.0,
            current_level: 1,
            correct_answers: 0,
            total_answers: 0,
            accuracy: 0,
            unlocked: BTreeSet::new(),
            generation: 0,
            turn: 0,
        }
    }

    /// Returns the lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns why the last game ended, while ended.
    pub fn end_cause(&self) -> Option<EndCause> {
        self.end_cause
    }

    /// Returns true while paused.
    pub fn is_paused(&self) -> bool {
        self.phase == SessionPhase::Paused
    }

    /// Returns true once the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    /// Returns the score of the current game.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Returns the remaining lives.
    pub fn lives(&self) -> u8 {
        self.lives
    }

    /// Returns the current run of correct answers.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Returns the seconds left on the turn clock.
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Returns the fact in play.
    pub fn current_fact(&self) -> Option<&Fact> {
        self.current_fact.as_ref()
    }

    /// Returns the last grade while it is still on display.
    pub fn grading(&self) -> Option<bool> {
        self.grading
    }

    /// Returns the power-up inventory.
    pub fn power_ups(&self) -> &PowerUpInventory {
        &self.power_ups
    }

    /// Returns the seconds of play in the current game.
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Returns the difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the best score on record.
    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Returns how many games have ended.
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Returns how many games ended in under five minutes of play.
    pub fn quick_games(&self) -> u32 {
        self.quick_games
    }

    /// Returns points earned across all games (power-up doubling excluded).
    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    /// Returns the longest streak seen.
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Returns accumulated XP.
    pub fn xp(&self) -> f64 {
        self.xp
    }

    /// Returns the current level.
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    /// Returns how many answers were correct.
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    /// Returns how many answers were graded.
    pub fn total_answers(&self) -> u32 {
        self.total_answers
    }

    /// Returns the rounded percentage of correct answers (0 before any).
    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    /// Returns the unlocked achievements.
    pub fn unlocked_achievements(&self) -> &BTreeSet<Achievement> {
        &self.unlocked
    }

    /// Returns true if `achievement` is unlocked.
    pub fn has_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    /// Returns the token effects scheduled now would carry.
    pub fn token(&self) -> EffectToken {
        EffectToken::new(self.generation, self.turn)
    }

    /// Puts a fact in play and restarts the clock.
    pub(super) fn present(&mut self, fact: Fact) {
        self.current_fact = Some(fact);
        self.time_left = TURN_SECONDS;
        self.grading = None;
        self.turn += 1;
    }

    /// Clears per-game fields, keeping aggregates.
    pub(super) fn clear_game(&mut self) {
        self.end_cause = None;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.streak = 0;
        self.time_left = TURN_SECONDS;
        self.current_fact = None;
        self.grading = None;
        self.power_ups = PowerUpInventory::default();
        self.elapsed_seconds = 0;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Difficulty::default(), 0)
    }
}
