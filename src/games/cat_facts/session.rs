//! Stateful quiz session.
//!
//! [`GameSession`] owns the current [`SessionState`], the fact batch, the
//! picker and the high-score store. Every operation runs one pure
//! transition from [`super::rules`] and commits its result.

use super::action::{GameEvent, ScheduledEffect, Step, Transition};
use super::picker::{Dealer, FactPicker, RandomPicker};
use super::rules;
use super::state::SessionState;
use super::types::{Difficulty, EndCause, FactBatch, PowerUpKind, SessionPhase};
use crate::score_store::{ScoreStore, load_high_score};
use tracing::{debug, info, instrument, warn};

/// Reasons a session refuses to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    /// The fact batch is empty.
    #[display("No facts available")]
    NoFactsAvailable,
}

/// One player's quiz session.
#[derive(Debug)]
pub struct GameSession {
    state: SessionState,
    batch: FactBatch,
    picker: Box<dyn FactPicker>,
    store: Box<dyn ScoreStore>,
}

impl GameSession {
    /// Creates a session over `batch`, reading the high score from `store`.
    #[instrument(skip_all, fields(batch_len = batch.len()))]
    pub fn new(batch: FactBatch, store: impl ScoreStore + 'static) -> Self {
        let high_score = load_high_score(&store);
        info!(high_score, "Creating game session");
        Self {
            state: SessionState::new(Difficulty::default(), high_score),
            batch,
            picker: Box::new(RandomPicker::new()),
            store: Box::new(store),
        }
    }

    /// Replaces the fact picker.
    pub fn with_picker(mut self, picker: impl FactPicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    /// Sets the difficulty for the games that follow.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.state.difficulty = difficulty;
        self
    }

    /// Returns the current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the fact batch.
    pub fn batch(&self) -> &FactBatch {
        &self.batch
    }

    /// Swaps in a refreshed batch. The fact in play is kept.
    #[instrument(skip_all, fields(batch_len = batch.len()))]
    pub fn replace_batch(&mut self, batch: FactBatch) {
        debug!("Replacing fact batch");
        self.batch = batch;
    }

    /// Returns true if an effect still belongs to the running game.
    pub fn is_current(&self, effect: &ScheduledEffect) -> bool {
        effect.token().generation() == self.state.generation
    }

    /// Starts a game.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoFactsAvailable`] if the batch is empty.
    /// Starting while a game runs is a no-op, not an error.
    #[instrument(skip(self), fields(phase = %self.state.phase()))]
    pub fn start(&mut self) -> Result<Step, SessionError> {
        if self.batch.is_empty()
            && matches!(
                self.state.phase(),
                SessionPhase::NotStarted | SessionPhase::Ended
            )
        {
            warn!("Cannot start without facts");
            return Err(SessionError::NoFactsAvailable);
        }
        let state = std::mem::take(&mut self.state);
        let mut dealer = Dealer::new(&self.batch, self.picker.as_mut());
        let transition = rules::start(state, &mut dealer);
        Ok(self.commit(transition))
    }

    /// Advances the clock by one second.
    #[instrument(skip(self))]
    pub fn tick(&mut self) -> Step {
        let state = std::mem::take(&mut self.state);
        self.commit(rules::tick(state))
    }

    /// Answers the fact in play.
    #[instrument(skip(self))]
    pub fn answer(&mut self, choice: bool) -> Step {
        let state = std::mem::take(&mut self.state);
        self.commit(rules::answer(state, choice))
    }

    /// Uses a power-up.
    #[instrument(skip(self))]
    pub fn apply_power_up(&mut self, kind: PowerUpKind) -> Step {
        let state = std::mem::take(&mut self.state);
        let mut dealer = Dealer::new(&self.batch, self.picker.as_mut());
        let transition = rules::apply_power_up(state, kind, &mut dealer);
        self.commit(transition)
    }

    /// Freezes the clock.
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> Step {
        let state = std::mem::take(&mut self.state);
        self.commit(rules::pause(state))
    }

    /// Unfreezes the clock.
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> Step {
        let state = std::mem::take(&mut self.state);
        self.commit(rules::resume(state))
    }

    /// Ends the running game.
    #[instrument(skip(self))]
    pub fn end(&mut self, cause: EndCause) -> Step {
        let state = std::mem::take(&mut self.state);
        self.commit(rules::end(state, cause))
    }

    /// Returns to the not-started phase.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Step {
        let state = std::mem::take(&mut self.state);
        self.commit(rules::reset(state))
    }

    /// Delivers a deferred effect. Stale effects are ignored.
    #[instrument(skip(self))]
    pub fn fire(&mut self, effect: ScheduledEffect) -> Step {
        let state = std::mem::take(&mut self.state);
        let mut dealer = Dealer::new(&self.batch, self.picker.as_mut());
        let transition = rules::fire(state, effect, &mut dealer);
        self.commit(transition)
    }

    /// Installs the new state and persists a beaten high score.
    fn commit(&mut self, transition: Transition) -> Step {
        let Transition {
            state,
            events,
            effects,
        } = transition;
        self.state = state;

        for event in &events {
            if let GameEvent::HighScoreBeaten { new, .. } = event
                && let Err(e) = self.store.write_high_score(*new)
            {
                warn!(error = %e, "Failed to persist high score");
            }
        }

        Step::new(events, effects)
    }
}
