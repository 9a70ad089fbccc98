//! Domain events and deferred effects.
//!
//! Transitions never touch clocks or I/O. They report what happened as
//! [`GameEvent`]s and ask for delayed work through [`ScheduledEffect`]s,
//! which the driver delivers back once the delay has elapsed.

use super::progression::Achievement;
use super::state::SessionState;
use super::types::{EndCause, Fact, PowerUpKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a graded answer stays on screen before the game moves on.
pub const GRADING_DELAY: Duration = Duration::from_millis(1500);

/// Something observable that happened during a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A game started with its first fact.
    Started {
        /// The first fact.
        fact: Fact,
    },
    /// A new fact replaced the previous one.
    FactDrawn {
        /// The fact now in play.
        fact: Fact,
    },
    /// One second elapsed on the turn clock.
    Ticked {
        /// Seconds left after the tick.
        time_left: u32,
    },
    /// An answer was graded.
    Answered {
        /// The player's choice.
        choice: bool,
        /// Whether the choice matched the classifier.
        correct: bool,
        /// Points awarded (zero when wrong).
        points: u64,
        /// Score after grading.
        score: u64,
        /// Lives after grading.
        lives: u8,
        /// Streak after grading.
        streak: u32,
    },
    /// The session moved to a higher level.
    LevelChanged {
        /// Previous level.
        from: u32,
        /// New level.
        to: u32,
    },
    /// An achievement was unlocked for the first time.
    AchievementUnlocked(Achievement),
    /// A power-up was consumed.
    PowerUpUsed {
        /// Which power-up.
        kind: PowerUpKind,
        /// Uses of this kind left.
        remaining: u32,
    },
    /// The clock was frozen.
    Paused,
    /// The clock was unfrozen.
    Resumed,
    /// The game ended.
    Ended {
        /// Why it ended.
        cause: EndCause,
        /// Final score.
        score: u64,
    },
    /// The final score beat the stored high score.
    HighScoreBeaten {
        /// Previous record.
        previous: u64,
        /// New record.
        new: u64,
    },
    /// The session returned to its initial phase.
    Reset,
}

/// Identifies the game and turn an effect was scheduled in.
///
/// `generation` changes on every end and reset; `turn` changes on every
/// fact draw. An effect whose token no longer matches is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectToken {
    generation: u64,
    turn: u64,
}

impl EffectToken {
    /// Creates a token.
    pub fn new(generation: u64, turn: u64) -> Self {
        Self { generation, turn }
    }

    /// Returns the generation the effect belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the turn the effect belongs to.
    pub fn turn(&self) -> u64 {
        self.turn
    }
}

/// Work to perform once a delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Replace the graded fact and restart the clock.
    DrawNextFact,
    /// End the game.
    EndGame(EndCause),
}

/// A cancellable delayed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEffect {
    token: EffectToken,
    delay: Duration,
    action: DeferredAction,
}

impl ScheduledEffect {
    /// Creates an effect that fires after [`GRADING_DELAY`].
    pub fn after_grading(token: EffectToken, action: DeferredAction) -> Self {
        Self {
            token,
            delay: GRADING_DELAY,
            action,
        }
    }

    /// Returns the token the effect was scheduled with.
    pub fn token(&self) -> EffectToken {
        self.token
    }

    /// Returns how long to wait before firing.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns what to do when firing.
    pub fn action(&self) -> DeferredAction {
        self.action
    }
}

/// The next state plus everything the transition produced.
#[derive(Debug, Clone)]
pub struct Transition {
    /// State after the transition.
    pub state: SessionState,
    /// Events in the order they happened.
    pub events: Vec<GameEvent>,
    /// Effects to schedule.
    pub effects: Vec<ScheduledEffect>,
}

impl Transition {
    /// A transition that changed nothing.
    pub fn unchanged(state: SessionState) -> Self {
        Self {
            state,
            events: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Appends an event.
    pub fn with_event(mut self, event: GameEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Runs a follow-up transition on the resulting state and merges output.
    pub fn then(self, next: impl FnOnce(SessionState) -> Transition) -> Self {
        let Self {
            state,
            mut events,
            mut effects,
        } = self;
        let follow = next(state);
        events.extend(follow.events);
        effects.extend(follow.effects);
        Self {
            state: follow.state,
            events,
            effects,
        }
    }

    /// Returns true if nothing observable happened.
    pub fn is_noop(&self) -> bool {
        self.events.is_empty() && self.effects.is_empty()
    }
}

/// Output of a committed transition, as seen by callers of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    events: Vec<GameEvent>,
    effects: Vec<ScheduledEffect>,
}

impl Step {
    /// Creates a step.
    pub fn new(events: Vec<GameEvent>, effects: Vec<ScheduledEffect>) -> Self {
        Self { events, effects }
    }

    /// Returns the emitted events.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Returns the effects to schedule.
    pub fn effects(&self) -> &[ScheduledEffect] {
        &self.effects
    }

    /// Returns true if the operation was rejected or had no effect.
    pub fn is_noop(&self) -> bool {
        self.events.is_empty() && self.effects.is_empty()
    }

    /// Splits the step into its parts.
    pub fn into_parts(self) -> (Vec<GameEvent>, Vec<ScheduledEffect>) {
        (self.events, self.effects)
    }
}
