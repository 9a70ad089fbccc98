//! True/false cat-fact quiz.

mod action;
mod classifier;
mod picker;
mod progression;
pub mod rules;
mod session;
mod state;
mod types;

pub use action::{
    DeferredAction, EffectToken, GRADING_DELAY, GameEvent, ScheduledEffect, Step, Transition,
};
pub use classifier::{FACT_KEYWORDS, LONG_FACT_LENGTH, classify, keyword_hits};
pub use picker::{Dealer, FactDealer, FactPicker, RandomPicker, SequencePicker};
pub use progression::{
    Achievement, CAT_MASTER_SCORE, COLLECTOR_COUNT, LEVELS, Level, PERFECT_STREAK,
    QUICK_GAME_SECONDS, SURVIVOR_GAMES, TIME_MASTER_GAMES, level_for_xp, level_up,
};
pub use rules::{accuracy_percent, points_for};
pub use session::{GameSession, SessionError};
pub use state::SessionState;
pub use types::{
    Difficulty, EXTRA_TIME_SECONDS, EndCause, Fact, FactBatch, MAX_TURN_SECONDS,
    PowerUpInventory, PowerUpKind, STARTING_LIVES, SessionPhase, TURN_SECONDS,
};
