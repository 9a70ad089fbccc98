//! Cat Facts Game library - a true/false cat-fact quiz
//!
//! Players judge one cat fact per turn against a countdown, building
//! score, streaks, XP and achievements while guarding three lives.
//!
//! # Architecture
//!
//! - **Games**: pure quiz rules and the [`GameSession`] state machine
//! - **Facts**: the public cat-facts API with a static fallback
//! - **Scores**: the persisted high-score slot
//! - **Runner**: an async driver supplying the clock and deferred effects
//!
//! # Example
//!
//! ```no_run
//! use cat_facts_game::{FactSource, GameSession, MemoryScoreStore, StaticFacts};
//!
//! let mut session = GameSession::new(StaticFacts.batch(), MemoryScoreStore::new());
//! let step = session.start().expect("fallback facts are never empty");
//! assert!(!step.events().is_empty());
//! let graded = session.answer(true);
//! println!("{:?}", graded.events());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod fact_source;
mod games;
mod runner;
mod score_store;

// Crate-level exports - Configuration
pub use config::{ConfigError, DEFAULT_CONFIG_FILE, GameConfig};

// Crate-level exports - Fact sources
pub use fact_source::{
    CatFactClient, FALLBACK_FACTS, FactFeed, FactProvider, FactSource, FactSourceError,
    StaticFacts,
};

// Crate-level exports - High score storage
pub use score_store::{FileScoreStore, MemoryScoreStore, ScoreStore, StoreError, load_high_score};

// Crate-level exports - Runner
pub use runner::{
    Command, EVENT_CAPACITY, RunnerEvent, RunnerHandle, RunnerStopped, SessionRunner, TICK_PERIOD,
};

// Crate-level exports - Quiz game
pub use games::cat_facts::{
    Achievement, CAT_MASTER_SCORE, COLLECTOR_COUNT, Dealer, DeferredAction, Difficulty,
    EXTRA_TIME_SECONDS, EffectToken, EndCause, FACT_KEYWORDS, Fact, FactBatch, FactDealer,
    FactPicker, GRADING_DELAY, GameEvent, GameSession, LEVELS, LONG_FACT_LENGTH, Level,
    MAX_TURN_SECONDS, PERFECT_STREAK, PowerUpInventory, PowerUpKind, QUICK_GAME_SECONDS,
    RandomPicker, STARTING_LIVES, SURVIVOR_GAMES, ScheduledEffect, SequencePicker, SessionError,
    SessionPhase, SessionState, Step, TIME_MASTER_GAMES, TURN_SECONDS, Transition,
    accuracy_percent, classify, keyword_hits, level_for_xp, level_up, points_for, rules,
};
