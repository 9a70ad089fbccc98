//! Pure transition functions for a quiz session.
//!
//! Each function takes the current state by value and returns the next
//! state with the events and effects it produced. Operations invoked in a
//! phase that does not allow them return the state unchanged.

use super::action::{DeferredAction, GameEvent, ScheduledEffect, Transition};
use super::classifier::classify;
use super::picker::FactDealer;
use super::progression::{
    Achievement, CAT_MASTER_SCORE, PERFECT_STREAK, QUICK_GAME_SECONDS, SURVIVOR_GAMES, level_up,
};
use super::state::SessionState;
use super::types::{
    Difficulty, EXTRA_TIME_SECONDS, EndCause, MAX_TURN_SECONDS, PowerUpKind, SessionPhase,
};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

/// Points for a correct answer: base + `floor(streak/3)*5` + `floor(time_left/5)`.
#[instrument]
pub fn points_for(difficulty: Difficulty, streak: u32, time_left: u32) -> u64 {
    let streak_bonus = u64::from(streak / 3) * 5;
    let time_bonus = u64::from(time_left / 5);
    difficulty.base_points() + streak_bonus + time_bonus
}

/// Rounded percentage of `correct` over `total`, halves rounding up.
#[instrument]
pub fn accuracy_percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (correct, total) = (u64::from(correct), u64::from(total));
    // Bounded by 100, the cast cannot truncate.
    ((200 * correct + total) / (2 * total)) as u32
}

/// Starts a game from `NotStarted` or `Ended`.
#[instrument(skip_all, fields(phase = %state.phase))]
pub fn start(state: SessionState, dealer: &mut dyn FactDealer) -> Transition {
    if !matches!(state.phase, SessionPhase::NotStarted | SessionPhase::Ended) {
        warn!("Start ignored, game already running");
        return Transition::unchanged(state);
    }
    let Some(fact) = dealer.deal() else {
        warn!("Start ignored, no fact to draw");
        return Transition::unchanged(state);
    };

    let mut state = state;
    if state.phase == SessionPhase::Ended {
        state.clear_game();
    }
    state.phase = SessionPhase::Playing;
    state.present(fact.clone());
    info!(turn = state.turn, "Game started");
    Transition::unchanged(state).with_event(GameEvent::Started { fact })
}

/// Advances the turn clock by one second.
#[instrument(skip_all, fields(time_left = state.time_left))]
pub fn tick(state: SessionState) -> Transition {
    if state.phase != SessionPhase::Playing {
        return Transition::unchanged(state);
    }
    let mut state = state;
    state.time_left = state.time_left.saturating_sub(1);
    state.elapsed_seconds += 1;
    let time_left = state.time_left;
    let transition = Transition::unchanged(state).with_event(GameEvent::Ticked { time_left });
    if time_left == 0 {
        info!("Turn clock ran out");
        transition.then(|state| end(state, EndCause::Timeout))
    } else {
        transition
    }
}

/// Grades the player's answer for the fact in play.
#[instrument(skip_all, fields(choice))]
pub fn answer(state: SessionState, choice: bool) -> Transition {
    if state.phase != SessionPhase::Playing {
        warn!(phase = %state.phase, "Answer ignored outside play");
        return Transition::unchanged(state);
    }
    if state.lives == 0 {
        debug!("Answer ignored, no lives left");
        return Transition::unchanged(state);
    }
    if state.grading.is_some() {
        debug!("Answer ignored while previous grade is on display");
        return Transition::unchanged(state);
    }
    let Some(fact) = state.current_fact.as_ref() else {
        warn!("Answer ignored, no fact in play");
        return Transition::unchanged(state);
    };

    let correct = classify(fact) == choice;
    let mut state = state;
    let mut events = Vec::new();

    state.accuracy = accuracy_percent(
        state.correct_answers + u32::from(correct),
        state.total_answers + 1,
    );
    state.total_answers += 1;
    state.grading = Some(correct);

    let mut points = 0;
    if correct {
        points = points_for(state.difficulty, state.streak, state.time_left);
        state.score += points;
        state.total_points += points;
        state.streak += 1;
        state.best_streak = state.best_streak.max(state.streak);
        state.correct_answers += 1;
    } else {
        state.lives = state.lives.saturating_sub(1);
        state.streak = 0;
    }

    info!(
        correct,
        points,
        score = state.score,
        lives = state.lives,
        streak = state.streak,
        "Answer graded"
    );
    events.push(GameEvent::Answered {
        choice,
        correct,
        points,
        score: state.score,
        lives: state.lives,
        streak: state.streak,
    });

    if correct {
        // XP is a running f64 so medium/hard multipliers keep their halves.
        #[allow(clippy::cast_precision_loss)]
        let gained = points as f64 * state.difficulty.xp_multiplier();
        state.xp += gained;
        apply_level_up(&mut state, &mut events);
        if state.score >= CAT_MASTER_SCORE {
            unlock(&mut state, Achievement::CatMaster, &mut events);
        }
        if state.streak >= PERFECT_STREAK {
            unlock(&mut state, Achievement::PerfectStreak, &mut events);
        }
        raise_high_score(&mut state, &mut events);
    }

    let action = if state.lives == 0 {
        info!("Last life lost, ending after grading delay");
        DeferredAction::EndGame(EndCause::LivesExhausted)
    } else {
        DeferredAction::DrawNextFact
    };
    let effect = ScheduledEffect::after_grading(state.token(), action);

    Transition {
        state,
        events,
        effects: vec![effect],
    }
}

/// Consumes a power-up and applies its effect.
#[instrument(skip(state, dealer), fields(phase = %state.phase))]
pub fn apply_power_up(
    state: SessionState,
    kind: PowerUpKind,
    dealer: &mut dyn FactDealer,
) -> Transition {
    if state.phase != SessionPhase::Playing {
        warn!("Power-up ignored outside play");
        return Transition::unchanged(state);
    }
    if state.lives == 0 {
        debug!("Power-up ignored, no lives left");
        return Transition::unchanged(state);
    }
    let mut state = state;
    if !state.power_ups.consume(kind) {
        debug!("Power-up ignored, none left");
        return Transition::unchanged(state);
    }

    let mut events = vec![GameEvent::PowerUpUsed {
        kind,
        remaining: state.power_ups.remaining(kind),
    }];
    match kind {
        PowerUpKind::ExtraTime => {
            state.time_left = (state.time_left + EXTRA_TIME_SECONDS).min(MAX_TURN_SECONDS);
        }
        PowerUpKind::DoublePoints => {
            state.score = state.score.saturating_mul(2);
            if state.score >= CAT_MASTER_SCORE {
                unlock(&mut state, Achievement::CatMaster, &mut events);
            }
            raise_high_score(&mut state, &mut events);
        }
        PowerUpKind::SkipQuestion => {
            if let Some(fact) = dealer.deal() {
                state.present(fact.clone());
                events.push(GameEvent::FactDrawn { fact });
            }
        }
    }
    info!(time_left = state.time_left, score = state.score, "Power-up applied");

    Transition {
        state,
        events,
        effects: Vec::new(),
    }
}

/// Freezes the clock.
#[instrument(skip_all)]
pub fn pause(state: SessionState) -> Transition {
    if state.phase != SessionPhase::Playing {
        return Transition::unchanged(state);
    }
    let mut state = state;
    state.phase = SessionPhase::Paused;
    info!("Game paused");
    Transition::unchanged(state).with_event(GameEvent::Paused)
}

/// Unfreezes the clock.
#[instrument(skip_all)]
pub fn resume(state: SessionState) -> Transition {
    if state.phase != SessionPhase::Paused {
        return Transition::unchanged(state);
    }
    let mut state = state;
    state.phase = SessionPhase::Playing;
    info!("Game resumed");
    Transition::unchanged(state).with_event(GameEvent::Resumed)
}

/// Ends the running game and folds its results into the aggregates.
#[instrument(skip(state), fields(phase = %state.phase, score = state.score))]
pub fn end(state: SessionState, cause: EndCause) -> Transition {
    if !matches!(state.phase, SessionPhase::Playing | SessionPhase::Paused) {
        return Transition::unchanged(state);
    }
    let mut state = state;
    state.phase = SessionPhase::Ended;
    state.end_cause = Some(cause);
    state.grading = None;
    state.generation += 1;
    state.games_played += 1;
    if state.elapsed_seconds < QUICK_GAME_SECONDS {
        state.quick_games += 1;
    }
    info!(
        games_played = state.games_played,
        elapsed = state.elapsed_seconds,
        "Game ended"
    );

    let mut events = vec![GameEvent::Ended {
        cause,
        score: state.score,
    }];

    if state.games_played == 1 {
        unlock(&mut state, Achievement::FirstStep, &mut events);
    }
    if state.games_played >= SURVIVOR_GAMES {
        unlock(&mut state, Achievement::Survivor, &mut events);
    }

    raise_high_score(&mut state, &mut events);

    for achievement in Achievement::iter() {
        if achievement.is_earned(&state) {
            unlock(&mut state, achievement, &mut events);
        }
    }

    Transition {
        state,
        events,
        effects: Vec::new(),
    }
}

/// Returns to `NotStarted`, keeping aggregates and restoring power-ups.
#[instrument(skip_all, fields(phase = %state.phase))]
pub fn reset(state: SessionState) -> Transition {
    let mut state = state;
    state.clear_game();
    state.phase = SessionPhase::NotStarted;
    state.generation += 1;
    info!(generation = state.generation, "Session reset");
    Transition::unchanged(state).with_event(GameEvent::Reset)
}

/// Delivers a deferred effect if it still belongs to the current game.
#[instrument(skip(state, dealer), fields(generation = state.generation, turn = state.turn))]
pub fn fire(
    state: SessionState,
    effect: ScheduledEffect,
    dealer: &mut dyn FactDealer,
) -> Transition {
    let token = effect.token();
    if token.generation() != state.generation {
        debug!(stale = token.generation(), "Dropped effect from a finished game");
        return Transition::unchanged(state);
    }
    match effect.action() {
        DeferredAction::DrawNextFact => {
            let live = matches!(state.phase, SessionPhase::Playing | SessionPhase::Paused);
            if !live || token.turn() != state.turn {
                debug!("Dropped next-fact draw for a superseded turn");
                return Transition::unchanged(state);
            }
            let Some(fact) = dealer.deal() else {
                warn!("No fact to draw");
                return Transition::unchanged(state);
            };
            let mut state = state;
            state.present(fact.clone());
            Transition::unchanged(state).with_event(GameEvent::FactDrawn { fact })
        }
        DeferredAction::EndGame(cause) => end(state, cause),
    }
}

/// Moves to the highest level the current XP covers.
fn apply_level_up(state: &mut SessionState, events: &mut Vec<GameEvent>) {
    if let Some(to) = level_up(state.current_level, state.xp) {
        let from = state.current_level;
        state.current_level = to;
        info!(from, to, xp = state.xp, "Level up");
        events.push(GameEvent::LevelChanged { from, to });
    }
}

/// Moves the record up as soon as the running score passes it. Ties keep the old record.
fn raise_high_score(state: &mut SessionState, events: &mut Vec<GameEvent>) {
    if state.score > state.high_score {
        let previous = state.high_score;
        state.high_score = state.score;
        info!(previous, new = state.score, "New high score");
        events.push(GameEvent::HighScoreBeaten {
            previous,
            new: state.score,
        });
    }
}

/// Adds an achievement if new, then checks whether it completes the collection.
fn unlock(state: &mut SessionState, achievement: Achievement, events: &mut Vec<GameEvent>) {
    if !state.unlocked.insert(achievement) {
        return;
    }
    info!(%achievement, "Achievement unlocked");
    events.push(GameEvent::AchievementUnlocked(achievement));

    if achievement != Achievement::Collector && Achievement::Collector.is_earned(state) {
        unlock(state, Achievement::Collector, events);
    }
}
