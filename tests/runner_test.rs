//! Tests for the async session runner on a paused clock.

use cat_facts_game::{
    Command, EndCause, Fact, FactBatch, GameEvent, GameSession, MemoryScoreStore, RunnerEvent,
    RunnerHandle, SequencePicker, SessionError, SessionPhase, SessionRunner, SessionState,
};
use std::time::Duration;
use tokio::sync::broadcast::Receiver;
use tokio::time::{Instant, sleep};

fn session() -> GameSession {
    let facts = vec![
        Fact::from_text("Cats sleep most of the night"),
        Fact::from_text("Dogs bark loudly"),
    ];
    GameSession::new(FactBatch::new(facts), MemoryScoreStore::new())
        .with_picker(SequencePicker::new(vec![0, 1]))
}

/// Requests a snapshot and returns it with the game events seen before it.
async fn status(
    handle: &RunnerHandle,
    events: &mut Receiver<RunnerEvent>,
) -> (Box<SessionState>, Vec<GameEvent>) {
    handle.send(Command::Status).expect("Runner is alive");
    let mut seen = Vec::new();
    loop {
        match events.recv().await.expect("Event channel open") {
            RunnerEvent::Status(state) => return (state, seen),
            RunnerEvent::Game(event) => seen.push(event),
            RunnerEvent::Rejected(e) => panic!("Unexpected rejection: {}", e),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_clock_runs_out_after_thirty_seconds() {
    let (handle, runner) = SessionRunner::spawn(session());
    let mut events = handle.subscribe();
    let started_at = Instant::now();
    handle.send(Command::Start).expect("Runner is alive");

    let mut ticks = 0;
    let cause = loop {
        match events.recv().await.expect("Event channel open") {
            RunnerEvent::Game(GameEvent::Ticked { .. }) => ticks += 1,
            RunnerEvent::Game(GameEvent::Ended { cause, .. }) => break cause,
            _ => {}
        }
    };
    assert_eq!(cause, EndCause::Timeout);
    assert_eq!(ticks, 30);
    let waited = started_at.elapsed();
    assert!(waited >= Duration::from_secs(30) && waited < Duration::from_secs(31));

    drop(handle);
    let session = runner.await.expect("Runner finished");
    assert_eq!(session.state().phase(), SessionPhase::Ended);
    assert_eq!(session.state().games_played(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pause_freezes_clock() {
    let (handle, _runner) = SessionRunner::spawn(session());
    let mut events = handle.subscribe();
    handle.send(Command::Start).expect("Runner is alive");
    sleep(Duration::from_millis(5_500)).await;

    handle.send(Command::TogglePause).expect("Runner is alive");
    sleep(Duration::from_secs(60)).await;
    let (state, seen) = status(&handle, &mut events).await;
    assert_eq!(state.phase(), SessionPhase::Paused);
    assert_eq!(state.time_left(), 25);
    assert!(seen.contains(&GameEvent::Paused));

    handle.send(Command::TogglePause).expect("Runner is alive");
    sleep(Duration::from_millis(2_500)).await;
    let (state, _) = status(&handle, &mut events).await;
    assert_eq!(state.phase(), SessionPhase::Playing);
    assert_eq!(state.time_left(), 23);
}

#[tokio::test(start_paused = true)]
async fn test_next_fact_drawn_after_grading_delay() {
    let (handle, _runner) = SessionRunner::spawn(session());
    let mut events = handle.subscribe();
    handle.send(Command::Start).expect("Runner is alive");
    handle.send(Command::Answer(true)).expect("Runner is alive");

    sleep(Duration::from_millis(1_000)).await;
    let (state, seen) = status(&handle, &mut events).await;
    assert_eq!(state.grading(), Some(true));
    assert!(
        !seen
            .iter()
            .any(|event| matches!(event, GameEvent::FactDrawn { .. }))
    );

    sleep(Duration::from_millis(1_000)).await;
    let (state, seen) = status(&handle, &mut events).await;
    assert!(seen.contains(&GameEvent::FactDrawn {
        fact: Fact::from_text("Dogs bark loudly"),
    }));
    assert_eq!(state.grading(), None);
    assert_eq!(state.time_left(), 30);
}

#[tokio::test(start_paused = true)]
async fn test_end_during_grading_cancels_draw() {
    let (handle, _runner) = SessionRunner::spawn(session());
    let mut events = handle.subscribe();
    handle.send(Command::Start).expect("Runner is alive");
    handle.send(Command::Answer(true)).expect("Runner is alive");
    handle.send(Command::End).expect("Runner is alive");

    sleep(Duration::from_secs(3)).await;
    let (state, seen) = status(&handle, &mut events).await;
    assert_eq!(state.phase(), SessionPhase::Ended);
    assert_eq!(state.end_cause(), Some(EndCause::Quit));
    assert_eq!(
        state.current_fact(),
        Some(&Fact::from_text("Cats sleep most of the night"))
    );
    assert!(
        !seen
            .iter()
            .any(|event| matches!(event, GameEvent::FactDrawn { .. } | GameEvent::Ticked { .. }))
    );
}

#[tokio::test(start_paused = true)]
async fn test_last_life_ends_after_grading_delay() {
    let facts = vec![Fact::from_text("Cats sleep most of the night")];
    let session = GameSession::new(FactBatch::new(facts), MemoryScoreStore::new())
        .with_picker(SequencePicker::new(vec![0]));
    let (handle, _runner) = SessionRunner::spawn(session);
    let mut events = handle.subscribe();
    handle.send(Command::Start).expect("Runner is alive");

    for _ in 0..3 {
        handle.send(Command::Answer(false)).expect("Runner is alive");
        sleep(Duration::from_secs(2)).await;
    }
    let (state, seen) = status(&handle, &mut events).await;
    assert_eq!(state.phase(), SessionPhase::Ended);
    assert_eq!(state.end_cause(), Some(EndCause::LivesExhausted));
    assert_eq!(state.lives(), 0);
    assert!(seen.contains(&GameEvent::Ended {
        cause: EndCause::LivesExhausted,
        score: 0,
    }));
}

#[tokio::test(start_paused = true)]
async fn test_start_without_facts_is_rejected() {
    let session = GameSession::new(FactBatch::default(), MemoryScoreStore::new());
    let (handle, _runner) = SessionRunner::spawn(session);
    let mut events = handle.subscribe();
    handle.send(Command::Start).expect("Runner is alive");

    match events.recv().await.expect("Event channel open") {
        RunnerEvent::Rejected(e) => assert_eq!(e, SessionError::NoFactsAvailable),
        other => panic!("Expected a rejection, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_reset_stops_clock() {
    let (handle, _runner) = SessionRunner::spawn(session());
    let mut events = handle.subscribe();
    handle.send(Command::Start).expect("Runner is alive");
    sleep(Duration::from_millis(3_500)).await;
    handle.send(Command::Reset).expect("Runner is alive");
    sleep(Duration::from_secs(10)).await;

    let (state, seen) = status(&handle, &mut events).await;
    assert_eq!(state.phase(), SessionPhase::NotStarted);
    assert_eq!(state.time_left(), 30);
    let ticks = seen
        .iter()
        .filter(|event| matches!(event, GameEvent::Ticked { .. }))
        .count();
    assert_eq!(ticks, 3);
}

#[tokio::test(start_paused = true)]
async fn test_stopped_runner_refuses_commands() {
    let (handle, runner) = SessionRunner::spawn(session());
    runner.abort();
    let _ = runner.await;
    assert!(handle.send(Command::Start).is_err());
}

#[tokio::test(start_paused = true)]
async fn test_closing_handle_ends_running_game() {
    let (handle, runner) = SessionRunner::spawn(session());
    let mut events = handle.subscribe();
    handle.send(Command::Start).expect("Runner is alive");
    handle.send(Command::Answer(true)).expect("Runner is alive");
    drop(handle);

    let session = runner.await.expect("Runner finished");
    assert_eq!(session.state().phase(), SessionPhase::Ended);
    assert_eq!(session.state().end_cause(), Some(EndCause::Quit));
    assert_eq!(session.state().games_played(), 1);
    assert_eq!(session.state().high_score(), 16);

    let mut ended = false;
    while let Ok(event) = events.recv().await {
        if let RunnerEvent::Game(GameEvent::Ended { cause, score }) = event {
            assert_eq!((cause, score), (EndCause::Quit, 16));
            ended = true;
        }
    }
    assert!(ended);
}

#[tokio::test(start_paused = true)]
async fn test_replaced_facts_used_for_next_draw() {
    let (handle, runner) = SessionRunner::spawn(session());
    let mut events = handle.subscribe();
    let kitten = Fact::from_text("Kittens purr at night");
    handle
        .send(Command::ReplaceFacts(FactBatch::new(vec![kitten.clone()])))
        .expect("Runner is alive");
    handle.send(Command::Start).expect("Runner is alive");

    let (state, seen) = status(&handle, &mut events).await;
    assert_eq!(state.current_fact(), Some(&kitten));
    assert!(seen.contains(&GameEvent::Started { fact: kitten }));

    drop(handle);
    let session = runner.await.expect("Runner finished");
    assert_eq!(session.batch().len(), 1);
}
