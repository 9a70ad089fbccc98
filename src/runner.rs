//! Async driver that gives a [`GameSession`] a clock.
//!
//! The runner owns the session and is the only place that knows about
//! wall time. It ticks once per second while a game is playing and
//! unpaused, delivers deferred effects when their delay elapses, and
//! publishes every domain event on a broadcast channel.

use crate::games::cat_facts::{
    EndCause, FactBatch, GameEvent, GameSession, PowerUpKind, ScheduledEffect, SessionError,
    SessionPhase, SessionState, Step,
};
use derive_more::{Display, Error};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at, sleep_until};
use tracing::{debug, info, instrument, warn};

/// Period of the turn clock.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Capacity of the event broadcast channel.
pub const EVENT_CAPACITY: usize = 256;

/// Player input accepted by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a game (also starts over after a game ended).
    Start,
    /// Answer the fact in play.
    Answer(bool),
    /// Use a power-up.
    PowerUp(PowerUpKind),
    /// Pause if playing, resume if paused.
    TogglePause,
    /// End the running game.
    End,
    /// Return to the not-started phase.
    Reset,
    /// Publish a snapshot of the session state.
    Status,
    /// Draw later facts from a refreshed batch.
    ReplaceFacts(FactBatch),
}

/// What subscribers receive.
#[derive(Debug, Clone)]
pub enum RunnerEvent {
    /// A domain event from the session.
    Game(GameEvent),
    /// A command the session refused.
    Rejected(SessionError),
    /// A state snapshot, in reply to [`Command::Status`].
    Status(Box<SessionState>),
}

/// The runner has stopped and accepts no more commands.
#[derive(Debug, Clone, Copy, Display, Error)]
#[display("Session runner has stopped")]
pub struct RunnerStopped;

/// Sends commands to a running session and subscribes to its events.
#[derive(Debug, Clone)]
pub struct RunnerHandle {
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<RunnerEvent>,
}

impl RunnerHandle {
    /// Queues a command.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerStopped`] if the runner has exited.
    #[instrument(skip(self))]
    pub fn send(&self, command: Command) -> Result<(), RunnerStopped> {
        self.commands.send(command).map_err(|_| RunnerStopped)
    }

    /// Subscribes to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RunnerEvent> {
        self.events.subscribe()
    }
}

/// Drives a session until every [`RunnerHandle`] is dropped.
///
/// A game still running at that point is ended with [`EndCause::Quit`].
#[derive(Debug)]
pub struct SessionRunner {
    session: GameSession,
    commands: mpsc::UnboundedReceiver<Command>,
    events: broadcast::Sender<RunnerEvent>,
    pending: Vec<(Instant, ScheduledEffect)>,
    ticker: Option<Interval>,
    armed_turn: Option<u64>,
}

impl SessionRunner {
    /// Creates a runner and its handle without starting it.
    #[instrument(skip_all)]
    pub fn new(session: GameSession) -> (Self, RunnerHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let runner = Self {
            session,
            commands: command_rx,
            events: event_tx.clone(),
            pending: Vec::new(),
            ticker: None,
            armed_turn: None,
        };
        let handle = RunnerHandle {
            commands: command_tx,
            events: event_tx,
        };
        (runner, handle)
    }

    /// Spawns the runner on the current tokio runtime.
    ///
    /// The join handle yields the session once all handles are dropped.
    pub fn spawn(session: GameSession) -> (RunnerHandle, JoinHandle<GameSession>) {
        let (runner, handle) = Self::new(session);
        (handle, tokio::spawn(runner.run()))
    }

    /// Runs until the command channel closes, ends any running game, then
    /// returns the session.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> GameSession {
        info!("Session runner started");
        loop {
            self.sync_ticker();
            let next_deadline = self.pending.iter().map(|(at, _)| *at).min();
            let deadline = next_deadline.unwrap_or_else(Instant::now);

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                _ = next_tick(self.ticker.as_mut()), if self.ticker.is_some() => {
                    let step = self.session.tick();
                    self.dispatch(step);
                }
                _ = sleep_until(deadline), if next_deadline.is_some() => {
                    self.fire_due();
                }
            }
        }
        let step = self.session.end(EndCause::Quit);
        self.dispatch(step);
        info!("Session runner stopped");
        self.session
    }

    /// Applies one command.
    #[instrument(skip_all)]
    fn handle(&mut self, command: Command) {
        let step = match command {
            Command::Start => match self.session.start() {
                Ok(step) => step,
                Err(e) => {
                    warn!(error = %e, "Start rejected");
                    self.publish(RunnerEvent::Rejected(e));
                    return;
                }
            },
            Command::Answer(choice) => self.session.answer(choice),
            Command::PowerUp(kind) => self.session.apply_power_up(kind),
            Command::TogglePause => match self.session.state().phase() {
                SessionPhase::Paused => self.session.resume(),
                _ => self.session.pause(),
            },
            Command::End => self.session.end(EndCause::Quit),
            Command::Reset => self.session.reset(),
            Command::Status => {
                let snapshot = Box::new(self.session.state().clone());
                self.publish(RunnerEvent::Status(snapshot));
                return;
            }
            Command::ReplaceFacts(batch) => {
                self.session.replace_batch(batch);
                return;
            }
        };
        self.dispatch(step);
    }

    /// Delivers every effect whose deadline has passed, oldest first.
    fn fire_due(&mut self) {
        let now = Instant::now();
        let (mut due, later): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = later;
        due.sort_by_key(|(at, _)| *at);
        for (_, effect) in due {
            let step = self.session.fire(effect);
            self.dispatch(step);
        }
    }

    /// Publishes events, schedules new effects and drops stale ones.
    fn dispatch(&mut self, step: Step) {
        let (events, effects) = step.into_parts();
        for event in events {
            self.publish(RunnerEvent::Game(event));
        }
        let now = Instant::now();
        for effect in effects {
            debug!(?effect, "Scheduling effect");
            self.pending.push((now + effect.delay(), effect));
        }
        let session = &self.session;
        self.pending
            .retain(|(_, effect)| session.is_current(effect));
    }

    /// Arms the clock while playing, disarms it otherwise.
    ///
    /// A new fact re-arms the clock so every turn gets whole seconds.
    fn sync_ticker(&mut self) {
        let state = self.session.state();
        if state.phase() != SessionPhase::Playing {
            if self.ticker.take().is_some() {
                debug!("Clock disarmed");
            }
            self.armed_turn = None;
            return;
        }
        let turn = state.token().turn();
        if self.ticker.is_none() || self.armed_turn != Some(turn) {
            let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            self.ticker = Some(ticker);
            self.armed_turn = Some(turn);
            debug!(turn, "Clock armed");
        }
    }

    fn publish(&self, event: RunnerEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

async fn next_tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
