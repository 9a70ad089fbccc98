//! Cat Facts Game - Unified CLI
//!
//! Terminal front-end for the true/false cat-fact quiz.

#![warn(missing_docs)]

mod cli;
mod terminal;

use anyhow::Result;
use cat_facts_game::{
    Achievement, CatFactClient, Command as SessionCommand, FactFeed, FactProvider,
    FileScoreStore, GameConfig, GameSession, LEVELS, ScoreStore, SessionRunner, StaticFacts,
    classify,
};
use clap::Parser;
use cli::{Cli, Command};
use strum::IntoEnumIterator;
use terminal::Input;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GameConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Play {
            difficulty,
            offline,
        } => {
            let config = match difficulty {
                Some(difficulty) => config.with_difficulty(difficulty),
                None => config,
            };
            run_play(config, offline).await
        }
        Command::Facts { offline } => run_facts(config, offline).await,
        Command::Stats => run_stats(config),
    }
}

/// Build a feed over the API, or over the built-in list when offline
#[instrument(skip(config))]
fn fact_feed(config: &GameConfig, offline: bool) -> FactFeed<Box<dyn FactProvider>> {
    let provider: Box<dyn FactProvider> = if offline {
        info!("Offline mode, using built-in facts");
        Box::new(StaticFacts)
    } else {
        match CatFactClient::from_config(config) {
            Ok(client) => Box::new(client),
            Err(e) => {
                warn!(error = %e, "Cannot build facts client, using built-in facts");
                Box::new(StaticFacts)
            }
        }
    };
    FactFeed::new(provider, config.revalidate_after())
}

/// Run an interactive game on stdin/stdout
#[instrument(skip(config), fields(difficulty = %config.difficulty()))]
async fn run_play(config: GameConfig, offline: bool) -> Result<()> {
    let mut feed = fact_feed(&config, offline);
    let batch = feed.load().await;
    let store = FileScoreStore::new(config.score_file());
    let session = GameSession::new(batch, store).with_difficulty(*config.difficulty());

    let (handle, runner) = SessionRunner::spawn(session);
    let mut events = handle.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(line) = terminal::describe(&event) {
                        println!("{line}");
                    }
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event display fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!("Cat Facts! Decide whether each fact is true or false.");
    println!("{}", terminal::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match terminal::parse_input(&line) {
            Input::Command(SessionCommand::Start) => {
                // Refetches only once the cached batch has gone stale.
                handle.send(SessionCommand::ReplaceFacts(feed.load().await))?;
                handle.send(SessionCommand::Start)?;
            }
            Input::Command(command) => handle.send(command)?,
            Input::Help => println!("{}", terminal::HELP),
            Input::Quit => break,
            Input::Unknown => println!("Unknown key '{}'. Press h for help.", line.trim()),
        }
    }

    // Closing the handle ends a game still in progress.
    drop(handle);
    let session = runner.await?;
    printer.await?;
    println!("{}", terminal::describe_state(session.state()));
    Ok(())
}

/// List the facts with their labels
#[instrument(skip(config))]
async fn run_facts(config: GameConfig, offline: bool) -> Result<()> {
    let batch = fact_feed(&config, offline).load().await;
    for (index, fact) in batch.iter().enumerate() {
        let label = if classify(fact) { "TRUE " } else { "FALSE" };
        println!("{:>3}. [{label}] {fact}", index + 1);
    }
    Ok(())
}

/// Print the stored high score and the progression tables
#[instrument(skip(config))]
fn run_stats(config: GameConfig) -> Result<()> {
    let store = FileScoreStore::new(config.score_file());
    let high_score = store.read_high_score()?.unwrap_or(0);
    println!("High score: {high_score}");
    if let Some(updated_at) = store.updated_at()? {
        println!("Set on: {}", updated_at.format("%Y-%m-%d %H:%M UTC"));
    }

    println!("\nLevels:");
    for level in LEVELS {
        println!(
            "  {} - {:>5} XP - {}",
            level.level(),
            level.xp_threshold(),
            level.rewards().join(", ")
        );
    }

    println!("\nAchievements:");
    for achievement in Achievement::iter() {
        println!(
            "  #{} {:<15} {}",
            achievement.id(),
            achievement.title(),
            achievement.description()
        );
    }
    Ok(())
}
