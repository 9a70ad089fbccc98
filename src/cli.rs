//! Command-line interface for cat_facts_game.

use cat_facts_game::Difficulty;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cat Facts Game - judge cat facts true or false against the clock
#[derive(Parser, Debug)]
#[command(name = "cat_facts_game")]
#[command(about = "True/false cat-fact quiz with streaks, power-ups and achievements", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./cat_facts.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play the quiz in the terminal
    Play {
        /// Override the configured difficulty (easy, medium, hard)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Skip the API and play with the built-in facts
        #[arg(long)]
        offline: bool,
    },

    /// List the current facts with their true/false labels
    Facts {
        /// Skip the API and list the built-in facts
        #[arg(long)]
        offline: bool,
    },

    /// Show the stored high score, levels and achievements
    Stats,
}
