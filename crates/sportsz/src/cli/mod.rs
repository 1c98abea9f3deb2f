//! Command-line interface for sportsz.
//!
//! This module provides the CLI structure for the `sportsz` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AskCommand, AthletesCommand, CollectionArg, CommunityCommand, ConfigCommand, DreamCommand,
    EligibilityCommand, ExportCommand, HistoryCommand, OutputFormat, QuoteCommand,
    RegisterCommand, ResetCommand, SpeedCommand, StatusCommand, TimerCommand, VideoCommand,
};

/// sportsz - Train, time and share, all stored locally
///
/// Register athletes, time runs, upload clips, post to the community feed and
/// track a dream goal. Everything lives in a local database.
#[derive(Debug, Parser)]
#[command(name = "sportsz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
///
/// Configuration commands are kept apart so they can run when the
/// configuration itself is broken.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Commands that run against the local store
    #[command(flatten)]
    App(AppCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Commands that need a loaded configuration and an open store.
#[derive(Debug, Subcommand)]
pub enum AppCommand {
    /// Register an athlete
    Register(RegisterCommand),

    /// List registered athletes
    Athletes(AthletesCommand),

    /// Time a run with a live stopwatch
    Timer(TimerCommand),

    /// Calculate and save speed from distance and time
    Speed(SpeedCommand),

    /// Show run history, badges and chart
    History(HistoryCommand),

    /// Show the top 10% speed
    Insight,

    /// Export data as CSV
    #[command(subcommand)]
    Export(ExportCommand),

    /// Upload, list or delete videos
    #[command(subcommand)]
    Video(VideoCommand),

    /// Post to or read the community feed
    #[command(subcommand)]
    Community(CommunityCommand),

    /// View or update the dream goal
    #[command(subcommand)]
    Dream(DreamCommand),

    /// Show a motivational quote
    Quote(QuoteCommand),

    /// Show minimum age and training notes for a sport
    Eligibility(EligibilityCommand),

    /// Ask the training assistant
    Ask(AskCommand),

    /// Send the weekly practice reminder
    Remind,

    /// Delete one collection
    Reset(ResetCommand),

    /// Show what is stored
    Status(StatusCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
