//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::storage::CollectionKey;

/// Register command arguments.
#[derive(Debug, Args)]
pub struct RegisterCommand {
    /// Athlete name
    #[arg(short, long)]
    pub name: String,

    /// Age in years
    #[arg(short, long)]
    pub age: u32,

    /// Primary sport
    #[arg(short, long)]
    pub sport: String,

    /// Gender
    #[arg(short, long, default_value = "")]
    pub gender: String,

    /// Town or city
    #[arg(short, long, default_value = "")]
    pub location: String,

    /// Confirm a parent or guardian consents to storing this profile
    #[arg(long)]
    pub consent: bool,
}

/// Athlete listing arguments.
#[derive(Debug, Args)]
pub struct AthletesCommand {
    /// Only athletes whose name contains this text
    #[arg(short, long)]
    pub name: Option<String>,

    /// Only athletes playing this sport
    #[arg(short, long)]
    pub sport: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Stopwatch arguments.
#[derive(Debug, Args)]
pub struct TimerCommand {
    /// Distance covered in meters. Without it the run is timed but not saved.
    #[arg(short, long, default_value = "0")]
    pub distance: f64,
}

/// Manual speed calculator arguments.
#[derive(Debug, Args)]
pub struct SpeedCommand {
    /// Distance in meters
    pub distance: f64,

    /// Time in seconds
    pub seconds: f64,
}

/// History display arguments.
#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Number of recent runs to chart (defaults to the configured window)
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// CSV export commands.
#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Export every timed run
    History {
        /// Write to this file instead of a timestamped one
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Export athletes with the overall top speed
    Report {
        /// Write to this file instead of a timestamped one
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Video commands.
#[derive(Debug, Subcommand)]
pub enum VideoCommand {
    /// Upload a clip
    Upload {
        /// Path to the video file
        path: PathBuf,

        /// Clip length in seconds
        #[arg(short, long)]
        duration: f64,
    },

    /// List uploaded clips, newest first
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Delete a clip by id
    Delete {
        /// Video id (starts with `v_`)
        id: String,
    },
}

/// Community feed commands.
#[derive(Debug, Subcommand)]
pub enum CommunityCommand {
    /// Share a talent post
    Post {
        /// Your name
        #[arg(short, long)]
        author: String,

        /// What you are showing off
        #[arg(short, long)]
        title: String,
    },

    /// Show posts, newest first
    Feed,
}

/// Dream board commands.
#[derive(Debug, Subcommand)]
pub enum DreamCommand {
    /// Show the goal and a motivational quote
    Show,

    /// Set the goal text, and optionally the progress
    Set {
        /// What you are working toward
        goal: String,

        /// Percent complete (0-100); the saved progress is kept when omitted
        #[arg(short, long)]
        progress: Option<u8>,
    },

    /// Update only the progress
    Progress {
        /// Percent complete (0-100)
        percent: u8,
    },
}

/// Quote command arguments.
#[derive(Debug, Args)]
pub struct QuoteCommand {
    /// Add this quote to the rotation instead of showing one
    #[arg(long, value_name = "TEXT")]
    pub add: Option<String>,
}

/// Eligibility lookup arguments.
#[derive(Debug, Args)]
pub struct EligibilityCommand {
    /// Sport to look up; omit to list every sport
    pub sport: Option<String>,
}

/// Assistant question.
#[derive(Debug, Args)]
pub struct AskCommand {
    /// Your question, e.g. "how do I improve 100m"
    #[arg(num_args = 1.., trailing_var_arg = true)]
    pub question: Vec<String>,
}

/// Reset command arguments.
#[derive(Debug, Args)]
pub struct ResetCommand {
    /// Collection to delete
    #[arg(value_enum)]
    pub collection: CollectionArg,

    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to config file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Collection argument for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollectionArg {
    /// Registered athletes
    Users,
    /// Timed runs
    History,
    /// Uploaded videos
    Videos,
    /// Community posts
    Community,
    /// The dream goal
    Dream,
    /// Motivational quotes (restored to the defaults)
    Quotes,
}

impl From<CollectionArg> for CollectionKey {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Users => Self::Users,
            CollectionArg::History => Self::History,
            CollectionArg::Videos => Self::Videos,
            CollectionArg::Community => Self::Community,
            CollectionArg::Dream => Self::Dream,
            CollectionArg::Quotes => Self::Quotes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_collection_arg_conversion() {
        assert_eq!(CollectionKey::from(CollectionArg::Users), CollectionKey::Users);
        assert_eq!(
            CollectionKey::from(CollectionArg::Community),
            CollectionKey::Community
        );
        assert_eq!(CollectionKey::from(CollectionArg::Quotes), CollectionKey::Quotes);
    }

    #[test]
    fn test_collection_arg_names() {
        let names: Vec<String> = CollectionArg::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(
            names,
            ["users", "history", "videos", "community", "dream", "quotes"]
        );
    }
}
