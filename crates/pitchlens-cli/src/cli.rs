//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use pitchlens::Role;

/// Pitchlens: soccer player and goalkeeper performance analysis
#[derive(Parser)]
#[command(name = "pitchlens")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the player and goalkeeper IDs available for analysis
    Ids {
        #[command(flatten)]
        roster: RosterArgs,

        /// Only list IDs for this role
        #[arg(short, long)]
        role: Option<Role>,
    },

    /// Analyze one player or goalkeeper
    Analyze {
        #[command(flatten)]
        roster: RosterArgs,

        /// Role to analyze (player or goalkeeper)
        #[arg(short, long, default_value = "player")]
        role: Role,

        /// Player ID to analyze
        #[arg(short, long, value_name = "ID")]
        id: String,

        /// Write the analysis to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Open the web UI for uploading files and analyzing players
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "3142")]
        port: u16,

        /// Don't automatically open browser
        #[arg(long)]
        no_open: bool,

        #[command(flatten)]
        llm: LlmArgs,
    },
}

/// The four CSV files of a match.
#[derive(Args, Clone)]
pub struct RosterArgs {
    /// Team 1 player data (CSV)
    #[arg(long, value_name = "CSV")]
    pub team1: PathBuf,

    /// Team 2 player data (CSV)
    #[arg(long, value_name = "CSV")]
    pub team2: PathBuf,

    /// Goalkeeper 1 data (CSV)
    #[arg(long, value_name = "CSV")]
    pub keeper1: PathBuf,

    /// Goalkeeper 2 data (CSV)
    #[arg(long, value_name = "CSV")]
    pub keeper2: PathBuf,
}

/// Options for the text-generation backend.
#[derive(Args, Clone)]
pub struct LlmArgs {
    /// Use an offline mock model instead of the remote endpoint
    #[arg(long)]
    pub mock_llm: bool,

    /// Text-generation endpoint URL (overrides PITCHLENS_ENDPOINT)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Per-request HTTP timeout in seconds (0 disables it)
    #[arg(long, value_name = "SECS", default_value = "120")]
    pub timeout: u64,

    /// Maximum generated length in tokens
    #[arg(long, default_value = "500")]
    pub max_length: u32,

    /// Sampling temperature
    #[arg(long, default_value = "0.75")]
    pub temperature: f64,
}
