use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "factgate", about = "Fact-veto trading decision core")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate one instrument
    Evaluate {
        /// Instrument identifier
        id: String,
        /// Replay file (defaults to $FACTGATE_REPLAY)
        #[arg(long)]
        replay: Option<PathBuf>,
    },
    /// Evaluate many instruments and rank them
    Batch {
        /// Replay file (defaults to $FACTGATE_REPLAY)
        #[arg(long)]
        replay: Option<PathBuf>,
        /// Comma-separated identifiers (default: every instrument in the feed)
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<String>>,
        /// Only print decisions scoring at least this much
        #[arg(long)]
        min_score: Option<f64>,
        /// Only print BUY decisions
        #[arg(long)]
        buys_only: bool,
    },
    /// Show the admission thresholds for a float cap and time of day
    Thresholds {
        /// Float market cap (omit for the unknown-cap default bundle)
        #[arg(long)]
        float_cap: Option<f64>,
        /// Exchange-local time, HH:MM
        #[arg(long)]
        time: String,
        /// Sentiment stage (START, MAIN, CLIMAX, DIVERGENCE, RECESSION, FREEZE)
        #[arg(long, default_value = "DIVERGENCE")]
        stage: String,
        /// Yesterday's traded amount
        #[arg(long)]
        yesterday_amount: Option<f64>,
    },
    /// Print the effective rule config
    Config,
}
