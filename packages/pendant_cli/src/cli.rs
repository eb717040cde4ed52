//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap. Execution lives in main.rs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// VitaPendant telemetry service and caregiver console
#[derive(Parser, Debug)]
#[command(name = "pendant")]
#[command(about = "Run the pendant telemetry service or watch a running device", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON config file (defaults are used when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the pendant service (overrides config and $PENDANT_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the telemetry API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Seed for reproducible readings
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Fetch the latest reading
    Status {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Fetch the 24 hour heart-rate history
    History {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Trigger an emergency SOS alert
    Sos {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Poll the device and render a live dashboard
    Watch {
        /// Seconds between status polls
        #[arg(long)]
        status_interval: Option<u64>,

        /// Seconds between history polls
        #[arg(long)]
        history_interval: Option<u64>,
    },
}
