use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Donation intake wizard client", long_about = None)]
pub struct Cli {
    /// Override the intake service root URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "INTAKE_LOG_JSON", default_value = "false")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive one intake session through every step from a JSON script
    Run {
        /// Path to the intake script
        script: PathBuf,
    },

    /// Search registered donors and print the candidates
    Search {
        /// Free-text query (name, email or phone)
        query: String,
    },
}
