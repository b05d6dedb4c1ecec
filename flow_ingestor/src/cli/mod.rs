pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Retail and options flow signal report")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch flow data, aggregate it and write the JSON report
    Report {
        /// Path to the run config (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Output file; the report goes to stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Parse and normalize a run config without fetching anything
    CheckConfig {
        /// Path to the run config (TOML)
        #[arg(short, long)]
        config: PathBuf,
    },
}
