// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - run:   check every configured website and email the report
// - check: check a single URL for a keyword (handy while writing a config)
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "site-monitor",
    version,
    about = "Checks websites for expected content and emails a status report",
    long_about = "site-monitor fetches every configured page, makes sure it answers with a healthy \
                  status code and shows the expected keyword, then emails a consolidated report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check all configured websites and send the report
    ///
    /// Example: site-monitor run --config config.json
    Run {
        /// Path to the JSON config file
        #[arg(long, short, default_value = "config.json")]
        config: PathBuf,

        /// Print the report but do not send the email
        #[arg(long)]
        dry_run: bool,

        /// Also print the run report as JSON
        #[arg(long)]
        json: bool,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },

    /// Check one page for a keyword and print the result
    ///
    /// Example: site-monitor check https://example.com "Example Domain"
    Check {
        /// Full page URL
        url: String,

        /// Keyword expected in the visible page text (case-insensitive)
        keyword: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
}
