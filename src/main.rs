// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, to stderr) and load an optional .env file
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = done, 1 = single check failed, 2 = error)
//
// A `run` exits with 0 even when sites are down or the email could not be
// sent. The report is the place where problems show up, not the exit code.
// =============================================================================

mod checker; // src/checker/ - fetch a page and look for the keyword
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - config file + SMTP credentials
mod mail; // src/mail/ - email delivery
mod monitor; // src/monitor/ - runs all checks in order
mod report; // src/report/ - report data + text rendering

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checker::{CheckSummary, ContentChecker, ReqwestFetcher};
use cli::{Cli, Commands};
use config::{Config, SmtpCredentials};
use mail::{Mailer, SmtpMailer};
use monitor::Monitor;

#[tokio::main]
async fn main() {
    // stdout is reserved for the report, so logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // A missing .env file is fine, real env vars still work
    let _ = dotenvy::dotenv();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, dry_run, json, timeout_secs } => {
            // Credentials are read exactly once, here, and handed down
            let credentials = SmtpCredentials::from_env();
            handle_run(&config, credentials, dry_run, json, Duration::from_secs(timeout_secs)).await
        }
        Commands::Check { url, keyword, json, timeout_secs } => {
            handle_check(&url, &keyword, json, Duration::from_secs(timeout_secs)).await
        }
    }
}

// Handles the 'run' subcommand
async fn handle_run(
    config_path: &Path,
    credentials: Result<SmtpCredentials>,
    dry_run: bool,
    json: bool,
    timeout: Duration,
) -> Result<i32> {
    let config = Config::load(config_path)?;
    let page_count: usize = config.websites.iter().map(|w| w.pages.len()).sum();
    info!(websites = config.websites.len(), pages = page_count, "configuration loaded");

    let checker = ContentChecker::new(ReqwestFetcher::new()?).with_timeout(timeout);
    let report = Monitor::new(checker).run_all(&config.websites).await;
    info!(
        elapsed_ms = report.total_elapsed_ms,
        down = report.down_count(),
        "all checks finished"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let from = credentials.as_ref().map(|c| c.user.clone()).unwrap_or_default();
    let message = mail::compose(&report, &from, &config.email.to);

    let mailer = if dry_run {
        None
    } else {
        build_mailer(&config, credentials)
    };

    mail::deliver(&message, mailer.as_ref().map(|m| m as &dyn Mailer)).await;

    Ok(0)
}

// Any problem here is logged and the report is only printed
fn build_mailer(config: &Config, credentials: Result<SmtpCredentials>) -> Option<SmtpMailer> {
    let credentials = match credentials {
        Ok(credentials) => credentials,
        Err(e) => {
            error!(error = %e, "cannot send email without SMTP credentials");
            return None;
        }
    };

    match SmtpMailer::new(&config.smtp, &credentials) {
        Ok(mailer) => Some(mailer),
        Err(e) => {
            error!(error = ?e, "failed to set up email transport");
            None
        }
    }
}

// Handles the 'check' subcommand
async fn handle_check(url: &str, keyword: &str, json: bool, timeout: Duration) -> Result<i32> {
    let checker = ContentChecker::new(ReqwestFetcher::new()?).with_timeout(timeout);
    let result = checker.check(url, keyword).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&CheckSummary::new(url, &result))?);
    } else if let Some(error) = result.error_message() {
        println!("❌ {} - {}", url, error);
        if let Some(snippet) = result.debug_snippet() {
            println!("   Page text starts with: {}", snippet);
        }
    } else {
        println!("✅ {} - keyword found", url);
    }

    Ok(if result.success() { 0 } else { 1 })
}
