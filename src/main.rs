//! Contact-Trawl main entry point
//!
//! This is the command-line interface for the Contact-Trawl email finder.

use anyhow::Context;
use clap::{Parser, Subcommand};
use contact_trawl::config::{load_config_with_hash, Config};
use contact_trawl::output::{print_follow_up_statistics, print_statistics};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Contact-Trawl: finds public contact emails for business websites
///
/// Contact-Trawl reads a sheet of business records, visits each website's
/// homepage, contact and about pages, then any linked social profiles, and
/// writes the first emails it finds back to the sheet.
#[derive(Parser, Debug)]
#[command(name = "contact-trawl")]
#[command(version)]
#[command(about = "A contact email finder for business websites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Job to run (defaults to scrape)
    #[command(subcommand)]
    command: Option<Command>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Discover emails for every record and write them back
    Scrape,
    /// Revisit saved social links of records still lacking an email
    Profiles,
    /// Rebuild the emails-only sheet from the record sheet
    Filter,
    /// Validate the configuration and show what would run
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    match cli.command.unwrap_or(Command::Scrape) {
        Command::Scrape => handle_scrape(config).await,
        Command::Profiles => handle_profiles(config).await,
        Command::Filter => handle_filter(config),
        Command::Check => {
            handle_check(&config);
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("contact_trawl=info,warn"),
            1 => EnvFilter::new("contact_trawl=debug,info"),
            2 => EnvFilter::new("contact_trawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs the scrape job; Ctrl-C stops new records from starting
async fn handle_scrape(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping sheet '{}' ({} records at a time, {}s per fetch)",
        config.store.sheet,
        config.crawler.max_concurrent_records,
        config.crawler.request_timeout
    );

    let cancel = cancel_on_ctrl_c();
    let stats = contact_trawl::crawler::scrape(config, &cancel)
        .await
        .context("Scrape failed")?;

    print_statistics(&stats);
    Ok(())
}

/// Runs the profile follow-up job over saved social links
async fn handle_profiles(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Following up saved profile links in sheet '{}' ({} at a time)",
        config.store.sheet,
        config.profiles.max_concurrent
    );

    let cancel = cancel_on_ctrl_c();
    let stats = contact_trawl::crawler::follow_up_profiles(config, &cancel)
        .await
        .context("Profile follow-up failed")?;

    print_follow_up_statistics(&stats);
    Ok(())
}

/// Returns a token cancelled by the first Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing work already in progress");
            trigger.cancel();
        }
    });
    cancel
}

fn handle_filter(config: Config) -> anyhow::Result<()> {
    let copied = contact_trawl::crawler::filter(config).context("Email filter failed")?;
    println!("✓ {} rows with an email copied", copied);
    Ok(())
}

/// Prints the effective configuration without touching the network
fn handle_check(config: &Config) {
    println!("=== Contact-Trawl Check ===\n");

    println!("Crawler Configuration:");
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!(
        "  Max concurrent records: {}",
        config.crawler.max_concurrent_records
    );

    println!("\nUser Agent:");
    println!("  Default: {}", config.user_agent.header_value());
    println!("  Profiles: {}", config.user_agent.profile_user_agent);

    println!("\nProfile Follow-up:");
    println!("  Max concurrent: {}", config.profiles.max_concurrent);

    println!("\nStore:");
    println!("  Backend: {:?}", config.store.backend);
    println!("  Path: {}", config.store.path);
    println!("  Sheet: {}", config.store.sheet);

    println!("\nColumns:");
    println!("  Website: {}", config.columns.website);
    println!("  Email: {}", config.columns.email);
    println!("  Social: {}", config.columns.social);

    if config.filter.enabled {
        println!("\nEmail filter sheet: {}", config.filter.sheet);
    } else {
        println!("\nEmail filter: disabled");
    }

    println!("\n✓ Configuration is valid");
}
