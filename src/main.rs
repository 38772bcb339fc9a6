//! Linkpulse main entry point
//!
//! This is the command-line interface for the linkpulse friend-link checker.

use clap::Parser;
use linkpulse::config::{self, Config};
use linkpulse::report::RunReport;
use tracing_subscriber::EnvFilter;

/// Linkpulse: a friend-link liveness checker
///
/// Linkpulse verifies each configured friend link through direct access, an
/// optional proxy rewrite, and a third-party status API, then writes a JSON
/// report that carries per-link failure streaks from run to run.
#[derive(Parser, Debug)]
#[command(name = "linkpulse")]
#[command(version = "1.0.0")]
#[command(about = "A friend-link liveness checker", long_about = None)]
struct Cli {
    /// Link source URL or path (overrides SOURCE_URL)
    #[arg(long)]
    source: Option<String>,

    /// Report file path (overrides RESULT_FILE)
    #[arg(long)]
    result_file: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate configuration and list the links without probing
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Print a summary of the existing report and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = config::from_env().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(source) = cli.source {
        config.source = source;
    }
    if let Some(path) = cli.result_file {
        config.output.result_path = path;
    }
    config::validate(&config)?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config).await
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_check(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkpulse=info,warn"),
            1 => EnvFilter::new("linkpulse=debug,info"),
            2 => EnvFilter::new("linkpulse=trace,debug"),
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

/// Handles the --dry-run mode: validates config and lists what would be checked
async fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Linkpulse Dry Run ===\n");

    println!("Configuration:");
    println!("  Source: {}", config.source);
    println!("  Report: {}", config.output.result_path);
    println!(
        "  Proxy tier: {}",
        config.proxy_prefix.as_deref().unwrap_or("disabled")
    );
    println!("  Status API: {}", config.status_api.url);
    println!(
        "  Status API key: {}",
        if config.status_api.key.is_some() {
            "set"
        } else {
            "unset"
        }
    );
    println!(
        "  Backlink check: {}",
        config.author_url.as_deref().unwrap_or("disabled")
    );
    println!("  Workers: {}", config.checker.workers);

    let client = linkpulse::checker::build_api_client(&config.checker)?;
    let entries = linkpulse::source::fetch_entries(&client, &config.source).await?;

    println!("\nLinks to check ({}):", entries.len());
    for entry in &entries {
        match &entry.linkpage {
            Some(page) => println!("  - {} ({}) [links page: {}]", entry.name, entry.link, page),
            None => println!("  - {} ({})", entry.name, entry.link),
        }
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: summarizes the existing persisted report
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = std::path::Path::new(&config.output.result_path);
    if !path.exists() {
        anyhow::bail!("no report found at {}", path.display());
    }

    let report = linkpulse::report::load_previous(path);
    print_report(&report);

    Ok(())
}

/// Prints a report summary to stdout
fn print_report(report: &RunReport) {
    println!("=== Link Check Report ===\n");
    println!("Timestamp: {}", report.timestamp);
    println!("Total links: {}", report.total_count);
    println!("Accessible: {}", report.accessible_count);
    println!("Inaccessible: {}", report.inaccessible_count);
    if let Some(count) = report.has_author_link_count {
        println!("Linking back: {}", count);
    }

    let failing: Vec<_> = report
        .link_status
        .iter()
        .filter(|status| !status.is_accessible())
        .collect();

    if !failing.is_empty() {
        println!("\nFailing links:");
        for status in failing {
            println!(
                "  - {} ({}) failing for {} run(s)",
                status.name, status.link, status.fail_count
            );
        }
    }
}

/// Handles the main check operation
async fn handle_check(config: &Config) -> anyhow::Result<()> {
    match linkpulse::checker::run_check(config).await {
        Ok(report) => {
            tracing::info!(
                "Check completed: {}/{} links accessible",
                report.accessible_count,
                report.total_count
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Check failed: {}", e);
            Err(e.into())
        }
    }
}
