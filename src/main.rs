//! Lianjia-Harvest main entry point
//!
//! This is the command-line interface for the staged listing crawler.

use anyhow::Context;
use clap::Parser;
use lianjia_harvest::config::{load_config_with_hash, Config};
use lianjia_harvest::crawler::run_crawl;
use lianjia_harvest::output::print_summary;
use lianjia_harvest::Stage;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Lianjia-Harvest: a staged second-hand listing crawler
///
/// Walks areas, sub-areas, listing pages and listing details in strict
/// order and writes one CSV row per listing.
#[derive(Parser, Debug)]
#[command(name = "lianjia-harvest")]
#[command(version)]
#[command(about = "A staged second-hand listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the stage plan without crawling
    #[arg(long)]
    dry_run: bool,

    /// Log to the console only, without the dated log file
    #[arg(long)]
    no_log_file: bool,
}

impl Cli {
    /// Directory for the dated log file, unless file logging is off
    fn log_dir<'a>(&self, config: &'a Config) -> Option<&'a str> {
        (!self.no_log_file).then_some(config.output.log_dir.as_str())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Held until exit so buffered file logs are written
    let log_dir = cli.log_dir(&config);
    let _guard = setup_logging(cli.verbose, cli.quiet, log_dir);

    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    if cli.dry_run {
        handle_dry_run(&config, log_dir);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up console logging and, when a directory is given, a dated log file
///
/// A log file that cannot be opened is reported and the run continues with
/// console output only.
fn setup_logging(verbose: u8, quiet: bool, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lianjia_harvest=info,warn"),
            1 => EnvFilter::new("lianjia_harvest=debug,info"),
            2 => EnvFilter::new("lianjia_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let mut log_path = None;
    let mut file_error = None;
    let mut guard = None;

    let file_layer = match log_dir.map(open_log_file) {
        Some(Ok((path, file))) => {
            let (writer, file_guard) = tracing_appender::non_blocking(file);
            log_path = Some(path);
            guard = Some(file_guard);
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(false)
                    .with_ansi(false),
            )
        }
        Some(Err(e)) => {
            file_error = Some(e);
            None
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_path {
        tracing::debug!("Logging to {}", path.display());
    }
    if let Some(e) = file_error {
        tracing::warn!("File logging disabled: {:#}", e);
    }

    guard
}

/// Opens `<dir>/log-YYYY-MM-DD.log` for appending
fn open_log_file(dir: &str) -> anyhow::Result<(PathBuf, std::fs::File)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir))?;

    let path = Path::new(dir).join(log_file_name(chrono::Local::now().date_naive()));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    Ok((path, file))
}

fn log_file_name(date: chrono::NaiveDate) -> String {
    format!("log-{}.log", date.format("%Y-%m-%d"))
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, log_dir: Option<&str>) {
    println!("=== Lianjia-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Seed URL: {}", config.site.seed_url());
    println!("  Listing path: {}", config.site.listing_path);
    println!("  Allowed domains: {}", config.site.allowed_domains.join(", "));

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    match log_dir {
        Some(dir) => println!("  Log directory: {}", dir),
        None => println!("  Log directory: (console only)"),
    }

    println!("\nStages:");
    let frontiers = &config.frontier;
    for (stage, frontier) in [
        (Stage::Area, &frontiers.area),
        (Stage::SubArea, &frontiers.sub_area),
        (Stage::Page, &frontiers.page),
        (Stage::Detail, &frontiers.detail),
    ] {
        println!(
            "  {:<10} capacity {:>6}, {} workers, {}ms delay",
            stage.as_str(),
            frontier.capacity,
            frontier.workers,
            frontier.delay_ms
        );
    }
    println!(
        "  Listing deduplication: {}",
        if config.crawl.dedup_listings { "on" } else { "off" }
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Writing to {}, request timeout {}s",
        config.output.csv_path,
        config.crawl.request_timeout_secs
    );

    match run_crawl(config).await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        let date = chrono::NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        assert_eq!(log_file_name(date), "log-2023-05-01.log");
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["lianjia-harvest", "lianjia.toml", "-vv", "--dry-run"]);
        assert_eq!(cli.config, PathBuf::from("lianjia.toml"));
        assert_eq!(cli.verbose, 2);
        assert!(cli.dry_run);
        assert!(!cli.quiet);
        assert!(!cli.no_log_file);
    }

    #[test]
    fn test_no_log_file_disables_file_logging() {
        let config = lianjia_harvest::config::parse_config(
            r#"
[site]
base-url = "https://bj.lianjia.com"
allowed-domains = ["bj.lianjia.com"]

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#,
        )
        .unwrap();

        let cli = Cli::parse_from(["lianjia-harvest", "lianjia.toml"]);
        assert_eq!(cli.log_dir(&config), Some("log"));

        let cli = Cli::parse_from(["lianjia-harvest", "lianjia.toml", "--no-log-file"]);
        assert_eq!(cli.log_dir(&config), None);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["lianjia-harvest", "c.toml", "-q", "-v"]).is_err());
    }
}
