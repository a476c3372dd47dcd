//! Book-Scraper main entry point
//!
//! This is the command-line interface for the Book-Scraper catalogue exporter.

use anyhow::Context;
use book_scraper::config::{load_config, validate, Config};
use book_scraper::crawler::{run_export, ExportRequest};
use book_scraper::output::{print_summary, RunSummary};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when the run aborted
const EXIT_FAILURE: u8 = 1;

/// Exit code when the run completed but found nothing to export
const EXIT_NOTHING_FOUND: u8 = 2;

/// Book-Scraper: catalogue exporter for the books.toscrape.com demo store
///
/// Exports one product, one catalogue, or every catalogue of the site to CSV,
/// downloading cover images alongside.
#[derive(Parser, Debug)]
#[command(name = "book-scraper")]
#[command(version)]
#[command(about = "Export books.toscrape.com products to CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory exports are written under
    #[arg(short, long, value_name = "DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Maximum simultaneous requests (1-8)
    #[arg(long, value_name = "N", global = true)]
    concurrency: Option<u32>,

    /// Skip cover image downloads
    #[arg(long, global = true)]
    no_images: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a single product page
    Product {
        /// Product detail page URL
        url: String,
    },

    /// Export every product of one catalogue
    Catalogue {
        /// First listing page of the catalogue
        url: String,
    },

    /// Export every catalogue linked from the site root
    Site,
}

impl Command {
    fn into_request(self) -> ExportRequest {
        match self {
            Command::Product { url } => ExportRequest::Product(url),
            Command::Catalogue { url } => ExportRequest::Catalogue(url),
            Command::Site => ExportRequest::Site,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let outcome = run(cli).await;
    match &outcome {
        Ok(summary) if summary.is_empty() => tracing::warn!("Nothing was exported"),
        Ok(_) => {}
        Err(e) => tracing::error!("Export failed: {:#}", e),
    }

    ExitCode::from(exit_code(&outcome))
}

/// Maps a run outcome to the process exit status
fn exit_code(outcome: &anyhow::Result<RunSummary>) -> u8 {
    match outcome {
        Ok(summary) if summary.is_empty() => EXIT_NOTHING_FOUND,
        Ok(_) => 0,
        Err(_) => EXIT_FAILURE,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("book_scraper=info,warn"),
            1 => EnvFilter::new("book_scraper=debug,info"),
            2 => EnvFilter::new("book_scraper=trace,debug"),
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

/// Loads configuration, applies CLI overrides, and runs the export
async fn run(cli: Cli) -> anyhow::Result<RunSummary> {
    let config = build_config(&cli)?;
    let quiet = cli.quiet;
    let request = cli.command.into_request();

    tracing::info!(
        "Exporting {:?} into {}",
        request,
        config.output.directory.display()
    );

    let summary = run_export(config, &request)
        .await
        .context("export aborted")?;

    if !quiet {
        print_summary(&summary);
    }

    Ok(summary)
}

/// Builds the effective configuration from the optional file and CLI flags
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_requests = concurrency;
    }
    if cli.no_images {
        config.crawler.download_images = false;
    }

    // Overrides go through the same checks as the file
    validate(&config).context("invalid configuration")?;

    Ok(config)
}
