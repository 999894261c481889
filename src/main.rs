//! Commentary Archiver main entry point
//!
//! This is the command-line interface for the chapter-by-chapter PDF archiver.

use anyhow::Context;
use clap::{Parser, Subcommand};
use commentary_archiver::capture::{CaptureAdapter, ChromeSession};
use commentary_archiver::catalog::Catalog;
use commentary_archiver::config::{load_config_with_hash, validate, Config};
use commentary_archiver::orchestrator::{partition_names, resolve_single, Orchestrator, TokioPause};
use commentary_archiver::report;
use commentary_archiver::resume::{pending_units, OutputSnapshot};
use commentary_archiver::state::RunProgress;
use commentary_archiver::ArchiveError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Commentary Archiver: a polite chapter-by-chapter PDF archiver
///
/// Captures every chapter of a commentary as a PDF, one book at a time.
/// Books whose directory already exists under the output root are skipped,
/// so an interrupted run is resumed by running again.
#[derive(Parser, Debug)]
#[command(name = "commentary-archiver")]
#[command(version = "1.0.0")]
#[command(about = "Archive commentary chapters as PDFs", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Books to capture, in order (default: every book not yet downloaded)
    #[arg(value_name = "BOOK")]
    books: Vec<String>,

    /// Path to TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory PDFs are written under
    #[arg(long, global = true, value_name = "DIR")]
    output_root: Option<PathBuf>,

    /// Pause between books, in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture one book, or a single chapter of it
    Book {
        /// Book name, e.g. "genesis" or "1 samuel"
        book: String,

        /// Chapter number (default: every chapter)
        chapter: Option<String>,
    },

    /// Show which books are downloaded and exit
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;
    let catalog = Catalog::standard();

    match &cli.command {
        Some(Command::Status) => handle_status(&config, &catalog),
        Some(Command::Book { book, chapter }) => {
            handle_book(&config, &catalog, book, chapter.as_deref()).await
        }
        None if cli.books.is_empty() => handle_run_all(&config, &catalog).await,
        None => handle_specific(&config, &catalog, &cli.books).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("commentary_archiver=info,warn"),
            1 => EnvFilter::new("commentary_archiver=debug,info"),
            2 => EnvFilter::new("commentary_archiver=trace,debug"),
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

/// Loads the config file if one was given, then applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(root) = &cli.output_root {
        config.archive.output_root = root.clone();
    }
    if let Some(delay) = cli.delay_ms {
        config.archive.delay_ms = delay;
    }

    validate(&config).map_err(ArchiveError::from)?;
    Ok(config)
}

fn scan_output(config: &Config) -> anyhow::Result<OutputSnapshot> {
    let root = &config.archive.output_root;
    OutputSnapshot::scan(root)
        .with_context(|| format!("Failed to read output root {}", root.display()))
}

fn prepare_output_root(config: &Config) -> Result<(), ArchiveError> {
    let root = &config.archive.output_root;
    std::fs::create_dir_all(root).map_err(|source| ArchiveError::OutputRoot {
        path: root.clone(),
        source,
    })
}

/// Handles the `status` subcommand
fn handle_status(config: &Config, catalog: &Catalog) -> anyhow::Result<()> {
    let snapshot = scan_output(config)?;
    println!("{}", report::format_status(catalog, &snapshot));
    Ok(())
}

/// Captures every book that has no output directory yet
async fn handle_run_all(config: &Config, catalog: &Catalog) -> anyhow::Result<()> {
    let snapshot = scan_output(config)?;
    println!("{}", report::format_status(catalog, &snapshot));

    let pending = pending_units(catalog, &snapshot);
    if pending.is_empty() {
        println!("\n{}", report::format_nothing_to_do());
        return Ok(());
    }

    println!(
        "\n{}",
        report::format_run_plan(
            &format!("Books to download ({}):", pending.len()),
            &pending
        )
    );

    prepare_output_root(config)?;
    let progress = run_with_browser(config, catalog, RunKind::Pending(&pending)).await?;

    println!("\n{}", report::format_summary(&progress));
    Ok(())
}

/// Captures the named books, in the order given
async fn handle_specific(config: &Config, catalog: &Catalog, books: &[String]) -> anyhow::Result<()> {
    // Checked up front so no browser is started for a list of typos
    if partition_names(catalog, books).valid.is_empty() {
        println!("{}", report::format_invalid_names(books, catalog));
        println!("{}", report::format_no_valid_units());
        return Ok(());
    }

    prepare_output_root(config)?;
    let progress = run_with_browser(config, catalog, RunKind::Named(books)).await?;

    println!("\n{}", report::format_summary(&progress));
    Ok(())
}

/// Captures one book or chapter; any failure ends the process with an error
async fn handle_book(
    config: &Config,
    catalog: &Catalog,
    book: &str,
    chapter: Option<&str>,
) -> anyhow::Result<()> {
    resolve_single(catalog, book, chapter).map_err(ArchiveError::from)?;

    prepare_output_root(config)?;
    let adapter = CaptureAdapter::from_config(config);
    let session = ChromeSession::launch(&config.browser).await?;

    let result = {
        let orchestrator = Orchestrator::new(
            catalog,
            &adapter,
            &session,
            TokioPause,
            config.archive.delay(),
        );
        orchestrator.run_single(book, chapter).await
    };

    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close browser: {}", e);
    }

    let capture = result?;
    for item in &capture.items {
        println!("Saved {}", item.path.display());
    }
    println!(
        "{}",
        report::format_unit_success(&capture.unit, capture.items.len())
    );
    Ok(())
}

/// Which orchestrator entry point a multi-book run goes through
enum RunKind<'t> {
    Pending(&'t [String]),
    Named(&'t [String]),
}

/// Launches the browser, performs the run, and always shuts the browser down
/// afterwards
async fn run_with_browser(
    config: &Config,
    catalog: &Catalog,
    kind: RunKind<'_>,
) -> anyhow::Result<RunProgress> {
    let adapter = CaptureAdapter::from_config(config);
    let session = ChromeSession::launch(&config.browser).await?;

    let progress = {
        let orchestrator = Orchestrator::new(
            catalog,
            &adapter,
            &session,
            TokioPause,
            config.archive.delay(),
        );
        match kind {
            RunKind::Pending(targets) => orchestrator.run(targets).await,
            RunKind::Named(books) => orchestrator.run_specific(books).await,
        }
    };

    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close browser: {}", e);
    }

    Ok(progress)
}
