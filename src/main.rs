//! WebQuery main entry point
//!
//! Command-line interface that turns websites, text and files into a corpus.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use webquery::config::{load_config_with_hash, validate, Config};
use webquery::corpus::{validate_id, CorpusBuilder, CorpusStore, FsCorpusStore};
use webquery::crawler::{build_sitemap, HttpFetcher, PageFetcher};
use webquery::{parse_seed, Orchestrator};

/// WebQuery: build a text corpus from websites
///
/// Every URL is crawled up to the configured depth and the readable text of each
/// discovered page is aggregated. Free text and plain-text files can be added to
/// the same corpus.
#[derive(Parser, Debug)]
#[command(name = "webquery")]
#[command(version)]
#[command(about = "Build a text corpus from websites", long_about = None)]
struct Cli {
    /// Seed URLs to ingest
    #[arg(value_name = "URLS")]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Store the corpus under this id instead of printing it
    #[arg(long, value_name = "ID")]
    id: Option<String>,

    /// Free text placed at the start of the corpus
    #[arg(long, value_name = "TEXT")]
    text: Option<String>,

    /// Plain-text file added to the corpus (repeatable)
    #[arg(long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Print the sitemap XML of every URL without extracting content
    #[arg(long, conflicts_with_all = ["id", "text", "files"])]
    sitemap: bool,

    /// Override the configured crawl depth
    #[arg(long, value_name = "N")]
    depth: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(&cli)?;

    if cli.sitemap {
        handle_sitemap(&config, &cli.urls).await
    } else {
        handle_ingest(config, &cli).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webquery=info,warn"),
            1 => EnvFilter::new("webquery=debug,info"),
            2 => EnvFilter::new("webquery=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so a corpus printed to stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (or defaults) and applies command-line overrides
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("loading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    validate(&config).context("invalid configuration")?;

    Ok(config)
}

/// Handles the --sitemap mode: prints one sitemap document per URL
async fn handle_sitemap(config: &Config, urls: &[String]) -> anyhow::Result<()> {
    if urls.is_empty() {
        bail!("--sitemap needs at least one URL");
    }

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::from_config(config)?);

    for url in urls {
        let seed = parse_seed(url).with_context(|| format!("invalid seed URL '{}'", url))?;
        let sitemap = build_sitemap(config, Arc::clone(&fetcher), &seed).await;
        tracing::info!(
            "Sitemap of {}: {} URLs ({} failed fetches)",
            seed,
            sitemap.len(),
            sitemap.failed_fetches()
        );
        println!("{}", sitemap.to_xml()?);
    }

    Ok(())
}

/// Handles the main ingestion: text, files and URLs into one corpus
async fn handle_ingest(config: Config, cli: &Cli) -> anyhow::Result<()> {
    if cli.urls.is_empty() && cli.text.is_none() && cli.files.is_empty() {
        bail!("nothing to ingest: pass URLs, --text or --file");
    }
    if let Some(id) = &cli.id {
        validate_id(id)?;
    }

    let store = FsCorpusStore::from_config(&config.output);
    let orchestrator = Orchestrator::new(config)?;
    let mut builder = CorpusBuilder::new();

    if let Some(text) = &cli.text {
        builder.push_text(text);
    }
    for path in &cli.files {
        builder
            .push_file(path)
            .with_context(|| format!("reading {}", path.display()))?;
    }

    for url in &cli.urls {
        let report = orchestrator.ingest(url).await?;
        println!(
            "{}\t{}\t{}/{}",
            report.status,
            report.seed,
            report.extracted_count(),
            report.pages.len()
        );
        builder.push_url_corpus(&report.corpus());
    }

    let corpus = builder.build();
    match &cli.id {
        Some(id) => {
            store.put(id, &corpus)?;
            tracing::info!("Corpus '{}' written to {}", id, store.dir().display());
        }
        None => print!("{}", corpus),
    }

    Ok(())
}
