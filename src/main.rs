//! Content Auditor main entry point
//!
//! This is the command-line interface for the Content Auditor page auditor.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use content_auditor::config::{load_config_with_hash, validate, Config};
use content_auditor::input::load_urls;
use content_auditor::output::{
    print_statistics, print_top_issues, top_issues, write_reports, RunStatistics,
};
use content_auditor::pipeline::{BatchRunner, PagePipeline, RunOptions};
use content_auditor::{AuditError, BudgetManager, Cache};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Content Auditor: SEO, accessibility and tone audits for a list of pages
///
/// Reads URLs from a CSV file, scores each page with deterministic SEO and
/// accessibility rules, optionally asks a local model for a tone summary
/// under a hard call budget, and writes JSONL and CSV reports. Finished
/// pages are cached so repeated runs only fetch what is new or failed.
#[derive(Parser, Debug)]
#[command(name = "content-auditor")]
#[command(version)]
#[command(about = "Audit web pages for SEO, accessibility and tone", long_about = None)]
struct Cli {
    /// CSV file with a `url` column
    #[arg(short, long, value_name = "CSV", required_unless_present = "cache_stats")]
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Maximum number of pages to audit
    #[arg(long)]
    max_pages: Option<usize>,

    /// Log progress every N pages
    #[arg(long)]
    batch_size: Option<usize>,

    /// Number of pages processed at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Skip tone analysis entirely
    #[arg(long)]
    no_llm: bool,

    /// Maximum number of model calls for this run
    #[arg(long)]
    max_calls: Option<u64>,

    /// Directory for cached page results
    #[arg(long)]
    cache_dir: Option<String>,

    /// Directory for report files
    #[arg(long)]
    reports_dir: Option<String>,

    /// Remove all cached results before running
    #[arg(long)]
    clear_cache: bool,

    /// Model used for tone analysis
    #[arg(long, env = "OLLAMA_MODEL")]
    ollama_model: Option<String>,

    /// Base URL of the local model server
    #[arg(long, env = "OLLAMA_BASE_URL")]
    ollama_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and list the URLs that would be audited
    #[arg(long, conflicts_with = "cache_stats")]
    dry_run: bool,

    /// Show cache statistics and exit
    #[arg(long, conflicts_with = "dry_run")]
    cache_stats: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(max_pages) = self.max_pages {
            config.audit.max_pages = max_pages;
        }
        if let Some(batch_size) = self.batch_size {
            config.audit.batch_size = batch_size;
        }
        if let Some(concurrency) = self.concurrency {
            config.audit.concurrency = concurrency;
        }
        if self.no_llm {
            config.tone.enabled = false;
        }
        if let Some(max_calls) = self.max_calls {
            config.budget.max_llm_calls = max_calls;
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.output.cache_dir = cache_dir.clone();
        }
        if let Some(reports_dir) = &self.reports_dir {
            config.output.reports_dir = reports_dir.clone();
        }
        if let Some(model) = &self.ollama_model {
            config.tone.model = model.clone();
        }
        if let Some(base_url) = &self.ollama_url {
            config.tone.base_url = base_url.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .map_err(AuditError::from)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);
    validate(&config)
        .map_err(AuditError::from)
        .context("Invalid configuration")?;

    if cli.cache_stats {
        handle_cache_stats(&config)?;
        return Ok(());
    }

    // required_unless_present guarantees this outside --cache-stats
    let input = cli
        .input
        .as_deref()
        .context("--input is required")?;
    let urls = load_urls(input).map_err(AuditError::from)?;

    if cli.dry_run {
        handle_dry_run(&config, &urls);
        return Ok(());
    }

    if let Err(e) = handle_audit(config, urls, cli.clear_cache).await {
        tracing::error!("Audit failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("content_auditor=info,warn"),
            1 => EnvFilter::new("content_auditor=debug,info"),
            2 => EnvFilter::new("content_auditor=trace,debug"),
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

/// Handles the --cache-stats mode
fn handle_cache_stats(config: &Config) -> content_auditor::Result<()> {
    let cache = Cache::new(&config.output.cache_dir)?;
    let stats = cache.stats();

    println!("Cache directory: {}", cache.dir().display());
    println!("  Entries: {}", stats.entry_count);
    println!("  Size: {:.2} MB", stats.total_size_mb());

    Ok(())
}

/// Handles the --dry-run mode: shows what would be audited
fn handle_dry_run(config: &Config, urls: &[String]) {
    println!("=== Content Auditor Dry Run ===\n");

    println!("Audit:");
    println!("  Max pages: {}", config.audit.max_pages);
    println!("  Progress interval: {}", config.audit.batch_size);
    println!("  Concurrency: {}", config.audit.concurrency);

    println!("\nTone analysis:");
    if config.tone.enabled {
        println!("  Model: {}", config.tone.model);
        println!("  Endpoint: {}", config.tone.base_url);
        println!("  Max calls: {}", config.budget.max_llm_calls);
    } else {
        println!("  Disabled");
    }

    println!("\nOutput:");
    println!("  Cache: {}", config.output.cache_dir);
    println!("  Reports: {}", config.output.reports_dir);

    let selected = &urls[..urls.len().min(config.audit.max_pages)];
    println!("\nURLs ({} of {}):", selected.len(), urls.len());
    for url in selected {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main audit run
async fn handle_audit(
    config: Config,
    urls: Vec<String>,
    clear_cache: bool,
) -> content_auditor::Result<()> {
    let cache = Cache::new(&config.output.cache_dir)?;
    if clear_cache {
        let removed = cache.clear()?;
        tracing::info!("Cleared {} cached results", removed);
    }

    let pipeline = PagePipeline::from_config(&config)?;
    let budget = BudgetManager::new(config.budget.max_llm_calls);
    let options = RunOptions::from_config(&config);
    let runner = BatchRunner::new(pipeline, cache, budget, options);

    let started_at = Utc::now();
    let report = runner.run(&urls).await;

    let paths = write_reports(Path::new(&config.output.reports_dir), &report.results)?;

    let budget_state = options.use_llm.then(|| runner.budget().stats());
    let stats =
        RunStatistics::from_report(&report, started_at, budget_state, runner.cache().stats());

    print_statistics(&stats);
    print_top_issues(&top_issues(&report.results, 10));

    println!("\nReports:");
    println!("  {}", paths.jsonl.display());
    println!("  {}", paths.summary.display());

    Ok(())
}
