//! Wiki-Ranker main entry point
//!
//! This is the command-line interface for the Wiki-Ranker link-graph crawler.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use wiki_ranker::config::{load_config_with_hash, validate, validate_start_url, Config};
use wiki_ranker::crawler::build_frontier;
use wiki_ranker::graph::{build_inverter, run_worker, InverterStrategy};
use wiki_ranker::output::{print_statistics, print_top_ranked, write_rank_json};
use wiki_ranker::count_rank;
use tracing_subscriber::EnvFilter;

/// Wiki-Ranker: ranks wiki pages by inbound links
///
/// Wiki-Ranker crawls a wiki breadth-first from a start page, records the
/// article links of every page it visits, and ranks pages by how many of
/// the crawled pages link to them.
#[derive(Parser, Debug)]
#[command(name = "wiki-ranker")]
#[command(version = "1.0.0")]
#[command(about = "Ranks wiki pages by inbound links", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page to start crawling from (overrides crawler.start-url)
    #[arg(short, long, value_name = "URL")]
    start_url: Option<String>,

    /// Maximum number of pages to crawl (overrides crawler.page-limit)
    #[arg(short, long, value_name = "N")]
    limit: Option<usize>,

    /// Graph inversion strategy (overrides inverter.strategy)
    #[arg(long, value_enum)]
    strategy: Option<InverterStrategy>,

    /// Number of top-ranked pages to print
    #[arg(long, default_value_t = 20, value_name = "N")]
    top: usize,

    /// Print the full rank map as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inverts a batch of link-map entries read from stdin (used internally
    /// by the process inversion strategy)
    #[command(name = "invert-worker", hide = true)]
    InvertWorker,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::InvertWorker) = cli.command {
        // stdout carries the worker response; only errors are logged
        setup_logging(0, true);
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        run_worker(stdin.lock(), stdout.lock()).context("Inversion worker failed")?;
        return Ok(());
    }

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let start_url = config
        .crawler
        .start_url
        .clone()
        .ok_or_else(|| anyhow!("No start URL: pass --start-url or set crawler.start-url"))?;
    validate_start_url(&start_url)?;

    if cli.dry_run {
        handle_dry_run(&config, &start_url);
        return Ok(());
    }

    handle_rank(&cli, config, &start_url).await
}

/// Loads the configuration file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(start_url) = &cli.start_url {
        config.crawler.start_url = Some(start_url.clone());
    }
    if let Some(limit) = cli.limit {
        config.crawler.page_limit = limit;
    }
    if let Some(strategy) = cli.strategy {
        config.inverter.strategy = strategy;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for results.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wiki_ranker=info,warn"),
            1 => EnvFilter::new("wiki_ranker=debug,info"),
            2 => EnvFilter::new("wiki_ranker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, start_url: &str) {
    println!("=== Wiki-Ranker Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", start_url);
    println!("  Page limit: {}", config.crawler.page_limit);
    println!(
        "  Workers: {} (max {}, request rate ceiling {})",
        config.crawler.effective_workers(),
        config.crawler.max_workers,
        config.crawler.max_request_rate
    );
    println!(
        "  Minimum request interval: {}ms",
        config.crawler.min_request_interval
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Link prefix: {}", config.crawler.link_prefix);

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!("  Delay: {}ms", config.retry.delay);
    println!("  Backoff: {}", config.retry.backoff);

    println!("\nInverter:");
    println!("  Strategy: {}", config.inverter.strategy);
    println!("  Threads: {}", config.inverter.threads);
    println!("  Processes: {}", config.inverter.processes);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
}

/// Handles the main operation: crawl, invert, rank, report
async fn handle_rank(cli: &Cli, config: Config, start_url: &str) -> anyhow::Result<()> {
    let inverter = build_inverter(config.inverter.strategy, &config.inverter)
        .context("Failed to set up graph inverter")?;

    let mut frontier = build_frontier(start_url, config.crawler.page_limit, &config)?;
    frontier.run().await;
    let stats = frontier.stats().clone();
    let links = frontier.into_link_map();

    let ranks = tokio::task::spawn_blocking(move || count_rank(&links, inverter.as_ref()))
        .await
        .context("Inversion task panicked")??;

    if cli.json {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        write_rank_json(&ranks, &mut out)?;
        out.flush()?;
    } else {
        print_statistics(&stats);
        print_top_ranked(&ranks, cli.top);
    }

    Ok(())
}
