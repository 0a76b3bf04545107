// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Dispatch to the crawl or search handler
// 3. Exit with proper code (0 = success, 1 = unresolvable index entries,
//    2 = error)
//
// The crawl is strictly sequential, so a single-threaded tokio runtime is
// all we need.
// =============================================================================

mod cli;
mod config;
mod crawl;
mod index;
mod logging;
mod search;

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use cli::{Cli, Commands};
use config::CrawlConfig;
use search::DecodedIndex;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Crawl {
            urls,
            index,
            timeout,
            max_length,
        } => {
            let timeout = Duration::try_from_secs_f64(timeout)
                .with_context(|| format!("invalid timeout {}", timeout))?;
            let config = CrawlConfig::default()
                .with_timeout(timeout)
                .with_max_length(max_length);
            handle_crawl(&urls, &index, &config).await
        }
        Commands::Search { terms, index } => handle_search(&terms, &index),
    }
}

// Handles the 'crawl' subcommand
//
// Nothing is written until the whole crawl has finished: the index file is
// only created once the queue has drained.
async fn handle_crawl(urls: &[String], index_path: &Path, config: &CrawlConfig) -> Result<i32> {
    info!(
        roots = urls.len(),
        timeout = ?config.timeout,
        max_length = config.max_length,
        "starting crawl"
    );

    let fetcher = crawl::HttpFetcher::new(config.max_length).context("failed to build HTTP client")?;
    let outcome = crawl::crawl(&fetcher, urls, config).await?;
    if outcome.stats.parsed == 0 {
        warn!(
            skipped = outcome.stats.skipped,
            failed = outcome.stats.failed,
            "no page could be parsed, the index only holds the roots"
        );
    }

    let written = index::write_index(index_path, outcome.trie.flatten())
        .with_context(|| format!("failed to write index {}", index_path.display()))?;
    info!(edges = written, path = %index_path.display(), "index written");

    Ok(0)
}

// Handles the 'search' subcommand
//
// Prints one "name<TAB>url" line per hit on stdout. Edges the decoder skipped
// and entries whose URL cannot be rebuilt are logged and counted; the rest
// are still printed.
fn handle_search(terms: &[String], index_path: &Path) -> Result<i32> {
    let edges = index::read_index(index_path)
        .with_context(|| format!("failed to read index {}", index_path.display()))?;
    let decoded = DecodedIndex::from_edges(edges);

    if decoded.is_empty() {
        warn!(path = %index_path.display(), "index is empty");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut unresolved = 0;

    for result in decoded.search(terms) {
        match result {
            Ok(hit) => writeln!(out, "{}\t{}", hit.name, hit.url)?,
            Err(e) => {
                error!(error = %e, "cannot rebuild URL for index entry");
                unresolved += 1;
            }
        }
    }
    out.flush()?;

    let rejected = decoded.rejected();
    info!(nodes = decoded.len(), rejected, unresolved, "search finished");
    Ok(if unresolved > 0 || rejected > 0 { 1 } else { 0 })
}
