// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl: walk one or more roots and write an index file
// - search: look up terms in an index file written by `crawl`
//
// We use clap's "derive" API: the CLI structure is described by the structs
// and enums below, and clap generates the parsing and --help output.
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_MAX_LENGTH, DEFAULT_TIMEOUT};

#[derive(Parser, Debug)]
#[command(
    name = "url-search",
    version,
    about = "Index the files under web directory listings and search them offline",
    long_about = "url-search crawls directory-style web pages below a set of root URLs, \
                  stores every discovered path in a compact index file, and later finds \
                  files by name in that index without touching the network."
)]
pub struct Cli {
    /// Log every skipped page and fetch (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl one or more roots and write an index
    ///
    /// Example: url-search crawl https://example.com/pub/ --index pub.json
    Crawl {
        /// URLs that serve both as starting points and as the allowed prefixes
        #[arg(required = true)]
        urls: Vec<String>,

        /// Location of the index file to write to
        #[arg(long)]
        index: PathBuf,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs_f64())]
        timeout: f64,

        /// Pages declaring more bytes than this are not parsed
        #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
        max_length: u64,
    },

    /// Search an index for file names containing all terms
    ///
    /// Example: url-search search linux iso --index pub.json
    Search {
        /// Terms to search for (arbitrary order, case-insensitive)
        #[arg(required = true)]
        terms: Vec<String>,

        /// Location of the index file to read from
        #[arg(long)]
        index: PathBuf,
    },
}
