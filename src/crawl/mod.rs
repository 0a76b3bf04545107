// src/crawl/mod.rs
// =============================================================================
// This module handles crawling the roots into a path trie.
//
// Submodules:
// - normalize: canonical form of a URL, so equal resources share one path
// - fetch: the Fetcher seam, the reqwest implementation and page filtering
// - html: pulling href targets out of a page
// - queue: the breadth-first crawl loop tying the others together
// =============================================================================

mod fetch;
mod html;
mod normalize;
mod queue;

pub use fetch::HttpFetcher;
pub use queue::crawl;
