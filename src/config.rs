// src/config.rs
// =============================================================================
// Crawl settings.
//
// The crawler has exactly two knobs:
// - timeout: how long a single fetch may take before it is abandoned
// - max_length: the largest page (in bytes) we are willing to parse
//
// Defaults match what the CLI uses when no flags are given. The CLI builds a
// CrawlConfig from Default and overrides fields with the with_* methods.
// =============================================================================

use std::time::Duration;

/// Per-request timeout used when `--timeout` is not given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Largest declared Content-Length (in bytes) that is still parsed.
pub const DEFAULT_MAX_LENGTH: u64 = 51_200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Timeout for each individual fetch.
    pub timeout: Duration,
    /// Pages declaring (or streaming) more bytes than this are skipped.
    pub max_length: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl CrawlConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_length(mut self, max_length: u64) -> Self {
        self.max_length = max_length;
        self
    }
}
