// src/crawl/queue.rs
// =============================================================================
// This module implements the crawl itself, breadth first.
//
// How it works:
// 1. Normalize the roots, record their paths in the trie, queue them
// 2. Pop the oldest URL and fetch it
// 3. Skip it unless it is a successful, not-too-long text/html page
// 4. Extract its links, resolve and normalize them, keep those under a root
// 5. Record every link not seen before; queue the ones that look like
//    directories (end in '/')
// 6. Repeat until the queue is empty
//
// A path is recorded in the trie before it is queued, and only unrecorded
// paths get queued, so no URL is fetched twice. Failed fetches are logged
// and never retried.
//
// Everything runs on one task: one fetch at a time, in discovery order.
// =============================================================================

use std::collections::VecDeque;

use anyhow::Result;
use tracing::{debug, info, warn};
use url::Url;

use super::fetch::{check_eligible, Fetcher};
use super::html::{extract_links, resolve_link};
use super::normalize::{normalize, normalize_url};
use crate::config::CrawlConfig;
use crate::index::{split_path, PathTrie};

/// Counters reported at the end of a crawl.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched and parsed for links
    pub parsed: usize,
    /// Pages fetched but not parsed (status, type or length)
    pub skipped: usize,
    /// Fetches that failed at the transport level
    pub failed: usize,
}

/// Everything a finished crawl produced.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub trie: PathTrie,
    pub stats: CrawlStats,
}

/// State of one crawl run.
struct Crawler<'a, F: Fetcher> {
    fetcher: &'a F,
    config: &'a CrawlConfig,
    // Normalized roots; a link must start with one of these to be kept
    roots: Vec<String>,
    trie: PathTrie,
    // Frontier: URLs waiting to be fetched, oldest first
    queue: VecDeque<String>,
    stats: CrawlStats,
}

// Crawls everything reachable from `roots` without leaving them
//
// Parameters:
//   fetcher: where pages come from (HttpFetcher in the binary)
//   roots: start URLs, which double as the allow-list of URL prefixes
//   config: timeout and size limits
//
// Returns: the trie of every discovered path, plus counters
//
// Errors only when a root is not a valid absolute URL. Problems with
// individual pages are logged and skipped.
pub async fn crawl<F, S>(fetcher: &F, roots: &[S], config: &CrawlConfig) -> Result<CrawlOutcome>
where
    F: Fetcher,
    S: AsRef<str>,
{
    let mut crawler = Crawler::new(fetcher, config, roots)?;
    crawler.run().await;
    Ok(CrawlOutcome {
        trie: crawler.trie,
        stats: crawler.stats,
    })
}

impl<'a, F: Fetcher> Crawler<'a, F> {
    fn new<S: AsRef<str>>(fetcher: &'a F, config: &'a CrawlConfig, roots: &[S]) -> Result<Self> {
        let roots = roots
            .iter()
            .map(|root| normalize(root.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut trie = PathTrie::new();
        let mut queue = VecDeque::new();
        for root in &roots {
            let path = split_path(root);
            // The same root given twice is only crawled once
            if !trie.has(&path) {
                trie.add(&path);
                queue.push_back(root.clone());
            }
        }

        Ok(Self {
            fetcher,
            config,
            roots,
            trie,
            queue,
            stats: CrawlStats::default(),
        })
    }

    async fn run(&mut self) {
        while let Some(url) = self.queue.pop_front() {
            debug!(url = %url, pending = self.queue.len(), "fetching");

            let page = match self.fetcher.fetch(&url, self.config.timeout).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %url, error = %e, "fetch failed");
                    self.stats.failed += 1;
                    continue;
                }
            };

            if let Err(reason) = check_eligible(&page, self.config.max_length) {
                debug!(url = %url, %reason, "not parsing page");
                self.stats.skipped += 1;
                continue;
            }

            self.stats.parsed += 1;
            self.visit(&url, &page.body);
        }

        info!(
            nodes = self.trie.node_count(),
            parsed = self.stats.parsed,
            skipped = self.stats.skipped,
            failed = self.stats.failed,
            "crawl finished"
        );
    }

    // Records the links of one parsed page and queues new directories
    fn visit(&mut self, page_url: &str, html: &str) {
        // Every queued URL came out of normalize(), so this only fails if the
        // url crate cannot re-parse its own output
        let base = match Url::parse(page_url) {
            Ok(base) => base,
            Err(e) => {
                warn!(url = %page_url, error = %e, "cannot resolve links against page URL");
                return;
            }
        };

        for href in extract_links(html) {
            let Some(resolved) = resolve_link(&base, &href) else {
                debug!(page = %page_url, href = %href, "unresolvable link");
                continue;
            };
            let link = match normalize_url(resolved) {
                Ok(link) => link.to_string(),
                Err(e) => {
                    debug!(page = %page_url, href = %href, error = %e, "cannot normalize link");
                    continue;
                }
            };

            if !self.roots.iter().any(|root| link.starts_with(root.as_str())) {
                continue;
            }

            let path = split_path(&link);
            if self.trie.has(&path) {
                continue;
            }
            self.trie.add(&path);

            if link.ends_with('/') {
                self.queue.push_back(link);
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is the trie checked before queueing, not when popping?
//    - A directory is usually linked from many pages (every "../" link)
//    - Checking at discovery time keeps each URL out of the queue entirely,
//      so the queue never holds duplicates
//
// 2. Why only queue links ending in '/'?
//    - Directory listings end in '/', files do not
//    - Files are recorded in the trie (so they are searchable) but never
//      downloaded
//
// 3. What is `let ... else`?
//    - Binds a pattern or runs the else block, which must leave the scope
//      (here: `continue`)
//    - Avoids one level of nesting compared to `match`
//
// 4. Why a generic `F: Fetcher` and not reqwest directly?
//    - Tests plug in a fake fetcher with canned pages, so the crawl logic can
//      be checked without a network
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::fetch::{FetchError, FetchedPage};
    use crate::index::{Edge, NodeId};
    use crate::search::DecodedIndex;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    // Serves canned pages and remembers the order URLs were requested in
    #[derive(Default)]
    struct FixtureFetcher {
        pages: HashMap<String, FetchedPage>,
        fetched: Mutex<Vec<String>>,
    }

    impl FixtureFetcher {
        fn page(mut self, url: &str, page: FetchedPage) -> Self {
            self.pages.insert(url.to_string(), page);
            self
        }

        fn html(self, url: &str, links: &[&str]) -> Self {
            let body: String = links
                .iter()
                .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
                .collect();
            self.page(url, FetchedPage::html(format!("<html><body>{}</body></html>", body)))
        }

        fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for FixtureFetcher {
        async fn fetch(&self, url: &str, _timeout: Duration) -> Result<FetchedPage, FetchError> {
            self.fetched.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Connect(format!("no fixture for {}", url)))
        }
    }

    fn node(trie: &PathTrie, url: &str) -> Option<NodeId> {
        trie.lookup(&split_path(url))
    }

    async fn run(fetcher: &FixtureFetcher, roots: &[&str]) -> CrawlOutcome {
        crawl(fetcher, roots, &CrawlConfig::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let fetcher = FixtureFetcher::default()
            .html("http://x/", &["http://x/sub/", "http://x/sub/page.html"])
            .html("http://x/sub/", &[]);

        let outcome = run(&fetcher, &["http://x/"]).await;
        let trie = &outcome.trie;

        let root = node(trie, "http://x/").unwrap();
        let sub = node(trie, "http://x/sub/").unwrap();
        let page = node(trie, "http://x/sub/page.html").unwrap();

        let edges: Vec<Edge> = trie.flatten().collect();
        assert!(edges.contains(&Edge {
            child: sub,
            parent: root,
            name: "sub".to_string()
        }));
        assert!(edges.contains(&Edge {
            child: page,
            parent: sub,
            name: "page.html".to_string()
        }));

        let index = DecodedIndex::from_edges(edges);
        let hits: Vec<_> = index.search(&["page"]).map(Result::unwrap).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "page.html");
        assert_eq!(hits[0].url, "http://x/sub/page.html");

        // Files are recorded, never fetched
        assert_eq!(fetcher.fetched(), vec!["http://x/", "http://x/sub/"]);
        assert_eq!(outcome.stats.parsed, 2);
    }

    #[tokio::test]
    async fn test_fetches_in_discovery_order() {
        let fetcher = FixtureFetcher::default()
            .html("http://x/", &["a/", "b/"])
            .html("http://x/a/", &["c/", "../b/"])
            .html("http://x/b/", &["d/"])
            .html("http://x/a/c/", &[])
            .html("http://x/b/d/", &[]);

        run(&fetcher, &["http://x/"]).await;

        assert_eq!(
            fetcher.fetched(),
            vec![
                "http://x/",
                "http://x/a/",
                "http://x/b/",
                "http://x/a/c/",
                "http://x/b/d/",
            ]
        );
    }

    #[tokio::test]
    async fn test_links_outside_roots_are_ignored() {
        let fetcher = FixtureFetcher::default().html(
            "http://x/pub/",
            &[
                "http://y/pub/",
                "/private/",
                "/pubx/",
                "https://x/pub/other/",
                "inner/",
            ],
        );

        let outcome = run(&fetcher, &["http://x/pub/"]).await;
        let trie = &outcome.trie;

        assert!(node(trie, "http://y/pub/").is_none());
        assert!(node(trie, "http://x/private/").is_none());
        assert!(node(trie, "https://x/pub/other/").is_none());
        assert!(node(trie, "http://x/pub/inner/").is_some());
        // "/pubx/" starts with "http://x/pub" but not with the root "http://x/pub/"
        assert!(node(trie, "http://x/pubx/").is_none());

        assert_eq!(fetcher.fetched(), vec!["http://x/pub/", "http://x/pub/inner/"]);
    }

    #[tokio::test]
    async fn test_each_url_fetched_once() {
        let fetcher = FixtureFetcher::default()
            .html("http://x/", &["a/", "a/", "%61/", "a/?sort=name", "a/#top"])
            .html("http://x/a/", &["../", "../a/"]);

        run(&fetcher, &["http://x/", "HTTP://X/"]).await;

        assert_eq!(fetcher.fetched(), vec!["http://x/", "http://x/a/"]);
    }

    #[tokio::test]
    async fn test_ineligible_pages_are_skipped() {
        let mut not_found = FetchedPage::html(r#"<a href="hidden/">x</a>"#);
        not_found.status = 404;
        let mut pdf = FetchedPage::html(r#"<a href="hidden2/">x</a>"#);
        pdf.content_type = Some("application/pdf".to_string());
        let mut huge = FetchedPage::html(r#"<a href="hidden3/">x</a>"#);
        huge.content_length = Some("1000000".to_string());

        let fetcher = FixtureFetcher::default()
            .html("http://x/", &["gone/", "doc/", "big/", "ok/"])
            .page("http://x/gone/", not_found)
            .page("http://x/doc/", pdf)
            .page("http://x/big/", huge)
            .html("http://x/ok/", &["deeper.txt"]);

        let outcome = run(&fetcher, &["http://x/"]).await;

        assert!(node(&outcome.trie, "http://x/ok/deeper.txt").is_some());
        assert!(node(&outcome.trie, "http://x/gone/hidden/").is_none());
        assert!(node(&outcome.trie, "http://x/doc/hidden2/").is_none());
        assert!(node(&outcome.trie, "http://x/big/hidden3/").is_none());
        assert_eq!(
            outcome.stats,
            CrawlStats {
                parsed: 2,
                skipped: 3,
                failed: 0
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_failures_do_not_stop_the_crawl() {
        // "broken/" has no fixture, so fetching it fails
        let fetcher = FixtureFetcher::default()
            .html("http://x/", &["broken/", "fine/"])
            .html("http://x/fine/", &["leaf.bin"]);

        let outcome = run(&fetcher, &["http://x/"]).await;

        assert!(node(&outcome.trie, "http://x/fine/leaf.bin").is_some());
        assert!(node(&outcome.trie, "http://x/broken/").is_some());
        assert_eq!(outcome.stats.failed, 1);
        assert_eq!(
            fetcher.fetched(),
            vec!["http://x/", "http://x/broken/", "http://x/fine/"]
        );
    }

    #[tokio::test]
    async fn test_multiple_roots() {
        let fetcher = FixtureFetcher::default()
            .html("http://x/one/", &["http://x/two/shared/", "http://x/three/"])
            .html("http://x/two/", &[])
            .html("http://x/two/shared/", &[]);

        let outcome = run(&fetcher, &["http://x/one/", "http://x/two/"]).await;

        assert!(node(&outcome.trie, "http://x/two/shared/").is_some());
        assert!(node(&outcome.trie, "http://x/three/").is_none());
        assert_eq!(
            fetcher.fetched(),
            vec!["http://x/one/", "http://x/two/", "http://x/two/shared/"]
        );
    }

    #[tokio::test]
    async fn test_invalid_root_is_an_error() {
        let fetcher = FixtureFetcher::default();
        let result = crawl(&fetcher, &["not a url"], &CrawlConfig::default()).await;
        assert!(result.is_err());
        assert!(fetcher.fetched().is_empty());
    }
}
