// src/crawl/html.rs
// =============================================================================
// This module pulls raw link targets out of HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Unlike a link checker, the crawler wants the href values exactly as they
// were written: relative or absolute, duplicates included, in document
// order. Resolving and filtering them is the crawl loop's job.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Returns the raw href of every <a href="..."> in the document
//
// Example:
//   html = "<a href='sub/'>Sub</a><a href='/abs'>Abs</a>"
//   result = ["sub/", "/abs"]
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // "a[href]" is a constant selector, parsing it cannot fail
    let selector = Selector::parse("a[href]").expect("static selector is valid");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

// Resolves a possibly-relative href against the page it was found on
//
// Examples:
//   base = "http://example.com/pub/"
//   href = "sub/"                 -> Some("http://example.com/pub/sub/")
//   href = "../other"             -> Some("http://example.com/other")
//   href = "http://elsewhere.org" -> Some("http://elsewhere.org/")
//   href = "http://[bad"          -> None
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    base.join(href).ok()
}
