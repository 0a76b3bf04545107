// src/crawl/normalize.rs
// =============================================================================
// URL canonicalization.
//
// Two URLs should map to the same trie path when they name the same resource.
// We treat these as equivalent:
// - host spelled in different case (EXAMPLE.com vs example.com)
// - paths spelled with different percent-encoding (%7E vs ~, %2f vs %2F)
// - anything after '?' or '#'
//
// The path is decoded to raw bytes and then re-encoded with one fixed set of
// unreserved characters, so every spelling collapses to one canonical form.
// Working on bytes (not strings) keeps escapes of invalid UTF-8 intact.
// =============================================================================

use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;
use url::Url;

// Everything except ALPHA / DIGIT / "-" / "." / "_" / "~" and the path
// separator gets escaped.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

#[derive(Debug, Error)]
#[error("invalid URL '{input}': {source}")]
pub struct NormalizeError {
    pub input: String,
    #[source]
    pub source: url::ParseError,
}

/// Parses `raw` and returns its canonical string form.
pub fn normalize(raw: &str) -> Result<String, NormalizeError> {
    let url = Url::parse(raw).map_err(|source| NormalizeError {
        input: raw.to_string(),
        source,
    })?;
    Ok(normalize_url(url)?.to_string())
}

/// Canonicalizes an already parsed URL.
///
/// Fails only when the lower-cased host is rejected by the URL parser.
pub fn normalize_url(mut url: Url) -> Result<Url, NormalizeError> {
    // The url crate lowercases hosts of http(s) URLs while parsing, but not
    // for other schemes.
    if let Some(host) = url.host_str() {
        if host.bytes().any(|b| b.is_ascii_uppercase()) {
            let lowered = host.to_ascii_lowercase();
            let input = url.to_string();
            url.set_host(Some(&lowered))
                .map_err(|source| NormalizeError { input, source })?;
        }
    }

    let decoded: Vec<u8> = percent_decode_str(url.path()).collect();
    let encoded = percent_encode(&decoded, PATH_ENCODE_SET).to_string();
    url.set_path(&encoded);

    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_host() {
        assert_eq!(
            normalize("http://EXAMPLE.com/Docs/").unwrap(),
            "http://example.com/Docs/"
        );
    }

    #[test]
    fn test_drops_query_and_fragment() {
        assert_eq!(
            normalize("https://example.com/a/b.html?x=1&y=2#top").unwrap(),
            "https://example.com/a/b.html"
        );
    }

    #[test]
    fn test_canonical_percent_encoding() {
        let variants = [
            "http://example.com/%7Euser/my%20file.txt",
            "http://example.com/~user/my file.txt",
            "http://example.com/%7euser/my%20file.txt",
        ];
        for variant in variants {
            assert_eq!(
                normalize(variant).unwrap(),
                "http://example.com/~user/my%20file.txt",
                "variant {}",
                variant
            );
        }
    }

    #[test]
    fn test_escapes_reserved_characters() {
        assert_eq!(
            normalize("http://example.com/a+b/c(1).txt").unwrap(),
            "http://example.com/a%2Bb/c%281%29.txt"
        );
    }

    #[test]
    fn test_keeps_port() {
        assert_eq!(
            normalize("http://Example.COM:8080/pub/").unwrap(),
            "http://example.com:8080/pub/"
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "http://EXAMPLE.com/a%2fb/%E2%82%AC/?q#f",
            "https://example.com/dir with space/",
            "http://example.com/%FF%FE/raw",
            "http://example.com",
            "ftp://Files.Example.org/pub/%7Ejoe/",
        ];
        for input in inputs {
            let once = normalize(input).unwrap();
            let twice = normalize(&once).unwrap();
            assert_eq!(once, twice, "input {}", input);
        }
    }

    #[test]
    fn test_lowercases_host_of_other_schemes() {
        assert_eq!(
            normalize("foo://HOST.Example/a/B").unwrap(),
            "foo://host.example/a/B"
        );
        let url = Url::parse("ftp://Files.Example.org/pub/").unwrap();
        assert_eq!(
            normalize_url(url).unwrap().as_str(),
            "ftp://files.example.org/pub/"
        );
    }

    #[test]
    fn test_rejects_relative_input() {
        let err = normalize("/just/a/path").unwrap_err();
        assert_eq!(err.input, "/just/a/path");
    }
}
