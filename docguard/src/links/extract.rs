//! Strict absolute-URL extraction from raw text.
//!
//! A URL needs an explicit lowercase scheme followed by `://`; bare domains
//! never match. The scheme must start a word, so a match never begins
//! partway through a token. The grammar over-matches on purpose (trailing punctuation,
//! markdown link syntax) and trims afterwards.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUrl {
    pub raw: String,
    /// Byte offset of the URL in the document.
    pub position: usize,
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\b[a-z][a-z0-9+.\-]*://[^\s<>"'`\[\]{}|\\^]+"#)
            .expect("URL pattern is valid")
    })
}

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '*', '_', '~', '\'', '"'];

/// Drop trailing punctuation and closing parens that have no opening partner.
fn trim_candidate(candidate: &str) -> &str {
    let mut end = candidate.len();
    loop {
        let current = &candidate[..end];
        let Some(last) = current.chars().last() else {
            break;
        };
        let unbalanced_paren =
            last == ')' && current.matches(')').count() > current.matches('(').count();
        if TRAILING_PUNCTUATION.contains(&last) || unbalanced_paren {
            end -= last.len_utf8();
        } else {
            break;
        }
    }
    &candidate[..end]
}

pub struct UrlExtractor {
    pattern: &'static Regex,
}

impl UrlExtractor {
    pub fn new() -> Self {
        Self {
            pattern: url_regex(),
        }
    }

    /// Lazily scan `text` left to right. Calling again restarts the scan.
    pub fn extract<'t>(&self, text: &'t str) -> Urls<'t> {
        Urls {
            matches: self.pattern.find_iter(text),
        }
    }
}

impl Default for UrlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the URLs of one text, in document order.
pub struct Urls<'t> {
    matches: regex::Matches<'static, 't>,
}

impl Iterator for Urls<'_> {
    type Item = ExtractedUrl;

    fn next(&mut self) -> Option<Self::Item> {
        for m in self.matches.by_ref() {
            let trimmed = trim_candidate(m.as_str());
            let has_rest = trimmed
                .split_once("://")
                .is_some_and(|(_, rest)| !rest.is_empty());
            if has_rest {
                return Some(ExtractedUrl {
                    raw: trimmed.to_string(),
                    position: m.start(),
                });
            }
        }
        None
    }
}

/// Convenience: collect every URL in `text`.
pub fn extract_urls(text: &str) -> Vec<ExtractedUrl> {
    UrlExtractor::new().extract(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raws(text: &str) -> Vec<String> {
        extract_urls(text).into_iter().map(|u| u.raw).collect()
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(extract_urls("").is_empty());
    }

    #[test]
    fn test_bare_domains_are_ignored() {
        assert!(raws("see example.com and www.example.org").is_empty());
    }

    #[test]
    fn test_markdown_link_target() {
        assert_eq!(
            raws("Read [the docs](https://example.com/docs) first."),
            vec!["https://example.com/docs"]
        );
    }

    #[test]
    fn test_link_text_and_target_are_separate_matches() {
        assert_eq!(
            raws("[https://a.test/x](https://a.test/x)"),
            vec!["https://a.test/x", "https://a.test/x"]
        );
    }

    #[test]
    fn test_trailing_punctuation_trimmed() {
        assert_eq!(
            raws("Visit https://example.com/path. Or http://x.test/a, ok?"),
            vec!["https://example.com/path", "http://x.test/a"]
        );
    }

    #[test]
    fn test_balanced_parens_are_kept() {
        assert_eq!(
            raws("(see https://en.wikipedia.org/wiki/Rust_(programming_language))"),
            vec!["https://en.wikipedia.org/wiki/Rust_(programming_language)"]
        );
    }

    #[test]
    fn test_table_cells_stop_at_pipe() {
        assert_eq!(
            raws("| [aws_s3_bucket](https://registry.terraform.io/providers/hashicorp/aws/latest/docs) | resource |"),
            vec!["https://registry.terraform.io/providers/hashicorp/aws/latest/docs"]
        );
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        assert!(raws("HTTPS://EXAMPLE.COM").is_empty());
    }

    #[test]
    fn test_match_never_starts_mid_word() {
        let urls = raws("See Https://example.com/docs and xyzhttps://a.test/q");
        assert!(urls.iter().all(|u| !u.starts_with("ttps://")));
        assert!(urls.iter().all(|u| !u.starts_with("yzhttps://")));
        assert_eq!(urls, vec!["xyzhttps://a.test/q"]);
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let text = "a https://x.test b https://y.test";
        let urls = extract_urls(text);
        assert_eq!(urls[0].position, 2);
        assert_eq!(&text[urls[1].position..], "https://y.test");
    }

    #[test]
    fn test_scheme_without_rest_is_dropped() {
        assert!(raws("protocol https://. end").is_empty());
    }

    #[test]
    fn test_extraction_is_restartable() {
        let extractor = UrlExtractor::new();
        let text = "https://a.test https://b.test";
        let first: Vec<_> = extractor.extract(text).collect();
        let second: Vec<_> = extractor.extract(text).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
