//! Bibliographic metadata model and lookup seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Placeholder some catalog records carry instead of a real description.
const UNKNOWN_DESCRIPTION: &str = "不明";

const SENTENCE_END: char = '。';
const ELLIPSIS: &str = "...";

/// At most this many sentences go into an excerpt.
pub const SUMMARY_MAX_SENTENCES: usize = 5;

/// Bibliographic record for the best match of a keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub categories: Vec<String>,
    pub page_count: Option<u32>,
    pub language: Option<String>,
    pub thumbnail_url: Option<String>,
    pub info_url: Option<String>,
    pub isbn13: Option<String>,
    pub isbn10: Option<String>,
}

impl BookMetadata {
    /// ISBN-13 when known, else ISBN-10.
    pub fn isbn(&self) -> Option<&str> {
        self.isbn13.as_deref().or(self.isbn10.as_deref())
    }

    /// Authors joined for display, `None` when there are none.
    pub fn authors_display(&self) -> Option<String> {
        if self.authors.is_empty() {
            None
        } else {
            Some(self.authors.join(" / "))
        }
    }

    /// Short summary of the description.
    ///
    /// Whitespace is collapsed and whole sentences are kept while they fit in
    /// `max_chars` (up to [`SUMMARY_MAX_SENTENCES`]). If not even the first
    /// sentence fits, the text is cut at `max_chars`. An ellipsis marks any
    /// dropped text. Returns `None` when there is no usable description.
    pub fn summary_excerpt(&self, max_chars: usize) -> Option<String> {
        let description = self.description.as_deref()?.trim();
        if description.is_empty() || description == UNKNOWN_DESCRIPTION {
            return None;
        }

        let text = description.split_whitespace().collect::<Vec<_>>().join(" ");
        let sentences: Vec<&str> = text
            .split(SENTENCE_END)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let mut kept: Vec<&str> = Vec::new();
        let mut used = 0;
        for sentence in sentences.iter().take(SUMMARY_MAX_SENTENCES) {
            let len = sentence.chars().count();
            if used + len > max_chars {
                break;
            }
            kept.push(sentence);
            // the separator counts against the next sentence
            used += len + 1;
        }

        if kept.is_empty() {
            return Some(truncate_chars(&text, max_chars));
        }

        let mut summary = kept.join("。");
        summary.push(SENTENCE_END);
        if sentences.len() > kept.len() {
            summary.push_str(ELLIPSIS);
        }
        Some(summary)
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    while cut.ends_with(SENTENCE_END) {
        cut.pop();
    }
    cut.push_str(ELLIPSIS);
    cut
}

/// Looks up the best bibliographic match for a keyword.
///
/// Lookups never fail: transport, status and decode problems are logged by
/// the implementation and reported as `None`, the same as "no match".
#[async_trait]
pub trait BookMetadataLookup: Send + Sync {
    async fn lookup(&self, keyword: &str) -> Option<BookMetadata>;
}
