//! Type definitions for the audiobook-fetcher application.
//!
//! This module contains the core data structures used throughout the
//! application for representing search queries, scraped audio manifests,
//! and download-ready books.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A user-entered search query.
///
/// Immutable once sent; kept around so the stateless backend variant can
/// replay it on the selection step and so cached audio entries can be tied
/// back to the search that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Book title, non-empty (enforced by the input form).
    pub title: String,

    /// Optional author. Serialized as `null` when absent, matching the
    /// backend's expected request shape.
    pub author: Option<String>,
}

impl SearchQuery {
    /// Build a query from raw form input, normalizing a blank author to `None`.
    pub fn new(title: &str, author: &str) -> Self {
        let author = author.trim();
        Self {
            title: title.trim().to_string(),
            author: if author.is_empty() {
                None
            } else {
                Some(author.to_string())
            },
        }
    }

    /// A stable key identifying this query in the snapshot store.
    pub fn fingerprint(&self) -> String {
        format!("{}::{}", self.title, self.author.as_deref().unwrap_or(""))
    }
}

/// A mapping from chapter/file name to its resource locator, as reported
/// by the backend after a selection. Opaque beyond existence checking.
pub type AudioManifest = HashMap<String, String>;

/// A book whose audio manifest has been resolved and is ready to download.
///
/// The manifest and the resolved title are only ever valid together, so
/// they live in one struct: no code path can observe a manifest without
/// the title it belongs to, or vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyDownload {
    /// Chapter name to URL mapping.
    pub manifest: AudioManifest,

    /// Backend-reported title with whitespace collapsed to underscores.
    pub title: String,
}

impl ReadyDownload {
    /// Filename for the downloadable archive.
    ///
    /// # Examples
    ///
    /// ```
    /// use audiobook_fetcher::types::ReadyDownload;
    /// use std::collections::HashMap;
    ///
    /// let ready = ReadyDownload {
    ///     manifest: HashMap::new(),
    ///     title: "Dune_Abridged".to_string(),
    /// };
    /// assert_eq!(ready.archive_filename(), "Dune_Abridged_audiobook.zip");
    /// ```
    pub fn archive_filename(&self) -> String {
        format!("{}_audiobook.zip", self.title)
    }

    /// Label for the download action shown to the user.
    pub fn download_label(&self) -> String {
        format!("Download {}", self.title)
    }
}

/// Collapse every maximal run of whitespace in a backend-reported title to
/// exactly one underscore.
///
/// # Examples
///
/// ```
/// use audiobook_fetcher::types::resolve_title;
///
/// assert_eq!(resolve_title("Dune  Abridged"), "Dune_Abridged");
/// ```
pub fn resolve_title(raw: &str) -> String {
    let re = Regex::new(r"\s+").unwrap();
    re.replace_all(raw, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_normalizes_blank_author() {
        let query = SearchQuery::new("Dune", "");
        assert_eq!(query.title, "Dune");
        assert!(query.author.is_none());

        let query = SearchQuery::new("Dune", "   ");
        assert!(query.author.is_none());
    }

    #[test]
    fn test_query_keeps_author() {
        let query = SearchQuery::new("Dune", "Frank Herbert");
        assert_eq!(query.author.as_deref(), Some("Frank Herbert"));
    }

    #[test]
    fn test_query_serializes_null_author() {
        let query = SearchQuery::new("Dune", "");
        let json = serde_json::to_string(&query).unwrap();
        assert_eq!(json, r#"{"title":"Dune","author":null}"#);
    }

    #[test]
    fn test_fingerprint_distinguishes_author() {
        let a = SearchQuery::new("Dune", "");
        let b = SearchQuery::new("Dune", "Frank Herbert");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_resolve_title_single_spaces() {
        assert_eq!(resolve_title("The Great Gatsby"), "The_Great_Gatsby");
    }

    #[test]
    fn test_resolve_title_collapses_runs() {
        assert_eq!(resolve_title("Dune  Abridged"), "Dune_Abridged");
        assert_eq!(resolve_title("A \t\n B"), "A_B");
    }

    #[test]
    fn test_resolve_title_no_whitespace() {
        assert_eq!(resolve_title("Hobbit"), "Hobbit");
    }

    #[test]
    fn test_archive_filename() {
        let ready = ReadyDownload {
            manifest: AudioManifest::new(),
            title: resolve_title("Dune  Abridged"),
        };
        assert_eq!(ready.archive_filename(), "Dune_Abridged_audiobook.zip");
        assert_eq!(ready.download_label(), "Download Dune_Abridged");
    }
}
