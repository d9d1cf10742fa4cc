//! Resilience cache for the search-select-download workflow.
//!
//! This module persists a flat snapshot of server state (option list,
//! original query, audio manifest, resolved title) so a failed selection
//! call can be recovered from the last successful one. The snapshot is
//! strictly best-effort: it is written after successful network steps and
//! read only as a fallback, never as the primary source of truth.

use crate::types::{AudioManifest, ReadyDownload, SearchQuery};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// On-disk snapshot mirroring the backend's view of the workflow.
///
/// Audio entries carry the fingerprint of the query and option label that
/// produced them, so a manifest cached for one book is never served as a
/// false recovery for another.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Snapshot {
    /// Option labels from the most recent successful search.
    #[serde(default)]
    pub book_options: Option<Vec<String>>,

    /// The query that produced `book_options`.
    #[serde(default)]
    pub book_dict: Option<SearchQuery>,

    /// Audio manifest from the most recent successful selection.
    #[serde(default)]
    pub audio_files: Option<AudioManifest>,

    /// Resolved title belonging to `audio_files`.
    #[serde(default)]
    pub selected_book: Option<String>,

    /// Query + option label fingerprint tying the audio entries to the
    /// selection that produced them.
    #[serde(default)]
    pub audio_fingerprint: Option<String>,
}

impl Snapshot {
    /// Create a new empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the path to the snapshot file.
    ///
    /// Returns ~/.local/share/audiobook-fetcher/snapshot.json on Linux,
    /// or a platform-appropriate location on other systems.
    pub fn snapshot_path() -> Result<PathBuf, io::Error> {
        let data_dir = if cfg!(target_os = "macos") {
            dirs::data_dir()
        } else {
            dirs::data_local_dir()
        }
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Could not find data directory"))?
        .join("audiobook-fetcher");

        Ok(data_dir.join("snapshot.json"))
    }

    /// Load the snapshot from disk.
    ///
    /// Returns an empty snapshot if the file doesn't exist.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::snapshot_path()?;

        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }

    /// Save the snapshot to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::snapshot_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Mirror a successful search: store the option list and its query.
    ///
    /// Audio entries from earlier selections are left in place; recovery is
    /// gated by fingerprint, not by clearing.
    pub fn record_search(&mut self, options: &[String], query: &SearchQuery) {
        self.book_options = Some(options.to_vec());
        self.book_dict = Some(query.clone());
    }

    /// Mirror a successful selection: store the manifest, resolved title,
    /// and the fingerprint tying them to the selected book.
    pub fn record_selection(&mut self, ready: &ReadyDownload, fingerprint: &str) {
        self.audio_files = Some(ready.manifest.clone());
        self.selected_book = Some(ready.title.clone());
        self.audio_fingerprint = Some(fingerprint.to_string());
    }

    /// Recover a download-ready book after a failed selection call.
    ///
    /// Returns `Some` only when the manifest and title are both present and
    /// were produced by the same query/option pair the caller is asking
    /// about; a stale entry from an unrelated book is never served.
    pub fn recover_selection(&self, fingerprint: &str) -> Option<ReadyDownload> {
        if self.audio_fingerprint.as_deref() != Some(fingerprint) {
            return None;
        }

        match (&self.audio_files, &self.selected_book) {
            (Some(manifest), Some(title)) => Some(ReadyDownload {
                manifest: manifest.clone(),
                title: title.clone(),
            }),
            _ => None,
        }
    }

    /// The option list and query to replay on a stateless selection call.
    pub fn search_replay(&self) -> Option<(Vec<String>, SearchQuery)> {
        match (&self.book_options, &self.book_dict) {
            (Some(options), Some(query)) => Some((options.clone(), query.clone())),
            _ => None,
        }
    }

    /// Check whether the snapshot holds anything at all.
    pub fn is_empty(&self) -> bool {
        self.book_options.is_none()
            && self.book_dict.is_none()
            && self.audio_files.is_none()
            && self.selected_book.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::resolve_title;

    fn ready(title: &str) -> ReadyDownload {
        let mut manifest = AudioManifest::new();
        manifest.insert("Chapter 1".to_string(), "http://host/ch1.mp3".to_string());
        ReadyDownload {
            manifest,
            title: resolve_title(title),
        }
    }

    #[test]
    fn test_new_snapshot_is_empty() {
        let snapshot = Snapshot::new();
        assert!(snapshot.is_empty());
        assert!(snapshot.recover_selection("anything").is_none());
        assert!(snapshot.search_replay().is_none());
    }

    #[test]
    fn test_record_search_stores_replay_state() {
        let mut snapshot = Snapshot::new();
        let query = SearchQuery::new("Dune", "");
        snapshot.record_search(&["Dune (Unabridged)".to_string()], &query);

        let (options, replayed) = snapshot.search_replay().unwrap();
        assert_eq!(options, vec!["Dune (Unabridged)".to_string()]);
        assert_eq!(replayed, query);
    }

    #[test]
    fn test_record_search_overwrites_previous() {
        let mut snapshot = Snapshot::new();
        snapshot.record_search(&["Old".to_string()], &SearchQuery::new("Old", ""));
        snapshot.record_search(&["New".to_string()], &SearchQuery::new("New", ""));

        let (options, query) = snapshot.search_replay().unwrap();
        assert_eq!(options, vec!["New".to_string()]);
        assert_eq!(query.title, "New");
    }

    #[test]
    fn test_recover_requires_matching_fingerprint() {
        let mut snapshot = Snapshot::new();
        snapshot.record_selection(&ready("Dune  Abridged"), "Dune::#1");

        assert!(snapshot.recover_selection("Dune::#1").is_some());
        assert!(snapshot.recover_selection("Hobbit::#0").is_none());
    }

    #[test]
    fn test_recover_returns_manifest_and_title_together() {
        let mut snapshot = Snapshot::new();
        snapshot.record_selection(&ready("Dune  Abridged"), "fp");

        let recovered = snapshot.recover_selection("fp").unwrap();
        assert_eq!(recovered.title, "Dune_Abridged");
        assert_eq!(recovered.manifest.len(), 1);
    }

    #[test]
    fn test_recover_rejects_partial_entries() {
        let snapshot = Snapshot {
            audio_files: Some(AudioManifest::new()),
            audio_fingerprint: Some("fp".to_string()),
            ..Default::default()
        };
        // Manifest without a title must not recover.
        assert!(snapshot.recover_selection("fp").is_none());
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let mut snapshot = Snapshot::new();
        snapshot.record_search(
            &["Dune (Abridged)".to_string()],
            &SearchQuery::new("Dune", "Frank Herbert"),
        );
        snapshot.record_selection(&ready("Dune  Abridged"), "fp");

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.selected_book.as_deref(), Some("Dune_Abridged"));
        assert!(restored.recover_selection("fp").is_some());
    }
}
