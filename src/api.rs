//! API client for the audiobook scraper backend.
//!
//! This module wraps the three backend endpoints the workflow consumes:
//! `/scrape` (search), `/scrape/continue` (selection), and `/download_all`
//! (archive retrieval). The backend signals "nothing found" by omitting the
//! relevant field from an otherwise parseable JSON body, so responses are
//! decoded regardless of HTTP status and the caller inspects the fields;
//! only transport and decode failures surface as errors here.

use crate::error::{AppError, Result};
use crate::types::{AudioManifest, SearchQuery};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = "audiobook-fetcher/0.1";

/// Request timeout for search and selection calls. The archive call gets a
/// longer window since it transfers the full zip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const ARCHIVE_TIMEOUT: Duration = Duration::from_secs(600);

/// Response body of the search endpoint.
///
/// `bookOptions` is absent when the backend found no matching books.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "bookOptions", default)]
    pub book_options: Option<Vec<String>>,
}

/// Response body of the selection endpoint.
///
/// Both fields are absent when the backend found no audio files for the
/// selected book.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectResponse {
    #[serde(rename = "audioFiles", default)]
    pub audio_files: Option<AudioManifest>,

    #[serde(rename = "bookTitle", default)]
    pub book_title: Option<String>,
}

/// Request body of the selection endpoint.
///
/// The session variant sends only the index and relies on server-side
/// session continuity from the prior search call. The stateless variant
/// replays the option list and the original query so the server needs no
/// session at all. A given run uses exactly one shape.
#[derive(Debug, Clone, Serialize)]
pub struct SelectRequest {
    pub selection: usize,

    #[serde(rename = "bookOptions", skip_serializing_if = "Option::is_none")]
    pub book_options: Option<Vec<String>>,

    #[serde(rename = "bookDict", skip_serializing_if = "Option::is_none")]
    pub book_dict: Option<SearchQuery>,
}

impl SelectRequest {
    /// Index-only request for the session-based backend variant.
    pub fn session(selection: usize) -> Self {
        Self {
            selection,
            book_options: None,
            book_dict: None,
        }
    }

    /// Full-replay request for the stateless backend variant.
    pub fn stateless(selection: usize, options: Vec<String>, query: SearchQuery) -> Self {
        Self {
            selection,
            book_options: Some(options),
            book_dict: Some(query),
        }
    }
}

/// HTTP client for the scraper backend.
///
/// Cheap to clone: the underlying reqwest client is reference-counted, and
/// the cookie store it carries provides the session continuity the
/// session-based variant depends on.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Build a client for the given backend base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(ARCHIVE_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST the query to `/scrape` and decode the option list.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        debug!(
            "Searching for '{}' (author: {:?})",
            query.title, query.author
        );

        let resp = self
            .http
            .post(self.endpoint("/scrape"))
            .timeout(REQUEST_TIMEOUT)
            .json(query)
            .send()
            .await?;

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("search response for '{}': {}", query.title, e)))?;

        debug!(
            "Search for '{}' returned {} options",
            query.title,
            parsed.book_options.as_ref().map_or(0, |o| o.len())
        );

        Ok(parsed)
    }

    /// POST the selection to `/scrape/continue` and decode the manifest.
    pub async fn continue_selection(&self, request: &SelectRequest) -> Result<SelectResponse> {
        debug!("Continuing with selection {}", request.selection);

        let resp = self
            .http
            .post(self.endpoint("/scrape/continue"))
            .timeout(REQUEST_TIMEOUT)
            .json(request)
            .send()
            .await?;

        let parsed: SelectResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("selection response: {}", e)))?;

        debug!(
            "Selection {} returned {} audio files",
            request.selection,
            parsed.audio_files.as_ref().map_or(0, |m| m.len())
        );

        Ok(parsed)
    }

    /// GET the assembled archive from `/download_all`.
    ///
    /// Fire-and-forget from the workflow's point of view: one request, the
    /// whole body buffered, no retry or partial-failure handling.
    pub async fn fetch_archive(&self) -> Result<Vec<u8>> {
        let resp = self.http.get(self.endpoint("/download_all")).send().await?;

        if !resp.status().is_success() {
            return Err(AppError::Download(format!(
                "archive endpoint returned {}",
                resp.status()
            )));
        }

        let bytes = resp.bytes().await?;
        debug!("Fetched archive: {} bytes", bytes.len());

        Ok(bytes.to_vec())
    }
}
