//! The search-select-download workflow controller.
//!
//! This module owns all workflow state in one place (no ambient globals):
//! the current query, the rendered option list, the phase of the selection
//! state machine, and the resilience snapshot. Network steps are issued
//! elsewhere; the controller hands out a monotonically increasing sequence
//! number per step and the event loop discards completions whose sequence
//! is stale, so a slow earlier call can never overwrite the state of a
//! later one.
//!
//! Selection is the only state-machine-like piece of the system:
//! `Idle -> AwaitingSelection -> {DownloadReady, NoResultNotified}`,
//! re-entered fresh on each call. The manifest and resolved title travel
//! together inside [`ReadyDownload`], so the download action can never be
//! backed by a manifest that doesn't match the displayed title.

use crate::api::{SearchResponse, SelectRequest, SelectResponse};
use crate::cache::Snapshot;
use crate::error::{AppError, Result};
use crate::types::{resolve_title, ReadyDownload, SearchQuery};
use log::{debug, info};

/// Phase of the selection state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// No selection in flight.
    Idle,
    /// A selection call has been issued and not yet resolved.
    AwaitingSelection,
    /// Terminal: a manifest and title are ready for download.
    DownloadReady(ReadyDownload),
    /// Terminal: the user has been told no audio files were found.
    NoResultNotified,
}

/// Outcome of a completed search step.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Non-empty option list, rendered and mirrored to the snapshot.
    Options(Vec<String>),
    /// Backend responded but found nothing for this title.
    Empty(String),
    /// Transport failure; search has no fallback path.
    Failed(AppError),
}

/// Outcome of a completed selection step.
#[derive(Debug)]
pub enum SelectOutcome {
    /// Download action revealed, either fresh or recovered from the snapshot.
    Ready(ReadyDownload),
    /// Exactly one "no audio files found" notice is owed to the user.
    NoAudio,
}

/// Raw result of a spawned network step, reported over the event channel.
#[derive(Debug)]
pub enum StepResult {
    Search(Result<SearchResponse>),
    Select(Result<SelectResponse>),
    Archive(Result<Vec<u8>>),
}

/// A completed network step tagged with the sequence it was issued under.
#[derive(Debug)]
pub struct WorkflowEvent {
    pub seq: u64,
    pub result: StepResult,
}

/// Two-tier fetch: network result first, local snapshot on transport failure.
///
/// The fallback is consulted only for transport-class errors; a backend
/// that answered (even with nothing) is authoritative. When the fallback
/// also has nothing, the original error is handed back.
pub fn with_fallback<T, F>(primary: Result<T>, fallback: F) -> Result<T>
where
    F: FnOnce() -> Option<T>,
{
    match primary {
        Ok(value) => Ok(value),
        Err(err) if err.is_transport() => match fallback() {
            Some(value) => {
                info!("Transport failure, recovered from local snapshot: {}", err);
                Ok(value)
            }
            None => Err(err),
        },
        Err(err) => Err(err),
    }
}

/// Controller state for the search-select-download workflow.
pub struct Workflow {
    /// Sequence number of the most recently issued network step.
    seq: u64,
    /// Selection state machine phase.
    pub phase: Phase,
    /// Query of the most recent search submission.
    query: Option<SearchQuery>,
    /// Option labels from the most recent successful search.
    options: Vec<String>,
    /// Index sent with the in-flight (or last) selection call.
    pending_selection: Option<usize>,
    /// True while a search call is in flight; the submit control stays
    /// disabled until the call completes, success or not.
    search_pending: bool,
    /// Whether selection calls replay the search state instead of relying
    /// on a server-side session. Fixed for the lifetime of the run.
    stateless: bool,
    snapshot: Snapshot,
}

impl Workflow {
    pub fn new(stateless: bool, snapshot: Snapshot) -> Self {
        Self {
            seq: 0,
            phase: Phase::Idle,
            query: None,
            options: Vec::new(),
            pending_selection: None,
            search_pending: false,
            stateless,
            snapshot,
        }
    }

    /// The snapshot, for best-effort persistence after successful steps.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Whether a completion tagged with `seq` belongs to the latest issued
    /// step. Stale completions must be dropped, not applied.
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.seq
    }

    /// Whether the submit control should be disabled.
    pub fn search_pending(&self) -> bool {
        self.search_pending
    }

    /// Currently rendered option labels.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The download-ready book, if the workflow reached that phase.
    pub fn ready(&self) -> Option<&ReadyDownload> {
        match &self.phase {
            Phase::DownloadReady(ready) => Some(ready),
            _ => None,
        }
    }

    /// Begin a search step.
    ///
    /// Clears the previously rendered options (a resubmission supersedes
    /// them, stale entries never linger), hides any download action, and
    /// disables the submit control. Returns the sequence number the
    /// eventual completion must carry.
    pub fn begin_search(&mut self, query: SearchQuery) -> u64 {
        self.seq += 1;
        self.search_pending = true;
        self.phase = Phase::Idle;
        self.options.clear();
        self.pending_selection = None;
        self.query = Some(query);
        debug!("Search issued (seq {})", self.seq);
        self.seq
    }

    /// Apply the completion of the current search step.
    ///
    /// Re-enables the submit control unconditionally, then sorts the
    /// response into the three outcomes of the contract.
    pub fn apply_search(&mut self, result: Result<SearchResponse>) -> SearchOutcome {
        self.search_pending = false;

        let title = self
            .query
            .as_ref()
            .map(|q| q.title.clone())
            .unwrap_or_default();

        match result {
            Ok(resp) => match resp.book_options {
                Some(options) if !options.is_empty() => {
                    self.options = options.clone();
                    if let Some(query) = &self.query {
                        self.snapshot.record_search(&options, query);
                    }
                    SearchOutcome::Options(options)
                }
                _ => SearchOutcome::Empty(title),
            },
            Err(err) => SearchOutcome::Failed(err),
        }
    }

    /// Begin a selection step for the option at `index`.
    ///
    /// No bounds checking is performed; an out-of-range index is the
    /// backend's to reject. Returns `None` only when no search has
    /// completed yet, i.e. there is nothing to select from. The request
    /// shape follows the configured variant and never mixes: index-only
    /// for the session variant, index plus replayed search state for the
    /// stateless one.
    pub fn begin_selection(&mut self, index: usize) -> Option<(u64, SelectRequest)> {
        let query = self.query.as_ref()?;

        let request = if self.stateless {
            let (options, query) = self
                .snapshot
                .search_replay()
                .unwrap_or_else(|| (self.options.clone(), query.clone()));
            SelectRequest::stateless(index, options, query)
        } else {
            SelectRequest::session(index)
        };

        self.seq += 1;
        self.phase = Phase::AwaitingSelection;
        self.pending_selection = Some(index);
        debug!("Selection {} issued (seq {})", index, self.seq);
        Some((self.seq, request))
    }

    /// Fingerprint of the in-flight selection, tying cached audio entries
    /// to the exact query/option pair that produced them.
    fn selection_fingerprint(&self) -> Option<String> {
        let query = self.query.as_ref()?;
        let index = self.pending_selection?;
        let label = self
            .options
            .get(index)
            .cloned()
            .unwrap_or_else(|| index.to_string());
        Some(format!("{}#{}", query.fingerprint(), label))
    }

    /// Apply the completion of the current selection step.
    ///
    /// A response carrying both a manifest and a title resolves fresh; a
    /// transport failure falls back to the snapshot, gated on the
    /// selection fingerprint. Everything else is a single no-audio notice.
    pub fn apply_selection(&mut self, result: Result<SelectResponse>) -> SelectOutcome {
        let fingerprint = self.selection_fingerprint();

        let primary = result.map(|resp| match (resp.audio_files, resp.book_title) {
            (Some(manifest), Some(title)) if !manifest.is_empty() => Some(ReadyDownload {
                manifest,
                title: resolve_title(&title),
            }),
            _ => None,
        });

        let resolved = with_fallback(primary, || {
            let fp = fingerprint.as_deref()?;
            self.snapshot.recover_selection(fp).map(Some)
        });

        match resolved {
            Ok(Some(ready)) => {
                if let Some(fp) = &fingerprint {
                    self.snapshot.record_selection(&ready, fp);
                }
                // Success hides the option list and reveals the download.
                self.options.clear();
                self.phase = Phase::DownloadReady(ready.clone());
                SelectOutcome::Ready(ready)
            }
            Ok(None) | Err(_) => {
                self.phase = Phase::NoResultNotified;
                SelectOutcome::NoAudio
            }
        }
    }

    /// Begin the archive download step.
    ///
    /// Only reachable from `DownloadReady`, so the filename is always
    /// backed by a matching manifest and title.
    pub fn begin_archive(&mut self) -> Option<(u64, ReadyDownload)> {
        let ready = self.ready()?.clone();
        self.seq += 1;
        debug!("Archive download issued (seq {})", self.seq);
        Some((self.seq, ready))
    }
}
