//! Integration tests for audiobook-fetcher.
//!
//! These tests drive the workflow controller end to end with synthetic
//! backend responses, covering the search, selection, recovery, and
//! download-naming contracts.

use audiobook_fetcher::api::{SearchResponse, SelectRequest, SelectResponse};
use audiobook_fetcher::cache::Snapshot;
use audiobook_fetcher::config::Config;
use audiobook_fetcher::error::AppError;
use audiobook_fetcher::types::{resolve_title, AudioManifest, SearchQuery};
use audiobook_fetcher::workflow::{SearchOutcome, SelectOutcome, Workflow};

fn dune_options() -> SearchResponse {
    SearchResponse {
        book_options: Some(vec![
            "Dune (Unabridged)".to_string(),
            "Dune (Abridged)".to_string(),
        ]),
    }
}

fn dune_abridged_audio() -> SelectResponse {
    let mut manifest = AudioManifest::new();
    manifest.insert("Chapter 01".to_string(), "http://host/ch01.mp3".to_string());
    manifest.insert("Chapter 02".to_string(), "http://host/ch02.mp3".to_string());
    SelectResponse {
        audio_files: Some(manifest),
        book_title: Some("Dune  Abridged".to_string()),
    }
}

fn transport_err<T>() -> Result<T, AppError> {
    Err(AppError::Network("connection reset by peer".to_string()))
}

/// Rendered option count equals the returned option count, and the
/// selection index round-trips to the backend key.
#[test]
fn test_rendered_options_match_backend() {
    let mut workflow = Workflow::new(false, Snapshot::new());
    workflow.begin_search(SearchQuery::new("Dune", ""));

    match workflow.apply_search(Ok(dune_options())) {
        SearchOutcome::Options(options) => {
            assert_eq!(options.len(), 2);
            assert_eq!(options[0], "Dune (Unabridged)");
            assert_eq!(options[1], "Dune (Abridged)");
        }
        other => panic!("expected Options, got {:?}", other),
    }

    let (_, request) = workflow.begin_selection(1).unwrap();
    assert_eq!(request.selection, 1);
}

/// The whole "Dune" scenario: search, select the second entry, and check
/// the download label and archive filename.
#[test]
fn test_dune_scenario_end_to_end() {
    let mut workflow = Workflow::new(false, Snapshot::new());
    workflow.begin_search(SearchQuery::new("Dune", ""));
    workflow.apply_search(Ok(dune_options()));

    workflow.begin_selection(1).unwrap();
    match workflow.apply_selection(Ok(dune_abridged_audio())) {
        SelectOutcome::Ready(ready) => {
            assert_eq!(ready.download_label(), "Download Dune_Abridged");
            assert_eq!(ready.archive_filename(), "Dune_Abridged_audiobook.zip");
            assert_eq!(ready.manifest.len(), 2);
        }
        other => panic!("expected Ready, got {:?}", other),
    }
}

/// Displayed filename equals the title with every whitespace run collapsed
/// to exactly one underscore, suffixed with `_audiobook.zip`.
#[test]
fn test_filename_collapses_whitespace_runs() {
    for (raw, expected) in [
        ("Dune  Abridged", "Dune_Abridged_audiobook.zip"),
        ("The Great Gatsby", "The_Great_Gatsby_audiobook.zip"),
        ("One\t\tTwo \n Three", "One_Two_Three_audiobook.zip"),
    ] {
        assert_eq!(format!("{}_audiobook.zip", resolve_title(raw)), expected);
    }
}

/// Cache recovery short-circuits the empty-result path: a failed selection
/// call with a matching prior manifest still reveals the download.
#[test]
fn test_recovery_after_transport_failure() {
    let mut first = Workflow::new(false, Snapshot::new());
    first.begin_search(SearchQuery::new("Dune", ""));
    first.apply_search(Ok(dune_options()));
    first.begin_selection(1).unwrap();
    first.apply_selection(Ok(dune_abridged_audio()));

    // Simulate a later session sharing the persisted snapshot.
    let mut second = Workflow::new(false, first.snapshot().clone());
    second.begin_search(SearchQuery::new("Dune", ""));
    second.apply_search(Ok(dune_options()));
    second.begin_selection(1).unwrap();

    match second.apply_selection(transport_err()) {
        SelectOutcome::Ready(ready) => {
            assert_eq!(ready.title, "Dune_Abridged");
        }
        other => panic!("expected recovery, got {:?}", other),
    }
}

/// A failed selection with nothing cached yields exactly one no-audio
/// notice, never a phantom download action.
#[test]
fn test_failure_with_empty_cache_notifies_once() {
    let mut workflow = Workflow::new(false, Snapshot::new());
    workflow.begin_search(SearchQuery::new("Dune", ""));
    workflow.apply_search(Ok(dune_options()));
    workflow.begin_selection(0).unwrap();

    assert!(matches!(
        workflow.apply_selection(transport_err()),
        SelectOutcome::NoAudio
    ));
    assert!(workflow.ready().is_none());
}

/// A manifest cached for one book is never served when a different option
/// of the same search fails.
#[test]
fn test_recovery_is_scoped_to_the_selected_book() {
    let mut first = Workflow::new(false, Snapshot::new());
    first.begin_search(SearchQuery::new("Dune", ""));
    first.apply_search(Ok(dune_options()));
    first.begin_selection(1).unwrap();
    first.apply_selection(Ok(dune_abridged_audio()));

    let mut second = Workflow::new(false, first.snapshot().clone());
    second.begin_search(SearchQuery::new("Dune", ""));
    second.apply_search(Ok(dune_options()));
    second.begin_selection(0).unwrap();

    assert!(matches!(
        second.apply_selection(transport_err()),
        SelectOutcome::NoAudio
    ));
}

/// Re-submitting after an empty result leaves no stale options behind.
#[test]
fn test_resubmission_after_empty_result() {
    let mut workflow = Workflow::new(false, Snapshot::new());
    workflow.begin_search(SearchQuery::new("Dune", ""));
    workflow.apply_search(Ok(dune_options()));
    assert_eq!(workflow.options().len(), 2);

    workflow.begin_search(SearchQuery::new("Nothing Here", ""));
    let outcome = workflow.apply_search(Ok(SearchResponse { book_options: None }));
    assert!(matches!(outcome, SearchOutcome::Empty(ref t) if t == "Nothing Here"));
    assert!(workflow.options().is_empty());

    // And a fresh search renders a fresh list.
    workflow.begin_search(SearchQuery::new("Dune", ""));
    workflow.apply_search(Ok(dune_options()));
    assert_eq!(workflow.options().len(), 2);
}

/// An in-flight search superseded by a newer one must be dropped by the
/// sequence guard, not applied.
#[test]
fn test_sequence_guard_drops_superseded_search() {
    let mut workflow = Workflow::new(false, Snapshot::new());
    let stale = workflow.begin_search(SearchQuery::new("Dune", ""));
    let fresh = workflow.begin_search(SearchQuery::new("Hobbit", ""));

    assert!(!workflow.is_current(stale));
    assert!(workflow.is_current(fresh));
}

/// The two backend variants produce their distinct request shapes and
/// never mix within a run.
#[test]
fn test_variant_request_shapes() {
    let mut session = Workflow::new(false, Snapshot::new());
    session.begin_search(SearchQuery::new("Dune", "Frank Herbert"));
    session.apply_search(Ok(dune_options()));
    let (_, request) = session.begin_selection(0).unwrap();
    assert_eq!(
        serde_json::to_string(&request).unwrap(),
        r#"{"selection":0}"#
    );

    let mut stateless = Workflow::new(true, Snapshot::new());
    stateless.begin_search(SearchQuery::new("Dune", "Frank Herbert"));
    stateless.apply_search(Ok(dune_options()));
    let (_, request) = stateless.begin_selection(0).unwrap();
    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains(r#""bookOptions""#));
    assert!(json.contains(r#""bookDict":{"title":"Dune","author":"Frank Herbert"}"#));
}

/// Snapshot search state survives a JSON round trip for stateless replay.
#[test]
fn test_snapshot_replay_round_trip() {
    let mut snapshot = Snapshot::new();
    let query = SearchQuery::new("Dune", "Frank Herbert");
    snapshot.record_search(
        &["Dune (Unabridged)".to_string(), "Dune (Abridged)".to_string()],
        &query,
    );

    let restored: Snapshot =
        serde_json::from_str(&serde_json::to_string(&snapshot).unwrap()).unwrap();
    let (options, replayed) = restored.search_replay().unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(replayed, query);

    let request = SelectRequest::stateless(1, options, replayed);
    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains(r#""selection":1"#));
}

/// Config defaults.
#[test]
fn test_config_defaults() {
    let config = Config::new();

    assert_eq!(config.download_dir, ".");
    assert!(!config.stateless);
    assert!(config.server_url.starts_with("https://"));
}
