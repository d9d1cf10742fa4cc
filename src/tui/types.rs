//! TUI type definitions for screens, form focus, and actions.

use crate::types::SearchQuery;

/// The current screen/view of the application.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Search form (title + author inputs)
    Search,
    /// Browsing the returned book options
    OptionList,
    /// Download action revealed for the selected book
    DownloadReady,
    /// Waiting for a backend response
    Loading,
}

/// Which search form field has focus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputField {
    Title,
    Author,
}

/// Actions that can be returned from the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No action, continue running
    None,
    /// Quit the application
    Quit,
    /// Submit a search with the given query
    Search(SearchQuery),
    /// Select a book option by position
    SelectOption(usize),
    /// Download the assembled archive
    Download,
}
