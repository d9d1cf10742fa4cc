//! Application state management and input handling.

use crate::types::SearchQuery;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use super::types::{Action, InputField, Screen};

/// Application state for the TUI.
pub struct App {
    /// Current screen being displayed
    pub screen: Screen,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Title field of the search form
    pub title_input: String,
    /// Author field of the search form
    pub author_input: String,
    /// Which form field has focus
    pub input_focus: InputField,
    /// Rendered book options
    pub options: Vec<String>,
    /// List state for the option list
    pub option_list_state: ListState,
    /// Loading message
    pub loading_message: String,
    /// User-visible notice ("No books found...", "No audio files found")
    pub notice: Option<String>,
    /// Error message to display
    pub error_message: Option<String>,
    /// Transient status line ("Saved to ...")
    pub status_message: Option<String>,
    /// Label of the revealed download action
    pub download_label: String,
    /// True while a search call is in flight; the form stays visible but
    /// submission is disabled until the call completes
    pub search_busy: bool,
    /// Backend base URL, shown in the header
    pub server_url: String,
    /// Whether the stateless variant is active, shown in the header
    pub stateless: bool,
}

impl App {
    /// Create a new App with default state.
    pub fn new(server_url: String, stateless: bool) -> Self {
        Self {
            screen: Screen::Search,
            should_quit: false,
            title_input: String::new(),
            author_input: String::new(),
            input_focus: InputField::Title,
            options: Vec::new(),
            option_list_state: ListState::default(),
            loading_message: String::new(),
            notice: None,
            error_message: None,
            status_message: None,
            download_label: String::new(),
            search_busy: false,
            server_url,
            stateless,
        }
    }

    /// Set the app to loading state with a message.
    pub fn set_loading(&mut self, message: &str) {
        self.screen = Screen::Loading;
        self.loading_message = message.to_string();
    }

    /// Replace the rendered options and switch to the option list screen.
    pub fn set_options(&mut self, options: Vec<String>) {
        self.options = options;
        self.option_list_state.select(Some(0));
        self.screen = Screen::OptionList;
    }

    /// Drop any rendered options (a new search supersedes them).
    pub fn clear_options(&mut self) {
        self.options.clear();
        self.option_list_state.select(None);
    }

    /// Reveal the download action with its label.
    pub fn set_ready(&mut self, label: &str) {
        self.clear_options();
        self.download_label = label.to_string();
        self.screen = Screen::DownloadReady;
    }

    /// Show a user-visible notice.
    pub fn set_notice(&mut self, message: &str) {
        self.notice = Some(message.to_string());
    }

    /// Set an error message.
    pub fn set_error(&mut self, message: &str) {
        self.error_message = Some(message.to_string());
    }

    /// Set a transient status line.
    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    /// Clear notice and error messages.
    pub fn clear_messages(&mut self) {
        self.notice = None;
        self.error_message = None;
    }

    /// Handle keyboard input and return an action.
    pub fn handle_input(&mut self, key: KeyEvent) -> Action {
        // Global quit with Ctrl+C or Ctrl+Q
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Action::Quit;
                }
                _ => {}
            }
        }

        // A notice or error blocks the screen until dismissed.
        if self.notice.is_some() || self.error_message.is_some() {
            self.clear_messages();
            return Action::None;
        }

        match self.screen {
            Screen::Search => self.handle_search_input(key),
            Screen::OptionList => self.handle_option_list_input(key),
            Screen::DownloadReady => self.handle_download_ready_input(key),
            Screen::Loading => {
                // Allow quit during loading
                if key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                    return Action::Quit;
                }
                Action::None
            }
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => {
                // Submission is disabled while a search is in flight and
                // requires a non-empty title.
                if self.search_busy || self.title_input.trim().is_empty() {
                    Action::None
                } else {
                    Action::Search(SearchQuery::new(&self.title_input, &self.author_input))
                }
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.input_focus = match self.input_focus {
                    InputField::Title => InputField::Author,
                    InputField::Author => InputField::Title,
                };
                Action::None
            }
            KeyCode::Char(c) => {
                match self.input_focus {
                    InputField::Title => self.title_input.push(c),
                    InputField::Author => self.author_input.push(c),
                }
                Action::None
            }
            KeyCode::Backspace => {
                match self.input_focus {
                    InputField::Title => self.title_input.pop(),
                    InputField::Author => self.author_input.pop(),
                };
                Action::None
            }
            KeyCode::Esc => {
                if !self.options.is_empty() {
                    self.screen = Screen::OptionList;
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_option_list_input(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.option_list_state.selected().unwrap_or(0);
                if i > 0 {
                    self.option_list_state.select(Some(i - 1));
                }
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.option_list_state.selected().unwrap_or(0);
                if i < self.options.len().saturating_sub(1) {
                    self.option_list_state.select(Some(i + 1));
                }
                Action::None
            }
            KeyCode::Enter => {
                if let Some(i) = self.option_list_state.selected() {
                    Action::SelectOption(i)
                } else {
                    Action::None
                }
            }
            KeyCode::Char('/') | KeyCode::Char('s') | KeyCode::Esc => {
                self.screen = Screen::Search;
                Action::None
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
                Action::Quit
            }
            _ => Action::None,
        }
    }

    fn handle_download_ready_input(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter | KeyCode::Char('d') => Action::Download,
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.screen = Screen::Search;
                Action::None
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
                Action::Quit
            }
            _ => Action::None,
        }
    }
}
