//! Terminal User Interface for audiobook-fetcher using ratatui.
//!
//! This module provides a full-screen TUI with a search form, the returned
//! book options, and the download action once audio has been resolved.

mod render;
mod state;
mod types;

pub use render::draw;
pub use state::App;
pub use types::{Action, InputField, Screen};

use crossterm::event::{self, Event};
use std::io;
use std::time::Duration;

/// Poll for keyboard events with a timeout.
pub fn poll_event(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
