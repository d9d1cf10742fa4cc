//! A terminal client for a book-to-audiobook scraping service.
//!
//! audiobook-fetcher drives the backend's three-step workflow from a TUI:
//! search for a book by title and author, pick one of the returned options,
//! and download the assembled audiobook archive once the audio files have
//! been scraped. A local snapshot of server state acts as a resilience
//! cache, so a failed selection call can recover the last successful one.
//!
//! # Features
//!
//! - Search by title with an optional author
//! - Pick from the backend's matched editions
//! - Download the finished archive as `<Title>_audiobook.zip`
//! - Recover a lost selection from the local snapshot
//! - Works against both session-based and stateless backend variants
//!
//! # Usage
//!
//! ```bash
//! # Run against the configured backend
//! cargo run
//!
//! # Run against a local backend, replaying search state on selection
//! cargo run -- --server http://localhost:5000 --stateless
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod download;
pub mod error;
pub mod tui;
pub mod types;
pub mod workflow;
