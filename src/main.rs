//! Main entry point for the audiobook-fetcher CLI application.

mod api;
mod cache;
mod config;
mod download;
mod error;
mod tui;
mod types;
mod workflow;

use crate::api::ApiClient;
use crate::cache::Snapshot;
use crate::config::Config;
use crate::tui::{draw, poll_event, Action, App};
use crate::workflow::{
    SearchOutcome, SelectOutcome, StepResult, Workflow, WorkflowEvent,
};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info, warn};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

/// Command-line arguments for the audiobook-fetcher application.
#[derive(Parser, Debug)]
#[command(
    name = "audiobook-fetcher",
    version,
    about = "A TUI client for an audiobook scraping service",
    long_about = "Search for a book, pick one of the matched editions, and download the \
                  scraped audiobook archive from a remote scraper backend."
)]
struct Args {
    /// Backend base URL (overrides config)
    #[arg(short, long)]
    server: Option<String>,

    /// Directory for the downloaded archive
    #[arg(short, long, default_value = ".")]
    download_dir: String,

    /// Replay search state on selection instead of relying on a server session
    #[arg(short = 'S', long)]
    stateless: bool,

    /// Log verbosity level: 0=error, 1=warn, 2=info, 3=debug, 4=trace
    #[arg(short, long, default_value_t = 1)]
    log: u8,
}

/// Initialize the terminal for TUI rendering.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Best-effort snapshot persistence; a failed write is logged, never fatal.
fn persist_snapshot(workflow: &Workflow) {
    if let Err(e) = workflow.snapshot().save() {
        warn!("Failed to persist snapshot: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.log {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    debug!("Log level set to {:?}", log_level);

    // Load config
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config: {}. Using defaults.", e);
        Config::new()
    });

    // Merge config with CLI args
    let server_url = args.server.clone().unwrap_or_else(|| config.server_url.clone());

    let download_dir_str = if args.download_dir == "." {
        config.download_dir.clone()
    } else {
        args.download_dir.clone()
    };

    let stateless = args.stateless || config.stateless;

    // Verify download directory
    let download_dir = Path::new(&download_dir_str);
    if !download_dir.exists() {
        eprintln!(
            "Error: Download directory '{}' does not exist.",
            download_dir.display()
        );
        std::process::exit(1);
    }

    info!(
        "Using backend {} ({} variant)",
        server_url,
        if stateless { "stateless" } else { "session" }
    );

    let client = match ApiClient::new(&server_url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    // Load the resilience snapshot
    let snapshot = Snapshot::load().unwrap_or_else(|e| {
        warn!("Failed to load snapshot: {}. Starting empty.", e);
        Snapshot::new()
    });

    // Initialize terminal
    let mut terminal = init_terminal()?;

    // Create app and workflow state
    let mut app = App::new(server_url, stateless);
    let mut workflow = Workflow::new(stateless, snapshot);

    // Main event loop
    let result = run_app(&mut terminal, &mut app, &mut workflow, &client, download_dir).await;

    // Restore terminal
    restore_terminal()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    workflow: &mut Workflow,
    client: &ApiClient,
    download_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<WorkflowEvent>();

    loop {
        // Draw UI
        terminal.draw(|f| draw(f, app))?;

        // Apply completed network steps before taking new input. Completions
        // issued under a superseded sequence are dropped so a slow earlier
        // call can never overwrite the state of a later one.
        while let Ok(event) = rx.try_recv() {
            if !workflow.is_current(event.seq) {
                debug!("Dropping stale completion (seq {})", event.seq);
                continue;
            }

            match event.result {
                StepResult::Search(result) => {
                    let outcome = workflow.apply_search(result);
                    app.search_busy = workflow.search_pending();

                    match outcome {
                        SearchOutcome::Options(options) => {
                            info!("Rendering {} book options", options.len());
                            persist_snapshot(workflow);
                            app.set_options(options);
                        }
                        SearchOutcome::Empty(title) => {
                            app.screen = tui::Screen::Search;
                            app.set_notice(&format!("No books found for {}", title));
                        }
                        SearchOutcome::Failed(e) => {
                            warn!("Search failed: {}", e);
                            app.screen = tui::Screen::Search;
                            app.set_error("An error occurred while searching for books.");
                        }
                    }
                }
                StepResult::Select(result) => match workflow.apply_selection(result) {
                    SelectOutcome::Ready(ready) => {
                        info!("Audio resolved for {}", ready.title);
                        persist_snapshot(workflow);
                        app.set_ready(&ready.download_label());
                    }
                    SelectOutcome::NoAudio => {
                        app.screen = if app.options.is_empty() {
                            tui::Screen::Search
                        } else {
                            tui::Screen::OptionList
                        };
                        app.set_notice("No audio files found");
                    }
                },
                StepResult::Archive(result) => match result {
                    Ok(bytes) => {
                        if let Some(ready) = workflow.ready() {
                            match download::save_archive(download_dir, ready, &bytes) {
                                Ok(path) => {
                                    info!("Archive saved to {}", path.display());
                                    app.set_status(&format!("Saved to {}", path.display()));
                                }
                                Err(e) => {
                                    warn!("Failed to save archive: {}", e);
                                    app.set_error(&format!("Download failed: {}", e));
                                }
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Archive download failed: {}", e);
                        app.set_error(&format!("Download failed: {}", e));
                    }
                },
            }
        }

        // Poll for events
        if let Some(Event::Key(key)) = poll_event(Duration::from_millis(100))? {
            match app.handle_input(key) {
                Action::Quit => break,
                Action::Search(query) => {
                    let seq = workflow.begin_search(query.clone());
                    app.clear_options();
                    app.search_busy = true;
                    app.set_loading(&format!("Loading book options for '{}'...", query.title));

                    let client = client.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let result = client.search(&query).await;
                        let _ = tx.send(WorkflowEvent {
                            seq,
                            result: StepResult::Search(result),
                        });
                    });
                }
                Action::SelectOption(i) => {
                    if let Some((seq, request)) = workflow.begin_selection(i) {
                        app.set_loading("Scraping audio files...");

                        let client = client.clone();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let result = client.continue_selection(&request).await;
                            let _ = tx.send(WorkflowEvent {
                                seq,
                                result: StepResult::Select(result),
                            });
                        });
                    }
                }
                Action::Download => {
                    if let Some((seq, ready)) = workflow.begin_archive() {
                        app.set_status(&format!("Downloading {}...", ready.archive_filename()));

                        let client = client.clone();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let result = client.fetch_archive().await;
                            let _ = tx.send(WorkflowEvent {
                                seq,
                                result: StepResult::Archive(result),
                            });
                        });
                    }
                }
                Action::None => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
