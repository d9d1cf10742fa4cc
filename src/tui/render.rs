//! UI rendering functions for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::state::App;
use super::types::{InputField, Screen};

/// Draw the UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(size);

    draw_header(frame, app, chunks[0]);

    match app.screen {
        Screen::Search => draw_search_form(frame, app, chunks[1]),
        Screen::OptionList => draw_option_list(frame, app, chunks[1]),
        Screen::DownloadReady => draw_download_ready(frame, app, chunks[1]),
        Screen::Loading => draw_loading(frame, app, chunks[1]),
    }

    draw_footer(frame, app, chunks[2]);

    // Popups render last so they sit on top of the screen content.
    if let Some(error) = app.error_message.clone() {
        draw_popup(frame, "Error", &error, Color::Red);
    } else if let Some(notice) = app.notice.clone() {
        draw_popup(frame, "Notice", &notice, Color::Yellow);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let variant = if app.stateless {
        Span::styled("[stateless]", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("[session]", Style::default().fg(Color::Cyan))
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "audiobook-fetcher",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        variant,
        Span::raw("  "),
        Span::styled(
            app.server_url.clone(),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_search_form(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title input
            Constraint::Length(3), // Author input
            Constraint::Min(0),    // Help text
        ])
        .split(area);

    draw_input_field(
        frame,
        chunks[0],
        "Title",
        &app.title_input,
        app.input_focus == InputField::Title,
    );
    draw_input_field(
        frame,
        chunks[1],
        "Author (optional)",
        &app.author_input,
        app.input_focus == InputField::Author,
    );

    let help = if app.search_busy {
        "Search in progress..."
    } else {
        "Type a book title (author optional) and press Enter\n\n\
        - Tab: switch field\n\
        - Esc: back to results\n\
        - Ctrl+C: quit"
    };

    let help = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).title("Search"))
        .wrap(Wrap { trim: true });

    frame.render_widget(help, chunks[2]);

    // Show the cursor in the focused field while the form is usable.
    if !app.search_busy {
        let (field_area, text) = match app.input_focus {
            InputField::Title => (chunks[0], &app.title_input),
            InputField::Author => (chunks[1], &app.author_input),
        };
        frame.set_cursor_position((
            field_area.x + text.chars().count() as u16 + 1,
            field_area.y + 1,
        ));
    }
}

fn draw_input_field(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input = Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style),
    );

    frame.render_widget(input, area);
}

fn draw_option_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .options
        .iter()
        .map(|label| ListItem::new(label.clone()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Results ({})", app.options.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.option_list_state);
}

fn draw_download_ready(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            app.download_label.clone(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::raw("Press Enter to download the archive."),
    ];

    if let Some(status) = &app.status_message {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Cyan),
        )));
    }

    let ready = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Audio found"))
        .wrap(Wrap { trim: true });

    frame.render_widget(ready, area);
}

fn draw_loading(frame: &mut Frame, app: &App, area: Rect) {
    let loading = Paragraph::new(app.loading_message.clone())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Loading"))
        .wrap(Wrap { trim: true });

    frame.render_widget(loading, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.screen {
        Screen::Search => "Enter: search | Tab: switch field | Ctrl+C: quit",
        Screen::OptionList => "j/k: navigate | Enter: select | s: new search | q: quit",
        Screen::DownloadReady => "Enter/d: download | s: new search | q: quit",
        Screen::Loading => "q: quit",
    };

    let footer = Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

fn draw_popup(frame: &mut Frame, title: &str, message: &str, color: Color) {
    let area = centered_rect(60, 20, frame.area());

    let popup = Paragraph::new(format!("{}\n\nPress any key to continue", message))
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(color)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// Compute a centered rect using percentages of the available area.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
