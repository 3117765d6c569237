use crate::client::SnippetClient;
use crate::error::{CodebinError, Result};
use crate::highlight::Highlighter;
use crate::models::Snippet;

use arboard::Clipboard;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use chrono::{LocalResult, TimeZone, Utc};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::{self, stdout};

/// State of the read-only view page: either a snippet or an error, never
/// both, never partial content.
pub struct ViewerState {
    pub snippet: Option<Snippet>,
    pub error: Option<String>,
    scroll: u16,
}

impl ViewerState {
    pub fn load(client: &SnippetClient, id: &str) -> Self {
        Self::from_outcome(client.fetch(id))
    }

    pub fn from_outcome(outcome: Result<Snippet>) -> Self {
        match outcome {
            Ok(snippet) => ViewerState {
                snippet: Some(snippet),
                error: None,
                scroll: 0,
            },
            Err(err) => ViewerState {
                snippet: None,
                error: Some(err.to_string()),
                scroll: 0,
            },
        }
    }

    fn scroll_by(&mut self, delta: i32, line_count: usize) {
        let max = line_count.saturating_sub(1) as u16;
        let next = self.scroll as i32 + delta;
        self.scroll = next.clamp(0, max as i32) as u16;
    }
}

/// Fetch the snippet with the given id and display it.
pub fn run_viewer(client: SnippetClient, id: &str) -> Result<()> {
    let state = ViewerState::load(&client, id);

    let lines = match &state.snippet {
        Some(snippet) => Highlighter::new().highlight(&snippet.body, snippet.mode, snippet.theme),
        None => Vec::new(),
    };

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    let result = run_ui(&mut terminal, state, lines);

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    result
}

fn run_ui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut state: ViewerState,
    lines: Vec<Line<'static>>,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw_viewer(f, &state, &lines))?;

        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            match code {
                KeyCode::Up => state.scroll_by(-1, lines.len()),
                KeyCode::Down => state.scroll_by(1, lines.len()),
                KeyCode::PageUp => state.scroll_by(-10, lines.len()),
                KeyCode::PageDown => state.scroll_by(10, lines.len()),
                KeyCode::Home => state.scroll_by(i32::MIN, lines.len()),
                KeyCode::Enter | KeyCode::Char('c') => {
                    if let Some(snippet) = &state.snippet {
                        copy_body(snippet)?;
                    }
                }
                KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                _ => {}
            }
        }
    }
}

fn copy_body(snippet: &Snippet) -> Result<()> {
    let mut clipboard = match Clipboard::new() {
        Ok(clipboard) => clipboard,
        Err(e) => return Err(CodebinError::Clipboard(e.to_string())),
    };
    clipboard
        .set_text(snippet.body.clone())
        .map_err(|e| CodebinError::Clipboard(e.to_string()))
}

fn draw_viewer<B: Backend>(f: &mut Frame<B>, state: &ViewerState, lines: &[Line<'static>]) {
    let size = f.size();

    // A failed fetch replaces the whole view with the error panel.
    if let Some(error) = &state.error {
        let panel = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::White).bg(Color::Red))
            .block(Block::default().borders(Borders::ALL));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(size);
        f.render_widget(panel, chunks[0]);
        return;
    }

    let snippet = match &state.snippet {
        Some(snippet) => snippet,
        None => return,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(size);

    let title = Paragraph::new(Span::styled(
        snippet.name.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    f.render_widget(title, chunks[0]);

    render_tags(f, chunks[1], snippet);

    let body = Paragraph::new(Text::from(lines.to_vec()))
        .scroll((state.scroll, 0))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, chunks[2]);

    let key = Style::default().fg(Color::Yellow);
    let help = Paragraph::new(Line::from(vec![
        Span::styled("↑/↓", key),
        Span::raw(": Scroll  "),
        Span::styled("Enter", key),
        Span::raw(": Copy to clipboard  "),
        Span::styled("Esc", key),
        Span::raw(": Exit"),
    ]))
    .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[3]);
}

fn render_tags<B: Backend>(f: &mut Frame<B>, area: Rect, snippet: &Snippet) {
    let tags = Line::from(vec![
        Span::styled(
            format!(" Created at {} ", format_timestamp(snippet.time_created)),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(
            format!(" Expires at {} ", format_timestamp(snippet.time_expired)),
            Style::default().fg(Color::White).bg(Color::Red),
        ),
        Span::raw("  "),
        Span::styled(snippet.mode.as_str(), Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(tags), area);
}

fn format_timestamp(secs: i64) -> String {
    match Utc.timestamp_opt(secs, 0) {
        LocalResult::Single(dt) => dt.to_rfc2822(),
        _ => secs.to_string(),
    }
}
