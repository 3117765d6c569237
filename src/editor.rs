use crate::client::SnippetClient;
use crate::error::{CodebinError, Result};
use crate::models::{Mode, Theme};

use arboard::Clipboard;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io::{self, stdout};

/// Single notification slot, overwritten by each outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub color: NotificationColor,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationColor {
    Primary,
    Danger,
}

impl Notification {
    pub fn primary(message: impl Into<String>) -> Self {
        Notification {
            color: NotificationColor::Primary,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Notification {
            color: NotificationColor::Danger,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Mode,
    Theme,
    Body,
}

/// What the run loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    Continue,
    Submit,
    Copy,
    Exit,
}

/// State of the snippet editor form.
///
/// The editor owns every widget value it renders, so outcomes of a save land
/// here and nowhere else.
pub struct EditorState {
    pub name: String,
    pub body: String,
    pub mode: Mode,
    pub theme: Theme,
    pub locked: bool,
    pub notification: Option<Notification>,
    /// Ids of snippets saved during this session, oldest first.
    pub saved: Vec<String>,
    pub focus: Field,
    name_cursor: usize,
    body_cursor: usize,
    scroll: u16,
}

impl EditorState {
    pub fn new() -> Self {
        EditorState {
            name: String::new(),
            body: String::new(),
            mode: Mode::Python,
            theme: Theme::Terminal,
            locked: false,
            notification: None,
            saved: Vec::new(),
            focus: Field::Name,
            name_cursor: 0,
            body_cursor: 0,
            scroll: 0,
        }
    }

    pub fn submit(&mut self, client: &SnippetClient) {
        let outcome = client.submit(&self.name, &self.body, self.mode);
        self.apply_save_outcome(outcome);
    }

    /// Fold a save outcome into the notification slot and saved list.
    ///
    /// A success appends exactly one id; any failure leaves the list alone.
    pub fn apply_save_outcome(&mut self, outcome: Result<String>) {
        match outcome {
            Ok(id) => {
                self.notification = Some(Notification::primary("snippet saved."));
                self.saved.push(id);
            }
            Err(err @ CodebinError::Api { .. }) => {
                self.notification = Some(Notification::danger(err.to_string()));
            }
            Err(err) => {
                self.notification = Some(Notification::danger(format!(
                    "Failed to save snippet data: {}",
                    err
                )));
            }
        }
    }

    pub fn copy_to_clipboard(&mut self) {
        let outcome = Clipboard::new().and_then(|mut clipboard| clipboard.set_text(self.body.clone()));
        match outcome {
            Ok(()) => {
                self.notification = Some(Notification::primary("snippet copied to clipboard."));
            }
            Err(e) => {
                self.notification = Some(Notification::danger(
                    CodebinError::Clipboard(e.to_string()).to_string(),
                ));
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> EditorEvent {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return match code {
                KeyCode::Char('s') => EditorEvent::Submit,
                KeyCode::Char('y') => EditorEvent::Copy,
                KeyCode::Char('l') => {
                    self.locked = !self.locked;
                    EditorEvent::Continue
                }
                KeyCode::Char('c') => EditorEvent::Exit,
                _ => EditorEvent::Continue,
            };
        }

        match code {
            KeyCode::Esc => return EditorEvent::Exit,
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_prev(),
            KeyCode::Enter => match self.focus {
                Field::Body => self.insert_char('\n'),
                _ => self.focus_next(),
            },
            KeyCode::Up => match self.focus {
                Field::Body => move_vertical(&self.body, &mut self.body_cursor, true),
                _ => self.focus_prev(),
            },
            KeyCode::Down => match self.focus {
                Field::Body => move_vertical(&self.body, &mut self.body_cursor, false),
                _ => self.focus_next(),
            },
            KeyCode::Left => match self.focus {
                Field::Name => move_left(&self.name, &mut self.name_cursor),
                Field::Body => move_left(&self.body, &mut self.body_cursor),
                Field::Mode => self.cycle_mode(-1),
                Field::Theme => self.cycle_theme(-1),
            },
            KeyCode::Right => match self.focus {
                Field::Name => move_right(&self.name, &mut self.name_cursor),
                Field::Body => move_right(&self.body, &mut self.body_cursor),
                Field::Mode => self.cycle_mode(1),
                Field::Theme => self.cycle_theme(1),
            },
            KeyCode::Home => match self.focus {
                Field::Name => self.name_cursor = 0,
                Field::Body => self.body_cursor = line_bounds(&self.body, self.body_cursor).0,
                _ => {}
            },
            KeyCode::End => match self.focus {
                Field::Name => self.name_cursor = self.name.len(),
                Field::Body => self.body_cursor = line_bounds(&self.body, self.body_cursor).1,
                _ => {}
            },
            KeyCode::Backspace => match self.focus {
                Field::Name => backspace_at(&mut self.name, &mut self.name_cursor),
                Field::Body => {
                    if !self.locked {
                        backspace_at(&mut self.body, &mut self.body_cursor);
                    }
                }
                _ => {}
            },
            KeyCode::Delete => match self.focus {
                Field::Name => delete_at(&mut self.name, self.name_cursor),
                Field::Body => {
                    if !self.locked {
                        delete_at(&mut self.body, self.body_cursor);
                    }
                }
                _ => {}
            },
            KeyCode::Char(c) => self.insert_char(c),
            _ => {}
        }
        EditorEvent::Continue
    }

    fn insert_char(&mut self, c: char) {
        match self.focus {
            Field::Name => insert_at(&mut self.name, &mut self.name_cursor, c),
            Field::Body => {
                if !self.locked {
                    insert_at(&mut self.body, &mut self.body_cursor, c);
                }
            }
            _ => {}
        }
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            Field::Name => Field::Mode,
            Field::Mode => Field::Theme,
            Field::Theme => Field::Body,
            Field::Body => Field::Name,
        };
    }

    fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Field::Name => Field::Body,
            Field::Mode => Field::Name,
            Field::Theme => Field::Mode,
            Field::Body => Field::Theme,
        };
    }

    fn cycle_mode(&mut self, step: isize) {
        let len = Mode::ALL.len() as isize;
        let current = Mode::ALL
            .iter()
            .position(|mode| *mode == self.mode)
            .unwrap_or(0) as isize;
        self.mode = Mode::ALL[(current + step).rem_euclid(len) as usize];
    }

    fn cycle_theme(&mut self, step: isize) {
        let len = Theme::ALL.len() as isize;
        let current = Theme::ALL
            .iter()
            .position(|theme| *theme == self.theme)
            .unwrap_or(0) as isize;
        self.theme = Theme::ALL[(current + step).rem_euclid(len) as usize];
    }
}

impl Default for EditorState {
    fn default() -> Self {
        EditorState::new()
    }
}

/// Open the snippet editor against the given server.
pub fn run_editor(client: SnippetClient) -> Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    let result = run_ui(&mut terminal, client);

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    result
}

fn run_ui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: SnippetClient,
) -> Result<()> {
    let mut state = EditorState::new();

    loop {
        terminal.draw(|f| draw_editor(f, &mut state))?;

        if let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        {
            match state.handle_key(code, modifiers) {
                EditorEvent::Exit => return Ok(()),
                EditorEvent::Submit => state.submit(&client),
                EditorEvent::Copy => state.copy_to_clipboard(),
                EditorEvent::Continue => {}
            }
        }
    }
}

fn draw_editor<B: Backend>(f: &mut Frame<B>, state: &mut EditorState) {
    let size = f.size();

    let mut constraints = Vec::new();
    if state.notification.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(3));
    constraints.push(Constraint::Length(3));
    constraints.push(Constraint::Min(5));
    if !state.saved.is_empty() {
        constraints.push(Constraint::Length((state.saved.len() as u16).min(4) + 2));
    }
    constraints.push(Constraint::Length(2));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    let mut next = 0;
    if let Some(notification) = &state.notification {
        render_notification(f, chunks[next], notification);
        next += 1;
    }

    render_name(f, chunks[next], state);
    next += 1;

    let selects = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[next]);
    let modes = Mode::ALL.map(Mode::as_str);
    let themes = Theme::ALL.map(Theme::as_str);
    render_select(
        f,
        selects[0],
        " Mode ",
        &modes,
        state.mode.as_str(),
        state.focus == Field::Mode,
    );
    render_select(
        f,
        selects[1],
        " Theme ",
        &themes,
        state.theme.as_str(),
        state.focus == Field::Theme,
    );
    next += 1;

    render_body(f, chunks[next], state);
    next += 1;

    if !state.saved.is_empty() {
        render_saved(f, chunks[next], &state.saved);
        next += 1;
    }

    render_help(f, chunks[next]);
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Blue)
    }
}

fn render_notification<B: Backend>(f: &mut Frame<B>, area: Rect, notification: &Notification) {
    let bg = match notification.color {
        NotificationColor::Primary => Color::Green,
        NotificationColor::Danger => Color::Red,
    };
    let panel = Paragraph::new(notification.message.as_str())
        .style(Style::default().fg(Color::White).bg(bg))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(panel, area);
}

fn render_name<B: Backend>(f: &mut Frame<B>, area: Rect, state: &EditorState) {
    let active = state.focus == Field::Name;
    let inner_width = area.width.saturating_sub(2);
    let cursor_col = state.name[..state.name_cursor].chars().count() as u16;
    let hscroll = cursor_col.saturating_sub(inner_width.saturating_sub(1));

    let name = Paragraph::new(state.name.as_str())
        .scroll((0, hscroll))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Snippet Name ")
                .border_style(border_style(active)),
        );
    f.render_widget(name, area);

    if active {
        f.set_cursor(area.x + 1 + cursor_col - hscroll, area.y + 1);
    }
}

fn render_select<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    title: &'static str,
    options: &[&'static str],
    selected: &str,
    active: bool,
) {
    let mut spans = Vec::new();
    for (i, option) in options.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        if *option == selected {
            spans.push(Span::styled(
                *option,
                Style::default()
                    .fg(Color::White)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(*option, Style::default().fg(Color::Gray)));
        }
    }

    let select = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style(active)),
    );
    f.render_widget(select, area);
}

fn render_body<B: Backend>(f: &mut Frame<B>, area: Rect, state: &mut EditorState) {
    let active = state.focus == Field::Body;
    let title = if state.locked {
        " Snippet (locked) "
    } else {
        " Snippet "
    };

    let inner_height = area.height.saturating_sub(2);
    let (line, col) = cursor_line_col(&state.body, state.body_cursor);
    if line < state.scroll {
        state.scroll = line;
    } else if inner_height > 0 && line >= state.scroll + inner_height {
        state.scroll = line - inner_height + 1;
    }

    let body = Paragraph::new(state.body.as_str())
        .scroll((state.scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style(active)),
        );
    f.render_widget(body, area);

    if active && inner_height > 0 {
        let col = col.min(area.width.saturating_sub(2));
        f.set_cursor(area.x + 1 + col, area.y + 1 + line - state.scroll);
    }
}

fn render_saved<B: Backend>(f: &mut Frame<B>, area: Rect, saved: &[String]) {
    // Newest first, like the saved list under the original form.
    let items: Vec<ListItem> = saved
        .iter()
        .rev()
        .map(|sid| {
            ListItem::new(Line::from(vec![
                Span::raw("view saved snippet with: "),
                Span::styled(
                    format!("codebin view {}", sid),
                    Style::default().fg(Color::Green),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Saved Snippets "),
    );
    f.render_widget(list, area);
}

fn render_help<B: Backend>(f: &mut Frame<B>, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let help = Paragraph::new(Line::from(vec![
        Span::styled("Tab", key),
        Span::raw(": Next field  "),
        Span::styled("←/→", key),
        Span::raw(": Change selection  "),
        Span::styled("Ctrl+S", key),
        Span::raw(": Save  "),
        Span::styled("Ctrl+L", key),
        Span::raw(": Lock  "),
        Span::styled("Ctrl+Y", key),
        Span::raw(": Copy  "),
        Span::styled("Esc", key),
        Span::raw(": Exit"),
    ]))
    .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, area);
}

fn insert_at(text: &mut String, cursor: &mut usize, c: char) {
    text.insert(*cursor, c);
    *cursor += c.len_utf8();
}

fn backspace_at(text: &mut String, cursor: &mut usize) {
    if let Some((idx, _)) = text[..*cursor].char_indices().next_back() {
        text.remove(idx);
        *cursor = idx;
    }
}

fn delete_at(text: &mut String, cursor: usize) {
    if cursor < text.len() {
        text.remove(cursor);
    }
}

fn move_left(text: &str, cursor: &mut usize) {
    if let Some((idx, _)) = text[..*cursor].char_indices().next_back() {
        *cursor = idx;
    }
}

fn move_right(text: &str, cursor: &mut usize) {
    if let Some(c) = text[*cursor..].chars().next() {
        *cursor += c.len_utf8();
    }
}

/// Byte offsets of the first character of every line.
fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

fn line_bounds(text: &str, cursor: usize) -> (usize, usize) {
    let start = text[..cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[cursor..]
        .find('\n')
        .map(|i| cursor + i)
        .unwrap_or(text.len());
    (start, end)
}

/// Move the cursor one line up or down, keeping the column when possible.
fn move_vertical(text: &str, cursor: &mut usize, up: bool) {
    let starts = line_starts(text);
    let line = match starts.binary_search(cursor) {
        Ok(i) => i,
        Err(i) => i - 1,
    };
    let col = text[starts[line]..*cursor].chars().count();

    let target = if up {
        if line == 0 {
            return;
        }
        line - 1
    } else {
        if line + 1 >= starts.len() {
            return;
        }
        line + 1
    };

    let start = starts[target];
    let end = if target + 1 < starts.len() {
        starts[target + 1] - 1
    } else {
        text.len()
    };

    let mut new_cursor = start;
    for (advanced, c) in text[start..end].chars().enumerate() {
        if advanced == col {
            break;
        }
        new_cursor += c.len_utf8();
    }
    *cursor = new_cursor;
}

fn cursor_line_col(text: &str, cursor: usize) -> (u16, u16) {
    let before = &text[..cursor];
    let line = before.matches('\n').count() as u16;
    let col = before
        .rsplit('\n')
        .next()
        .map(|tail| tail.chars().count())
        .unwrap_or(0) as u16;
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(state: &mut EditorState, text: &str) {
        for c in text.chars() {
            state.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn successful_save_appends_exactly_one_id() {
        let mut state = EditorState::new();
        state.apply_save_outcome(Ok("0123456789abcdef0123456789abcdef".to_string()));

        assert_eq!(state.saved, vec!["0123456789abcdef0123456789abcdef"]);
        let notification = state.notification.expect("notification");
        assert_eq!(notification.color, NotificationColor::Primary);
        assert_eq!(notification.message, "snippet saved.");
    }

    #[test]
    fn failed_save_leaves_saved_list_unchanged() {
        let mut state = EditorState::new();
        state.saved.push("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string());
        state.apply_save_outcome(Err(CodebinError::Api {
            status: 500,
            message: "boom".to_string(),
        }));

        assert_eq!(state.saved, vec!["aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"]);
        let notification = state.notification.expect("notification");
        assert_eq!(notification.color, NotificationColor::Danger);
        assert_eq!(notification.message, "Error 500: boom");
    }

    #[test]
    fn transport_failure_is_prefixed() {
        let mut state = EditorState::new();
        state.apply_save_outcome(Err(CodebinError::Other("connection refused".to_string())));

        let notification = state.notification.expect("notification");
        assert_eq!(notification.color, NotificationColor::Danger);
        assert_eq!(
            notification.message,
            "Failed to save snippet data: Error: connection refused"
        );
    }

    #[test]
    fn next_save_overwrites_notification() {
        let mut state = EditorState::new();
        state.apply_save_outcome(Err(CodebinError::Api {
            status: 400,
            message: "Snippet body is empty".to_string(),
        }));
        state.apply_save_outcome(Ok("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string()));

        let notification = state.notification.expect("notification");
        assert_eq!(notification.color, NotificationColor::Primary);
        assert_eq!(state.saved.len(), 1);
    }

    #[test]
    fn typing_edits_the_focused_field() {
        let mut state = EditorState::new();
        type_str(&mut state, "my snippet");
        assert_eq!(state.name, "my snippet");
        assert!(state.body.is_empty());

        state.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        state.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        state.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(state.focus, Field::Body);
        type_str(&mut state, "line one");
        state.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        type_str(&mut state, "line two");
        assert_eq!(state.body, "line one\nline two");
    }

    #[test]
    fn enter_in_name_moves_to_mode() {
        let mut state = EditorState::new();
        state.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(state.focus, Field::Mode);
    }

    #[test]
    fn mode_selection_cycles_and_wraps() {
        let mut state = EditorState::new();
        state.focus = Field::Mode;
        assert_eq!(state.mode, Mode::Python);

        state.handle_key(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(state.mode, Mode::Text);
        state.handle_key(KeyCode::Right, KeyModifiers::NONE);
        state.handle_key(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(state.mode, Mode::Golang);
    }

    #[test]
    fn lock_blocks_body_edits() {
        let mut state = EditorState::new();
        state.focus = Field::Body;
        type_str(&mut state, "keep me");

        state.handle_key(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert!(state.locked);
        type_str(&mut state, "nope");
        state.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(state.body, "keep me");

        state.handle_key(KeyCode::Char('l'), KeyModifiers::CONTROL);
        type_str(&mut state, "!");
        assert_eq!(state.body, "keep me!");
    }

    #[test]
    fn ctrl_s_requests_submit() {
        let mut state = EditorState::new();
        let event = state.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(event, EditorEvent::Submit);
    }

    #[test]
    fn esc_requests_exit() {
        let mut state = EditorState::new();
        assert_eq!(
            state.handle_key(KeyCode::Esc, KeyModifiers::NONE),
            EditorEvent::Exit
        );
    }

    #[test]
    fn backspace_handles_multibyte_chars() {
        let mut state = EditorState::new();
        type_str(&mut state, "héllo");
        state.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        state.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        state.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(state.name, "hé");
    }

    #[test]
    fn vertical_moves_keep_column() {
        let text = "alpha\nbe\ngamma";
        let mut cursor = 4; // "alph|a"
        move_vertical(text, &mut cursor, false);
        assert_eq!(cursor, 8); // clamped to end of "be"
        move_vertical(text, &mut cursor, false);
        assert_eq!(cursor, 11); // "ga|mma"
        move_vertical(text, &mut cursor, true);
        assert_eq!(cursor, 8);
    }

    #[test]
    fn line_bounds_finds_current_line() {
        let text = "one\ntwo\nthree";
        assert_eq!(line_bounds(text, 5), (4, 7));
        assert_eq!(line_bounds(text, 0), (0, 3));
        assert_eq!(line_bounds(text, 13), (8, 13));
    }
}
