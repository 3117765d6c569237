use crate::models::{Mode, Theme};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Turns snippet text into styled terminal lines.
///
/// Loading the grammar and theme sets is the expensive part, so one
/// `Highlighter` is built per viewer session and reused per line.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Highlighter {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    pub fn highlight(&self, body: &str, mode: Mode, theme: Theme) -> Vec<Line<'static>> {
        let syntax = self
            .syntaxes
            .find_syntax_by_extension(mode.extension())
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        let theme = match self.themes.themes.get(theme.highlight_theme()) {
            Some(theme) => theme,
            None => return plain_lines(body),
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut lines = Vec::new();
        for raw in LinesWithEndings::from(body) {
            match highlighter.highlight_line(raw, &self.syntaxes) {
                Ok(ranges) => lines.push(styled_line(&ranges)),
                Err(_) => lines.push(Line::from(trim_newline(raw).to_string())),
            }
        }
        lines
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Highlighter::new()
    }
}

fn plain_lines(body: &str) -> Vec<Line<'static>> {
    body.lines().map(|line| Line::from(line.to_string())).collect()
}

fn styled_line(ranges: &[(syntect::highlighting::Style, &str)]) -> Line<'static> {
    let spans: Vec<Span<'static>> = ranges
        .iter()
        .map(|(style, text)| {
            let fg = style.foreground;
            Span::styled(
                trim_newline(text).to_string(),
                Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
            )
        })
        .collect();
    Line::from(spans)
}

fn trim_newline(text: &str) -> &str {
    text.trim_end_matches('\n').trim_end_matches('\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn one_styled_line_per_input_line() {
        let highlighter = Highlighter::new();
        let body = "fn main() {\n    println!(\"hi\");\n}\n";
        let lines = highlighter.highlight(body, Mode::Rust, Theme::Terminal);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn highlighting_preserves_text() {
        let highlighter = Highlighter::new();
        let body = "def greet():\n    return 42";
        let lines = highlighter.highlight(body, Mode::Python, Theme::Terminal);
        assert_eq!(line_text(&lines[0]), "def greet():");
        assert_eq!(line_text(&lines[1]), "    return 42");
    }

    #[test]
    fn text_mode_falls_back_to_plain_grammar() {
        let highlighter = Highlighter::new();
        let lines = highlighter.highlight("just words", Mode::Text, Theme::Terminal);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "just words");
    }

    #[test]
    fn empty_body_yields_no_lines() {
        let highlighter = Highlighter::new();
        assert!(highlighter
            .highlight("", Mode::Javascript, Theme::Terminal)
            .is_empty());
    }
}
