//! Data models for snippets and the save/view wire format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language mode a snippet is highlighted as.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Python,
    Golang,
    Rust,
    Javascript,
    Text,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Python,
        Mode::Golang,
        Mode::Rust,
        Mode::Javascript,
        Mode::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Python => "python",
            Mode::Golang => "golang",
            Mode::Rust => "rust",
            Mode::Javascript => "javascript",
            Mode::Text => "text",
        }
    }

    pub fn parse(s: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|mode| mode.as_str() == s)
    }

    /// File extension hint used to pick a highlighting grammar.
    pub fn extension(self) -> &'static str {
        match self {
            Mode::Python => "py",
            Mode::Golang => "go",
            Mode::Rust => "rs",
            Mode::Javascript => "js",
            Mode::Text => "txt",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display theme used when rendering a snippet.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Terminal,
}

impl Theme {
    pub const ALL: [Theme; 1] = [Theme::Terminal];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Terminal => "terminal",
        }
    }

    /// Name of the syntect theme backing this display theme.
    pub fn highlight_theme(self) -> &'static str {
        match self {
            Theme::Terminal => "base16-eighties.dark",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Terminal
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A saved snippet as it travels between client and server.
///
/// The snippet id lives in the URL path and the save response, never inside
/// the snippet JSON itself.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Snippet {
    #[serde(rename = "snippetName")]
    pub name: String,
    #[serde(rename = "snippetText")]
    pub body: String,
    pub mode: Mode,
    #[serde(default)]
    pub theme: Theme,
    #[serde(rename = "timeCreated")]
    pub time_created: i64,
    #[serde(rename = "timeExpired")]
    pub time_expired: i64,
    #[serde(skip)]
    pub id: String,
}

/// Response body of a successful save.
#[derive(Serialize, Deserialize, Debug)]
pub struct SaveResponse {
    #[serde(rename = "snippetId")]
    pub snippet_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snippet {
        Snippet {
            name: "hello".to_string(),
            body: "print('hi')".to_string(),
            mode: Mode::Python,
            theme: Theme::Terminal,
            time_created: 1_700_000_000,
            time_expired: 1_700_086_400,
            id: "0123456789abcdef0123456789abcdef".to_string(),
        }
    }

    #[test]
    fn snippet_uses_wire_field_names() {
        let json = serde_json::to_string(&sample()).expect("serialize");
        assert!(json.contains("\"snippetName\""));
        assert!(json.contains("\"snippetText\""));
        assert!(json.contains("\"mode\":\"python\""));
        assert!(json.contains("\"theme\":\"terminal\""));
        assert!(json.contains("\"timeCreated\""));
        assert!(json.contains("\"timeExpired\""));
    }

    #[test]
    fn snippet_id_never_serialized() {
        let json = serde_json::to_string(&sample()).expect("serialize");
        assert!(!json.contains("0123456789abcdef"));
    }

    #[test]
    fn deserializes_payload_without_theme() {
        let json = r#"{
            "snippetName": "demo",
            "snippetText": "package main",
            "mode": "golang",
            "timeCreated": 10,
            "timeExpired": 20
        }"#;
        let snippet: Snippet = serde_json::from_str(json).expect("deserialize");
        assert_eq!(snippet.name, "demo");
        assert_eq!(snippet.mode, Mode::Golang);
        assert_eq!(snippet.theme, Theme::Terminal);
        assert_eq!(snippet.time_created, 10);
        assert_eq!(snippet.time_expired, 20);
        assert!(snippet.id.is_empty());
    }

    #[test]
    fn mode_parses_supported_values_only() {
        for mode in Mode::ALL {
            assert_eq!(Mode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(Mode::parse("haskell"), None);
        assert_eq!(Mode::parse("Python"), None);
    }

    #[test]
    fn save_response_wire_name() {
        let resp: SaveResponse =
            serde_json::from_str(r#"{"snippetId":"abc"}"#).expect("deserialize");
        assert_eq!(resp.snippet_id, "abc");
    }
}
