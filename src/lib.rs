//! Codebin - a code snippet sharing tool.
//!
//! Codebin lets you author a snippet in a terminal form, save it to a codebin
//! server, and view saved snippets with syntax highlighting.

pub mod cli;
pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod highlight;
pub mod models;
pub mod server;
pub mod store;
pub mod viewer;

// Re-export
pub use cli::{Codebin, Commands};
pub use client::SnippetClient;
pub use config::Config;
pub use editor::{run_editor, EditorState, Notification, NotificationColor};
pub use error::{CodebinError, Result};
pub use highlight::Highlighter;
pub use models::{Mode, SaveResponse, Snippet, Theme};
pub use server::{routes, start_server};
pub use store::{MemoryStore, SharedStore, SnippetStore};
pub use viewer::{run_viewer, ViewerState};
