use std::fmt;
use std::io;

#[derive(Debug)]
pub enum CodebinError {
    Io(io::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    Api { status: u16, message: String },
    SnippetNotFound(String),
    MalformedForm,
    MissingField,
    EmptyBody,
    UnsupportedMode(String),
    InvalidConfig(String),
    Clipboard(String),
    Other(String),
}

impl fmt::Display for CodebinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodebinError::Io(err) => write!(f, "I/O error: {}", err),
            CodebinError::Json(err) => write!(f, "JSON error: {}", err),
            CodebinError::Http(err) => write!(f, "HTTP error: {}", err),
            CodebinError::Api { status, message } => write!(f, "Error {}: {}", status, message),
            CodebinError::SnippetNotFound(id) => write!(f, "Data for snippet {} not found", id),
            CodebinError::MalformedForm => write!(f, "Got malformed form data"),
            CodebinError::MissingField => write!(f, "Missing form field"),
            CodebinError::EmptyBody => write!(f, "Snippet body is empty"),
            CodebinError::UnsupportedMode(mode) => write!(f, "Unsupported mode: {}", mode),
            CodebinError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            CodebinError::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
            CodebinError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CodebinError {}

impl From<io::Error> for CodebinError {
    fn from(err: io::Error) -> Self {
        CodebinError::Io(err)
    }
}

impl From<serde_json::Error> for CodebinError {
    fn from(err: serde_json::Error) -> Self {
        CodebinError::Json(err)
    }
}

impl From<reqwest::Error> for CodebinError {
    fn from(err: reqwest::Error) -> Self {
        CodebinError::Http(err)
    }
}

pub type Result<T> = std::result::Result<T, CodebinError>;
