use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Error code the backend reports when a file record outlives its stored bytes.
pub const FILE_MISSING: &str = "FILE_MISSING";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Server(ServerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Body the backend sends alongside a failed request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A non-2xx response, kept raw so callers can decide how to read the body.
#[derive(Debug, Clone)]
pub struct ServerError {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ServerError {
    /// Decode the body as UTF-8 JSON. Any decoding failure yields `None`.
    pub fn payload(&self) -> Option<ErrorPayload> {
        let text = std::str::from_utf8(&self.body).ok()?;
        serde_json::from_str(text).ok()
    }

    pub fn message(&self) -> Option<String> {
        self.payload()
            .and_then(|p| p.message)
            .filter(|m| !m.trim().is_empty())
    }

    pub fn is_file_missing(&self) -> bool {
        self.status == 404
            && self
                .payload()
                .and_then(|p| p.code)
                .is_some_and(|code| code == FILE_MISSING)
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(msg) => write!(f, "HTTP {}: {msg}", self.status),
            None => write!(f, "HTTP {}", self.status),
        }
    }
}

impl AppError {
    /// Message supplied by the backend, if the error came from a response.
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Server(e) => e.message(),
            _ => None,
        }
    }

    /// Text for a notice: the server's own message, otherwise `fallback`.
    /// Validation errors always show their own text.
    pub fn notice_text(&self, fallback: &str) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            _ => self.server_message().unwrap_or_else(|| fallback.to_string()),
        }
    }

    pub fn is_file_missing(&self) -> bool {
        matches!(self, Self::Server(e) if e.is_file_missing())
    }
}
