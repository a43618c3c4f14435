// src/error.rs
// Error types for newsdesk

use thiserror::Error;

/// Main error type for the newsdesk library
#[derive(Error, Debug)]
pub enum NewsdeskError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("session not ready: {0}")]
    SessionNotReady(&'static str),

    #[error("assistant API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed run: {0}")]
    MalformedRun(String),

    #[error("run ended with status {status}: {message}")]
    RunTerminated { status: String, message: String },

    #[error("run still pending after {attempts} polls")]
    PollTimeout { attempts: u32 },

    #[error("run polling cancelled")]
    Cancelled,

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Convenience type alias for Result using NewsdeskError
pub type Result<T> = std::result::Result<T, NewsdeskError>;

impl NewsdeskError {
    /// True for errors that mean the run reached a state it will never leave.
    pub fn is_run_failure(&self) -> bool {
        matches!(
            self,
            NewsdeskError::RunTerminated { .. } | NewsdeskError::MalformedRun(_)
        )
    }
}
