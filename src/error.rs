//! Failure taxonomy for a run.
//!
//! Everything except [`SolverError::Storage`] aborts the run. Library code
//! returns `anyhow::Result` with these values inside, so callers can
//! `downcast_ref::<SolverError>()` when they need the kind.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("missing required setting `{key}`")]
    MissingConfig { key: &'static str },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered {status}: {body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("invalid response from generateWebhook: {reason}")]
    InvalidRegistration { reason: String },

    #[error("unable to load SQL file {}: {source}", path.display())]
    AnswerUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to persist submission: {0}")]
    Storage(#[from] rusqlite::Error),
}
