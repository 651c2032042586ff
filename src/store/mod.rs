pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A submission that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub reg_no: String,
    pub final_query: String,
    pub submitted_at: DateTime<Utc>,
}

/// A persisted submission. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: i64,
    pub reg_no: String,
    pub final_query: String,
    pub submitted_at: DateTime<Utc>,
}

/// Where submissions are recorded. Could be SQLite, a remote service, etc.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist `submission` and return the id the store assigned.
    async fn save(&self, submission: &NewSubmission) -> Result<i64>;

    /// Up to `limit` submissions, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<Submission>>;
}
