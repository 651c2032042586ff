use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, warn};

use super::{NewSubmission, Submission, SubmissionStore};
use crate::error::SolverError;

/// SQLite-backed submission log.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the submissions table at `path`.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(SolverError::from)
            .with_context(|| format!("failed to open database {path}"))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS submissions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                reg_no       TEXT NOT NULL,
                final_query  TEXT NOT NULL,
                submitted_at TEXT NOT NULL
            )",
        )
        .map_err(SolverError::from)
        .context("failed to create submissions table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Open `path` for a run, creating its parent directory. When that fails
    /// the run gets an in-memory store instead, so a broken database never
    /// stops a submission.
    pub fn open_or_in_memory(path: &Path) -> Result<Self> {
        match Self::open_creating(path) {
            Ok(store) => Ok(store),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %format!("{e:#}"),
                    "falling back to an in-memory store"
                );
                Self::in_memory()
            }
        }
    }

    fn open_creating(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        Self::open(utf8(path)?)
    }

    /// Open an existing database without writing to it.
    /// Returns `None` when there is no file at `path`.
    pub fn open_existing(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let conn = Connection::open_with_flags(utf8(path)?, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(SolverError::from)
            .with_context(|| format!("failed to open database {}", path.display()))?;
        Ok(Some(Self {
            conn: Mutex::new(conn),
        }))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("submission store lock poisoned"))
    }
}

#[async_trait]
impl SubmissionStore for SqliteStore {
    async fn save(&self, submission: &NewSubmission) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO submissions (reg_no, final_query, submitted_at) VALUES (?1, ?2, ?3)",
            params![
                submission.reg_no,
                submission.final_query,
                submission.submitted_at.to_rfc3339(),
            ],
        )
        .map_err(SolverError::from)?;
        let id = conn.last_insert_rowid();
        debug!(id, "submission row inserted");
        Ok(id)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Submission>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, reg_no, final_query, submitted_at FROM submissions
             ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map([i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, reg_no, final_query, submitted_at)| {
                let submitted_at = DateTime::parse_from_rfc3339(&submitted_at)
                    .with_context(|| format!("bad timestamp on submission {id}: {submitted_at}"))?
                    .with_timezone(&Utc);
                Ok(Submission {
                    id,
                    reg_no,
                    final_query,
                    submitted_at,
                })
            })
            .collect()
    }
}

fn utf8(path: &Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("database path is not UTF-8: {}", path.display()))
}
