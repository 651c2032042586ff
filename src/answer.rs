//! Loads the prepared SQL answer for a question.
//!
//! Answers under `sql/` are compiled into the binary, so a default run does
//! not depend on the working directory. `--sql-dir` reads from disk instead.

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::consts::DEFAULT_SQL_DIR;
use crate::error::SolverError;

/// Answer files baked into the binary, keyed by question number.
const BUNDLED: &[(u32, &str)] = &[(42, include_str!("../sql/question42.sql"))];

/// Question numbers with a bundled answer.
pub fn bundled_questions() -> Vec<u32> {
    BUNDLED.iter().map(|(n, _)| *n).collect()
}

/// Reads `question{n}.sql` answers from the bundled set or one directory.
#[derive(Debug, Clone)]
pub enum AnswerLoader {
    Bundled,
    Dir(PathBuf),
}

impl AnswerLoader {
    /// `dir` when one is configured, the bundled answers otherwise.
    pub fn new(dir: Option<PathBuf>) -> Self {
        match dir {
            Some(dir) => AnswerLoader::Dir(dir),
            None => AnswerLoader::Bundled,
        }
    }

    pub fn path_for(&self, question_number: u32) -> PathBuf {
        let file = format!("question{question_number}.sql");
        match self {
            AnswerLoader::Bundled => PathBuf::from(DEFAULT_SQL_DIR).join(file),
            AnswerLoader::Dir(dir) => dir.join(file),
        }
    }

    /// Contents of the answer file with surrounding whitespace trimmed.
    pub fn load(&self, question_number: u32) -> Result<String> {
        let path = self.path_for(question_number);
        let raw = match self {
            AnswerLoader::Bundled => BUNDLED
                .iter()
                .find(|(n, _)| *n == question_number)
                .map(|(_, text)| text.to_string())
                .ok_or_else(|| SolverError::AnswerUnavailable {
                    path: path.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })?,
            AnswerLoader::Dir(_) => {
                std::fs::read_to_string(&path).map_err(|source| {
                    SolverError::AnswerUnavailable {
                        path: path.clone(),
                        source,
                    }
                })?
            }
        };
        debug!(path = %path.display(), bytes = raw.len(), "loaded answer file");
        Ok(raw.trim().to_string())
    }
}
