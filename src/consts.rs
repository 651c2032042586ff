//! Project-wide constants.

use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory holding `question{n}.sql` answer files when none is configured.
pub const DEFAULT_SQL_DIR: &str = "sql";

/// Number of rows `history` prints when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// File name used for the submissions database.
pub const DB_FILE_NAME: &str = "submissions.db";

/// Default database path: `~/.webhook-solver/submissions.db`.
/// Falls back to the working directory when no home directory is known.
pub fn default_db_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".webhook-solver").join(DB_FILE_NAME),
        None => PathBuf::from(DB_FILE_NAME),
    }
}

/// First line of a (possibly multi-line) text, cut to `max_chars`.
pub fn preview(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > max_chars {
        line.chars().take(max_chars).collect::<String>() + "..."
    } else {
        line.to_string()
    }
}
