//! Loading commit lists from JSON files.
//!
//! A commits file is a JSON array of commit objects, oldest first:
//!
//! ```json
//! [{ "hash": "abc1234", "timestamp": 1700000000, "author": "Alice", "message": "init" }]
//! ```

use std::path::{Path, PathBuf};

use commitsong_spec::{BackendError, Commit};

use crate::commands::json_output::error_codes;

/// Result of loading a commits file.
#[derive(Debug)]
pub struct LoadResult {
    /// Valid commits in file order.
    pub commits: Vec<Commit>,
    /// Entries dropped because they failed validation.
    pub skipped: usize,
    /// BLAKE3 hash of the file content (hex string).
    pub source_hash: String,
}

/// Errors from loading a commits file.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON parsing failed.
    JsonParse { message: String },
}

impl BackendError for InputError {
    fn code(&self) -> &'static str {
        match self {
            InputError::FileRead { .. } => error_codes::FILE_READ,
            InputError::JsonParse { .. } => error_codes::JSON_PARSE,
        }
    }

    fn category(&self) -> &'static str {
        "input"
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::JsonParse { message } => {
                write!(f, "failed to parse commits JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            InputError::JsonParse { .. } => None,
        }
    }
}

/// Load commits from a JSON file.
///
/// Entries that fail [`Commit::validate`] are dropped and counted in
/// [`LoadResult::skipped`].
pub fn load_commits(path: &Path) -> Result<LoadResult, InputError> {
    let content = std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let source_hash = blake3::hash(content.as_bytes()).to_hex().to_string();

    let parsed: Vec<Commit> =
        serde_json::from_str(&content).map_err(|e| InputError::JsonParse {
            message: e.to_string(),
        })?;

    let total = parsed.len();
    let commits: Vec<Commit> = parsed
        .into_iter()
        .filter(|commit| commit.validate().is_ok())
        .collect();

    Ok(LoadResult {
        skipped: total - commits.len(),
        commits,
        source_hash,
    })
}
