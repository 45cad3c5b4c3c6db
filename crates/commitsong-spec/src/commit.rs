//! Commit records consumed by the generator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest hash accepted as a commit identity (an abbreviated git hash).
pub const MIN_HASH_LEN: usize = 7;

/// A single commit from version-control history.
///
/// Commits are read once and never mutated. Sequences of commits are ordered
/// chronologically, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash, the identity key.
    pub hash: String,
    /// Commit time in Unix seconds.
    pub timestamp: i64,
    /// Author name.
    pub author: String,
    /// Subject line of the commit message.
    pub message: String,
}

/// Reasons a commit record is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("commit hash cannot be empty")]
    EmptyHash,
    #[error("commit hash too short: {hash}")]
    HashTooShort { hash: String },
}

impl Commit {
    /// Create a new commit record.
    pub fn new(
        hash: impl Into<String>,
        timestamp: i64,
        author: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            timestamp,
            author: author.into(),
            message: message.into(),
        }
    }

    /// Check the hash is present and at least [`MIN_HASH_LEN`] characters.
    pub fn validate(&self) -> Result<(), CommitError> {
        if self.hash.is_empty() {
            return Err(CommitError::EmptyHash);
        }
        if self.hash.chars().count() < MIN_HASH_LEN {
            return Err(CommitError::HashTooShort {
                hash: self.hash.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_short_hash() {
        let commit = Commit::new("abc1234", 0, "Alice", "init");
        assert!(commit.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_hash() {
        let commit = Commit::new("", 0, "Alice", "init");
        assert_eq!(commit.validate(), Err(CommitError::EmptyHash));
    }

    #[test]
    fn test_validate_rejects_too_short_hash() {
        let commit = Commit::new("abc12", 0, "Alice", "init");
        let err = commit.validate().unwrap_err();
        assert!(err.to_string().contains("abc12"));
    }

    #[test]
    fn test_json_shape() {
        let commit = Commit::new("abc1234", 1_700_000_000, "Alice", "init");
        let json = serde_json::to_value(&commit).unwrap();
        assert_eq!(json["hash"], "abc1234");
        assert_eq!(json["timestamp"], 1_700_000_000i64);
        assert_eq!(json["author"], "Alice");
    }
}
