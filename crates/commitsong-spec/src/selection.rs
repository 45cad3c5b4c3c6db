//! Trimming long commit histories before generation.
//!
//! Both functions preserve chronological order; they only decide which
//! commits survive.

use thiserror::Error;

use crate::commit::Commit;
use crate::error::BackendError;

/// Selection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("sample count must be positive")]
    ZeroSampleCount,
}

impl BackendError for SelectionError {
    fn code(&self) -> &'static str {
        match self {
            SelectionError::ZeroSampleCount => "SELECT_001",
        }
    }

    fn category(&self) -> &'static str {
        "selection"
    }
}

/// Keep the first `count` commits.
///
/// A `count` of zero means "no limit" and returns every commit.
pub fn limit_commits(commits: &[Commit], count: usize) -> &[Commit] {
    if count == 0 || count >= commits.len() {
        return commits;
    }
    &commits[..count]
}

/// Pick `count` commits spread evenly over the whole history.
///
/// Index `i` of the result is taken from `floor(i * len / count)` of the input,
/// so the first commit is always kept and the tail is thinned uniformly.
pub fn sample_commits(commits: &[Commit], count: usize) -> Result<Vec<Commit>, SelectionError> {
    if count == 0 {
        return Err(SelectionError::ZeroSampleCount);
    }
    if count >= commits.len() {
        return Ok(commits.to_vec());
    }

    let len = commits.len();
    Ok((0..count)
        .map(|i| i * len / count)
        .filter_map(|index| commits.get(index).cloned())
        .collect())
}
