//! Git history reader.
//!
//! Commits are read by running `git log` against a local directory, or against
//! a temporary clone when the repository is given as a URL. The temporary
//! clone is removed when reading finishes, whether or not it succeeded.

use std::io;
use std::path::Path;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use commitsong_spec::{BackendError, Commit};
use thiserror::Error;

/// Format passed to `git log --pretty`: hash, unix time, author, subject.
pub const LOG_FORMAT: &str = "%H|%ct|%an|%s";

const FIELD_SEPARATOR: char = '|';
const URL_PREFIXES: [&str; 4] = ["http://", "https://", "git://", "ssh://"];

/// Errors from reading git history.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` executable could not be started.
    #[error("failed to run git: {0}")]
    Spawn(#[source] io::Error),

    /// A temporary directory for the clone could not be created.
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] io::Error),

    /// `git clone` exited unsuccessfully.
    #[error("failed to clone repository {url}: {stderr}")]
    CloneFailed { url: String, stderr: String },

    /// `git log` exited unsuccessfully.
    #[error("failed to read git log in {path}: {stderr}")]
    LogFailed { path: String, stderr: String },
}

impl BackendError for GitError {
    fn code(&self) -> &'static str {
        match self {
            GitError::Spawn(_) => "GIT_001",
            GitError::TempDir(_) => "GIT_002",
            GitError::CloneFailed { .. } => "GIT_003",
            GitError::LogFailed { .. } => "GIT_004",
        }
    }

    fn category(&self) -> &'static str {
        "git"
    }
}

/// True if `repo` should be cloned rather than read in place.
///
/// An existing directory is never treated as a URL, even if its name looks
/// like one.
pub fn is_git_url(repo: &str) -> bool {
    if Path::new(repo).is_dir() {
        return false;
    }

    let lower = repo.to_ascii_lowercase();
    URL_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) || repo.starts_with("git@")
}

/// Read the commit history of `repo`, oldest first.
pub fn read_log(repo: &str) -> Result<Vec<Commit>, GitError> {
    if is_git_url(repo) {
        let checkout = tempfile::Builder::new()
            .prefix("commitsong-")
            .tempdir()
            .map_err(GitError::TempDir)?;

        tracing::info!(url = repo, dir = %checkout.path().display(), "cloning repository");
        clone(repo, checkout.path())?;

        // `checkout` is dropped, and the clone deleted, on both return paths.
        let log = run_log(checkout.path())?;
        Ok(parse_log_output(&log))
    } else {
        let log = run_log(Path::new(repo))?;
        Ok(parse_log_output(&log))
    }
}

fn clone(url: &str, into: &Path) -> Result<(), GitError> {
    let output = Command::new("git")
        .arg("clone")
        .arg("--quiet")
        .arg(url)
        .arg(into)
        .output()
        .map_err(GitError::Spawn)?;

    if !output.status.success() {
        return Err(GitError::CloneFailed {
            url: url.to_string(),
            stderr: stderr_text(&output),
        });
    }
    Ok(())
}

fn run_log(path: &Path) -> Result<String, GitError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(path)
        .arg("log")
        .arg(format!("--pretty=format:{}", LOG_FORMAT))
        .output()
        .map_err(GitError::Spawn)?;

    if !output.status.success() {
        return Err(GitError::LogFailed {
            path: path.display().to_string(),
            stderr: stderr_text(&output),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn stderr_text(output: &Output) -> String {
    let text = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if text.is_empty() {
        format!("git exited with {}", output.status)
    } else {
        text
    }
}

/// Parse `git log` output in [`LOG_FORMAT`] into commits, oldest first.
///
/// Malformed lines and invalid commits are skipped. A timestamp that does not
/// parse is replaced with the current time.
pub fn parse_log_output(text: &str) -> Vec<Commit> {
    parse_log_output_at(text, unix_now())
}

/// [`parse_log_output`] with an explicit fallback timestamp.
pub fn parse_log_output_at(text: &str, fallback_timestamp: i64) -> Vec<Commit> {
    let mut commits: Vec<Commit> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| parse_line(line, fallback_timestamp))
        .collect();

    // git log lists newest first
    commits.reverse();
    commits
}

fn parse_line(line: &str, fallback_timestamp: i64) -> Option<Commit> {
    let fields: Vec<&str> = line.splitn(4, FIELD_SEPARATOR).collect();
    let [hash, timestamp, author, message] = fields.as_slice() else {
        tracing::debug!(line, "skipping malformed log line");
        return None;
    };

    let timestamp = timestamp.trim().parse().unwrap_or(fallback_timestamp);
    let commit = Commit::new(*hash, timestamp, *author, *message);

    match commit.validate() {
        Ok(()) => Some(commit),
        Err(err) => {
            tracing::debug!(%err, "skipping invalid commit");
            None
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
