//! Run configuration for the `generate` command.

use std::path::PathBuf;

use commitsong_spec::{ConfigError, GenerateConfig};

/// Default repository: the current directory.
pub const DEFAULT_REPO_PATH: &str = ".";

/// Default output file.
pub const DEFAULT_OUTPUT_PATH: &str = "commits.mid";

/// Where commits are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitSource {
    /// A local repository path or a clonable URL.
    Repository(String),
    /// A JSON file holding a commit array.
    File(PathBuf),
}

impl CommitSource {
    /// Human-readable location for progress output.
    pub fn describe(&self) -> String {
        match self {
            CommitSource::Repository(repo) => repo.clone(),
            CommitSource::File(path) => path.display().to_string(),
        }
    }
}

/// Everything one `generate` run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Commit source.
    pub source: CommitSource,
    /// Output path; its extension selects MIDI or audio output.
    pub output: PathBuf,
    /// Maximum commits to render, 0 for all.
    pub limit: usize,
    /// Spread the `limit` commits evenly over history instead of taking the first ones.
    pub sample: bool,
    /// Musical parameters.
    pub generate: GenerateConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source: CommitSource::Repository(DEFAULT_REPO_PATH.to_string()),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            limit: 0,
            sample: false,
            generate: GenerateConfig::default(),
        }
    }
}

impl RunConfig {
    /// Check paths are present and musical parameters are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.source {
            CommitSource::Repository(repo) if repo.trim().is_empty() => {
                return Err(ConfigError::EmptyPath {
                    field: "repository path",
                });
            }
            CommitSource::File(path) if path.as_os_str().is_empty() => {
                return Err(ConfigError::EmptyPath {
                    field: "commits file path",
                });
            }
            _ => {}
        }

        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath {
                field: "output path",
            });
        }

        self.generate.validate()
    }
}
