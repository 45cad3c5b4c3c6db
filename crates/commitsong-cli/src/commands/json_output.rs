//! JSON output types for machine-readable CLI output.
//!
//! With `--json`, the `generate` command prints exactly one
//! [`GenerateOutput`] document to stdout.

use commitsong_backend_midi::TrackSummary;
use commitsong_spec::GenerationError;
use serde::{Deserialize, Serialize};

/// Error codes for CLI-level failures.
///
/// Backend failures pass their own codes through (`MIDI_001`, `GIT_004`, ...).
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_002";
}

/// Warning codes for CLI operations.
pub mod warning_codes {
    /// ffmpeg was not found; the MIDI file was kept instead
    pub const FFMPEG_MISSING: &str = "CLI_W001";
    /// The intermediate MIDI file could not be removed after conversion
    pub const INTERMEDIATE_NOT_REMOVED: &str = "CLI_W002";
    /// Invalid commits were dropped from the input
    pub const COMMITS_SKIPPED: &str = "CLI_W003";
    /// Commit count is above the recommended maximum
    pub const LARGE_HISTORY: &str = "CLI_W004";
    /// More authors than MIDI channels
    pub const CHANNELS_SHARED: &str = "CLI_W005";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "MIDI_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Error category (e.g., "git", "config")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            category: None,
        }
    }

    /// Sets the category for this error.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl From<&GenerationError> for JsonError {
    fn from(err: &GenerationError) -> Self {
        JsonError::new(err.code, err.message.clone()).with_category(err.category)
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "CLI_W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
}

impl JsonWarning {
    /// Creates a new warning with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A file written by the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Output kind ("midi" or "audio")
    pub kind: String,
    /// File format (mid, mp3, ...)
    pub format: String,
    /// Output path
    pub path: String,
    /// BLAKE3 hash of the file, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Details of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    /// Repository path, URL or commits file
    pub source: String,
    /// Commits available before limiting or sampling
    pub total_commits: usize,
    /// Commits rendered
    pub rendered_commits: usize,
    /// How commits were chosen: "all", "limited" or "sampled"
    pub selection: String,
    /// Track layout
    pub mode: String,
    /// SMF format (0 or 1)
    pub smf_format: u16,
    /// Ticks per quarter note
    pub division: u16,
    /// Per-track details
    pub tracks: Vec<TrackSummary>,
    /// Files left on disk
    pub outputs: Vec<GeneratedFile>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// JSON output for the `generate` command.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    /// Whether generation succeeded
    pub success: bool,
    /// Errors encountered during generation
    pub errors: Vec<JsonError>,
    /// Warnings raised along the way
    pub warnings: Vec<JsonWarning>,
    /// Result details (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerateResult>,
    /// BLAKE3 hash of the commits file, when one was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

impl GenerateOutput {
    /// Creates a successful output.
    pub fn success(
        result: GenerateResult,
        warnings: Vec<JsonWarning>,
        source_hash: Option<String>,
    ) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            result: Some(result),
            source_hash,
        }
    }

    /// Creates a failed output.
    pub fn failure(
        errors: Vec<JsonError>,
        warnings: Vec<JsonWarning>,
        source_hash: Option<String>,
    ) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            result: None,
            source_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_error_from_generation_error() {
        let err = GenerationError::new("MIDI_001", "no commits to render", "midi");
        let json_err = JsonError::from(&err);
        assert_eq!(json_err.code, "MIDI_001");
        assert_eq!(json_err.category.as_deref(), Some("midi"));

        let json = serde_json::to_string(&json_err).unwrap();
        assert!(json.contains("\"code\":\"MIDI_001\""));
    }

    #[test]
    fn test_json_error_skips_missing_category() {
        let json = serde_json::to_string(&JsonError::new(error_codes::FILE_READ, "x")).unwrap();
        assert!(!json.contains("category"));
    }

    #[test]
    fn test_failure_output_shape() {
        let output = GenerateOutput::failure(
            vec![JsonError::new("GIT_004", "not a repository")],
            vec![JsonWarning::new(warning_codes::LARGE_HISTORY, "big")],
            None,
        );
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["errors"][0]["code"], "GIT_004");
        assert_eq!(value["warnings"][0]["code"], "CLI_W004");
        assert!(value.get("result").is_none());
        assert!(value.get("source_hash").is_none());
    }
}
