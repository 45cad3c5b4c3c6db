//! Error reporting shared across backends.

/// Trait for errors raised by generation backends and their collaborators.
///
/// Every implementor exposes a stable error code and a category so the CLI
/// can report failures uniformly in both human and JSON output.
///
/// # Example
///
/// ```
/// use commitsong_spec::BackendError;
///
/// fn handle_error<E: BackendError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting.
    ///
    /// Returns a static string like "MIDI_001" or "GIT_002". These codes are
    /// stable and can be matched programmatically.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category, e.g. "midi", "git", "audio", "config".
    fn category(&self) -> &'static str;
}

/// A type-erased error carrying the code, message and category of any
/// [`BackendError`].
#[derive(Debug)]
pub struct GenerationError {
    /// The error code (e.g., "MIDI_001").
    pub code: &'static str,
    /// The human-readable error message.
    pub message: String,
    /// The error category (e.g., "midi").
    pub category: &'static str,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl GenerationError {
    /// Create a `GenerationError` from any `BackendError` implementor.
    pub fn from_backend<E: BackendError + Send + Sync + 'static>(err: E) -> Self {
        Self {
            code: err.code(),
            message: err.message(),
            category: err.category(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a `GenerationError` with explicit values and no underlying cause.
    pub fn new(code: &'static str, message: impl Into<String>, category: &'static str) -> Self {
        Self {
            code,
            message: message.into(),
            category,
            source: None,
        }
    }
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[derive(Debug, thiserror::Error)]
    #[error("something broke")]
    struct Broken;

    impl BackendError for Broken {
        fn code(&self) -> &'static str {
            "TEST_001"
        }

        fn category(&self) -> &'static str {
            "test"
        }
    }

    #[test]
    fn test_from_backend_keeps_code_and_source() {
        let err = GenerationError::from_backend(Broken);
        assert_eq!(err.code, "TEST_001");
        assert_eq!(err.category, "test");
        assert_eq!(err.to_string(), "[TEST_001] something broke");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_new_has_no_source() {
        let err = GenerationError::new("CLI_001", "file missing", "cli");
        assert_eq!(err.to_string(), "[CLI_001] file missing");
        assert!(err.source().is_none());
    }
}
