//! Commitsong MIDI Backend - Deterministic Standard MIDI File generation
//!
//! This crate turns an ordered list of commits into a Standard MIDI File.
//! Every commit becomes one note: the hash picks the pitch, the message length
//! picks the velocity and the commit's position picks the duration.
//!
//! # Determinism
//!
//! Output depends only on the commit list and [`GenerateConfig`]. There is no
//! randomness, clock or environment input, so identical inputs produce
//! byte-identical files. This holds with the `parallel` feature as well.
//!
//! # Example
//!
//! ```
//! use commitsong_backend_midi::generate_midi;
//! use commitsong_spec::{Commit, GenerateConfig, Mode};
//!
//! let commits = vec![
//!     Commit::new("abc1234", 1_700_000_000, "Alice", "init"),
//!     Commit::new("def5678", 1_700_000_100, "Bob", "add parser"),
//! ];
//!
//! let config = GenerateConfig::default().with_mode(Mode::PerAuthor);
//! let result = generate_midi(&commits, &config).unwrap();
//!
//! assert_eq!(result.tracks.len(), 2);
//! println!("Generated hash: {}", result.hash);
//! ```
//!
//! # Module Structure
//!
//! - [`vlq`]: variable-length quantity codec
//! - [`smf`]: events, tracks and the file writer
//! - [`mapping`]: pitch, velocity and rhythm mapping
//! - [`generate`]: main generation entry point
//!
//! [`GenerateConfig`]: commitsong_spec::GenerateConfig

pub mod generate;
pub mod mapping;
pub mod smf;
pub mod vlq;

// Re-export main types
pub use generate::{
    generate_midi, parse_mode, write_midi, GenerateError, GenerateResult, Generator, TrackSummary,
};
pub use smf::{MidiFile, Track};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend identifier.
pub const BACKEND_ID: &str = "commitsong-backend-midi";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_id() {
        assert_eq!(BACKEND_ID, "commitsong-backend-midi");
        assert!(!VERSION.is_empty());
    }
}
