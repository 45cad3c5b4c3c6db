//! commitsong input contract
//!
//! This crate holds the types shared by the MIDI backend and the CLI: the
//! commit records that drive generation, the generation configuration, and the
//! upstream selection stage that trims long histories before they are encoded.
//!
//! # Overview
//!
//! - **Commits**: immutable `hash / timestamp / author / message` records,
//!   ordered oldest first by the caller
//! - **Config**: tempo, resolution, base note length and track layout mode
//! - **Selection**: truncation or even sampling of a commit sequence
//!
//! # Example
//!
//! ```
//! use commitsong_spec::{sample_commits, Commit, GenerateConfig, Mode};
//!
//! let commits: Vec<Commit> = (0..10)
//!     .map(|i| Commit::new(format!("{:07x}", i), i, "Alice", "tweak"))
//!     .collect();
//!
//! let picked = sample_commits(&commits, 5).unwrap();
//! assert_eq!(picked.len(), 5);
//!
//! let config = GenerateConfig::default().with_mode(Mode::PerAuthor);
//! assert!(config.validate().is_ok());
//! ```
//!
//! # Modules
//!
//! - [`commit`]: Commit record type and validation
//! - [`config`]: Generation config, mode parsing and bounds
//! - [`error`]: Backend error trait and type-erased wrapper
//! - [`selection`]: Commit limiting and sampling

pub mod commit;
pub mod config;
pub mod error;
pub mod selection;

pub use commit::{Commit, CommitError, MIN_HASH_LEN};
pub use config::{
    ConfigError, GenerateConfig, Mode, DEFAULT_BPM, DEFAULT_DURATION, DEFAULT_TICKS, MAX_BPM,
    MAX_DURATION, MAX_TICKS, MIN_BPM, MIN_DURATION, MIN_TICKS, RECOMMENDED_MAX_COMMITS,
};
pub use error::{BackendError, GenerationError};
pub use selection::{limit_commits, sample_commits, SelectionError};

/// Crate version for report provenance.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
