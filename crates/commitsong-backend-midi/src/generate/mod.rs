//! Main entry point for commit-to-MIDI generation.
//!
//! [`Generator`] plans one timeline per output track, builds the tracks and
//! wraps them in a [`MidiFile`]. [`generate_midi`] and [`write_midi`] run the
//! whole pipeline and report what was produced.

use std::path::Path;

use commitsong_spec::{BackendError, Commit, GenerateConfig, Mode};
use serde::Serialize;
use thiserror::Error;

use crate::smf::MidiFile;

mod generator;


pub use generator::{Generator, Timeline, RELEASE_VELOCITY};

/// Error type for MIDI generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No commits were supplied.
    #[error("no commits to render")]
    EmptyInput,

    /// The requested track layout is not recognised.
    #[error("unsupported mode '{mode}' (expected one of: single-track, per-author)")]
    UnsupportedMode {
        /// The mode name as given.
        mode: String,
    },

    /// IO error while writing the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError for GenerateError {
    fn code(&self) -> &'static str {
        match self {
            GenerateError::EmptyInput => "MIDI_001",
            GenerateError::UnsupportedMode { .. } => "MIDI_002",
            GenerateError::Io(_) => "MIDI_003",
        }
    }

    fn category(&self) -> &'static str {
        "midi"
    }
}

/// Resolve a mode name into a [`Mode`].
pub fn parse_mode(name: &str) -> Result<Mode, GenerateError> {
    name.parse().map_err(|_| GenerateError::UnsupportedMode {
        mode: name.to_string(),
    })
}

/// Description of one generated track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackSummary {
    /// Author for per-author tracks; absent for the single shared track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// MIDI channel used by every note in the track.
    pub channel: u8,
    /// Number of notes (one per commit).
    pub note_count: usize,
    /// Number of events including tempo and end-of-track.
    pub event_count: usize,
}

/// Result of generating a MIDI file.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    /// Complete file bytes.
    #[serde(skip)]
    pub data: Vec<u8>,
    /// BLAKE3 hash of `data`.
    pub hash: String,
    /// SMF format written in the header.
    pub format: u16,
    /// Ticks per quarter note.
    pub division: u16,
    /// Per-track details in output order.
    pub tracks: Vec<TrackSummary>,
}

impl GenerateResult {
    /// Total number of notes across every track.
    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|t| t.note_count).sum()
    }
}

/// Generate a complete MIDI file in memory.
///
/// # Example
/// ```
/// use commitsong_backend_midi::generate::generate_midi;
/// use commitsong_spec::{Commit, GenerateConfig};
///
/// let commits = vec![Commit::new("abc1234", 1_700_000_000, "Alice", "init")];
/// let result = generate_midi(&commits, &GenerateConfig::default()).unwrap();
/// assert_eq!(&result.data[0..4], b"MThd");
/// assert_eq!(result.tracks.len(), 1);
/// ```
pub fn generate_midi(
    commits: &[Commit],
    config: &GenerateConfig,
) -> Result<GenerateResult, GenerateError> {
    let (file, tracks) = render(commits, config)?;
    finish(file, tracks)
}

/// Generate a MIDI file and write it to `path`.
///
/// Nothing is created when `commits` is empty.
pub fn write_midi(
    commits: &[Commit],
    config: &GenerateConfig,
    path: impl AsRef<Path>,
) -> Result<GenerateResult, GenerateError> {
    let (file, tracks) = render(commits, config)?;
    file.write_file(path)?;
    finish(file, tracks)
}

fn finish(file: MidiFile, tracks: Vec<TrackSummary>) -> Result<GenerateResult, GenerateError> {
    let data = file.to_bytes()?;
    let hash = blake3::hash(&data).to_hex().to_string();

    Ok(GenerateResult {
        data,
        hash,
        format: file.format(),
        division: file.division(),
        tracks,
    })
}

fn render(
    commits: &[Commit],
    config: &GenerateConfig,
) -> Result<(MidiFile, Vec<TrackSummary>), GenerateError> {
    let generator = Generator::new(config.clone());
    let timelines = generator.plan(commits)?;
    let tracks = generator.build_tracks(&timelines);

    let summaries = timelines
        .iter()
        .zip(&tracks)
        .map(|(timeline, track)| TrackSummary {
            author: timeline.author.map(str::to_string),
            channel: timeline.channel,
            note_count: track.note_count(),
            event_count: track.event_count(),
        })
        .collect();

    Ok((generator.assemble(tracks), summaries))
}
