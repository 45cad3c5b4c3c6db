//! Generate command implementation
//!
//! Reads commit history, renders it to MIDI and optionally transcodes the
//! result to an audio format. The human and JSON output modes share the
//! steps defined here and differ only in how they report them.

mod human;
mod json;


use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use commitsong_backend_midi::{parse_mode, GenerateError};
use commitsong_spec::{
    limit_commits, sample_commits, Commit, GenerateConfig, GenerationError, Mode,
    DEFAULT_BPM, DEFAULT_DURATION, DEFAULT_TICKS, RECOMMENDED_MAX_COMMITS,
};

use crate::audio::{Converter, OutputPlan};
use crate::commands::json_output::{warning_codes, JsonWarning};
use crate::config::{CommitSource, RunConfig, DEFAULT_OUTPUT_PATH, DEFAULT_REPO_PATH};
use crate::git;
use crate::input::load_commits;

/// Number of distinct MIDI channels.
const MIDI_CHANNELS: usize = 16;

/// Raw `generate` arguments as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Repository path or URL
    pub repo: String,
    /// Optional commits JSON file, used instead of `repo`
    pub commits: Option<String>,
    /// Output file path
    pub out: String,
    /// Tempo in BPM
    pub bpm: i32,
    /// Ticks per quarter note
    pub ticks: u16,
    /// Base note duration in ticks
    pub dur: u32,
    /// Maximum commits, 0 for all
    pub limit: usize,
    /// Sample evenly instead of truncating
    pub sample: bool,
    /// Mode name
    pub mode: String,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            repo: DEFAULT_REPO_PATH.to_string(),
            commits: None,
            out: DEFAULT_OUTPUT_PATH.to_string(),
            bpm: DEFAULT_BPM,
            ticks: DEFAULT_TICKS,
            dur: DEFAULT_DURATION,
            limit: 0,
            sample: false,
            mode: Mode::SingleTrack.as_str().to_string(),
        }
    }
}

impl GenerateArgs {
    /// Parse the mode and build a validated [`RunConfig`].
    pub fn resolve(&self) -> Result<RunConfig, GenerationError> {
        let mode = parse_mode(&self.mode).map_err(GenerationError::from_backend)?;

        let source = match &self.commits {
            Some(path) => CommitSource::File(PathBuf::from(path)),
            None => CommitSource::Repository(self.repo.clone()),
        };

        let config = RunConfig {
            source,
            output: PathBuf::from(&self.out),
            limit: self.limit,
            sample: self.sample,
            generate: GenerateConfig {
                bpm: self.bpm,
                ticks_per_quarter: self.ticks,
                base_duration: self.dur,
                mode,
            },
        };

        config.validate().map_err(GenerationError::from_backend)?;
        Ok(config)
    }
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 success, 1 input or configuration error, 2 generation or I/O error
pub fn run(args: &GenerateArgs, json_output: bool) -> Result<ExitCode> {
    if json_output {
        json::run_json(args)
    } else {
        human::run_human(args)
    }
}

/// Commits loaded from the configured source.
#[derive(Debug)]
pub(crate) struct LoadedCommits {
    pub commits: Vec<Commit>,
    /// Invalid entries dropped from a commits file.
    pub skipped: usize,
    /// Hash of the commits file, if one was read.
    pub source_hash: Option<String>,
}

/// How the rendered commits were chosen from the loaded ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selection {
    All,
    Limited,
    Sampled,
}

impl Selection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Selection::All => "all",
            Selection::Limited => "limited",
            Selection::Sampled => "sampled",
        }
    }
}

/// What happened after the MIDI file was written.
#[derive(Debug)]
pub(crate) enum AudioOutcome {
    /// Output was MIDI; nothing to transcode.
    MidiOnly,
    /// ffmpeg could not be found; the MIDI file was kept.
    FfmpegMissing,
    /// Audio written; carries the error if the intermediate MIDI file survived.
    Converted {
        leftover: Option<std::io::Error>,
    },
}

pub(crate) fn load(source: &CommitSource) -> Result<LoadedCommits, GenerationError> {
    match source {
        CommitSource::Repository(repo) => {
            let commits = git::read_log(repo).map_err(GenerationError::from_backend)?;
            Ok(LoadedCommits {
                commits,
                skipped: 0,
                source_hash: None,
            })
        }
        CommitSource::File(path) => {
            let loaded = load_commits(path).map_err(GenerationError::from_backend)?;
            Ok(LoadedCommits {
                commits: loaded.commits,
                skipped: loaded.skipped,
                source_hash: Some(loaded.source_hash),
            })
        }
    }
}

/// Apply `limit` and `sample` to a non-empty commit list.
pub(crate) fn select(
    commits: Vec<Commit>,
    limit: usize,
    sample: bool,
) -> Result<(Vec<Commit>, Selection), GenerationError> {
    if commits.is_empty() {
        return Err(GenerationError::from_backend(GenerateError::EmptyInput));
    }

    if limit == 0 || commits.len() <= limit {
        return Ok((commits, Selection::All));
    }

    if sample {
        let sampled = sample_commits(&commits, limit).map_err(GenerationError::from_backend)?;
        Ok((sampled, Selection::Sampled))
    } else {
        Ok((limit_commits(&commits, limit).to_vec(), Selection::Limited))
    }
}

/// Warnings about the input that do not stop generation.
pub(crate) fn input_warnings(
    loaded_skipped: usize,
    selected: &[Commit],
    config: &RunConfig,
) -> Vec<JsonWarning> {
    let mut warnings = Vec::new();

    if loaded_skipped > 0 {
        warnings.push(JsonWarning::new(
            warning_codes::COMMITS_SKIPPED,
            format!("skipped {} invalid commit(s)", loaded_skipped),
        ));
    }

    if selected.len() > RECOMMENDED_MAX_COMMITS {
        warnings.push(JsonWarning::new(
            warning_codes::LARGE_HISTORY,
            format!(
                "rendering {} commits; consider --limit {} to keep the file small",
                selected.len(),
                RECOMMENDED_MAX_COMMITS
            ),
        ));
    }

    if config.generate.mode == Mode::PerAuthor {
        let authors: BTreeSet<&str> = selected.iter().map(|c| c.author.as_str()).collect();
        if authors.len() > MIDI_CHANNELS {
            warnings.push(JsonWarning::new(
                warning_codes::CHANNELS_SHARED,
                format!(
                    "{} authors but only {} MIDI channels; authors past the 16th share channel 15",
                    authors.len(),
                    MIDI_CHANNELS
                ),
            ));
        }
    }

    warnings
}

/// Transcode the MIDI file when the output plan asks for audio.
pub(crate) fn transcode(
    plan: &OutputPlan,
    converter: &Converter,
) -> Result<AudioOutcome, GenerationError> {
    let Some((audio_path, format)) = &plan.audio else {
        return Ok(AudioOutcome::MidiOnly);
    };

    if !converter.is_available() {
        return Ok(AudioOutcome::FfmpegMissing);
    }

    converter
        .convert(&plan.midi_path, audio_path, *format)
        .map_err(GenerationError::from_backend)?;

    let leftover = std::fs::remove_file(&plan.midi_path).err();
    Ok(AudioOutcome::Converted { leftover })
}

/// Exit code for a failed run.
pub(crate) fn failure_exit_code(err: &GenerationError) -> ExitCode {
    match (err.category, err.code) {
        ("audio", _) | ("midi", "MIDI_003") => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}
