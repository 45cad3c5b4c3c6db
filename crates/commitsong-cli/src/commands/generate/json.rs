//! JSON output mode for the generate command.

use anyhow::{Context, Result};
use commitsong_backend_midi::write_midi;
use commitsong_spec::GenerationError;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use super::{
    failure_exit_code, input_warnings, load, select, transcode, AudioOutcome, GenerateArgs,
};
use crate::audio::{Converter, OutputPlan, FFMPEG_ENV};
use crate::commands::json_output::{
    warning_codes, GenerateOutput, GenerateResult, GeneratedFile, JsonError, JsonWarning,
};

/// Run generate with machine-readable JSON output.
pub fn run_json(args: &GenerateArgs) -> Result<ExitCode> {
    let start = Instant::now();

    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => return fail(&e, Vec::new(), None, ExitCode::from(1)),
    };
    let plan = match OutputPlan::for_output(&config.output) {
        Ok(plan) => plan,
        Err(e) => {
            let e = GenerationError::from_backend(e);
            return fail(&e, Vec::new(), None, ExitCode::from(1));
        }
    };

    let loaded = match load(&config.source) {
        Ok(loaded) => loaded,
        Err(e) => return fail(&e, Vec::new(), None, failure_exit_code(&e)),
    };
    let source_hash = loaded.source_hash.clone();

    let total = loaded.commits.len();
    let (commits, selection) = match select(loaded.commits, config.limit, config.sample) {
        Ok(selected) => selected,
        Err(e) => return fail(&e, Vec::new(), source_hash, failure_exit_code(&e)),
    };

    let mut warnings = input_warnings(loaded.skipped, &commits, &config);

    let result = match write_midi(&commits, &config.generate, &plan.midi_path) {
        Ok(result) => result,
        Err(e) => {
            let e = GenerationError::from_backend(e);
            return fail(&e, warnings, source_hash, failure_exit_code(&e));
        }
    };

    let midi_file = GeneratedFile {
        kind: "midi".to_string(),
        format: "mid".to_string(),
        path: plan.midi_path.display().to_string(),
        hash: Some(result.hash.clone()),
    };

    let outputs = match transcode(&plan, &Converter::new()) {
        Ok(AudioOutcome::MidiOnly) => vec![midi_file],
        Ok(AudioOutcome::FfmpegMissing) => {
            warnings.push(JsonWarning::new(
                warning_codes::FFMPEG_MISSING,
                format!(
                    "ffmpeg not found (install it or set {}); kept MIDI file {}",
                    FFMPEG_ENV, midi_file.path
                ),
            ));
            vec![midi_file]
        }
        Ok(AudioOutcome::Converted { leftover }) => {
            let mut outputs = Vec::new();
            if let Some(e) = leftover {
                warnings.push(JsonWarning::new(
                    warning_codes::INTERMEDIATE_NOT_REMOVED,
                    format!("failed to remove temporary MIDI file {}: {}", midi_file.path, e),
                ));
                outputs.push(midi_file);
            }
            if let Some((audio_path, format)) = &plan.audio {
                outputs.push(GeneratedFile {
                    kind: "audio".to_string(),
                    format: format.to_string(),
                    path: audio_path.display().to_string(),
                    hash: file_hash(audio_path),
                });
            }
            outputs
        }
        Err(e) => return fail(&e, warnings, source_hash, failure_exit_code(&e)),
    };

    let run_result = GenerateResult {
        source: config.source.describe(),
        total_commits: total,
        rendered_commits: commits.len(),
        selection: selection.as_str().to_string(),
        mode: config.generate.mode.to_string(),
        smf_format: result.format,
        division: result.division,
        tracks: result.tracks,
        outputs,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    print_output(&GenerateOutput::success(run_result, warnings, source_hash))?;
    Ok(ExitCode::SUCCESS)
}

fn fail(
    err: &GenerationError,
    warnings: Vec<JsonWarning>,
    source_hash: Option<String>,
    code: ExitCode,
) -> Result<ExitCode> {
    let output = GenerateOutput::failure(vec![JsonError::from(err)], warnings, source_hash);
    print_output(&output)?;
    Ok(code)
}

fn print_output(output: &GenerateOutput) -> Result<()> {
    let json = serde_json::to_string_pretty(output).context("failed to serialize JSON output")?;
    println!("{}", json);
    Ok(())
}

fn file_hash(path: &Path) -> Option<String> {
    std::fs::read(path)
        .ok()
        .map(|bytes| blake3::hash(&bytes).to_hex().to_string())
}
