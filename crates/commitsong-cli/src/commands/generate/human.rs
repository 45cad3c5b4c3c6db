//! Human-readable (colored) output mode for the generate command.

use anyhow::Result;
use colored::Colorize;
use commitsong_backend_midi::write_midi;
use commitsong_spec::{GenerationError, Mode};
use std::process::ExitCode;
use std::time::Instant;

use super::{
    failure_exit_code, input_warnings, load, select, transcode, AudioOutcome, GenerateArgs,
    Selection,
};
use crate::audio::{Converter, OutputPlan, FFMPEG_ENV};
use crate::config::CommitSource;
use crate::git;

/// Run generate with human-readable (colored) output.
pub fn run_human(args: &GenerateArgs) -> Result<ExitCode> {
    let start = Instant::now();

    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => return Ok(report_failure("INVALID CONFIGURATION", &e, ExitCode::from(1))),
    };
    let plan = match OutputPlan::for_output(&config.output) {
        Ok(plan) => plan,
        Err(e) => {
            let e = GenerationError::from_backend(e);
            return Ok(report_failure("INVALID CONFIGURATION", &e, ExitCode::from(1)));
        }
    };

    println!(
        "{} {}",
        "Reading commits from:".cyan().bold(),
        config.source.describe()
    );
    if let CommitSource::Repository(repo) = &config.source {
        if git::is_git_url(repo) {
            println!("{} {}", "Cloning repository:".dimmed(), repo);
        }
    }

    let loaded = match load(&config.source) {
        Ok(loaded) => loaded,
        Err(e) => return Ok(report_failure("FAILED", &e, failure_exit_code(&e))),
    };
    if let Some(hash) = &loaded.source_hash {
        println!("{} {}", "Source hash:".dimmed(), &hash[..16]);
    }

    let total = loaded.commits.len();
    let (commits, selection) = match select(loaded.commits, config.limit, config.sample) {
        Ok(selected) => selected,
        Err(e) => return Ok(report_failure("FAILED", &e, failure_exit_code(&e))),
    };

    match selection {
        Selection::All => println!("Found {} commits", total.to_string().bold()),
        Selection::Limited => println!(
            "Limited to first {} commits from {} total",
            commits.len().to_string().bold(),
            total
        ),
        Selection::Sampled => println!(
            "Sampled {} commits from {} total",
            commits.len().to_string().bold(),
            total
        ),
    }

    for warning in input_warnings(loaded.skipped, &commits, &config) {
        println!("  {} {}", "!".yellow(), warning.message);
    }

    println!(
        "{} {}",
        "Generating MIDI composition:".cyan().bold(),
        config.generate.mode
    );
    println!(
        "{} {}",
        "Writing MIDI file to:".cyan().bold(),
        plan.midi_path.display()
    );

    let result = match write_midi(&commits, &config.generate, &plan.midi_path) {
        Ok(result) => result,
        Err(e) => {
            let e = GenerationError::from_backend(e);
            return Ok(report_failure("GENERATION FAILED", &e, failure_exit_code(&e)));
        }
    };

    for track in &result.tracks {
        let label = match (&track.author, config.generate.mode) {
            (Some(author), Mode::PerAuthor) => author.clone(),
            _ => "all commits".to_string(),
        };
        println!(
            "  {} ch {:>2}  {:>5} notes  {}",
            "->".green(),
            track.channel,
            track.note_count,
            label
        );
    }

    if let Some((_, format)) = &plan.audio {
        println!("{} {}", "Converting to:".cyan().bold(), format);
    }

    let outcome = match transcode(&plan, &Converter::new()) {
        Ok(outcome) => outcome,
        Err(e) => return Ok(report_failure("CONVERSION FAILED", &e, failure_exit_code(&e))),
    };

    let elapsed = start.elapsed().as_millis();
    match outcome {
        AudioOutcome::MidiOnly => {
            println!(
                "\n{} Generated MIDI file with {} track(s) in {}ms",
                "SUCCESS".green().bold(),
                result.tracks.len(),
                elapsed
            );
        }
        AudioOutcome::FfmpegMissing => {
            eprintln!(
                "{} ffmpeg not found. Audio conversion skipped.",
                "warning:".yellow().bold()
            );
            eprintln!(
                "{}",
                format!(
                    "Install ffmpeg or set {} to convert MIDI to audio formats.",
                    FFMPEG_ENV
                )
                .dimmed()
            );
            println!(
                "\n{} MIDI file saved as: {}",
                "SUCCESS".green().bold(),
                plan.midi_path.display()
            );
        }
        AudioOutcome::Converted { leftover } => {
            if let Some(e) = leftover {
                eprintln!(
                    "{} failed to remove temporary MIDI file {}: {}",
                    "warning:".yellow().bold(),
                    plan.midi_path.display(),
                    e
                );
            }
            println!(
                "\n{} Generated audio file: {} in {}ms",
                "SUCCESS".green().bold(),
                config.output.display(),
                elapsed
            );
        }
    }
    println!("{} {}", "MIDI hash:".dimmed(), result.hash);

    Ok(ExitCode::SUCCESS)
}

fn report_failure(label: &str, err: &GenerationError, code: ExitCode) -> ExitCode {
    println!("\n{} {}", label.red().bold(), err);
    code
}
