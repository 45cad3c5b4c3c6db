//! commitsong CLI - Turn a repository's commit history into music
//!
//! This binary renders commits as notes in a Standard MIDI File and can hand
//! the result to ffmpeg for audio output.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use commitsong_cli::commands;
use commitsong_cli::commands::generate::GenerateArgs;
use commitsong_cli::config::{DEFAULT_OUTPUT_PATH, DEFAULT_REPO_PATH};

/// commitsong - Commit history sonification
#[derive(Parser)]
#[command(name = "commitsong")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log progress details to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render commit history to a MIDI (or audio) file
    Generate {
        /// Repository path or URL to read commits from
        #[arg(long, default_value = DEFAULT_REPO_PATH)]
        repo: String,

        /// JSON file holding commits, used instead of --repo
        #[arg(long)]
        commits: Option<String>,

        /// Output file; .mid/.midi writes MIDI, mp3/wav/ogg/flac/aac/m4a converts via ffmpeg
        #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
        out: String,

        /// Tempo in beats per minute
        #[arg(long, default_value_t = 140)]
        bpm: i32,

        /// Ticks per quarter note
        #[arg(long, default_value_t = 480)]
        ticks: u16,

        /// Base note duration in ticks
        #[arg(long, default_value_t = 120)]
        dur: u32,

        /// Maximum number of commits to render (0 for all)
        #[arg(long, default_value_t = 0)]
        limit: usize,

        /// Sample commits evenly across history instead of taking the first --limit
        #[arg(long)]
        sample: bool,

        /// Track layout: single-track or per-author
        #[arg(long, default_value = "single-track")]
        mode: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check system dependencies and configuration
    Doctor,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            repo,
            commits,
            out,
            bpm,
            ticks,
            dur,
            limit,
            sample,
            mode,
            json,
        } => {
            let args = GenerateArgs {
                repo,
                commits,
                out,
                bpm,
                ticks,
                dur,
                limit,
                sample,
                mode,
            };
            commands::generate::run(&args, json)
        }
        Commands::Doctor => commands::doctor::run(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_generate_defaults() {
        let cli = Cli::try_parse_from(["commitsong", "generate"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Generate {
                repo,
                commits,
                out,
                bpm,
                ticks,
                dur,
                limit,
                sample,
                mode,
                json,
            } => {
                assert_eq!(repo, ".");
                assert_eq!(commits, None);
                assert_eq!(out, "commits.mid");
                assert_eq!(bpm, 140);
                assert_eq!(ticks, 480);
                assert_eq!(dur, 120);
                assert_eq!(limit, 0);
                assert!(!sample);
                assert_eq!(mode, "single-track");
                assert!(!json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_generate_flags() {
        let cli = Cli::try_parse_from([
            "commitsong",
            "generate",
            "--repo",
            "https://github.com/example/project.git",
            "--out",
            "song.mp3",
            "--bpm",
            "90",
            "--limit",
            "200",
            "--sample",
            "--mode",
            "per-author",
            "--json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate {
                repo,
                out,
                bpm,
                limit,
                sample,
                mode,
                json,
                ..
            } => {
                assert_eq!(repo, "https://github.com/example/project.git");
                assert_eq!(out, "song.mp3");
                assert_eq!(bpm, 90);
                assert_eq!(limit, 200);
                assert!(sample);
                assert_eq!(mode, "per-author");
                assert!(json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_defaults_match_generate_args() {
        let cli = Cli::try_parse_from(["commitsong", "generate"]).unwrap();
        let Commands::Generate {
            repo,
            commits,
            out,
            bpm,
            ticks,
            dur,
            limit,
            sample,
            mode,
            ..
        } = cli.command
        else {
            panic!("expected generate command");
        };
        let parsed = GenerateArgs {
            repo,
            commits,
            out,
            bpm,
            ticks,
            dur,
            limit,
            sample,
            mode,
        };
        assert_eq!(parsed, GenerateArgs::default());
    }

    #[test]
    fn test_cli_parses_doctor() {
        let cli = Cli::try_parse_from(["commitsong", "doctor"]).unwrap();
        assert!(matches!(cli.command, Commands::Doctor));
    }

    #[test]
    fn test_cli_rejects_negative_ticks() {
        assert!(Cli::try_parse_from(["commitsong", "generate", "--ticks", "-1"]).is_err());
    }
}
