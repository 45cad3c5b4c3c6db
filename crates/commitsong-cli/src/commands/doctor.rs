//! Doctor command implementation
//!
//! Checks the external tools generation depends on.

use anyhow::Result;
use colored::Colorize;
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use crate::audio::{Converter, FFMPEG_ENV};

/// Run the doctor command
///
/// Checks:
/// - git installation (required for reading repositories)
/// - ffmpeg installation (optional, audio output only)
/// - Output directory permissions
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run() -> Result<ExitCode> {
    println!("{}", "commitsong doctor".cyan().bold());
    println!("{}", "=================".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} commitsong v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "  {} commitsong-backend-midi v{}",
        "->".green(),
        commitsong_backend_midi::VERSION
    );
    println!();

    println!("{}", "Dependencies:".bold());
    match check_tool("git", "--version", parse_git_version) {
        ToolStatus::Found(path, version) => {
            println!(
                "  {} git {} ({})",
                "ok".green(),
                version,
                path.display()
            );
        }
        ToolStatus::NotFound => {
            println!("  {} git not found in PATH", "!!".red());
            println!(
                "     {}",
                "git is required to read commit history from repositories.".dimmed()
            );
            all_ok = false;
        }
        ToolStatus::Error(e) => {
            println!("  {} git check failed: {}", "!!".red(), e);
            all_ok = false;
        }
    }

    match Converter::new().find_ffmpeg() {
        Ok(path) => match tool_version(&path, "-version", parse_ffmpeg_version) {
            Ok(version) => {
                println!("  {} ffmpeg {} ({})", "ok".green(), version, path.display());
            }
            Err(e) => {
                println!("  {} ffmpeg check failed: {}", "!!".yellow(), e);
            }
        },
        Err(_) => {
            // Only audio output needs ffmpeg.
            println!("  {} ffmpeg not found", "!!".yellow());
            println!(
                "     {}",
                format!(
                    "Audio output needs ffmpeg in PATH or {} set; MIDI output works without it.",
                    FFMPEG_ENV
                )
                .dimmed()
            );
        }
    }

    println!();

    println!("{}", "Permissions:".bold());
    match env::current_dir() {
        Ok(dir) => {
            let test_file = dir.join(".commitsong_write_test");
            match std::fs::write(&test_file, "test") {
                Ok(_) => {
                    let _ = std::fs::remove_file(&test_file);
                    println!(
                        "  {} Current directory is writable ({})",
                        "ok".green(),
                        dir.display()
                    );
                }
                Err(e) => {
                    println!("  {} Cannot write to current directory: {}", "!!".red(), e);
                    all_ok = false;
                }
            }
        }
        Err(e) => {
            println!("  {} Cannot determine current directory: {}", "!!".red(), e);
            all_ok = false;
        }
    }

    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}

/// Status of an external tool lookup
enum ToolStatus {
    Found(PathBuf, String),
    NotFound,
    Error(String),
}

fn check_tool(name: &str, flag: &str, parse: fn(&str) -> Option<String>) -> ToolStatus {
    let Ok(path) = which::which(name) else {
        return ToolStatus::NotFound;
    };
    match tool_version(&path, flag, parse) {
        Ok(version) => ToolStatus::Found(path, version),
        Err(e) => ToolStatus::Error(e),
    }
}

fn tool_version(
    path: &Path,
    flag: &str,
    parse: fn(&str) -> Option<String>,
) -> Result<String, String> {
    let output = Command::new(path)
        .arg(flag)
        .output()
        .map_err(|e| e.to_string())?;

    if !output.status.success() {
        return Err(format!("exited with status: {}", output.status));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse(&stdout).unwrap_or_else(|| "unknown".to_string()))
}

fn parse_git_version(output: &str) -> Option<String> {
    // "git version 2.43.0"
    output
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("git version "))
        .and_then(|v| v.split_whitespace().next())
        .map(|v| v.to_string())
}

fn parse_ffmpeg_version(output: &str) -> Option<String> {
    // "ffmpeg version 6.1.1-3ubuntu5 Copyright (c) ..."
    output
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("ffmpeg version "))
        .and_then(|v| v.split_whitespace().next())
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_git_version() {
        assert_eq!(
            parse_git_version("git version 2.43.0\n").as_deref(),
            Some("2.43.0")
        );
        assert_eq!(
            parse_git_version("git version 2.39.3 (Apple Git-146)\n").as_deref(),
            Some("2.39.3")
        );
        assert_eq!(parse_git_version("usage: git\n"), None);
    }

    #[test]
    fn test_parse_ffmpeg_version() {
        let out = "ffmpeg version 6.1.1-3ubuntu5 Copyright (c) 2000-2023 the FFmpeg developers\n";
        assert_eq!(parse_ffmpeg_version(out).as_deref(), Some("6.1.1-3ubuntu5"));
        assert_eq!(parse_ffmpeg_version(""), None);
    }
}
