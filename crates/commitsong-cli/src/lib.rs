//! commitsong CLI library.
//!
//! This crate provides the pieces behind the `commitsong` binary: reading
//! commit history from git or a JSON file, the `generate` and `doctor`
//! commands, and ffmpeg-driven audio conversion of the rendered MIDI file.

pub mod audio;
pub mod commands;
pub mod config;
pub mod git;
pub mod input;
