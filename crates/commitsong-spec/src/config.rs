//! Generation configuration and its bounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::BackendError;

/// Default tempo in beats per minute.
pub const DEFAULT_BPM: i32 = 140;
/// Default ticks per quarter note.
pub const DEFAULT_TICKS: u16 = 480;
/// Default note duration in ticks.
pub const DEFAULT_DURATION: u32 = 120;

/// Minimum accepted BPM.
pub const MIN_BPM: i32 = 20;
/// Maximum accepted BPM.
pub const MAX_BPM: i32 = 300;
/// Minimum accepted ticks per quarter note.
pub const MIN_TICKS: u16 = 96;
/// Maximum accepted ticks per quarter note.
pub const MAX_TICKS: u16 = 960;
/// Minimum accepted note duration in ticks.
pub const MIN_DURATION: u32 = 1;
/// Maximum accepted note duration in ticks.
pub const MAX_DURATION: u32 = 4800;

/// Commit count above which output files get unwieldy.
pub const RECOMMENDED_MAX_COMMITS: usize = 2000;

/// Track layout for a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Every commit on one track, channel 0.
    #[default]
    SingleTrack,
    /// One track per author, channels assigned in sorted author order.
    PerAuthor,
}

impl Mode {
    /// Returns the CLI name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::SingleTrack => "single-track",
            Mode::PerAuthor => "per-author",
        }
    }

    /// SMF header format selector for this mode (0 or 1).
    pub fn smf_format(&self) -> u16 {
        match self {
            Mode::SingleTrack => 0,
            Mode::PerAuthor => 1,
        }
    }

    /// All modes, in CLI help order.
    pub fn all() -> &'static [Mode] {
        &[Mode::SingleTrack, Mode::PerAuthor]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single-track" => Ok(Mode::SingleTrack),
            "per-author" => Ok(Mode::PerAuthor),
            other => Err(ConfigError::UnsupportedMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("BPM must be between {} and {}, got {value}", MIN_BPM, MAX_BPM)]
    BpmOutOfRange { value: i32 },

    #[error("ticks must be between {} and {}, got {value}", MIN_TICKS, MAX_TICKS)]
    TicksOutOfRange { value: u16 },

    #[error("duration must be between {} and {}, got {value}", MIN_DURATION, MAX_DURATION)]
    DurationOutOfRange { value: u32 },

    #[error("invalid mode: {mode} (must be 'single-track' or 'per-author')")]
    UnsupportedMode { mode: String },

    #[error("{field} cannot be empty")]
    EmptyPath { field: &'static str },
}

impl BackendError for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            ConfigError::BpmOutOfRange { .. } => "CONFIG_001",
            ConfigError::TicksOutOfRange { .. } => "CONFIG_002",
            ConfigError::DurationOutOfRange { .. } => "CONFIG_003",
            ConfigError::UnsupportedMode { .. } => "CONFIG_004",
            ConfigError::EmptyPath { .. } => "CONFIG_005",
        }
    }

    fn category(&self) -> &'static str {
        "config"
    }
}

/// Musical parameters for a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct GenerateConfig {
    /// Tempo in beats per minute. Values <= 0 play at 120.
    pub bpm: i32,
    /// Ticks per quarter note, written as the file division.
    pub ticks_per_quarter: u16,
    /// Base note duration in ticks.
    pub base_duration: u32,
    /// Track layout.
    pub mode: Mode,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            ticks_per_quarter: DEFAULT_TICKS,
            base_duration: DEFAULT_DURATION,
            mode: Mode::SingleTrack,
        }
    }
}

impl GenerateConfig {
    /// Sets the tempo.
    pub fn with_bpm(mut self, bpm: i32) -> Self {
        self.bpm = bpm;
        self
    }

    /// Sets the ticks per quarter note.
    pub fn with_ticks(mut self, ticks: u16) -> Self {
        self.ticks_per_quarter = ticks;
        self
    }

    /// Sets the base note duration.
    pub fn with_duration(mut self, duration: u32) -> Self {
        self.base_duration = duration;
        self
    }

    /// Sets the track layout mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Check every field against the accepted CLI bounds.
    ///
    /// The generator itself accepts any values; this is the gate applied to
    /// user-supplied configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BPM..=MAX_BPM).contains(&self.bpm) {
            return Err(ConfigError::BpmOutOfRange { value: self.bpm });
        }
        if !(MIN_TICKS..=MAX_TICKS).contains(&self.ticks_per_quarter) {
            return Err(ConfigError::TicksOutOfRange {
                value: self.ticks_per_quarter,
            });
        }
        if !(MIN_DURATION..=MAX_DURATION).contains(&self.base_duration) {
            return Err(ConfigError::DurationOutOfRange {
                value: self.base_duration,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_valid() {
        let config = GenerateConfig::default();
        assert_eq!(config.bpm, 140);
        assert_eq!(config.ticks_per_quarter, 480);
        assert_eq!(config.base_duration, 120);
        assert_eq!(config.mode, Mode::SingleTrack);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mode_round_trips_through_names() {
        for mode in Mode::all() {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), *mode);
        }
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = "per-track".parse::<Mode>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedMode {
                mode: "per-track".to_string()
            }
        );
        assert_eq!(err.code(), "CONFIG_004");
    }

    #[test]
    fn test_smf_format() {
        assert_eq!(Mode::SingleTrack.smf_format(), 0);
        assert_eq!(Mode::PerAuthor.smf_format(), 1);
    }

    #[test]
    fn test_bounds() {
        let base = GenerateConfig::default();
        assert!(base.clone().with_bpm(20).validate().is_ok());
        assert!(base.clone().with_bpm(300).validate().is_ok());
        assert_eq!(
            base.clone().with_bpm(19).validate(),
            Err(ConfigError::BpmOutOfRange { value: 19 })
        );
        assert_eq!(
            base.clone().with_ticks(961).validate(),
            Err(ConfigError::TicksOutOfRange { value: 961 })
        );
        assert_eq!(
            base.clone().with_duration(0).validate(),
            Err(ConfigError::DurationOutOfRange { value: 0 })
        );
        assert!(base.with_duration(4800).validate().is_ok());
    }

    #[test]
    fn test_json_uses_kebab_mode_names() {
        let config = GenerateConfig::default().with_mode(Mode::PerAuthor);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"per-author\""));
        let back: GenerateConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_json_rejects_unknown_mode() {
        let json = r#"{"bpm":140,"ticks_per_quarter":480,"base_duration":120,"mode":"chaos"}"#;
        assert!(serde_json::from_str::<GenerateConfig>(json).is_err());
    }
}
