//! Audio transcoding through an external ffmpeg.
//!
//! The MIDI file is always produced first. When the requested output is an
//! audio format, ffmpeg renders the MIDI file into it.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use commitsong_spec::BackendError;
use thiserror::Error;

/// Environment variable holding an explicit ffmpeg path.
pub const FFMPEG_ENV: &str = "COMMITSONG_FFMPEG";

/// Output sample rate passed to ffmpeg.
pub const SAMPLE_RATE: u32 = 44_100;

/// Output channel count passed to ffmpeg.
pub const CHANNELS: u32 = 2;

/// Errors from audio conversion.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The output extension is not an audio format ffmpeg is driven for.
    #[error("unsupported format: {format} (supported: mp3, wav, ogg, flac, aac, m4a)")]
    UnsupportedFormat { format: String },

    /// No ffmpeg executable could be located.
    #[error("ffmpeg not found; install ffmpeg or set {}", FFMPEG_ENV)]
    FfmpegNotFound,

    /// ffmpeg could not be started.
    #[error("failed to run ffmpeg: {0}")]
    Spawn(#[source] io::Error),

    /// ffmpeg exited unsuccessfully.
    #[error("failed to convert MIDI to {format}: {stderr}")]
    ConversionFailed { format: AudioFormat, stderr: String },
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::UnsupportedFormat { .. } => "AUDIO_001",
            AudioError::FfmpegNotFound => "AUDIO_002",
            AudioError::Spawn(_) => "AUDIO_003",
            AudioError::ConversionFailed { .. } => "AUDIO_004",
        }
    }

    fn category(&self) -> &'static str {
        "audio"
    }
}

/// Audio formats ffmpeg can render the MIDI file into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
    Flac,
    Aac,
    M4a,
}

impl AudioFormat {
    /// Lowercase extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Flac => "flac",
            AudioFormat::Aac => "aac",
            AudioFormat::M4a => "m4a",
        }
    }

    /// ffmpeg audio codec name.
    pub fn codec(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "libmp3lame",
            AudioFormat::Wav => "pcm_s16le",
            AudioFormat::Ogg => "libvorbis",
            AudioFormat::Flac => "flac",
            AudioFormat::Aac | AudioFormat::M4a => "aac",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for AudioFormat {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mp3" => Ok(AudioFormat::Mp3),
            "wav" => Ok(AudioFormat::Wav),
            "ogg" => Ok(AudioFormat::Ogg),
            "flac" => Ok(AudioFormat::Flac),
            "aac" => Ok(AudioFormat::Aac),
            "m4a" => Ok(AudioFormat::M4a),
            _ => Err(AudioError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// Where the MIDI file goes and whether it is transcoded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    /// Path the MIDI file is written to.
    pub midi_path: PathBuf,
    /// Final audio file and its format, if the output is not MIDI.
    pub audio: Option<(PathBuf, AudioFormat)>,
}

impl OutputPlan {
    /// Decide the output kind from the extension of `out`.
    ///
    /// No extension, `.mid` and `.midi` (any case) write MIDI directly. Any
    /// other extension must name an [`AudioFormat`]; the MIDI file is then
    /// written beside it with a `.mid` extension.
    pub fn for_output(out: &Path) -> Result<Self, AudioError> {
        let extension = match out.extension().and_then(|e| e.to_str()) {
            None => None,
            Some(ext) if ext.eq_ignore_ascii_case("mid") || ext.eq_ignore_ascii_case("midi") => {
                None
            }
            Some(ext) => Some(ext),
        };

        match extension {
            None => Ok(Self {
                midi_path: out.to_path_buf(),
                audio: None,
            }),
            Some(ext) => {
                let format: AudioFormat = ext.parse()?;
                Ok(Self {
                    midi_path: out.with_extension("mid"),
                    audio: Some((out.to_path_buf(), format)),
                })
            }
        }
    }

    /// True if a transcoding step follows the MIDI write.
    pub fn is_audio(&self) -> bool {
        self.audio.is_some()
    }
}

/// Drives ffmpeg to render MIDI files into audio formats.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    ffmpeg_path: Option<PathBuf>,
}

impl Converter {
    /// Create a converter that searches for ffmpeg on demand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter that prefers an explicit ffmpeg path.
    pub fn with_ffmpeg(path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: Some(path.into()),
        }
    }

    /// Locate ffmpeg: explicit path, then `COMMITSONG_FFMPEG`, then `PATH`.
    pub fn find_ffmpeg(&self) -> Result<PathBuf, AudioError> {
        if let Some(ref path) = self.ffmpeg_path {
            if path.exists() {
                return Ok(path.clone());
            }
        }

        if let Ok(path) = std::env::var(FFMPEG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        which::which("ffmpeg").map_err(|_| AudioError::FfmpegNotFound)
    }

    /// True if an ffmpeg executable can be located.
    pub fn is_available(&self) -> bool {
        self.find_ffmpeg().is_ok()
    }

    /// Arguments passed to ffmpeg for one conversion.
    pub fn command_args(midi_path: &Path, output_path: &Path, format: AudioFormat) -> Vec<String> {
        vec![
            "-i".to_string(),
            midi_path.display().to_string(),
            "-acodec".to_string(),
            format.codec().to_string(),
            "-ar".to_string(),
            SAMPLE_RATE.to_string(),
            "-ac".to_string(),
            CHANNELS.to_string(),
            "-y".to_string(),
            output_path.display().to_string(),
        ]
    }

    /// Render `midi_path` into `output_path`.
    pub fn convert(
        &self,
        midi_path: &Path,
        output_path: &Path,
        format: AudioFormat,
    ) -> Result<(), AudioError> {
        let ffmpeg = self.find_ffmpeg()?;
        tracing::debug!(ffmpeg = %ffmpeg.display(), %format, "running ffmpeg");

        let output = Command::new(&ffmpeg)
            .args(Self::command_args(midi_path, output_path, format))
            .stdin(Stdio::null())
            .output()
            .map_err(AudioError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // ffmpeg prints its banner first; the cause is on the last line.
            let last = stderr.lines().last().unwrap_or("").trim();
            return Err(AudioError::ConversionFailed {
                format,
                stderr: if last.is_empty() {
                    format!("ffmpeg exited with {}", output.status)
                } else {
                    last.to_string()
                },
            });
        }

        tracing::info!(path = %output_path.display(), %format, "wrote audio file");
        Ok(())
    }
}
