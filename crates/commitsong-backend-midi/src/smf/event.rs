//! Track events and their wire bytes.

use super::clamp::{clamp_channel, clamp_note, clamp_tempo, clamp_velocity};

/// Note-off status nibble.
pub const STATUS_NOTE_OFF: u8 = 0x80;
/// Note-on status nibble.
pub const STATUS_NOTE_ON: u8 = 0x90;
/// Meta-event status byte.
pub const STATUS_META: u8 = 0xFF;

/// Set-tempo meta type.
pub const META_SET_TEMPO: u8 = 0x51;
/// End-of-track meta type.
pub const META_END_OF_TRACK: u8 = 0x2F;

/// Tempo used when the configured BPM is not positive.
pub const FALLBACK_BPM: i32 = 120;

const MICROS_PER_MINUTE: u32 = 60_000_000;

/// A single event: ticks since the previous event plus its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Ticks since the previous event in the same track.
    pub delta_time: u32,
    /// Status byte and data bytes, written verbatim after the delta time.
    pub data: Vec<u8>,
}

impl Event {
    /// Create an event from raw bytes.
    pub fn new(delta_time: u32, data: impl Into<Vec<u8>>) -> Self {
        Self {
            delta_time,
            data: data.into(),
        }
    }

    /// Status byte, if the event has any bytes.
    pub fn status(&self) -> Option<u8> {
        self.data.first().copied()
    }

    /// True for channel note-on events.
    pub fn is_note_on(&self) -> bool {
        matches!(self.status(), Some(s) if s & 0xF0 == STATUS_NOTE_ON)
    }

    /// True for channel note-off events.
    pub fn is_note_off(&self) -> bool {
        matches!(self.status(), Some(s) if s & 0xF0 == STATUS_NOTE_OFF)
    }

    /// Meta type byte, for meta events.
    pub fn meta_type(&self) -> Option<u8> {
        match self.data.as_slice() {
            [STATUS_META, kind, ..] => Some(*kind),
            _ => None,
        }
    }

    /// Channel of a channel-voice event.
    pub fn channel(&self) -> Option<u8> {
        if self.is_note_on() || self.is_note_off() {
            self.status().map(|s| s & 0x0F)
        } else {
            None
        }
    }
}

/// Bytes of a note-on event. Inputs saturate to their legal ranges.
pub fn note_on(channel: u8, note: u8, velocity: u8) -> [u8; 3] {
    [
        STATUS_NOTE_ON | clamp_channel(channel),
        clamp_note(note),
        clamp_velocity(velocity),
    ]
}

/// Bytes of a note-off event. Inputs saturate to their legal ranges.
pub fn note_off(channel: u8, note: u8, velocity: u8) -> [u8; 3] {
    [
        STATUS_NOTE_OFF | clamp_channel(channel),
        clamp_note(note),
        clamp_velocity(velocity),
    ]
}

/// Bytes of a set-tempo meta event carrying a 24-bit big-endian value.
pub fn set_tempo(micros_per_quarter: u32) -> [u8; 6] {
    let tempo = clamp_tempo(micros_per_quarter);
    [
        STATUS_META,
        META_SET_TEMPO,
        0x03,
        (tempo >> 16) as u8,
        (tempo >> 8) as u8,
        tempo as u8,
    ]
}

/// Bytes of an end-of-track meta event.
pub fn end_of_track() -> [u8; 3] {
    [STATUS_META, META_END_OF_TRACK, 0x00]
}

/// Convert beats per minute to microseconds per quarter note.
///
/// Non-positive BPM is treated as [`FALLBACK_BPM`].
pub fn bpm_to_micros_per_quarter(bpm: i32) -> u32 {
    let bpm = if bpm <= 0 { FALLBACK_BPM } else { bpm };
    MICROS_PER_MINUTE / bpm as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_bytes() {
        assert_eq!(note_on(0, 60, 100), [0x90, 60, 100]);
        assert_eq!(note_on(9, 36, 127), [0x99, 36, 127]);
    }

    #[test]
    fn test_note_off_bytes() {
        assert_eq!(note_off(1, 72, 64), [0x81, 72, 64]);
    }

    #[test]
    fn test_channel_voice_saturation() {
        assert_eq!(note_on(20, 200, 255), [0x9F, 127, 127]);
        assert_eq!(note_off(16, 128, 128), [0x8F, 127, 127]);
    }

    #[test]
    fn test_set_tempo_bytes() {
        // 428571 = 0x068A1B
        assert_eq!(
            set_tempo(428_571),
            [0xFF, 0x51, 0x03, 0x06, 0x8A, 0x1B]
        );
        assert_eq!(set_tempo(500_000), [0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
    }

    #[test]
    fn test_end_of_track_bytes() {
        assert_eq!(end_of_track(), [0xFF, 0x2F, 0x00]);
    }

    #[test]
    fn test_bpm_conversion() {
        assert_eq!(bpm_to_micros_per_quarter(140), 428_571);
        assert_eq!(bpm_to_micros_per_quarter(120), 500_000);
        assert_eq!(bpm_to_micros_per_quarter(0), 500_000);
        assert_eq!(bpm_to_micros_per_quarter(-30), 500_000);
    }

    #[test]
    fn test_event_classification() {
        let on = Event::new(0, note_on(3, 60, 90));
        assert!(on.is_note_on());
        assert!(!on.is_note_off());
        assert_eq!(on.channel(), Some(3));

        let off = Event::new(10, note_off(3, 60, 64));
        assert!(off.is_note_off());

        let tempo = Event::new(0, set_tempo(500_000));
        assert_eq!(tempo.meta_type(), Some(META_SET_TEMPO));
        assert_eq!(tempo.channel(), None);

        let eot = Event::new(0, end_of_track());
        assert_eq!(eot.meta_type(), Some(META_END_OF_TRACK));
    }
}
