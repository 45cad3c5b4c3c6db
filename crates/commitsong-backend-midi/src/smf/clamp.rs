//! Saturating clamps for channel-voice data.
//!
//! Event constructors never reject out-of-range input. Values are pinned to
//! the nearest legal boundary here, and every constructor goes through these
//! functions so the saturation rules live in one place.

/// Highest MIDI channel (16 channels, zero-based).
pub const MAX_CHANNEL: u8 = 15;

/// Highest 7-bit data value (note number or velocity).
pub const MAX_DATA: u8 = 127;

/// Clamp a channel to 0..=15.
pub fn clamp_channel(channel: u8) -> u8 {
    channel.min(MAX_CHANNEL)
}

/// Clamp a channel index of any width to 0..=15.
pub fn channel_from_index(index: usize) -> u8 {
    index.min(MAX_CHANNEL as usize) as u8
}

/// Clamp a note number to 0..=127.
pub fn clamp_note(note: u8) -> u8 {
    note.min(MAX_DATA)
}

/// Clamp a velocity to 0..=127.
pub fn clamp_velocity(velocity: u8) -> u8 {
    velocity.min(MAX_DATA)
}

/// Clamp a set-tempo value to the 24 bits the meta event can carry.
pub fn clamp_tempo(micros_per_quarter: u32) -> u32 {
    micros_per_quarter.min(0x00FF_FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_values_pass_through() {
        assert_eq!(clamp_channel(9), 9);
        assert_eq!(clamp_note(60), 60);
        assert_eq!(clamp_velocity(0), 0);
        assert_eq!(clamp_tempo(500_000), 500_000);
    }

    #[test]
    fn test_out_of_range_values_saturate() {
        assert_eq!(clamp_channel(16), 15);
        assert_eq!(clamp_channel(255), 15);
        assert_eq!(clamp_note(128), 127);
        assert_eq!(clamp_velocity(200), 127);
        assert_eq!(clamp_tempo(u32::MAX), 0x00FF_FFFF);
    }

    #[test]
    fn test_channel_from_index() {
        assert_eq!(channel_from_index(0), 0);
        assert_eq!(channel_from_index(15), 15);
        assert_eq!(channel_from_index(16), 15);
        assert_eq!(channel_from_index(usize::MAX), 15);
    }
}
