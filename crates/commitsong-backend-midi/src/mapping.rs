//! Commit-to-note mapping.
//!
//! Pure functions that turn commit fields into musical parameters. All of
//! them are total: any input produces an in-range value.
//!
//! - pitch from the commit hash, folded onto a pentatonic minor scale over
//!   two octaves above middle C
//! - velocity from the message length
//! - rhythm from the commit's position in its timeline

/// Lowest pitch produced (C4).
pub const MIN_PITCH: u8 = 60;
/// Highest pitch produced (C6).
pub const MAX_PITCH: u8 = 84;

/// Lowest velocity produced.
pub const MIN_VELOCITY: u8 = 40;
/// Highest velocity produced.
pub const MAX_VELOCITY: u8 = 127;

/// Message length at which velocity reaches its maximum.
pub const MAX_MESSAGE_LEN: usize = 200;

/// Pentatonic minor semitone offsets.
pub const PENTATONIC_MINOR: [u8; 5] = [0, 3, 5, 7, 10];

/// Number of octaves the scale is spread over.
const OCTAVES: u32 = 3;

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the bytes of `input`.
pub fn fnv1a_32(input: &[u8]) -> u32 {
    input.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ byte as u32).wrapping_mul(FNV_PRIME)
    })
}

/// Map a commit hash to a MIDI note in `MIN_PITCH..=MAX_PITCH`.
pub fn pitch(hash: &str) -> u8 {
    let value = fnv1a_32(hash.as_bytes());
    let scale_len = PENTATONIC_MINOR.len() as u32;

    let degree = (value % scale_len) as usize;
    let octave = (value / scale_len) % OCTAVES;

    let note = MIN_PITCH as u32 + PENTATONIC_MINOR[degree] as u32 + octave * 12;
    note.clamp(MIN_PITCH as u32, MAX_PITCH as u32) as u8
}

/// Map a commit message to a velocity in `MIN_VELOCITY..=MAX_VELOCITY`.
///
/// Length is measured in bytes and capped at [`MAX_MESSAGE_LEN`]; velocity
/// grows linearly with it.
pub fn velocity(message: &str) -> u8 {
    let length = message.len().min(MAX_MESSAGE_LEN);
    let span = (MAX_VELOCITY - MIN_VELOCITY) as usize;

    let velocity = MIN_VELOCITY as usize + length * span / MAX_MESSAGE_LEN;
    velocity.clamp(MIN_VELOCITY as usize, MAX_VELOCITY as usize) as u8
}

/// Note duration in ticks for the commit at `index` in its timeline.
///
/// Every fourth note (after the first) is shortened to three quarters of
/// `base_duration`. The multiple-of-eight branch is checked after the
/// multiple-of-four branch and is never taken. The check order is part of the
/// output format.
pub fn rhythm(index: usize, base_duration: u32) -> u32 {
    if index == 0 {
        return base_duration;
    }

    if index % 4 == 0 {
        return scale_duration(base_duration, 3, 4);
    }
    if index % 8 == 0 {
        return scale_duration(base_duration, 5, 4);
    }

    base_duration
}

/// Gap between a note-off and the next note-on, producing a legato overlap.
pub fn legato_offset(duration: u32) -> u32 {
    scale_duration(duration, 3, 4)
}

/// `duration * num / den` without intermediate overflow, saturating at `u32::MAX`.
fn scale_duration(duration: u32, num: u64, den: u64) -> u32 {
    u32::try_from(duration as u64 * num / den).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a_32(b""), 0x811C_9DC5);
        assert_eq!(fnv1a_32(b"a"), 0xE40C_292C);
        assert_eq!(fnv1a_32(b"foobar"), 0xBF9C_F968);
    }

    #[test]
    fn test_pitch_is_on_scale() {
        for hash in ["abc1234", "def5678", "ghi9012", "0000000", "ffffffff"] {
            let p = pitch(hash);
            assert!((MIN_PITCH..=MAX_PITCH).contains(&p));
            let offset = (p - MIN_PITCH) % 12;
            assert!(PENTATONIC_MINOR.contains(&offset), "{} -> {}", hash, p);
        }
    }

    #[test]
    fn test_pitch_matches_formula() {
        let value = fnv1a_32(b"abc1234");
        let raw = 60 + PENTATONIC_MINOR[(value % 5) as usize] as u32 + ((value / 5) % 3) * 12;
        assert_eq!(pitch("abc1234") as u32, raw.min(84));
    }

    #[test]
    fn test_velocity_bounds() {
        assert_eq!(velocity(""), 40);
        assert_eq!(velocity(&"x".repeat(200)), 127);
        assert_eq!(velocity(&"x".repeat(5000)), 127);
        // 40 + 100 * 87 / 200 = 83
        assert_eq!(velocity(&"x".repeat(100)), 83);
    }

    #[test]
    fn test_rhythm_precedence() {
        let d = 120;
        assert_eq!(rhythm(0, d), 120);
        assert_eq!(rhythm(1, d), 120);
        assert_eq!(rhythm(4, d), 90);
        assert_eq!(rhythm(8, d), 90);
        assert_eq!(rhythm(16, d), 90);
        assert_eq!(rhythm(7, d), 120);
    }

    #[test]
    fn test_rhythm_integer_division() {
        assert_eq!(rhythm(4, 1), 0);
        assert_eq!(rhythm(4, 5), 3);
        assert_eq!(rhythm(4, u32::MAX), (u32::MAX as u64 * 3 / 4) as u32);
    }

    #[test]
    fn test_legato_offset() {
        assert_eq!(legato_offset(120), 90);
        assert_eq!(legato_offset(90), 67);
    }

    proptest! {
        #[test]
        fn pitch_is_deterministic_and_bounded(hash in ".{1,64}") {
            let p = pitch(&hash);
            prop_assert_eq!(p, pitch(&hash));
            prop_assert!((MIN_PITCH..=MAX_PITCH).contains(&p));
        }

        #[test]
        fn velocity_is_monotonic(a in 0usize..400, b in 0usize..400) {
            let (short, long) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(velocity(&"m".repeat(short)) <= velocity(&"m".repeat(long)));
        }

        #[test]
        fn rhythm_never_lengthens(index in 0usize..10_000, base in 0u32..100_000) {
            prop_assert!(rhythm(index, base) <= base);
        }
    }
}
