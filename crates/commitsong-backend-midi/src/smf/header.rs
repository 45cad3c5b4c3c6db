//! Header chunk structures and constants.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

/// Header chunk identifier.
pub const HEADER_MAGIC: &[u8; 4] = b"MThd";

/// Value of the header chunk's length field.
pub const HEADER_LENGTH: u32 = 6;

/// Total header chunk size in bytes (tag + length + 6 data bytes).
pub const HEADER_SIZE: usize = 14;

/// Format 0: a single multi-channel track.
pub const FORMAT_SINGLE_TRACK: u16 = 0;

/// Format 1: simultaneous tracks sharing one timeline.
pub const FORMAT_MULTI_TRACK: u16 = 1;

/// Header chunk data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmfHeader {
    /// Format selector. Descriptive only; it does not change track encoding.
    pub format: u16,
    /// Number of track chunks that follow.
    pub num_tracks: u16,
    /// Ticks per quarter note.
    pub division: u16,
}

impl Default for SmfHeader {
    fn default() -> Self {
        Self {
            format: FORMAT_SINGLE_TRACK,
            num_tracks: 0,
            division: 480,
        }
    }
}

impl SmfHeader {
    /// Create a header.
    pub fn new(format: u16, num_tracks: u16, division: u16) -> Self {
        Self {
            format,
            num_tracks,
            division,
        }
    }

    /// Write the 14-byte header chunk.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(HEADER_MAGIC)?;
        writer.write_u32::<BigEndian>(HEADER_LENGTH)?;
        writer.write_u16::<BigEndian>(self.format)?;
        writer.write_u16::<BigEndian>(self.num_tracks)?;
        writer.write_u16::<BigEndian>(self.division)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_write() {
        let header = SmfHeader::new(FORMAT_MULTI_TRACK, 3, 480);

        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();

        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(
            buf,
            vec![
                b'M', b'T', b'h', b'd', //
                0x00, 0x00, 0x00, 0x06, //
                0x00, 0x01, //
                0x00, 0x03, //
                0x01, 0xE0,
            ]
        );
    }

    #[test]
    fn test_default_header() {
        let header = SmfHeader::default();
        assert_eq!(header.format, FORMAT_SINGLE_TRACK);
        assert_eq!(header.num_tracks, 0);
        assert_eq!(header.division, 480);
    }
}
