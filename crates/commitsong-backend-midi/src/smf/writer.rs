//! SMF file writer - assembles the header and tracks into a complete file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::header::SmfHeader;
use super::track::Track;

/// A Standard MIDI File: format metadata plus tracks in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiFile {
    format: u16,
    division: u16,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// Create an empty file with the given format selector and ticks per quarter note.
    pub fn new(format: u16, division: u16) -> Self {
        Self {
            format,
            division,
            tracks: Vec::new(),
        }
    }

    /// Append a track. Tracks are written in the order they are added.
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Format selector.
    pub fn format(&self) -> u16 {
        self.format
    }

    /// Ticks per quarter note.
    pub fn division(&self) -> u16 {
        self.division
    }

    /// Tracks in output order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Header describing the current contents.
    ///
    /// The track count field is 16 bits wide and saturates at `u16::MAX`.
    pub fn header(&self) -> SmfHeader {
        let num_tracks = u16::try_from(self.tracks.len()).unwrap_or(u16::MAX);
        SmfHeader::new(self.format, num_tracks, self.division)
    }

    /// Write the header chunk followed by every track chunk.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.header().write(writer)?;
        for track in &self.tracks {
            track.write(writer)?;
        }
        Ok(())
    }

    /// Write the file to a byte vector.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    /// Create `path` and write the file to it.
    ///
    /// The handle is closed when this returns, on success or failure. A failed
    /// write may leave a partial file behind; removing it is up to the caller.
    pub fn write_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()?;
        tracing::info!(
            path = %path.display(),
            tracks = self.tracks.len(),
            "wrote MIDI file"
        );
        Ok(())
    }

    /// Compute the BLAKE3 hash of the file bytes.
    pub fn compute_hash(&self) -> io::Result<String> {
        let bytes = self.to_bytes()?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smf::header::{FORMAT_MULTI_TRACK, HEADER_SIZE};
    use pretty_assertions::assert_eq;

    fn simple_track(channel: u8) -> Track {
        let mut track = Track::new();
        track.add_tempo(0, 500_000);
        track.add_note_on(0, channel, 60, 100);
        track.add_note_off(120, channel, 60, 64);
        track.add_end_of_track(0);
        track
    }

    #[test]
    fn test_empty_file_is_header_only() {
        let file = MidiFile::new(0, 480);
        let bytes = file.to_bytes().unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(&bytes[10..12], &[0x00, 0x00]);
    }

    #[test]
    fn test_tracks_follow_header_in_order() {
        let mut file = MidiFile::new(FORMAT_MULTI_TRACK, 96);
        let first = simple_track(0);
        let second = simple_track(1);
        file.add_track(first.clone());
        file.add_track(second.clone());

        let bytes = file.to_bytes().unwrap();
        let mut expected = Vec::new();
        file.header().write(&mut expected).unwrap();
        expected.extend(first.encode());
        expected.extend(second.encode());
        assert_eq!(bytes, expected);
        assert_eq!(&bytes[8..14], &[0x00, 0x01, 0x00, 0x02, 0x00, 0x60]);
    }

    #[test]
    fn test_hash_determinism() {
        let mut a = MidiFile::new(0, 480);
        a.add_track(simple_track(0));
        let mut b = MidiFile::new(0, 480);
        b.add_track(simple_track(0));
        assert_eq!(a.compute_hash().unwrap(), b.compute_hash().unwrap());

        let mut c = MidiFile::new(0, 480);
        c.add_track(simple_track(1));
        assert_ne!(a.compute_hash().unwrap(), c.compute_hash().unwrap());
    }

    #[test]
    fn test_write_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mid");

        let mut file = MidiFile::new(0, 480);
        file.add_track(simple_track(0));
        file.write_file(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), file.to_bytes().unwrap());
    }

    #[test]
    fn test_write_file_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.mid");

        let file = MidiFile::new(0, 480);
        let err = file.write_file(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_surfaces_sink_errors() {
        let mut file = MidiFile::new(0, 480);
        file.add_track(simple_track(0));
        let err = file.write(&mut FailingSink).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
