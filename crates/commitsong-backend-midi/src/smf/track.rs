//! Track chunk assembly.

use std::io::{self, Write};

use byteorder::{BigEndian, WriteBytesExt};

use super::event::{self, Event};
use crate::vlq;

/// Track chunk identifier.
pub const TRACK_MAGIC: &[u8; 4] = b"MTrk";

/// Size of the chunk tag plus length field.
pub const CHUNK_HEADER_SIZE: usize = 8;

/// One channel's timeline: events in append order.
///
/// Tracks only grow. There is no removal or random access mutation, so the
/// encoded payload is fully determined by the sequence of `add_*` calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    events: Vec<Event>,
}

impl Track {
    /// Create an empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty track with room for `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }

    /// Append a raw event.
    pub fn add_event(&mut self, delta_time: u32, data: impl Into<Vec<u8>>) {
        self.events.push(Event::new(delta_time, data));
    }

    /// Append a note-on event.
    pub fn add_note_on(&mut self, delta_time: u32, channel: u8, note: u8, velocity: u8) {
        self.add_event(delta_time, event::note_on(channel, note, velocity));
    }

    /// Append a note-off event.
    pub fn add_note_off(&mut self, delta_time: u32, channel: u8, note: u8, velocity: u8) {
        self.add_event(delta_time, event::note_off(channel, note, velocity));
    }

    /// Append a set-tempo meta event.
    pub fn add_tempo(&mut self, delta_time: u32, micros_per_quarter: u32) {
        self.add_event(delta_time, event::set_tempo(micros_per_quarter));
    }

    /// Append an end-of-track meta event.
    pub fn add_end_of_track(&mut self, delta_time: u32) {
        self.add_event(delta_time, event::end_of_track());
    }

    /// Events in append order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Number of note-on events.
    pub fn note_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_note_on()).count()
    }

    /// True if no events have been appended.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Concatenated `delta_time + bytes` of every event, without the chunk header.
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(self.payload_len());
        for event in &self.events {
            vlq::encode_into(event.delta_time, &mut payload);
            payload.extend_from_slice(&event.data);
        }
        payload
    }

    /// Exact byte length of [`Track::payload`].
    pub fn payload_len(&self) -> usize {
        self.events
            .iter()
            .map(|e| vlq::encoded_len(e.delta_time) + e.data.len())
            .sum()
    }

    /// Write the full track chunk: tag, big-endian payload length, payload.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let payload = self.payload();
        let len = u32::try_from(payload.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("track payload of {} bytes exceeds chunk limit", payload.len()),
            )
        })?;

        writer.write_all(TRACK_MAGIC)?;
        writer.write_u32::<BigEndian>(len)?;
        writer.write_all(&payload)?;
        Ok(())
    }

    /// Encode the track chunk to a byte vector.
    pub fn encode(&self) -> Vec<u8> {
        let payload = self.payload();
        let mut chunk = Vec::with_capacity(CHUNK_HEADER_SIZE + payload.len());
        chunk.extend_from_slice(TRACK_MAGIC);
        chunk.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        chunk.extend_from_slice(&payload);
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_track_chunk() {
        let track = Track::new();
        assert_eq!(track.encode(), b"MTrk\x00\x00\x00\x00".to_vec());
    }

    #[test]
    fn test_single_note_chunk() {
        let mut track = Track::new();
        track.add_note_on(0, 0, 60, 100);
        track.add_note_off(480, 0, 60, 64);
        track.add_end_of_track(0);

        let expected = vec![
            b'M', b'T', b'r', b'k', //
            0x00, 0x00, 0x00, 0x0D, //
            0x00, 0x90, 60, 100, //
            0x83, 0x60, 0x80, 60, 64, //
            0x00, 0xFF, 0x2F, 0x00,
        ];
        assert_eq!(track.encode(), expected);
    }

    #[test]
    fn test_length_field_matches_payload() {
        let mut track = Track::new();
        track.add_tempo(0, 428_571);
        for i in 0..50u32 {
            track.add_note_on(i * 90, 2, 60 + (i % 24) as u8, 80);
            track.add_note_off(20_000 + i, 2, 60 + (i % 24) as u8, 64);
        }
        track.add_end_of_track(0);

        let chunk = track.encode();
        let len = u32::from_be_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]) as usize;
        assert_eq!(&chunk[..4], TRACK_MAGIC);
        assert_eq!(len, chunk.len() - CHUNK_HEADER_SIZE);
        assert_eq!(len, track.payload_len());
    }

    #[test]
    fn test_write_matches_encode() {
        let mut track = Track::new();
        track.add_tempo(0, 500_000);
        track.add_note_on(0, 1, 64, 70);
        track.add_note_off(120, 1, 64, 64);
        track.add_end_of_track(0);

        let mut buf = Vec::new();
        track.write(&mut buf).unwrap();
        assert_eq!(buf, track.encode());
    }

    #[test]
    fn test_counts() {
        let mut track = Track::with_capacity(4);
        assert!(track.is_empty());
        track.add_tempo(0, 500_000);
        track.add_note_on(0, 0, 60, 100);
        track.add_note_off(10, 0, 60, 64);
        track.add_end_of_track(0);
        assert_eq!(track.event_count(), 4);
        assert_eq!(track.note_count(), 1);
        assert_eq!(track.events()[1].delta_time, 0);
    }
}
