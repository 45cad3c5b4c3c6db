//! Standard MIDI File (SMF) writer.
//!
//! A file is a 14-byte header chunk followed by one track chunk per track:
//!
//! ```text
//! "MThd" | len=6 (u32 BE) | format (u16 BE) | ntracks (u16 BE) | division (u16 BE)
//! "MTrk" | len (u32 BE)   | { vlq(delta) event-bytes }*
//! ```
//!
//! Only the subset needed for commit rendering is produced: note on/off,
//! set-tempo and end-of-track. Reading existing files is out of scope.
//!
//! ```rust
//! use commitsong_backend_midi::smf::{MidiFile, Track};
//!
//! let mut track = Track::new();
//! track.add_tempo(0, 500_000);
//! track.add_note_on(0, 0, 60, 100);
//! track.add_note_off(480, 0, 60, 64);
//! track.add_end_of_track(0);
//!
//! let mut file = MidiFile::new(0, 480);
//! file.add_track(track);
//! let bytes = file.to_bytes().unwrap();
//! assert_eq!(&bytes[0..4], b"MThd");
//! ```

pub mod clamp;
pub mod event;
mod header;
mod track;
mod writer;

pub use event::{bpm_to_micros_per_quarter, Event};
pub use header::*;
pub use track::*;
pub use writer::*;
