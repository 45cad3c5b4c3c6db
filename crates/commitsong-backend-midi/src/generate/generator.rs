//! Timeline planning and track construction.

use std::collections::BTreeMap;

use commitsong_spec::{Commit, GenerateConfig, Mode};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::GenerateError;
use crate::mapping;
use crate::smf::clamp::{channel_from_index, MAX_CHANNEL};
use crate::smf::{bpm_to_micros_per_quarter, MidiFile, Track};

/// Release velocity for every note-off.
pub const RELEASE_VELOCITY: u8 = 64;

/// One planned track: the commits it plays and the channel it plays them on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline<'a> {
    /// Author name for per-author tracks, `None` for the single shared track.
    pub author: Option<&'a str>,
    /// MIDI channel, already clamped to 0..=15.
    pub channel: u8,
    /// Commits in chronological order.
    pub commits: Vec<&'a Commit>,
}

/// Turns an ordered commit sequence into a populated [`MidiFile`].
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GenerateConfig,
}

impl Generator {
    /// Create a generator with the given configuration.
    pub fn new(config: GenerateConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &GenerateConfig {
        &self.config
    }

    /// Microseconds per quarter note written to each track's tempo event.
    pub fn tempo(&self) -> u32 {
        bpm_to_micros_per_quarter(self.config.bpm)
    }

    /// Decide which commits go on which track and channel.
    ///
    /// Per-author channels are fixed here, from the sorted author list, before
    /// any track is built.
    pub fn plan<'a>(&self, commits: &'a [Commit]) -> Result<Vec<Timeline<'a>>, GenerateError> {
        if commits.is_empty() {
            return Err(GenerateError::EmptyInput);
        }

        let timelines = match self.config.mode {
            Mode::SingleTrack => vec![Timeline {
                author: None,
                channel: 0,
                commits: commits.iter().collect(),
            }],
            Mode::PerAuthor => plan_per_author(commits),
        };
        Ok(timelines)
    }

    /// Build one track per timeline, in timeline order.
    pub fn build_tracks(&self, timelines: &[Timeline<'_>]) -> Vec<Track> {
        let tempo = self.tempo();

        #[cfg(feature = "parallel")]
        {
            timelines
                .par_iter()
                .map(|timeline| self.build_track(timeline, tempo))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            timelines
                .iter()
                .map(|timeline| self.build_track(timeline, tempo))
                .collect()
        }
    }

    /// Generate the complete file for `commits`.
    pub fn generate(&self, commits: &[Commit]) -> Result<MidiFile, GenerateError> {
        let timelines = self.plan(commits)?;
        Ok(self.assemble(self.build_tracks(&timelines)))
    }

    /// Wrap finished tracks into a file with this generator's format and division.
    pub(crate) fn assemble(&self, tracks: Vec<Track>) -> MidiFile {
        let mut file = MidiFile::new(self.config.mode.smf_format(), self.config.ticks_per_quarter);
        for track in tracks {
            file.add_track(track);
        }
        file
    }

    fn build_track(&self, timeline: &Timeline<'_>, tempo: u32) -> Track {
        let channel = timeline.channel;
        let mut track = Track::with_capacity(timeline.commits.len() * 2 + 2);
        track.add_tempo(0, tempo);

        let mut cursor = 0u32;
        for (index, commit) in timeline.commits.iter().enumerate() {
            let note = mapping::pitch(&commit.hash);
            let velocity = mapping::velocity(&commit.message);
            let duration = mapping::rhythm(index, self.config.base_duration);

            track.add_note_on(cursor, channel, note, velocity);
            track.add_note_off(duration, channel, note, RELEASE_VELOCITY);

            cursor = mapping::legato_offset(duration);
        }

        track.add_end_of_track(0);

        tracing::debug!(
            author = timeline.author.unwrap_or("*"),
            channel,
            notes = timeline.commits.len(),
            events = track.event_count(),
            "built track"
        );
        track
    }
}

/// Group commits by author, sort authors, and assign channels by position.
fn plan_per_author(commits: &[Commit]) -> Vec<Timeline<'_>> {
    let mut by_author: BTreeMap<&str, Vec<&Commit>> = BTreeMap::new();
    for commit in commits {
        by_author
            .entry(commit.author.as_str())
            .or_default()
            .push(commit);
    }

    if by_author.len() > MAX_CHANNEL as usize + 1 {
        tracing::warn!(
            authors = by_author.len(),
            "more authors than MIDI channels, extra authors share channel {}",
            MAX_CHANNEL
        );
    }

    by_author
        .into_iter()
        .enumerate()
        .map(|(position, (author, commits))| Timeline {
            author: Some(author),
            channel: channel_from_index(position),
            commits,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn commit(hash: &str, author: &str) -> Commit {
        Commit::new(hash, 0, author, "message")
    }

    #[test]
    fn test_plan_rejects_empty() {
        let generator = Generator::default();
        assert!(matches!(
            generator.plan(&[]),
            Err(GenerateError::EmptyInput)
        ));
    }

    #[test]
    fn test_single_track_plan_keeps_order() {
        let commits = vec![commit("aaaaaaa", "Bob"), commit("bbbbbbb", "Alice")];
        let timelines = Generator::default().plan(&commits).unwrap();
        assert_eq!(timelines.len(), 1);
        assert_eq!(timelines[0].channel, 0);
        assert_eq!(timelines[0].author, None);
        assert_eq!(timelines[0].commits[0].hash, "aaaaaaa");
    }

    #[test]
    fn test_per_author_plan_sorts_and_groups() {
        let commits = vec![
            commit("1111111", "Carol"),
            commit("2222222", "Alice"),
            commit("3333333", "Carol"),
            commit("4444444", "Bob"),
        ];
        let generator = Generator::new(GenerateConfig::default().with_mode(Mode::PerAuthor));
        let timelines = generator.plan(&commits).unwrap();

        let authors: Vec<_> = timelines.iter().map(|t| t.author.unwrap()).collect();
        assert_eq!(authors, vec!["Alice", "Bob", "Carol"]);
        let channels: Vec<_> = timelines.iter().map(|t| t.channel).collect();
        assert_eq!(channels, vec![0, 1, 2]);

        let carol: Vec<_> = timelines[2].commits.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(carol, vec!["1111111", "3333333"]);
    }

    #[test]
    fn test_per_author_channels_collapse_past_sixteen() {
        let commits: Vec<Commit> = (0..20)
            .map(|i| commit(&format!("{:07}", i), &format!("author{:02}", i)))
            .collect();
        let generator = Generator::new(GenerateConfig::default().with_mode(Mode::PerAuthor));
        let timelines = generator.plan(&commits).unwrap();

        assert_eq!(timelines.len(), 20);
        assert_eq!(timelines[14].channel, 14);
        assert_eq!(timelines[15].channel, 15);
        assert!(timelines[15..].iter().all(|t| t.channel == 15));
    }

    #[test]
    fn test_track_timing_follows_legato_cursor() {
        let commits: Vec<Commit> = (0..5).map(|i| commit(&format!("h{:06}", i), "A")).collect();
        let generator = Generator::new(GenerateConfig::default().with_duration(120));
        let file = generator.generate(&commits).unwrap();
        let events = file.tracks()[0].events();

        // tempo, (on, off) x 5, end
        assert_eq!(events.len(), 12);
        let deltas: Vec<u32> = events.iter().map(|e| e.delta_time).collect();
        assert_eq!(
            deltas,
            vec![0, 0, 120, 90, 120, 90, 120, 90, 120, 90, 90, 0]
        );
    }

    #[test]
    fn test_note_off_uses_release_velocity() {
        let commits = vec![commit("abc1234", "A")];
        let file = Generator::default().generate(&commits).unwrap();
        let off = &file.tracks()[0].events()[2];
        assert!(off.is_note_off());
        assert_eq!(off.data[2], RELEASE_VELOCITY);
    }
}
