// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Audio playback control and state management.
//!
//! This module holds the [`PlayerState`] shown on every screen, and the
//! [`AudioBackend`] trait through which the rest of the application drives
//! whatever actually produces sound. The backend reports progress back as
//! [`PlaybackEvent`]s sent from its own thread.

#[cfg(test)]
pub(crate) mod mock;
mod mpv;

pub(crate) use mpv::MpvBackend;

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Sample rate used to turn produced audio into elapsed time.
pub(crate) const SAMPLE_RATE: u64 = 22050;

/// Two bytes per sample, two channels.
pub(crate) const BYTES_PER_FRAME: u64 = 4;

/// Output levels for each volume step, out of [`MAX_LEVEL`].
const VOLUME_CURVE: [u8; 14] = [0, 5, 10, 17, 25, 34, 45, 55, 65, 76, 88, 100, 112, 128];

/// The loudest output level a backend is asked for.
pub(crate) const MAX_LEVEL: u8 = 128;

/// Which screen is shown on the display.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) enum Mode {
    #[default]
    Files,
    NowPlaying,
    Volume,
}

/// Represents the current playback status of the audio engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Status {
    Playing,
    Paused,
    Stopped,
}

/// The transport state, carrying the title of the loaded track.
///
/// A track title exists exactly when something is loaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum Transport {
    #[default]
    Stopped,
    Paused(String),
    Playing(String),
}

impl Transport {
    pub(crate) fn status(&self) -> Status {
        match self {
            Transport::Stopped => Status::Stopped,
            Transport::Paused(_) => Status::Paused,
            Transport::Playing(_) => Status::Playing,
        }
    }

    pub(crate) fn title(&self) -> Option<&str> {
        match self {
            Transport::Stopped => None,
            Transport::Paused(title) | Transport::Playing(title) => Some(title),
        }
    }
}

/// Identifies one load of a track, so that late reports about a track that
/// has since been replaced can be told apart from the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TrackId(u64);

impl TrackId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

/// A step on the non-linear volume curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Volume(usize);

impl Volume {
    pub(crate) const MAX: usize = VOLUME_CURVE.len() - 1;

    /// Creates a volume at `index`, clamped to the curve.
    pub(crate) fn new(index: usize) -> Self {
        Self(index.min(Self::MAX))
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }

    /// The output level for this step, out of [`MAX_LEVEL`].
    pub(crate) fn level(self) -> u8 {
        VOLUME_CURVE[self.0]
    }

    /// One step louder, or `None` at the top of the curve.
    pub(crate) fn up(self) -> Option<Self> {
        (self.0 < Self::MAX).then(|| Self(self.0 + 1))
    }

    /// One step quieter, or `None` at the bottom of the curve.
    pub(crate) fn down(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(7)
    }
}

/// Everything the display needs to know about playback.
///
/// A single lock guards the whole structure because the fields are read
/// together when rendering.
#[derive(Debug, Default)]
pub(crate) struct PlayerState {
    pub(crate) mode: Mode,
    transport: Transport,
    track: Option<TrackId>,
    elapsed_bytes: u64,
    scroll_tick: u32,
    volume: Volume,
}

impl PlayerState {
    pub(crate) fn new(volume: Volume) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }

    pub(crate) fn status(&self) -> Status {
        self.transport.status()
    }

    pub(crate) fn title(&self) -> Option<&str> {
        self.transport.title()
    }

    pub(crate) fn volume(&self) -> Volume {
        self.volume
    }

    pub(crate) fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    pub(crate) fn scroll_tick(&self) -> u32 {
        self.scroll_tick
    }

    pub(crate) fn advance_scroll(&mut self) {
        self.scroll_tick = self.scroll_tick.wrapping_add(1);
    }

    pub(crate) fn reset_scroll(&mut self) {
        self.scroll_tick = 0;
    }

    /// Whole seconds played of the current track.
    pub(crate) fn elapsed_seconds(&self) -> u64 {
        self.elapsed_bytes / SAMPLE_RATE / BYTES_PER_FRAME
    }

    /// Elapsed seconds, or `None` when nothing is loaded.
    pub(crate) fn position(&self) -> Option<u64> {
        (self.status() != Status::Stopped).then(|| self.elapsed_seconds())
    }

    /// Notes that a new track has started playing.
    pub(crate) fn start_track(&mut self, title: &str, track: TrackId) {
        self.transport = Transport::Playing(title.to_string());
        self.track = Some(track);
        self.elapsed_bytes = 0;
    }

    /// Notes that nothing is loaded any more.
    pub(crate) fn stop(&mut self) {
        self.transport = Transport::Stopped;
        self.track = None;
        self.elapsed_bytes = 0;
    }

    /// Whether `track` is the one loaded now.
    pub(crate) fn is_current(&self, track: TrackId) -> bool {
        self.track == Some(track)
    }

    /// Flips between playing and paused.
    ///
    /// Returns the new status, or `None` if nothing is loaded.
    pub(crate) fn toggle_pause(&mut self) -> Option<Status> {
        self.transport = match std::mem::take(&mut self.transport) {
            Transport::Playing(title) => Transport::Paused(title),
            Transport::Paused(title) => Transport::Playing(title),
            Transport::Stopped => return None,
        };
        Some(self.status())
    }

    /// Counts audio produced by the backend towards the elapsed time.
    ///
    /// Audio only counts while playing. Returns whether the elapsed time in
    /// whole seconds changed.
    pub(crate) fn add_audio(&mut self, bytes: u64) -> bool {
        if self.status() != Status::Playing {
            return false;
        }
        let before = self.elapsed_seconds();
        self.elapsed_bytes = self.elapsed_bytes.saturating_add(bytes);
        before != self.elapsed_seconds()
    }

    /// Sets the elapsed time after a successful seek.
    pub(crate) fn set_elapsed_seconds(&mut self, seconds: u64) {
        self.elapsed_bytes = seconds * SAMPLE_RATE * BYTES_PER_FRAME;
    }

    pub(crate) fn reset_elapsed(&mut self) {
        self.elapsed_bytes = 0;
    }
}

#[derive(Debug, Error)]
pub(crate) enum BackendError {
    #[error("could not load audio {path}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("seek to {0}s is past the end of the track")]
    SeekPastEnd(u64),
    #[error("audio worker is no longer running")]
    Disconnected,
    #[error("audio backend failure: {0}")]
    Backend(String),
}

/// Progress reports sent by an [`AudioBackend`] from its own thread.
///
/// Every report names the track it is about.
#[derive(Debug, PartialEq)]
pub(crate) enum PlaybackEvent {
    /// This many bytes of audio were produced since the last report.
    AudioProduced { track: TrackId, bytes: u64 },
    /// The track played through to its end.
    TrackFinished(TrackId),
    /// The track loaded but could not be played any further.
    TrackFailed(TrackId),
}

/// Something that can play audio files.
///
/// Halting a track must not be reported as [`PlaybackEvent::TrackFinished`];
/// that event is reserved for tracks that reach their natural end.
pub(crate) trait AudioBackend: Send + Sync {
    /// Stops whatever is playing and starts `path` from the beginning.
    ///
    /// Only succeeds once the file is known to play. The returned id tags
    /// every later [`PlaybackEvent`] about this track.
    fn load_and_play(&self, path: &Path) -> Result<TrackId, BackendError>;

    /// Stops whatever is playing.
    fn halt(&self) -> Result<(), BackendError>;

    fn pause(&self) -> Result<(), BackendError>;

    fn resume(&self) -> Result<(), BackendError>;

    /// Moves playback to `seconds` from the start of the track.
    ///
    /// Fails with [`BackendError::SeekPastEnd`] if the track is shorter.
    fn seek_to(&self, seconds: u64) -> Result<(), BackendError>;

    /// Sets the output level, out of [`MAX_LEVEL`].
    fn set_volume(&self, level: u8) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_SECOND: u64 = SAMPLE_RATE * BYTES_PER_FRAME;

    #[test]
    fn starts_stopped_in_files_mode() {
        let state = PlayerState::new(Volume::default());
        assert_eq!(state.mode, Mode::Files);
        assert_eq!(state.status(), Status::Stopped);
        assert_eq!(state.title(), None);
        assert_eq!(state.position(), None);
    }

    #[test]
    fn title_present_exactly_when_not_stopped() {
        let mut state = PlayerState::default();
        let check = |state: &PlayerState| {
            assert_eq!(state.title().is_some(), state.status() != Status::Stopped);
        };

        check(&state);
        state.start_track("a.mp3", TrackId(1));
        check(&state);
        state.toggle_pause();
        check(&state);
        state.toggle_pause();
        check(&state);
        state.stop();
        check(&state);
        assert_eq!(state.toggle_pause(), None);
        check(&state);
    }

    #[test]
    fn toggle_pause_keeps_the_title() {
        let mut state = PlayerState::default();
        state.start_track("a.mp3", TrackId(1));

        assert_eq!(state.toggle_pause(), Some(Status::Paused));
        assert_eq!(state.title(), Some("a.mp3"));
        assert_eq!(state.toggle_pause(), Some(Status::Playing));
    }

    #[test]
    fn elapsed_seconds_derive_from_bytes() {
        let mut state = PlayerState::default();
        state.start_track("a.mp3", TrackId(1));

        assert!(!state.add_audio(ONE_SECOND - 1));
        assert_eq!(state.elapsed_seconds(), 0);
        assert!(state.add_audio(1));
        assert_eq!(state.elapsed_seconds(), 1);
        assert_eq!(state.position(), Some(1));
    }

    #[test]
    fn audio_does_not_count_while_paused() {
        let mut state = PlayerState::default();
        state.start_track("a.mp3", TrackId(1));
        state.toggle_pause();

        assert!(!state.add_audio(ONE_SECOND * 5));
        assert_eq!(state.elapsed_seconds(), 0);
    }

    #[test]
    fn new_track_resets_elapsed() {
        let mut state = PlayerState::default();
        state.start_track("a.mp3", TrackId(1));
        state.set_elapsed_seconds(42);

        state.start_track("b.mp3", TrackId(2));

        assert_eq!(state.elapsed_seconds(), 0);
    }

    #[test]
    fn only_the_loaded_track_is_current() {
        let mut state = PlayerState::default();
        assert!(!state.is_current(TrackId(1)));

        state.start_track("a.mp3", TrackId(1));
        state.start_track("b.mp3", TrackId(2));
        assert!(!state.is_current(TrackId(1)));
        assert!(state.is_current(TrackId(2)));

        state.toggle_pause();
        assert!(state.is_current(TrackId(2)));

        state.stop();
        assert!(!state.is_current(TrackId(2)));
    }

    #[test]
    fn volume_stays_on_the_curve() {
        assert_eq!(Volume::new(100).index(), Volume::MAX);
        assert_eq!(Volume::new(Volume::MAX).up(), None);
        assert_eq!(Volume::new(0).down(), None);
        assert_eq!(Volume::new(0).level(), 0);
        assert_eq!(Volume::new(Volume::MAX).level(), MAX_LEVEL);
        assert_eq!(Volume::default().up().unwrap().index(), 8);
    }
}
