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

//! Playlist queue management.
//!
//! This module provides state for the playback queue: the tracks waiting to
//! be played, in order. The track currently playing is not part of the queue;
//! it is removed from the front when playback of it starts.

use std::{collections::VecDeque, path::Path, path::PathBuf};

use tracing::debug;

use crate::browser::{self, AudioFilter, BrowseError, Listing};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlaylistEntry {
    pub(crate) path: PathBuf,
    pub(crate) title: String,
}

#[derive(Default)]
pub(crate) struct Playlist {
    queued: VecDeque<PlaylistEntry>,
}

impl Playlist {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, path: PathBuf, title: &str) {
        debug!("Append {} to playlist", path.display());
        self.queued.push_back(PlaylistEntry {
            path,
            title: title.to_string(),
        });
    }

    pub(crate) fn clear(&mut self) {
        self.queued.clear();
    }

    /// Replaces the queue with the audio files in `dir`.
    ///
    /// Files are queued in directory listing order, starting with the first
    /// whose name is not less than `start`. With no `start` the whole
    /// directory is queued. Returns the number of tracks queued.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be listed, in which case the queue is
    /// left empty.
    pub(crate) fn replace_with_directory(
        &mut self,
        dir: &Path,
        start: Option<&str>,
        filter: &AudioFilter,
    ) -> Result<usize, BrowseError> {
        self.clear();

        let entries = browser::scan_directory(dir, filter, Listing::AudioOnly)?;

        for entry in entries
            .iter()
            .filter(|entry| start.is_none_or(|start| entry.name.as_str() >= start))
        {
            self.append(dir.join(&entry.name), &entry.name);
        }

        Ok(self.queued.len())
    }

    pub(crate) fn pop_front(&mut self) -> Option<PlaylistEntry> {
        self.queued.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.queued.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &PlaylistEntry> {
        self.queued.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::tests::make_tree;

    fn titles(playlist: &Playlist) -> Vec<&str> {
        playlist.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn pops_in_insertion_order() {
        let mut playlist = Playlist::new();
        playlist.append(PathBuf::from("a.mp3"), "A");
        playlist.append(PathBuf::from("b.mp3"), "B");

        assert_eq!(playlist.pop_front().unwrap().title, "A");
        assert_eq!(playlist.pop_front().unwrap().title, "B");
        assert_eq!(playlist.pop_front(), None);
    }

    #[test]
    fn replace_starts_at_the_given_title() {
        let root = make_tree(&["a.mp3", "m.mp3", "z.mp3"]);
        let mut playlist = Playlist::new();

        let queued = playlist
            .replace_with_directory(root.path(), Some("m"), &AudioFilter::default())
            .unwrap();

        assert_eq!(queued, 2);
        assert_eq!(titles(&playlist), vec!["m.mp3", "z.mp3"]);
    }

    #[test]
    fn replace_without_start_queues_everything_in_order() {
        let root = make_tree(&["sub/", "c.ogg", "a.mp3", "b.mp3", "readme.txt"]);
        let mut playlist = Playlist::new();

        playlist
            .replace_with_directory(root.path(), None, &AudioFilter::default())
            .unwrap();

        assert_eq!(titles(&playlist), vec!["a.mp3", "b.mp3", "c.ogg"]);
        assert_eq!(playlist.iter().next().unwrap().path, root.path().join("a.mp3"));
    }

    #[test]
    fn replace_discards_the_previous_queue() {
        let root = make_tree(&["b.mp3"]);
        let mut playlist = Playlist::new();
        playlist.append(PathBuf::from("old.mp3"), "old.mp3");

        playlist
            .replace_with_directory(root.path(), Some("b.mp3"), &AudioFilter::default())
            .unwrap();

        assert_eq!(titles(&playlist), vec!["b.mp3"]);
    }

    #[test]
    fn failed_replace_leaves_the_queue_empty() {
        let root = make_tree(&[]);
        let mut playlist = Playlist::new();
        playlist.append(PathBuf::from("old.mp3"), "old.mp3");

        let result = playlist.replace_with_directory(
            &root.path().join("missing"),
            None,
            &AudioFilter::default(),
        );

        assert!(result.is_err());
        assert!(playlist.is_empty());
    }
}
