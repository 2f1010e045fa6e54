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

//! Moving on to the next queued track.

use tracing::{info, warn};

use crate::engine::{Engine, lock};

impl Engine {
    /// Stops the current track and starts the head of the playlist.
    ///
    /// With nothing queued the player is left stopped. A track that fails to
    /// load also leaves the player stopped, without trying the next one.
    pub(super) fn advance(&self) {
        {
            let mut playlist = lock(&self.playlist);

            if let Err(e) = self.backend.halt() {
                warn!("Failed to halt playback: {}", e);
            }

            let next = playlist.pop_front();
            let mut player = lock(&self.player);

            match next {
                None => {
                    info!("Playlist finished");
                    player.stop();
                }
                Some(entry) => match self.backend.load_and_play(&entry.path) {
                    Ok(track) => {
                        info!("Now playing {} ({} queued)", entry.title, playlist.len());
                        player.start_track(&entry.title, track);
                        player.reset_scroll();
                    }
                    Err(e) => {
                        warn!("{}", e);
                        player.stop();
                    }
                },
            }
        }

        self.redraw.signal();
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::{
        engine::{lock, tests::engine_with},
        player::{
            Status, TrackId,
            mock::{Call, MockBackend},
        },
    };

    #[test]
    fn plays_the_head_of_the_playlist() {
        let (_dir, engine, backend) = engine_with(&[], MockBackend::new(180));
        lock(&engine.playlist).append(PathBuf::from("/music/a.mp3"), "a.mp3");
        lock(&engine.playlist).append(PathBuf::from("/music/b.mp3"), "b.mp3");

        engine.advance();

        let player = lock(&engine.player);
        assert_eq!(player.status(), Status::Playing);
        assert_eq!(player.title(), Some("a.mp3"));
        assert_eq!(lock(&engine.playlist).len(), 1);
        assert_eq!(
            backend.calls(),
            vec![Call::Halt, Call::Load(PathBuf::from("/music/a.mp3"))]
        );
        assert!(engine.redraw.is_signalled());
    }

    #[test]
    fn new_track_starts_from_zero() {
        let (_dir, engine, _) = engine_with(&[], MockBackend::new(180));
        lock(&engine.player).start_track("old.mp3", TrackId::new(1));
        lock(&engine.player).set_elapsed_seconds(95);
        lock(&engine.playlist).append(PathBuf::from("/music/new.mp3"), "new.mp3");

        engine.advance();

        assert_eq!(lock(&engine.player).elapsed_seconds(), 0);
    }

    #[test]
    fn empty_playlist_stops_the_player() {
        let (_dir, engine, backend) = engine_with(&[], MockBackend::new(180));
        lock(&engine.player).start_track("last.mp3", TrackId::new(1));

        engine.advance();

        let player = lock(&engine.player);
        assert_eq!(player.status(), Status::Stopped);
        assert_eq!(player.title(), None);
        assert_eq!(backend.calls(), vec![Call::Halt]);
    }

    #[test]
    fn load_failure_stops_without_skipping_ahead() {
        let (_dir, engine, _) = engine_with(&[], MockBackend::failing_loads());
        lock(&engine.playlist).append(PathBuf::from("/music/bad.mp3"), "bad.mp3");
        lock(&engine.playlist).append(PathBuf::from("/music/good.mp3"), "good.mp3");

        engine.advance();

        assert_eq!(lock(&engine.player).status(), Status::Stopped);
        assert_eq!(lock(&engine.playlist).len(), 1);
        assert!(!engine.track_queue.is_signalled());
    }
}
