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

//! Button handling.
//!
//! Mode buttons and seeking work the same on every screen. `Up`, `Down` and
//! `Select` mean something different on each:
//!
//! | Screen      | Up / Down           | Select                          |
//! |-------------|---------------------|---------------------------------|
//! | Files       | Move the cursor     | Enter a directory or play files |
//! | Now playing | Nothing             | Pause or resume                 |
//! | Volume      | Louder / quieter    | Pause or resume                 |

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    browser::{AudioFilter, CURRENT_DIR},
    engine::{Engine, lock},
    input::Button,
    player::{BackendError, Mode, Status},
};

/// Seconds skipped by each press of forward or back.
const SEEK_STEP: u64 = 10;

/// What selecting an entry on the files screen leads to.
enum Selection {
    /// Play files from `dir`, starting at the named one, or all of them.
    Play {
        dir: PathBuf,
        start: Option<String>,
        filter: AudioFilter,
    },
    /// Move to another directory.
    Enter(String),
}

impl Engine {
    /// Acts on a single button press.
    pub(super) fn dispatch(&self, button: Button) {
        match button {
            Button::Files => self.set_mode(Mode::Files),
            Button::NowPlaying => self.set_mode(Mode::NowPlaying),
            Button::Volume => self.set_mode(Mode::Volume),
            Button::Forward => self.seek_forward(),
            Button::Back => self.seek_back(),
            Button::Quit => {}
            Button::Up | Button::Down | Button::Select => {
                let mode = lock(&self.player).mode;
                match mode {
                    Mode::Files => self.files_button(button),
                    Mode::NowPlaying => self.now_playing_button(button),
                    Mode::Volume => self.volume_button(button),
                }
            }
        }
    }

    fn set_mode(&self, mode: Mode) {
        {
            let mut player = lock(&self.player);
            player.mode = mode;
            player.reset_scroll();
        }
        self.redraw.signal();
    }

    fn files_button(&self, button: Button) {
        match button {
            Button::Up => self.move_cursor(-1),
            Button::Down => self.move_cursor(1),
            Button::Select => self.select_entry(),
            _ => {}
        }
    }

    fn now_playing_button(&self, button: Button) {
        if button == Button::Select {
            self.toggle_pause();
        }
    }

    fn volume_button(&self, button: Button) {
        match button {
            Button::Up => self.change_volume(true),
            Button::Down => self.change_volume(false),
            Button::Select => self.toggle_pause(),
            _ => {}
        }
    }

    fn move_cursor(&self, delta: isize) {
        lock(&self.browser).move_cursor(delta);
        lock(&self.player).reset_scroll();
        self.redraw.signal();
    }

    fn select_entry(&self) {
        let selection = {
            let browser = lock(&self.browser);
            let Some(entry) = browser.selected() else {
                return;
            };

            if !entry.is_directory() {
                Selection::Play {
                    dir: browser.current_dir(),
                    start: Some(entry.name.clone()),
                    filter: browser.filter().clone(),
                }
            } else if entry.name == CURRENT_DIR {
                Selection::Play {
                    dir: browser.current_dir(),
                    start: None,
                    filter: browser.filter().clone(),
                }
            } else {
                Selection::Enter(entry.name.clone())
            }
        };

        match selection {
            Selection::Play { dir, start, filter } => {
                self.start_playback(&dir, start.as_deref(), &filter)
            }
            Selection::Enter(name) => {
                if let Err(e) = lock(&self.browser).change_directory(&name) {
                    warn!("Cannot enter {}: {:#}", name, anyhow::Error::new(e));
                }
                lock(&self.player).reset_scroll();
                self.redraw.signal();
            }
        }
    }

    /// Replaces the playlist with the audio files of `dir` and hands over to
    /// the track advance worker.
    fn start_playback(&self, dir: &Path, start: Option<&str>, filter: &AudioFilter) {
        if let Err(e) = self.backend.halt() {
            warn!("Failed to halt playback: {}", e);
        }

        {
            let mut playlist = lock(&self.playlist);
            match playlist.replace_with_directory(dir, start, filter) {
                Ok(count) => info!("Queued {} tracks from {}", count, dir.display()),
                Err(e) => warn!("Nothing queued: {:#}", anyhow::Error::new(e)),
            }
            if playlist.is_empty() {
                info!("No audio to play in {}", dir.display());
            } else {
                debug!(
                    "Playlist: {:?}",
                    playlist.iter().map(|entry| entry.title.as_str()).collect::<Vec<_>>()
                );
            }

            let mut player = lock(&self.player);
            player.stop();
            player.mode = Mode::NowPlaying;
            player.reset_scroll();
        }

        self.track_queue.signal();
        self.redraw.signal();
    }

    fn toggle_pause(&self) {
        {
            let mut player = lock(&self.player);
            let result = match player.status() {
                Status::Playing => self.backend.pause(),
                Status::Paused => self.backend.resume(),
                Status::Stopped => return,
            };

            match result {
                Ok(()) => {
                    player.toggle_pause();
                }
                Err(e) => warn!("Failed to pause or resume: {}", e),
            }
        }
        self.redraw.signal();
    }

    fn change_volume(&self, louder: bool) {
        {
            let mut player = lock(&self.player);
            let current = player.volume();
            let next = if louder { current.up() } else { current.down() };

            if let Some(volume) = next {
                player.set_volume(volume);
                if let Err(e) = self.backend.set_volume(volume.level()) {
                    warn!("Failed to set volume: {}", e);
                }
            }
        }
        self.redraw.signal();
    }

    /// Skips ahead, treating a skip past the end as the end of the track.
    fn seek_forward(&self) {
        let finished = {
            let mut player = lock(&self.player);
            if player.status() == Status::Stopped {
                return;
            }

            let target = player.elapsed_seconds() + SEEK_STEP;
            match self.backend.seek_to(target) {
                Ok(()) => {
                    player.set_elapsed_seconds(target);
                    false
                }
                Err(e) => {
                    match e {
                        BackendError::SeekPastEnd(_) => debug!("{}", e),
                        _ => warn!("Seek failed, ending track: {}", e),
                    }
                    player.stop();
                    true
                }
            }
        };

        if finished {
            if let Err(e) = self.backend.halt() {
                warn!("Failed to halt playback: {}", e);
            }
            self.track_queue.signal();
        }
        self.redraw.signal();
    }

    /// Skips back, or to the start when near it.
    fn seek_back(&self) {
        {
            let mut player = lock(&self.player);
            if player.status() == Status::Stopped {
                return;
            }

            let target = player.elapsed_seconds().checked_sub(SEEK_STEP);
            match target.map(|target| (target, self.backend.seek_to(target))) {
                Some((target, Ok(()))) => player.set_elapsed_seconds(target),
                _ => {
                    if let Err(e) = self.backend.seek_to(0) {
                        warn!("Failed to rewind: {}", e);
                    }
                    player.reset_elapsed();
                }
            }
        }
        self.redraw.signal();
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        engine::{lock, tests::engine_with},
        input::Button,
        player::{
            Mode, Status, TrackId, Volume,
            mock::{Call, MockBackend},
        },
    };

    fn titles(engine: &crate::engine::Engine) -> Vec<String> {
        lock(&engine.playlist)
            .iter()
            .map(|entry| entry.title.clone())
            .collect()
    }

    fn press(engine: &crate::engine::Engine, buttons: &[Button]) {
        for button in buttons {
            engine.dispatch(*button);
        }
    }

    #[test]
    fn selecting_a_file_queues_it_and_the_rest_of_the_directory() {
        let (_dir, engine, backend) =
            engine_with(&["a.mp3", "b.mp3", "c.ogg"], MockBackend::new(180));

        // ".", "..", "a.mp3", "b.mp3", "c.ogg"
        press(&engine, &[Button::Down, Button::Down, Button::Down, Button::Select]);

        assert_eq!(titles(&engine), vec!["b.mp3", "c.ogg"]);
        let player = lock(&engine.player);
        assert_eq!(player.mode, Mode::NowPlaying);
        assert_eq!(player.status(), Status::Stopped);
        assert!(engine.track_queue.is_signalled());
        assert_eq!(backend.calls(), vec![Call::Halt]);
    }

    #[test]
    fn selected_track_plays_once_advanced() {
        let (_dir, engine, _) = engine_with(&["a.mp3", "b.mp3"], MockBackend::new(180));

        press(&engine, &[Button::Down, Button::Down, Button::Down, Button::Select]);
        engine.advance();

        let player = lock(&engine.player);
        assert_eq!(player.status(), Status::Playing);
        assert_eq!(player.title(), Some("b.mp3"));
        assert_eq!(player.elapsed_seconds(), 0);
        assert!(titles(&engine).is_empty());
    }

    #[test]
    fn last_file_in_a_directory_plays_alone() {
        let (_dir, engine, _) = engine_with(&["a.mp3", "b.mp3", "sub/"], MockBackend::new(180));

        // ".", "..", "sub", "a.mp3", "b.mp3"
        press(&engine, &[Button::Down, Button::Down, Button::Down, Button::Down]);
        let selected = lock(&engine.browser).selected().map(|entry| entry.name.clone());
        assert_eq!(selected.as_deref(), Some("b.mp3"));
        press(&engine, &[Button::Select]);

        assert_eq!(titles(&engine), vec!["b.mp3"]);

        engine.advance();

        assert_eq!(lock(&engine.player).title(), Some("b.mp3"));
        assert!(titles(&engine).is_empty());
    }

    #[test]
    fn selecting_current_directory_queues_everything() {
        let (_dir, engine, _) = engine_with(&["sub/", "a.mp3", "b.mp3"], MockBackend::new(180));

        press(&engine, &[Button::Select]);

        assert_eq!(titles(&engine), vec!["a.mp3", "b.mp3"]);
        assert_eq!(lock(&engine.player).mode, Mode::NowPlaying);
    }

    #[test]
    fn selecting_directories_moves_around_the_tree() {
        let (_dir, engine, _) = engine_with(&["sub/x.mp3"], MockBackend::new(180));

        // ".", "..", "sub"
        press(&engine, &[Button::Down, Button::Down, Button::Select]);
        assert!(lock(&engine.browser).current_dir().ends_with("sub"));
        assert_eq!(lock(&engine.browser).entries().len(), 3);

        // ".." is the second entry
        press(&engine, &[Button::Down, Button::Select]);
        assert!(!lock(&engine.browser).current_dir().ends_with("sub"));
        assert_eq!(lock(&engine.player).mode, Mode::Files);
    }

    #[test]
    fn cursor_moves_reset_the_marquee() {
        let (_dir, engine, _) = engine_with(&["a.mp3"], MockBackend::new(180));
        lock(&engine.player).advance_scroll();

        press(&engine, &[Button::Down]);

        assert_eq!(lock(&engine.browser).cursor(), Some(1));
        assert_eq!(lock(&engine.player).scroll_tick(), 0);
        assert!(engine.redraw.is_signalled());
    }

    #[test]
    fn mode_buttons_switch_screens_from_anywhere() {
        let (_dir, engine, _) = engine_with(&[], MockBackend::new(180));

        press(&engine, &[Button::Volume]);
        assert_eq!(lock(&engine.player).mode, Mode::Volume);
        press(&engine, &[Button::NowPlaying]);
        assert_eq!(lock(&engine.player).mode, Mode::NowPlaying);
        press(&engine, &[Button::Files]);
        assert_eq!(lock(&engine.player).mode, Mode::Files);
    }

    #[test]
    fn select_on_now_playing_toggles_pause() {
        let (_dir, engine, backend) = engine_with(&[], MockBackend::new(180));
        lock(&engine.player).start_track("a.mp3", TrackId::new(1));

        press(&engine, &[Button::NowPlaying, Button::Select]);
        assert_eq!(lock(&engine.player).status(), Status::Paused);

        press(&engine, &[Button::Select]);
        assert_eq!(lock(&engine.player).status(), Status::Playing);
        assert_eq!(backend.calls(), vec![Call::Pause, Call::Resume]);
    }

    #[test]
    fn select_while_stopped_does_nothing() {
        let (_dir, engine, backend) = engine_with(&[], MockBackend::new(180));

        press(&engine, &[Button::NowPlaying, Button::Select, Button::Up]);

        assert_eq!(lock(&engine.player).status(), Status::Stopped);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn volume_stops_at_both_ends() {
        let (_dir, engine, backend) = engine_with(&[], MockBackend::new(180));

        press(&engine, &[Button::Volume]);
        press(&engine, &[Button::Up; 10]);
        assert_eq!(lock(&engine.player).volume().index(), Volume::MAX);
        assert_eq!(backend.calls().last(), Some(&Call::Volume(128)));

        press(&engine, &[Button::Down; 20]);
        assert_eq!(lock(&engine.player).volume().index(), 0);
        assert_eq!(backend.calls().last(), Some(&Call::Volume(0)));
        assert_eq!(backend.calls().len(), Volume::MAX + Volume::MAX - 7);
    }

    #[test]
    fn seek_forward_moves_elapsed_time() {
        let (_dir, engine, backend) = engine_with(&[], MockBackend::new(180));
        lock(&engine.player).start_track("a.mp3", TrackId::new(1));
        lock(&engine.player).set_elapsed_seconds(5);

        press(&engine, &[Button::Forward]);

        assert_eq!(lock(&engine.player).elapsed_seconds(), 15);
        assert_eq!(backend.calls(), vec![Call::Seek(15)]);
    }

    #[test]
    fn seek_past_the_end_finishes_the_track() {
        let (_dir, engine, backend) = engine_with(&[], MockBackend::new(30));
        lock(&engine.player).start_track("a.mp3", TrackId::new(1));
        lock(&engine.player).set_elapsed_seconds(25);

        press(&engine, &[Button::Forward]);

        let player = lock(&engine.player);
        assert_eq!(player.status(), Status::Stopped);
        assert_eq!(player.elapsed_seconds(), 0);
        assert!(engine.track_queue.is_signalled());
        assert_eq!(backend.calls(), vec![Call::Seek(35), Call::Halt]);
    }

    #[test]
    fn seek_back_near_the_start_rewinds() {
        let (_dir, engine, backend) = engine_with(&[], MockBackend::new(180));
        lock(&engine.player).start_track("a.mp3", TrackId::new(1));
        lock(&engine.player).set_elapsed_seconds(7);

        press(&engine, &[Button::Back]);

        let player = lock(&engine.player);
        assert_eq!(player.elapsed_seconds(), 0);
        assert_eq!(player.status(), Status::Playing);
        assert_eq!(backend.calls(), vec![Call::Seek(0)]);
    }

    #[test]
    fn seek_back_skips_ten_seconds() {
        let (_dir, engine, backend) = engine_with(&[], MockBackend::new(180));
        lock(&engine.player).start_track("a.mp3", TrackId::new(1));
        lock(&engine.player).set_elapsed_seconds(42);

        press(&engine, &[Button::Back]);

        assert_eq!(lock(&engine.player).elapsed_seconds(), 32);
        assert_eq!(backend.calls(), vec![Call::Seek(32)]);
    }

    #[test]
    fn seeking_while_stopped_is_ignored() {
        let (_dir, engine, backend) = engine_with(&[], MockBackend::new(180));

        press(&engine, &[Button::Forward, Button::Back]);

        assert!(backend.calls().is_empty());
        assert!(!engine.track_queue.is_signalled());
    }
}
