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

//! Screen composition.
//!
//! This module turns the [`PlayerState`] and [`DirectoryBrowser`] into the
//! lines of text shown on the character display, one screen per [`Mode`].
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`compose`] function, called by the redraw
//! thread whenever something has changed. It always builds the whole screen;
//! working out which characters actually changed is left to the display.
//!
//! Displays with at least four rows get the tall layout, anything smaller
//! gets a two row summary of the same information.

mod browser;
mod player;

use crate::{
    browser::DirectoryBrowser,
    player::{Mode, PlayerState},
    util::format::truncate,
};

/// Rows needed for the tall layout.
const TALL_ROWS: usize = 4;

/// Builds the screen for the current mode.
///
/// Returns exactly `height` lines, none of them longer than `width`
/// characters.
///
/// # Arguments
///
/// * `player` - The playback state, which also selects the screen.
/// * `browser` - The directory listing shown on the files screen.
/// * `width` - Display width in characters.
/// * `height` - Display height in rows.
pub(crate) fn compose(
    player: &PlayerState,
    browser: &DirectoryBrowser,
    width: usize,
    height: usize,
) -> Vec<String> {
    let tall = height >= TALL_ROWS;

    let lines = match player.mode {
        Mode::Files => browser::draw_files(player, browser, width, tall),
        Mode::NowPlaying => player::draw_now_playing(player, width, tall),
        Mode::Volume => player::draw_volume(player, width, tall),
    };

    lines
        .into_iter()
        .map(|line| truncate(&line, width))
        .chain(std::iter::repeat(String::new()))
        .take(height)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        browser::{AudioFilter, tests::make_tree},
        player::{TrackId, Volume},
    };

    fn browser_for(paths: &[&str]) -> (tempfile::TempDir, DirectoryBrowser) {
        let dir = make_tree(paths);
        let mut browser = DirectoryBrowser::new(dir.path().to_path_buf(), AudioFilter::default());
        browser.change_directory(".").unwrap();
        (dir, browser)
    }

    #[test]
    fn every_screen_fills_the_display_exactly() {
        let (_dir, browser) = browser_for(&["a.mp3", "a-very-long-track-name-indeed.mp3"]);
        let mut player = PlayerState::new(Volume::default());
        player.start_track("a-very-long-track-name-indeed.mp3", TrackId::new(1));

        for mode in [Mode::Files, Mode::NowPlaying, Mode::Volume] {
            player.mode = mode;
            for (width, height) in [(16, 2), (20, 4)] {
                let lines = compose(&player, &browser, width, height);
                assert_eq!(lines.len(), height, "{:?} {}x{}", mode, width, height);
                for line in &lines {
                    assert!(line.chars().count() <= width, "{:?}: {:?}", mode, line);
                }
            }
        }
    }

    #[test]
    fn files_screen_on_a_four_line_display() {
        let (_dir, mut browser) = browser_for(&["sub/", "a.mp3", "b.mp3"]);
        browser.move_cursor(2);
        let player = PlayerState::new(Volume::default());

        let lines = compose(&player, &browser, 20, 4);

        assert_eq!(
            lines,
            vec![
                "Files          --:--".to_string(),
                " ..".to_string(),
                "-sub".to_string(),
                " a.mp3".to_string(),
            ]
        );
    }

    #[test]
    fn now_playing_when_stopped() {
        let (_dir, browser) = browser_for(&[]);
        let mut player = PlayerState::new(Volume::default());
        player.mode = Mode::NowPlaying;

        let lines = compose(&player, &browser, 20, 4);

        assert_eq!(lines[0].trim(), "Now Playing");
        assert_eq!(lines[1].trim(), "");
        assert_eq!(lines[2].trim(), "");
        assert_eq!(lines[3].trim(), "NO FILE");
    }

    #[test]
    fn now_playing_paused_on_a_two_line_display() {
        let (_dir, browser) = browser_for(&[]);
        let mut player = PlayerState::new(Volume::default());
        player.mode = Mode::NowPlaying;
        player.start_track("song.mp3", TrackId::new(1));
        player.set_elapsed_seconds(65);
        player.toggle_pause();

        let lines = compose(&player, &browser, 16, 2);

        assert_eq!(lines, vec!["PAUSED     01:05".to_string(), "song.mp3".to_string()]);
    }

    #[test]
    fn volume_bar_marks_the_current_step() {
        let (_dir, browser) = browser_for(&[]);
        let mut player = PlayerState::new(Volume::new(3));
        player.mode = Mode::Volume;

        let lines = compose(&player, &browser, 20, 4);

        assert_eq!(lines[0], "Volume         --:--");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "  |   +          |");
        assert_eq!(lines[3], "");
    }
}
