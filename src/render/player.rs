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

//! Render the now playing and volume screens.

use crate::{
    player::{PlayerState, Status, Volume},
    util::{
        format::{center, format_position, split_line},
        scroll::scroll_text,
    },
};

/// Width the volume bar is centred against.
const VOLUME_BAR_SPAN: usize = 16;

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Playing => "PLAYING",
        Status::Paused => "PAUSED",
        Status::Stopped => "NO FILE",
    }
}

/// Renders the current track, its position and the transport status.
pub(crate) fn draw_now_playing(player: &PlayerState, width: usize, tall: bool) -> Vec<String> {
    let title = player
        .title()
        .map(|title| scroll_text(title, width, player.scroll_tick()).to_string())
        .unwrap_or_default();
    let label = status_label(player.status());

    if !tall {
        let status_line = split_line(label, &format_position(player.position()), width);
        return vec![status_line, title];
    }

    let position = player
        .position()
        .map(|seconds| center(&format_position(Some(seconds)), width))
        .unwrap_or_default();

    vec![
        center("Now Playing", width),
        position,
        title,
        center(label, width),
    ]
}

/// Renders the volume as a bar with a marker at the current step.
pub(crate) fn draw_volume(player: &PlayerState, width: usize, tall: bool) -> Vec<String> {
    let title_line = split_line("Volume", &format_position(player.position()), width);
    let bar = volume_bar(player.volume(), width);

    if tall {
        vec![title_line, String::new(), bar, String::new()]
    } else {
        vec![title_line, bar]
    }
}

fn volume_bar(volume: Volume, width: usize) -> String {
    let indent = width.saturating_sub(VOLUME_BAR_SPAN) / 2;
    let index = volume.index();
    format!(
        "{:indent$}|{:index$}+{:rest$}|",
        "",
        "",
        "",
        indent = indent,
        index = index,
        rest = Volume::MAX - index,
    )
}
