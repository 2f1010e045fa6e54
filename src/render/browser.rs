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

//! Render the files screen.
//!
//! The entry under the cursor is marked with `-` and scrolls when it is too
//! wide, with its neighbours shown above and below it.

use crate::{
    browser::DirectoryBrowser,
    player::PlayerState,
    util::{
        format::{format_position, split_line},
        scroll::scroll_text,
    },
};

/// Renders the directory listing around the cursor.
pub(crate) fn draw_files(
    player: &PlayerState,
    browser: &DirectoryBrowser,
    width: usize,
    tall: bool,
) -> Vec<String> {
    let neighbour = |offset| {
        browser
            .entry_at(offset)
            .map(|entry| format!(" {}", entry.name))
            .unwrap_or_default()
    };

    let above = neighbour(-1);
    let selected = browser
        .selected()
        .map(|entry| {
            let visible = scroll_text(&entry.name, width.saturating_sub(1), player.scroll_tick());
            format!("-{}", visible)
        })
        .unwrap_or_default();

    if !tall {
        return vec![above, selected];
    }

    let title_line = split_line("Files", &format_position(player.position()), width);
    vec![title_line, above, selected, neighbour(1)]
}
