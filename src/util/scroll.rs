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

//! Marquee animation for text wider than a display line.
//!
//! Over-long text is shown still for a few ticks, slides left one character
//! per tick until its end is visible, holds there, and then starts again.

/// Ticks spent holding the text still at the start of each cycle.
const LEAD_STEPS: usize = 5;

/// Extra ticks added to every cycle on top of the sliding distance, covering
/// the hold at the start and at the end.
const HOLD_STEPS: usize = 10;

/// Returns the visible part of `text` for animation tick `tick`.
///
/// Text of at most `length` characters is returned unchanged. Longer text is
/// returned from some character offset onwards; the caller truncates it to
/// the display width. Offsets are counted in characters, so the returned
/// slice always starts on a character boundary.
pub(crate) fn scroll_text(text: &str, length: usize, tick: u32) -> &str {
    let len = text.chars().count();

    let overflow = match len.checked_sub(length) {
        Some(overflow) if overflow > 0 => overflow,
        _ => return text,
    };

    let steps = overflow + HOLD_STEPS;
    let phase = tick as usize % steps;
    if phase <= LEAD_STEPS {
        return text;
    }

    let offset = (phase - LEAD_STEPS).min(overflow);
    match text.char_indices().nth(offset) {
        Some((index, _)) => &text[index..],
        None => text,
    }
}
