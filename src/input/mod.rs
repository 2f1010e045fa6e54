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

//! Button input.
//!
//! The player is driven by a handful of buttons. An [`InputSource`] produces
//! presses of them, whether they come from the keyboard or from lines of text
//! on standard input.
//!
//! * [`keys`]: Maps terminal key events to buttons.
//! * [`lines`]: Reads button names, one per line, for scripted use.

mod keys;
mod lines;

pub(crate) use keys::KeyboardInput;
pub(crate) use lines::LineInput;

use std::thread;

use tracing::{debug, info};

/// A button on the player.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Button {
    Up,
    Down,
    Select,
    Files,
    NowPlaying,
    Volume,
    Forward,
    Back,
    Quit,
}

/// Something that produces button presses.
pub(crate) trait InputSource: Send {
    /// Blocks until the next button is pressed.
    ///
    /// Returns `None` once the source is exhausted and will never produce
    /// another press.
    fn next_button(&mut self) -> Option<Button>;
}

/// Spawns a thread that forwards presses from `source` to `on_press`.
///
/// When the source is exhausted a final [`Button::Quit`] is delivered so the
/// application shuts down rather than waiting for input that will never come.
pub(crate) fn spawn_input_worker<F>(mut source: Box<dyn InputSource>, on_press: F)
where
    F: Fn(Button) + Send + 'static,
{
    thread::spawn(move || {
        while let Some(button) = source.next_button() {
            debug!("Button pressed: {:?}", button);
            on_press(button);
        }

        info!("Input exhausted, quitting");
        on_press(Button::Quit);
    });
}
