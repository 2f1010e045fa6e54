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

//! Keyboard buttons.
//!
//! The keys are laid out so the player can be used one-handed from the
//! keyboard, with vi-style alternatives for navigation:
//!
//! | Key                 | Button        |
//! |---------------------|---------------|
//! | `Up` / `k`          | Up            |
//! | `Down` / `j`        | Down          |
//! | `Enter` / `Space`   | Select (play) |
//! | `1` / `f`           | Files         |
//! | `2` / `n`           | Now playing   |
//! | `3` / `v`           | Volume        |
//! | `Right` / `.` / `l` | Forward       |
//! | `Left` / `,` / `h`  | Back          |
//! | `q` / `Esc` / `^C`  | Quit          |

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::input::{Button, InputSource};

/// Reads key presses from the terminal, which must be in raw mode.
pub(crate) struct KeyboardInput;

impl InputSource for KeyboardInput {
    fn next_button(&mut self) -> Option<Button> {
        loop {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(button) = map_key(key) {
                        return Some(button);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to read terminal event: {}", e);
                    return None;
                }
            }
        }
    }
}

/// Maps a key event to the button it stands for, if any.
fn map_key(key: KeyEvent) -> Option<Button> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let button = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Button::Quit,
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Button::Quit,

        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Button::Up,
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Button::Down,
        (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => Button::Select,

        (KeyCode::Char('1'), _) | (KeyCode::Char('f'), _) => Button::Files,
        (KeyCode::Char('2'), _) | (KeyCode::Char('n'), _) => Button::NowPlaying,
        (KeyCode::Char('3'), _) | (KeyCode::Char('v'), _) => Button::Volume,

        (KeyCode::Char('.'), _) | (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Button::Forward,
        (KeyCode::Char(','), _) | (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Button::Back,

        _ => return None,
    };

    Some(button)
}
