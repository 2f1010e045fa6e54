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

//! Simulated buttons read from text, one button name per line.

use std::io::BufRead;

use tracing::{debug, warn};

use crate::input::{Button, InputSource};

/// Reads button names such as `up`, `play` or `quit` from a reader.
pub(crate) struct LineInput<R> {
    reader: R,
}

impl<R: BufRead + Send> LineInput<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead + Send> InputSource for LineInput<R> {
    fn next_button(&mut self) -> Option<Button> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    if let Some(button) = parse_line(&line) {
                        return Some(button);
                    }
                    debug!("Ignoring unknown button {:?}", line.trim());
                }
                Err(e) => {
                    warn!("Failed to read button input: {}", e);
                    return None;
                }
            }
        }
    }
}

/// Parses the button named on `line`, ignoring case and surrounding space.
fn parse_line(line: &str) -> Option<Button> {
    let button = match line.trim().to_ascii_lowercase().as_str() {
        "up" => Button::Up,
        "down" => Button::Down,
        "play" | "select" => Button::Select,
        "files" | "file" => Button::Files,
        "now" => Button::NowPlaying,
        "vol" | "volume" => Button::Volume,
        "ff" | "forward" => Button::Forward,
        "rw" | "back" => Button::Back,
        "quit" => Button::Quit,
        _ => return None,
    };
    Some(button)
}
