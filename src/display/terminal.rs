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

//! A character LCD simulated in the terminal.

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{display::Display, theme::Theme};

/// Draws a `width` x `height` grid of characters in the middle of the
/// terminal.
pub(crate) struct TerminalDisplay {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    theme: Theme,
    width: usize,
    height: usize,
}

impl TerminalDisplay {
    /// Takes over standard output for drawing.
    ///
    /// The terminal should already have been prepared with
    /// [`setup_terminal`].
    pub(crate) fn new(width: usize, height: usize, theme: Theme) -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        Ok(Self {
            terminal,
            theme,
            width,
            height,
        })
    }
}

impl Display for TerminalDisplay {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        let (width, height, theme) = (self.width, self.height, self.theme);
        self.terminal
            .draw(|f| draw_lcd(f, lines, width, height, &theme))
            .context("Failed to draw display")?;
        Ok(())
    }
}

/// Renders the glass and bezel of the display, centred in the frame.
fn draw_lcd(f: &mut Frame, lines: &[String], width: usize, height: usize, theme: &Theme) {
    let area = f.area();

    // +2 for the bezel on each side
    let outer_width = (width as u16 + 2).min(area.width);
    let outer_height = (height as u16 + 2).min(area.height);
    let x = area.width.saturating_sub(outer_width) / 2;
    let y = area.height.saturating_sub(outer_height) / 2;
    let lcd_area = Rect::new(x, y, outer_width, outer_height);

    f.render_widget(Clear, lcd_area);

    let bezel = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.bezel_style());
    let glass = bezel.inner(lcd_area);
    f.render_widget(bezel, lcd_area);

    let rows: Vec<Line> = (0..height)
        .map(|row| {
            let text = lines.get(row).map(String::as_str).unwrap_or_default();
            Line::from(format!("{:<width$}", text, width = width))
        })
        .collect();

    f.render_widget(Paragraph::new(rows).style(theme.glass_style()), glass);
}

/// Prepares the terminal for the simulated display.
///
/// This function performs the following side effects:
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
pub(crate) fn setup_terminal() -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Ok(())
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`] and makes the cursor
/// visible again. It is "best-effort" and does not return a result, as it is
/// typically called during cleanup.
pub(crate) fn restore_terminal() {
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show).ok();
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;

    #[test]
    fn lcd_is_centred_inside_a_bezel() {
        let mut terminal = Terminal::new(TestBackend::new(20, 4)).unwrap();
        let lines = vec!["Hi".to_string(), "there".to_string()];

        terminal
            .draw(|f| draw_lcd(f, &lines, 16, 2, &Theme::default()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row = |y: u16| -> String {
            (0..20u16).map(|x| buffer[(x, y)].symbol().to_string()).collect()
        };
        assert_eq!(row(1), " │Hi              │ ");
        assert_eq!(row(2), " │there           │ ");
    }
}
