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

/// Formats a duration in seconds into a human-readable `MM:SS` string.
///
/// This is used for the track position shown in the corner of most screens.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_time(65), "01:05");
/// assert_eq!(format_time(3600), "60:00");
/// ```
pub(crate) fn format_time(total_seconds: u64) -> String {
    let mins = total_seconds / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Formats the playback position, or `--:--` when nothing is loaded.
pub(crate) fn format_position(seconds: Option<u64>) -> String {
    match seconds {
        Some(seconds) => format_time(seconds),
        None => "--:--".to_string(),
    }
}

/// Lays out `label` on the left and `right` flush against the right edge of a
/// line `width` characters wide.
pub(crate) fn split_line(label: &str, right: &str, width: usize) -> String {
    let gap = width.saturating_sub(right.chars().count());
    format!("{:<gap$}{}", label, right, gap = gap)
}

/// Centres `text` within `width` characters, padding with spaces on both
/// sides.
pub(crate) fn center(text: &str, width: usize) -> String {
    format!("{:^width$}", text, width = width)
}

/// Truncates `line` to at most `width` characters.
pub(crate) fn truncate(line: &str, width: usize) -> String {
    line.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(3600), "60:00");
    }

    #[test]
    fn position_placeholder_when_stopped() {
        assert_eq!(format_position(None), "--:--");
        assert_eq!(format_position(Some(9)), "00:09");
    }

    #[test]
    fn split_line_pushes_right_text_to_the_edge() {
        assert_eq!(split_line("Files", "01:05", 16), "Files      01:05");
        assert_eq!(split_line("Files", "01:05", 16).len(), 16);
    }

    #[test]
    fn center_pads_both_sides() {
        assert_eq!(center("PAUSED", 20), "       PAUSED       ");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("ééééé", 3), "ééé");
        assert_eq!(truncate("ab", 3), "ab");
    }
}
