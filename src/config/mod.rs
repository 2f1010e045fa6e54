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

//! Application configuration.
//!
//! This module manages the application configuration file.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "lcdplay";

/// The character display being driven.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum ScreenType {
    Lcd2x16,
    Lcd4x20,
}

impl ScreenType {
    pub fn width(self) -> usize {
        match self {
            ScreenType::Lcd2x16 => 16,
            ScreenType::Lcd4x20 => 20,
        }
    }

    pub fn height(self) -> usize {
        match self {
            ScreenType::Lcd2x16 => 2,
            ScreenType::Lcd4x20 => 4,
        }
    }
}

/// Where the display is shown and buttons are read from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Frontend {
    /// A simulated LCD in the terminal, driven by the keyboard.
    Terminal,
    /// Screens printed to stderr, with button names read from stdin.
    Console,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub version: u32,
    pub screen: ScreenType,
    pub frontend: Frontend,
    pub volume: usize,
    pub scroll_interval_ms: u64,
    pub redraw_delay_ms: u64,
    pub button_poll_ms: u64,
    pub extensions: Vec<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            screen: ScreenType::Lcd4x20,
            frontend: Frontend::Terminal,
            volume: 7,
            scroll_interval_ms: 350,
            redraw_delay_ms: 30,
            button_poll_ms: 50,
            extensions: vec!["mp3".to_string(), "ogg".to_string()],
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }

    pub fn redraw_delay(&self) -> Duration {
        Duration::from_millis(self.redraw_delay_ms)
    }

    pub fn button_poll(&self) -> Duration {
        Duration::from_millis(self.button_poll_ms)
    }

    /// Directory the log file is written to, the system temporary directory
    /// unless configured.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Loads the configuration file, creating it with defaults if missing.
pub fn load_config() -> Result<AppConfig, confy::ConfyError> {
    confy::load(CONFIG_NAME, None)
}
