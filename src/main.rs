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

//! # LCD Music Player.
//!
//! A music player for a small character LCD and a handful of buttons.
//!
//! The player browses the directory it is started in, queues the audio files
//! found there, and shows what it is doing on a 2x16 or 4x20 display. The
//! display can be simulated in the terminal, with the keyboard standing in
//! for the buttons, or printed to stderr with button names read from stdin.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern. The display
//! and the audio backend are both initialised before any worker thread is
//! started, and a failure in either ends the process with a non-zero exit
//! code. Everything after that is owned by the [`engine::Engine`], whose
//! worker threads communicate through shared state and wake-up signals.

mod browser;
mod config;
mod display;
mod engine;
mod input;
mod player;
mod queue;
mod render;
mod signal;
mod theme;
mod util;

use std::{
    env,
    io::{self, BufReader},
    panic,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::{Arc, mpsc},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::{
    browser::AudioFilter,
    config::{AppConfig, Frontend},
    display::{ConsoleDisplay, Display, TerminalDisplay},
    engine::{Engine, Timings},
    input::{InputSource, KeyboardInput, LineInput},
    player::{MpvBackend, Volume},
    theme::Theme,
};

const LOG_FILE: &str = "lcdplay.log";

#[derive(Parser, Debug)]
#[command(version, about = "Music player for a character LCD and a few buttons")]
struct Cli {
    /// Directory to browse for music, the current directory if omitted
    root: Option<PathBuf>,
}

/// The entry point of the application.
///
/// Loads the configuration, starts logging, moves to the music directory and
/// runs the player until quit.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, config_error) = match config::load_config() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    let _log_guard = match init_logging(&config.log_dir()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {:#}", e);
            None
        }
    };

    if let Some(e) = config_error {
        warn!("Failed to load configuration, using defaults: {}", e);
    }

    if let Some(root) = &cli.root {
        if let Err(e) = env::set_current_dir(root) {
            error!("Cannot change to {}: {}", root.display(), e);
            eprintln!("Cannot change to {}: {}", root.display(), e);
            return ExitCode::FAILURE;
        }
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sends log output to a file, leaving the terminal to the display.
///
/// The returned guard flushes the log when dropped, so it must be kept alive
/// until the application exits.
fn init_logging(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(guard)
}

/// Initialises the display and audio, then runs the player until quit.
///
/// # Errors
///
/// Returns an error if the display or the audio backend cannot be
/// initialised. Nothing is started in that case.
fn run(config: &AppConfig) -> Result<()> {
    let root = env::current_dir().context("Failed to read the current directory")?;

    let (display, input) = open_frontend(config)?;

    let (playback_tx, playback_rx) = mpsc::channel();
    let backend = match MpvBackend::new(playback_tx).context("Failed to initialise audio") {
        Ok(backend) => backend,
        Err(e) => {
            close_frontend(config.frontend);
            return Err(e);
        }
    };

    info!("Browsing {}", root.display());

    let engine = Arc::new(Engine::new(
        root,
        AudioFilter::new(&config.extensions),
        Volume::new(config.volume),
        Arc::new(backend),
    ));

    let timings = Timings {
        scroll_interval: config.scroll_interval(),
        redraw_delay: config.redraw_delay(),
        button_poll: config.button_poll(),
    };
    engine.start(display, playback_rx, timings);

    let input_engine = Arc::clone(&engine);
    input::spawn_input_worker(input, move |button| input_engine.press_button(button));

    engine.run(timings.button_poll);

    close_frontend(config.frontend);
    info!("Shut down");
    Ok(())
}

/// Creates the display and the button source for the configured frontend.
fn open_frontend(config: &AppConfig) -> Result<(Box<dyn Display>, Box<dyn InputSource>)> {
    let (width, height) = (config.screen.width(), config.screen.height());

    match config.frontend {
        Frontend::Terminal => {
            // Put the terminal back before any panic message is printed
            let original_hook = panic::take_hook();
            panic::set_hook(Box::new(move |panic_info| {
                display::restore_terminal();
                original_hook(panic_info);
            }));

            if let Err(e) = display::setup_terminal() {
                display::restore_terminal();
                return Err(e.context("Failed to initialise display"));
            }
            let display = match TerminalDisplay::new(width, height, Theme::default()) {
                Ok(display) => display,
                Err(e) => {
                    display::restore_terminal();
                    return Err(e.context("Failed to initialise display"));
                }
            };
            Ok((Box::new(display), Box::new(KeyboardInput)))
        }
        Frontend::Console => {
            let display = ConsoleDisplay::new(io::stderr(), width, height);
            let input = LineInput::new(BufReader::new(io::stdin()));
            Ok((Box::new(display), Box::new(input)))
        }
    }
}

fn close_frontend(frontend: Frontend) {
    if frontend == Frontend::Terminal {
        display::restore_terminal();
    }
}
