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

//! The playback and navigation engine.
//!
//! The [`Engine`] owns all state shared between threads: the directory
//! browser, the playlist and the player state, each behind its own lock,
//! together with the buffered button presses.
//!
//! # Threads
//!
//! * The **main thread** runs [`Engine::run`], dispatching buttons.
//! * A **redraw worker** composes the screen whenever the redraw signal is
//!   raised.
//! * A **scroll worker** advances the marquee animation.
//! * A **track advance worker** starts the next queued track whenever the
//!   track queue signal is raised.
//! * A **playback event worker** applies progress reports from the audio
//!   backend's own thread.
//!
//! # Locking
//!
//! When more than one lock is needed they are always taken in the order
//! browser, playlist, player. Signals are raised once locks are released.

mod advance;
mod dispatch;

use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc::Receiver},
    thread,
    time::Duration,
};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::{
    browser::{AudioFilter, CURRENT_DIR, DirectoryBrowser},
    display::Display,
    input::Button,
    player::{AudioBackend, PlaybackEvent, PlayerState, Volume},
    queue::Playlist,
    render,
    signal::EventSignal,
};

/// How often the background workers run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Timings {
    /// Time between marquee animation steps.
    pub(crate) scroll_interval: Duration,
    /// Pause after each screen write, letting further changes accumulate.
    pub(crate) redraw_delay: Duration,
    /// How often the main loop checks for buttons.
    pub(crate) button_poll: Duration,
}

pub(crate) struct Engine {
    browser: Mutex<DirectoryBrowser>,
    playlist: Mutex<Playlist>,
    player: Mutex<PlayerState>,
    buttons: Mutex<VecDeque<Button>>,

    redraw: EventSignal,
    track_queue: EventSignal,
    button: EventSignal,

    backend: Arc<dyn AudioBackend>,
}

/// Locks `mutex`, carrying on with the data if another thread panicked while
/// holding it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Engine {
    /// Creates the engine and lists the root directory.
    ///
    /// # Arguments
    ///
    /// * `root` - The directory the browser starts in and cannot leave.
    /// * `filter` - Recognises the audio files shown and queued.
    /// * `volume` - The starting volume.
    /// * `backend` - Plays the queued tracks.
    pub(crate) fn new(
        root: PathBuf,
        filter: AudioFilter,
        volume: Volume,
        backend: Arc<dyn AudioBackend>,
    ) -> Self {
        let mut browser = DirectoryBrowser::new(root, filter);
        if let Err(e) = browser.change_directory(CURRENT_DIR) {
            warn!("Failed to list the root directory: {:#}", anyhow::Error::new(e));
        }

        Self {
            browser: Mutex::new(browser),
            playlist: Mutex::new(Playlist::new()),
            player: Mutex::new(PlayerState::new(volume)),
            buttons: Mutex::new(VecDeque::new()),
            redraw: EventSignal::new("redraw"),
            track_queue: EventSignal::new("track queue"),
            button: EventSignal::new("button"),
            backend,
        }
    }

    /// Buffers a button press for the main loop.
    ///
    /// Safe to call from any thread.
    pub(crate) fn press_button(&self, button: Button) {
        lock(&self.buttons).push_back(button);
        self.button.signal();
    }

    /// Spawns the background workers.
    ///
    /// The backend is given the starting volume, and a first redraw and
    /// track advance are requested.
    pub(crate) fn start(
        self: &Arc<Self>,
        display: Box<dyn Display>,
        playback_rx: Receiver<PlaybackEvent>,
        timings: Timings,
    ) {
        let level = lock(&self.player).volume().level();
        if let Err(e) = self.backend.set_volume(level) {
            warn!("Failed to set the starting volume: {}", e);
        }

        self.redraw.arm();
        self.track_queue.arm();
        self.button.arm();

        spawn_redraw_worker(Arc::clone(self), display, timings.redraw_delay);
        spawn_scroll_worker(Arc::clone(self), timings.scroll_interval);
        spawn_advance_worker(Arc::clone(self));
        spawn_playback_worker(Arc::clone(self), playback_rx);

        self.track_queue.signal();
        self.redraw.signal();
    }

    /// Dispatches buttons until [`Button::Quit`] is pressed.
    pub(crate) fn run(&self, poll: Duration) {
        info!("Waiting for buttons");
        loop {
            if !self.button.try_take() {
                thread::sleep(poll);
                continue;
            }

            while let Some(button) = self.next_button() {
                if button == Button::Quit {
                    info!("Quit pressed");
                    return;
                }
                self.dispatch(button);
            }
        }
    }

    fn next_button(&self) -> Option<Button> {
        lock(&self.buttons).pop_front()
    }

    /// Composes the current screen and writes it to `display`.
    fn draw_screen(&self, display: &mut dyn Display) -> Result<()> {
        let lines = {
            let browser = lock(&self.browser);
            let player = lock(&self.player);
            render::compose(&player, &browser, display.width(), display.height())
        };
        display.write_lines(&lines)
    }

    /// Applies a progress report from the audio backend.
    ///
    /// Reports about any track other than the one loaded now arrived too late
    /// to matter and are dropped.
    fn handle_playback_event(&self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::AudioProduced { track, bytes } => {
                let changed = {
                    let mut player = lock(&self.player);
                    player.is_current(track) && player.add_audio(bytes)
                };
                if changed {
                    self.redraw.signal();
                }
            }
            PlaybackEvent::TrackFinished(track) => {
                if lock(&self.player).is_current(track) {
                    debug!("Track finished");
                    self.track_queue.signal();
                } else {
                    debug!("Ignoring the end of a replaced track");
                }
            }
            PlaybackEvent::TrackFailed(track) => {
                let stopped = {
                    let mut player = lock(&self.player);
                    let current = player.is_current(track);
                    if current {
                        player.stop();
                    }
                    current
                };
                if stopped {
                    warn!("Current track stopped playing");
                    self.redraw.signal();
                }
            }
        }
    }
}

/// Spawns the thread that owns the display.
fn spawn_redraw_worker(engine: Arc<Engine>, mut display: Box<dyn Display>, delay: Duration) {
    thread::spawn(move || {
        loop {
            engine.redraw.wait();
            if let Err(e) = engine.draw_screen(display.as_mut()) {
                warn!("Failed to update display: {:?}", e);
            }
            thread::sleep(delay);
        }
    });
}

/// Spawns a thread to step the marquee animation, effectively the "frame
/// rate" for scrolling text.
fn spawn_scroll_worker(engine: Arc<Engine>, interval: Duration) {
    thread::spawn(move || {
        loop {
            thread::sleep(interval);
            lock(&engine.player).advance_scroll();
            engine.redraw.signal();
        }
    });
}

fn spawn_advance_worker(engine: Arc<Engine>) {
    thread::spawn(move || {
        loop {
            engine.track_queue.wait();
            debug!("Woken by {} signal", engine.track_queue.name());
            engine.advance();
        }
    });
}

fn spawn_playback_worker(engine: Arc<Engine>, playback_rx: Receiver<PlaybackEvent>) {
    thread::spawn(move || {
        while let Ok(event) = playback_rx.recv() {
            engine.handle_playback_event(event);
        }
        info!("Audio backend closed its event channel");
    });
}
