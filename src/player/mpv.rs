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

//! MPV-backed audio playback engine and event processing.
//!
//! This module provides an [`AudioBackend`] built on `libmpv`. A dedicated
//! worker thread owns the MPV context; [`MpvBackend`] is a handle that sends
//! it commands and waits for each to be carried out.
//!
//! # Architecture
//!
//! The engine operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`AudioPlayerCommand`]s, each paired with
//!    a reply channel, to control playback (load, pause, seek, etc.).
//! 2. **Event Channel**: Broadcasts [`PlaybackEvent`]s for audio produced and
//!    tracks ending or failing, each tagged with the track it is about.
//!
//! MPV opens files in the background. The reply to a load is held back until
//! MPV reports the file as loaded or failed, so a file that cannot be decoded
//! is a load failure rather than a track that never makes progress.
//!
//! MPV reports a playback position rather than a stream of samples, so the
//! worker converts each small forward step of `time-pos` into the number of
//! bytes a 22.05kHz 16-bit stereo stream would have produced over it.

use std::{
    fmt::Display,
    fs::File,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        mpsc::{self, Receiver, Sender, TryRecvError},
    },
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use mpv::Format;
use tracing::{debug, info, warn};

use crate::player::{
    AudioBackend, BYTES_PER_FRAME, BackendError, MAX_LEVEL, PlaybackEvent, SAMPLE_RATE, TrackId,
};

/// Position jumps larger than this are seeks, not playback.
const MAX_PROGRESS_STEP: f64 = 1.0;

/// Longest wait for MPV to accept or reject a file.
const LOAD_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
enum AudioPlayerCommand {
    PlayFile(PathBuf, TrackId),
    Stop,
    Pause,
    Resume,
    Seek(u64),
    SetVolume(u8),
}

type Reply = Sender<Result<(), BackendError>>;

/// A handle to the MPV worker thread.
pub(crate) struct MpvBackend {
    command_tx: Sender<(AudioPlayerCommand, Reply)>,
    loads: AtomicU64,
}

impl MpvBackend {
    /// Spawns the audio worker thread and waits for MPV to initialise.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send playback progress and track completion
    ///   back to the application.
    ///
    /// # Errors
    ///
    /// Returns an error if the MPV context cannot be created.
    pub(crate) fn new(event_tx: Sender<PlaybackEvent>) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        spawn_player_worker(command_rx, event_tx, ready_tx);

        ready_rx
            .recv()
            .context("MPV worker exited during start up")?
            .context("Failed to initialise MPV")?;

        Ok(Self {
            command_tx,
            loads: AtomicU64::new(0),
        })
    }

    fn request(&self, command: AudioPlayerCommand) -> Result<(), BackendError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.command_tx
            .send((command, reply_tx))
            .map_err(|_| BackendError::Disconnected)?;
        reply_rx.recv().map_err(|_| BackendError::Disconnected)?
    }
}

impl AudioBackend for MpvBackend {
    fn load_and_play(&self, path: &Path) -> Result<TrackId, BackendError> {
        let track = TrackId::new(self.loads.fetch_add(1, Ordering::Relaxed) + 1);
        self.request(AudioPlayerCommand::PlayFile(path.to_path_buf(), track))?;
        Ok(track)
    }

    fn halt(&self) -> Result<(), BackendError> {
        self.request(AudioPlayerCommand::Stop)
    }

    fn pause(&self) -> Result<(), BackendError> {
        self.request(AudioPlayerCommand::Pause)
    }

    fn resume(&self) -> Result<(), BackendError> {
        self.request(AudioPlayerCommand::Resume)
    }

    fn seek_to(&self, seconds: u64) -> Result<(), BackendError> {
        self.request(AudioPlayerCommand::Seek(seconds))
    }

    fn set_volume(&self, level: u8) -> Result<(), BackendError> {
        self.request(AudioPlayerCommand::SetVolume(level))
    }
}

/// What the worker knows about the loaded track.
#[derive(Default)]
struct Progress {
    duration: Option<f64>,
    last_position: Option<f64>,
    paused: bool,
}

impl Progress {
    /// Returns the bytes of audio produced by moving to `position`, if the
    /// move looks like ordinary playback.
    fn advance_to(&mut self, position: f64) -> Option<u64> {
        let last = self.last_position.replace(position)?;
        let step = position - last;
        if self.paused || step <= 0.0 || step > MAX_PROGRESS_STEP {
            return None;
        }
        Some((step * (SAMPLE_RATE * BYTES_PER_FRAME) as f64) as u64)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// How MPV says a file ended.
#[derive(Debug, PartialEq)]
enum Ending {
    /// Played through.
    Finished,
    /// Stopped or replaced on request.
    Stopped,
    /// Could not be opened or decoded.
    Failed(String),
}

fn ending<E: Display>(result: &Result<mpv::EndFileReason, E>) -> Ending {
    match result {
        Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF) => Ending::Finished,
        Ok(
            mpv::EndFileReason::MPV_END_FILE_REASON_STOP
            | mpv::EndFileReason::MPV_END_FILE_REASON_QUIT,
        ) => Ending::Stopped,
        Ok(reason) => Ending::Failed(format!("{:?}", reason)),
        Err(e) => Ending::Failed(e.to_string()),
    }
}

/// A load waiting for MPV to accept or reject the file.
///
/// MPV opens files asynchronously, so the reply to the loader is held back
/// until the file has either loaded or failed.
struct PendingLoad {
    path: PathBuf,
    reply: Reply,
    /// Set once MPV starts on this file; anything earlier is about the file
    /// it replaced.
    started: bool,
    deadline: Instant,
}

impl PendingLoad {
    fn finish(self, result: Result<(), String>) {
        let result = result.map_err(|reason| BackendError::Load {
            path: self.path,
            reason,
        });
        let _ = self.reply.send(result);
    }
}

/// The worker's view of the track MPV is playing.
#[derive(Default)]
struct WorkerState {
    track: Option<TrackId>,
    progress: Progress,
    pending: Option<PendingLoad>,
}

impl WorkerState {
    fn begin_load(&mut self, path: PathBuf, track: TrackId, reply: Reply, now: Instant) {
        self.abandon_load();
        self.track = Some(track);
        self.progress.reset();
        self.pending = Some(PendingLoad {
            path,
            reply,
            started: false,
            deadline: now + LOAD_TIMEOUT,
        });
    }

    fn abandon_load(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.finish(Err("replaced before it loaded".to_string()));
        }
    }

    /// Forgets the current track, failing any load still in progress.
    fn clear(&mut self) {
        self.clear_with(Err("stopped before it loaded".to_string()));
    }

    fn clear_with(&mut self, result: Result<(), String>) {
        if let Some(pending) = self.pending.take() {
            pending.finish(result);
        }
        self.track = None;
        self.progress.reset();
    }

    fn check_deadline(&mut self, now: Instant) {
        if let Some(pending) = self.pending.take_if(|pending| now >= pending.deadline) {
            warn!("Timed out loading {}", pending.path.display());
            pending.finish(Err("timed out waiting for the file to load".to_string()));
            self.track = None;
        }
    }

    fn file_started(&mut self) {
        if let Some(pending) = &mut self.pending {
            pending.started = true;
        }
    }

    fn file_loaded(&mut self) {
        if let Some(pending) = self.pending.take_if(|pending| pending.started) {
            info!("Playing track: {}", pending.path.display());
            pending.finish(Ok(()));
        }
    }

    /// Applies the end of a file, returning what to report about it.
    fn file_ended(&mut self, ending: Ending) -> Option<PlaybackEvent> {
        if let Some(pending) = &self.pending {
            if !pending.started {
                debug!("Replaced file ended: {:?}", ending);
                return None;
            }
            let reason = match ending {
                Ending::Failed(reason) => reason,
                Ending::Finished | Ending::Stopped => "ended before it loaded".to_string(),
            };
            self.clear_with(Err(reason));
            return None;
        }

        match ending {
            Ending::Finished => {
                self.progress.reset();
                self.track.take().map(PlaybackEvent::TrackFinished)
            }
            Ending::Failed(reason) => {
                warn!("Playback failed: {}", reason);
                self.progress.reset();
                self.track.take().map(PlaybackEvent::TrackFailed)
            }
            Ending::Stopped => None,
        }
    }

    fn position_changed(&mut self, seconds: f64) -> Option<PlaybackEvent> {
        let bytes = self.progress.advance_to(seconds)?;
        self.track.map(|track| PlaybackEvent::AudioProduced { track, bytes })
    }
}

/// Spawns the audio worker thread to process playback commands.
///
/// The result of initialising MPV is reported on `ready_tx` before any
/// command is processed. Failures after that are logged, and the worker
/// stops.
fn spawn_player_worker(
    command_rx: Receiver<(AudioPlayerCommand, Reply)>,
    event_tx: Sender<PlaybackEvent>,
    ready_tx: Sender<Result<()>>,
) {
    thread::spawn(move || {
        let mut handler = match create_handler() {
            Ok(handler) => {
                let _ = ready_tx.send(Ok(()));
                handler
            }
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };

        if let Err(e) = audio_player_worker(&mut handler, command_rx, event_tx) {
            warn!("MPV worker failure: {:?}", e);
        }
    });
}

/// Creates the MPV context and subscribes to the properties the worker
/// follows.
fn create_handler() -> Result<mpv::MpvHandler> {
    let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
    builder
        .set_option("vo", "null")
        .context("Failed to set no video output")?;
    let mut handler = builder.build().context("Failed to build MPV handler")?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;

    Ok(handler)
}

/// The primary execution loop for the audio player backend.
///
/// Alternates between draining pending commands and waiting briefly for MPV
/// events, until every [`MpvBackend`] handle has been dropped.
fn audio_player_worker(
    handler: &mut mpv::MpvHandler,
    command_rx: Receiver<(AudioPlayerCommand, Reply)>,
    event_tx: Sender<PlaybackEvent>,
) -> Result<()> {
    let mut state = WorkerState::default();

    while process_commands(handler, &command_rx, &mut state) {
        process_mpv_events(handler, &mut state, &event_tx)?;
    }

    state.clear();
    debug!("MPV worker shutting down");
    Ok(())
}

/// Drains and executes all pending commands.
///
/// Returns `false` once the command channel has been closed.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<(AudioPlayerCommand, Reply)>,
    state: &mut WorkerState,
) -> bool {
    loop {
        match command_rx.try_recv() {
            Ok((command, reply)) => execute_command(handler, command, reply, state),
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}

/// Carries out `command` and replies to it, except for a successfully
/// started load, whose reply waits for MPV to report on the file.
fn execute_command(
    handler: &mut mpv::MpvHandler,
    command: AudioPlayerCommand,
    reply: Reply,
    state: &mut WorkerState,
) {
    let result = match command {
        AudioPlayerCommand::PlayFile(path, track) => match load_file(handler, &path) {
            Ok(()) => {
                debug!("Loading {}", path.display());
                state.begin_load(path, track, reply, Instant::now());
                return;
            }
            Err(e) => Err(e),
        },
        AudioPlayerCommand::Stop => {
            state.clear();
            handler.command(&["stop"]).map_err(backend_error)
        }
        AudioPlayerCommand::Pause => handler.set_property("pause", true).map_err(backend_error),
        AudioPlayerCommand::Resume => handler.set_property("pause", false).map_err(backend_error),
        AudioPlayerCommand::Seek(seconds) => seek(handler, seconds, &mut state.progress),
        AudioPlayerCommand::SetVolume(level) => {
            let percent = f64::from(level) * 100.0 / f64::from(MAX_LEVEL);
            handler.set_property("volume", percent).map_err(backend_error)
        }
    };

    let _ = reply.send(result);
}

/// Asks MPV to replace whatever is playing with `path`.
fn load_file(handler: &mut mpv::MpvHandler, path: &Path) -> Result<(), BackendError> {
    let load_error = |reason: String| BackendError::Load {
        path: path.to_path_buf(),
        reason,
    };

    File::open(path).map_err(|e| load_error(e.to_string()))?;
    let filename = path
        .to_str()
        .ok_or_else(|| load_error("path is not valid UTF-8".to_string()))?;

    handler
        .command(&["loadfile", filename, "replace"])
        .map_err(|e| load_error(e.to_string()))?;
    handler.set_property("pause", false).map_err(backend_error)
}

fn seek(
    handler: &mut mpv::MpvHandler,
    seconds: u64,
    progress: &mut Progress,
) -> Result<(), BackendError> {
    if progress.duration.is_some_and(|duration| seconds as f64 >= duration) {
        return Err(BackendError::SeekPastEnd(seconds));
    }
    handler
        .command(&["seek", &seconds.to_string(), "absolute"])
        .map_err(backend_error)?;
    progress.last_position = None;
    Ok(())
}

fn backend_error<E: Display>(e: E) -> BackendError {
    BackendError::Backend(e.to_string())
}

/// Polls for MPV events and reports progress to the application.
///
/// This function waits for up to 50ms for an event from the MPV context.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    state: &mut WorkerState,
    event_tx: &Sender<PlaybackEvent>,
) -> Result<()> {
    state.check_deadline(Instant::now());

    let Some(mpv_event) = handler.wait_event(0.05) else {
        return Ok(());
    };

    let playback_event = match mpv_event {
        mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
            ("duration", Format::Double(duration)) => {
                state.progress.duration = Some(duration);
                None
            }
            ("pause", Format::Flag(pause)) => {
                state.progress.paused = pause;
                None
            }
            ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                state.position_changed(seconds)
            }
            _ => None,
        },
        mpv::Event::StartFile => {
            state.file_started();
            None
        }
        mpv::Event::FileLoaded => {
            state.file_loaded();
            None
        }
        mpv::Event::EndFile(result) => state.file_ended(ending(&result)),
        _ => None,
    };

    if let Some(event) = playback_event {
        event_tx.send(event).context("Failed to send playback event")?;
    }

    Ok(())
}
