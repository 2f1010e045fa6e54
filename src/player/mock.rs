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

//! A recording [`AudioBackend`] for tests.

use std::{
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::player::{AudioBackend, BackendError, TrackId};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Load(PathBuf),
    Halt,
    Pause,
    Resume,
    Seek(u64),
    Volume(u8),
}

/// Records every call and pretends every track is `track_length` seconds
/// long.
///
/// Successful loads are numbered from 1.
pub(crate) struct MockBackend {
    calls: Mutex<Vec<Call>>,
    loads: AtomicU64,
    track_length: u64,
    fail_loads: bool,
}

impl MockBackend {
    pub(crate) fn new(track_length: u64) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            loads: AtomicU64::new(0),
            track_length,
            fail_loads: false,
        }
    }

    pub(crate) fn failing_loads() -> Self {
        Self {
            fail_loads: true,
            ..Self::new(180)
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AudioBackend for MockBackend {
    fn load_and_play(&self, path: &Path) -> Result<TrackId, BackendError> {
        self.record(Call::Load(path.to_path_buf()));
        if self.fail_loads {
            return Err(BackendError::Load {
                path: path.to_path_buf(),
                reason: "mock".to_string(),
            });
        }
        Ok(TrackId::new(self.loads.fetch_add(1, Ordering::SeqCst) + 1))
    }

    fn halt(&self) -> Result<(), BackendError> {
        self.record(Call::Halt);
        Ok(())
    }

    fn pause(&self) -> Result<(), BackendError> {
        self.record(Call::Pause);
        Ok(())
    }

    fn resume(&self) -> Result<(), BackendError> {
        self.record(Call::Resume);
        Ok(())
    }

    fn seek_to(&self, seconds: u64) -> Result<(), BackendError> {
        self.record(Call::Seek(seconds));
        if seconds >= self.track_length {
            return Err(BackendError::SeekPastEnd(seconds));
        }
        Ok(())
    }

    fn set_volume(&self, level: u8) -> Result<(), BackendError> {
        self.record(Call::Volume(level));
        Ok(())
    }
}
