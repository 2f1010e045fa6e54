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

//! One-shot wake-up signals shared between worker threads.
//!
//! An [`EventSignal`] means "there is work to do". Raising it several times
//! before the waiter gets round to checking collapses into a single wake-up,
//! and observing the signal consumes it. Whatever the waiter does in response
//! must therefore cover every change made since it last woke.

use std::sync::{Condvar, Mutex, PoisonError};

/// An auto-reset, coalescing binary signal.
pub(crate) struct EventSignal {
    name: &'static str,
    signalled: Mutex<bool>,
    cond: Condvar,
}

impl EventSignal {
    /// Creates a new signal in the unsignalled state.
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            signalled: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    /// Marks the signal as unsignalled, discarding any pending wake-up.
    pub(crate) fn arm(&self) {
        *self.flag() = false;
    }

    /// Marks the signal as signalled and wakes a waiter.
    ///
    /// Raising an already raised signal has no further effect.
    pub(crate) fn signal(&self) {
        let mut signalled = self.flag();
        if !*signalled {
            *signalled = true;
            self.cond.notify_one();
        }
    }

    /// Blocks until the signal is raised, then consumes it.
    pub(crate) fn wait(&self) {
        let mut signalled = self.flag();
        while !*signalled {
            signalled = self
                .cond
                .wait(signalled)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *signalled = false;
    }

    /// Consumes the signal if it is raised, without blocking.
    ///
    /// Returns `true` if the signal was raised.
    pub(crate) fn try_take(&self) -> bool {
        std::mem::replace(&mut *self.flag(), false)
    }

    #[cfg(test)]
    pub(crate) fn is_signalled(&self) -> bool {
        *self.flag()
    }

    fn flag(&self) -> std::sync::MutexGuard<'_, bool> {
        self.signalled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
