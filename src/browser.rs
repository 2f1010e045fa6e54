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

//! Directory browser state management.
//!
//! This module provides state for the file browser screen: the directory
//! currently shown, its audio files and sub-directories in display order, and
//! the cursor selecting one of them.
//!
//! All paths are relative to a fixed root directory and the browser never
//! ascends above it.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// The name of the entry standing for the current directory.
pub(crate) const CURRENT_DIR: &str = ".";

/// The name of the entry standing for the parent directory.
pub(crate) const PARENT_DIR: &str = "..";

#[derive(Debug, Error)]
pub(crate) enum BrowseError {
    #[error("failed to read directory {path}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Directories sort before files.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) enum EntryKind {
    Directory,
    File,
}

/// A single row in a directory listing.
///
/// Field order matters: entries order by kind first, then by name.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) struct DirectoryEntry {
    pub(crate) kind: EntryKind,
    pub(crate) name: String,
}

impl DirectoryEntry {
    pub(crate) fn directory(name: &str) -> Self {
        Self {
            kind: EntryKind::Directory,
            name: name.to_string(),
        }
    }

    pub(crate) fn file(name: &str) -> Self {
        Self {
            kind: EntryKind::File,
            name: name.to_string(),
        }
    }

    pub(crate) fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Which entries a directory scan should keep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Listing {
    /// Audio files and directories, including `.` and `..`.
    All,
    /// Audio files only.
    AudioOnly,
}

/// Recognises audio files by their extension.
#[derive(Clone, Debug)]
pub(crate) struct AudioFilter {
    extensions: Vec<String>,
}

impl AudioFilter {
    pub(crate) fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub(crate) fn is_audio(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
    }
}

impl Default for AudioFilter {
    fn default() -> Self {
        Self::new(&["mp3", "ogg"])
    }
}

/// Lists a single directory, returning entries in display order.
///
/// Hidden directories are skipped. With [`Listing::All`] the synthetic `.` and
/// `..` entries are always present, even at the root; it is up to the browser
/// to decide what `..` means there.
///
/// # Errors
///
/// Returns an error if `dir` itself cannot be read. Problems with individual
/// entries, such as dangling symbolic links, only cause those entries to be
/// left out.
pub(crate) fn scan_directory(
    dir: &Path,
    filter: &AudioFilter,
    listing: Listing,
) -> Result<Vec<DirectoryEntry>, BrowseError> {
    let mut entries = Vec::new();

    if listing == Listing::All {
        entries.push(DirectoryEntry::directory(CURRENT_DIR));
        entries.push(DirectoryEntry::directory(PARENT_DIR));
    }

    for result in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(BrowseError::Scan {
                    path: dir.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        let Some(name) = entry.file_name().to_str() else {
            debug!("Skipping non UTF-8 name in {}", dir.display());
            continue;
        };

        let file_type = entry.file_type();
        if file_type.is_dir() && listing == Listing::All && !name.starts_with('.') {
            entries.push(DirectoryEntry::directory(name));
        } else if file_type.is_file() && filter.is_audio(entry.path()) {
            entries.push(DirectoryEntry::file(name));
        }
    }

    entries.sort();
    Ok(entries)
}

pub(crate) struct DirectoryBrowser {
    root: PathBuf,
    segments: Vec<String>,
    entries: Vec<DirectoryEntry>,
    cursor: Option<usize>,
    filter: AudioFilter,
}

impl DirectoryBrowser {
    /// Creates a browser confined to `root`.
    ///
    /// The listing starts out empty; call [`change_directory`] with `.` to
    /// populate it.
    ///
    /// [`change_directory`]: DirectoryBrowser::change_directory
    pub(crate) fn new(root: PathBuf, filter: AudioFilter) -> Self {
        Self {
            root,
            segments: Vec::new(),
            entries: Vec::new(),
            cursor: None,
            filter,
        }
    }

    /// The directory currently listed, as a path under the root.
    pub(crate) fn current_dir(&self) -> PathBuf {
        self.segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    pub(crate) fn filter(&self) -> &AudioFilter {
        &self.filter
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Changes directory relative to the current one and rescans it.
    ///
    /// `.` rescans the current directory and `..` moves to its parent, which
    /// does nothing at the root. Any other name is entered as a child.
    ///
    /// # Errors
    ///
    /// Returns an error if the new directory cannot be listed, in which case
    /// the browser keeps its previous directory, listing and cursor.
    pub(crate) fn change_directory(&mut self, name: &str) -> Result<(), BrowseError> {
        let mut segments = self.segments.clone();
        match name {
            CURRENT_DIR => {}
            PARENT_DIR => {
                segments.pop();
            }
            child => segments.push(child.to_string()),
        }

        let path = segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        let entries = scan_directory(&path, &self.filter, Listing::All)?;

        debug!("Listed {} entries in {}", entries.len(), path.display());

        self.segments = segments;
        self.entries = entries;
        self.cursor = (!self.entries.is_empty()).then_some(0);

        Ok(())
    }

    /// Moves the cursor by `delta` rows.
    ///
    /// The move is only made if the cursor stays within the listing; there is
    /// no wrap-around. Returns whether the cursor moved.
    pub(crate) fn move_cursor(&mut self, delta: isize) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };

        match cursor.checked_add_signed(delta) {
            Some(target) if target < self.entries.len() => {
                self.cursor = Some(target);
                true
            }
            _ => false,
        }
    }

    /// Returns the entry `offset` rows away from the cursor, if there is one.
    pub(crate) fn entry_at(&self, offset: isize) -> Option<&DirectoryEntry> {
        let index = self.cursor?.checked_add_signed(offset)?;
        self.entries.get(index)
    }

    /// Returns the entry under the cursor.
    pub(crate) fn selected(&self) -> Option<&DirectoryEntry> {
        self.entry_at(0)
    }
}
