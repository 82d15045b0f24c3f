// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Day file store management.
//!
//! Snip groups day files together into one place called the __snippet
//! directory__. The default location is `$HOME/.snip`.
//!
//! # Snippet Directory Layout
//!
//! Each day file is named after the calendar date its snippets were written
//! on, in local time. So, `$HOME/.snip/2024-11-20.txt` holds every snippet
//! written on November 20th, 2024. The snippet directory is flat, and snip
//! never deletes anything from it.
//!
//! # Atomic Writes
//!
//! Snippets are precious, so a day file is never written in place. The new
//! content is written to a temporary file next to the day file, flushed to
//! disk, and then renamed over the day file. A crash at any point leaves
//! either the old day file or the new one, never a truncated mix of both.
//!
//! Nothing serializes concurrent invocations. Two snip processes appending
//! to the same day file at the same moment race, and the last rename wins.

use crate::{
    assemble::Assembler,
    snippet::Snippet,
    timezone::TimezoneSource,
};

use chrono::{NaiveDate, NaiveDateTime};
use std::{
    fs::read,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

/// Collection of day files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetStore {
    root: PathBuf,
}

impl SnippetStore {
    /// Construct new snippet store rooted at target directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path to snippet directory.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Path to day file of target date.
    pub fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.root.join(format!("{}.txt", date.format("%Y-%m-%d")))
    }

    /// Read content of day file for target date.
    ///
    /// A day file that does not exist yet is treated as empty.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::ReadDayFile`] if day file exists but cannot be
    ///   read.
    pub fn read_day(&self, date: NaiveDate) -> Result<Vec<u8>> {
        read_existing(self.day_path(date))
    }

    /// Append snippet to day file of target timestamp.
    ///
    /// Creates snippet directory if needed, assembles the new day file
    /// content, and atomically replaces the day file with it. Returns the
    /// path of the day file that was written.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::CreateDir`] if snippet directory cannot be
    ///   created.
    /// - Return [`StoreError::ReadDayFile`] if existing day file cannot be
    ///   read.
    /// - Return [`StoreError::WriteDayFile`] or
    ///   [`StoreError::PersistDayFile`] if new content cannot be committed.
    #[instrument(skip(self, snippet, assembler), level = "debug")]
    pub fn append<T>(
        &self,
        snippet: &Snippet,
        now: NaiveDateTime,
        assembler: &Assembler<T>,
    ) -> Result<PathBuf>
    where
        T: TimezoneSource,
    {
        let path = self.day_path(now.date());
        mkdirp::mkdirp(&self.root).map_err(|err| StoreError::CreateDir {
            source: err,
            path: self.root.clone(),
        })?;

        let existing = read_existing(&path)?;
        debug!("day file {:?} holds {} bytes", path.display(), existing.len());

        let assembled = assembler.assemble(&existing, snippet, now);
        write_atomic(&path, &assembled)?;
        info!("add snippet to {:?}", path.display());

        Ok(path)
    }
}

fn read_existing(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    match read(path.as_ref()) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(StoreError::ReadDayFile {
            source: err,
            path: path.as_ref().into(),
        }),
    }
}

/// Replace file content all at once.
///
/// Writes to a sibling temporary file, flushes it to disk, and renames it
/// into place. The written file is only readable by its owner.
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let write_error = |err| StoreError::WriteDayFile {
        source: err,
        path: path.into(),
    };

    let mut file = NamedTempFile::new_in(parent).map_err(write_error)?;
    file.write_all(content).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::{fs::Permissions, os::unix::fs::PermissionsExt};
        file.as_file()
            .set_permissions(Permissions::from_mode(0o600))
            .map_err(write_error)?;
    }

    file.persist(path).map_err(|err| StoreError::PersistDayFile {
        source: err.error,
        path: path.into(),
    })?;

    Ok(())
}

/// Snippet store error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Snippet directory cannot be created.
    #[error("failed to create snippet directory at {:?}", path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Existing day file cannot be read.
    #[error("failed to read existing snippets from {:?}", path.display())]
    ReadDayFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// New day file content cannot be written out.
    #[error("failed to write snippets for {:?}", path.display())]
    WriteDayFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// New day file content cannot be moved into place.
    #[error("failed to move new snippets into place at {:?}", path.display())]
    PersistDayFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
