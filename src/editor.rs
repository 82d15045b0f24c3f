// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Snippet composition.
//!
//! Every snippet starts out as a __draft__: a temporary file prefilled with
//! the current timestamp, and whatever message was given on the command line.
//! The user may then open the draft in their editor to finish writing it.
//! Once done, the draft is read back and normalized into a [`Snippet`].
//!
//! The draft lives outside of the snippet directory, so a botched editing
//! session never leaves anything behind in a day file.

use crate::snippet::{Snippet, SnippetError};

use std::{
    env,
    ffi::OsStr,
    fs::read,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

/// Editor used when nothing else is configured.
pub const DEFAULT_EDITOR: &str = "vim";

/// Separator between timestamp and text of a snippet.
pub const STAMP_SEPARATOR: &str = " | ";

/// Way to let the user compose a draft file.
pub trait Compose {
    /// Let user edit file at target path, blocking until they are done.
    ///
    /// # Errors
    ///
    /// - Return [`EditorError`] if the user could not finish editing.
    fn compose(&self, path: &Path) -> Result<()>;
}

/// External interactive text editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    program: String,
    args: Vec<String>,
}

impl Editor {
    /// Parse editor command line.
    ///
    /// Splits on whitespace, so `code --wait` works as expected. Return
    /// [`None`] if command is blank.
    pub fn parse(command: impl AsRef<str>) -> Option<Self> {
        let mut words = command.as_ref().split_whitespace().map(str::to_owned);
        let program = words.next()?;

        Some(Self {
            program,
            args: words.collect(),
        })
    }

    /// Resolve editor to use.
    ///
    /// Prefers explicitly configured command, then `$EDITOR`, and falls back
    /// to [`DEFAULT_EDITOR`].
    pub fn resolve(configured: Option<&str>) -> Self {
        configured
            .and_then(Self::parse)
            .or_else(|| env::var("EDITOR").ok().and_then(Self::parse))
            .unwrap_or_else(|| Self {
                program: DEFAULT_EDITOR.into(),
                args: Vec::new(),
            })
    }

    /// Name of editor program.
    pub fn program(&self) -> &str {
        self.program.as_str()
    }
}

impl Compose for Editor {
    #[instrument(skip(self), level = "debug")]
    fn compose(&self, path: &Path) -> Result<()> {
        info!("open {} to edit snippet", self.program);
        syscall_interactive(&self.program, self.args.iter().map(OsStr::new).chain([path.as_os_str()]))
    }
}

/// Snippet draft backed by a temporary file.
///
/// The temporary file is deleted once the draft is finished or dropped.
#[derive(Debug)]
pub struct Draft {
    file: NamedTempFile,
}

impl Draft {
    /// Construct new draft prefilled with timestamp and optional message.
    ///
    /// Draft content always starts as `<stamp> | `, followed by the message if
    /// one was given.
    ///
    /// # Errors
    ///
    /// - Return [`EditorError::CreateDraft`] if temporary file cannot be
    ///   created.
    /// - Return [`EditorError::WriteDraft`] if prefilled content cannot be
    ///   written.
    pub fn new(stamp: impl AsRef<str>, message: Option<&str>) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("snip-")
            .suffix(".txt")
            .tempfile()
            .map_err(|err| EditorError::CreateDraft { source: err })?;
        debug!("create draft at {:?}", file.path().display());

        let mut prefill = format!("{}{STAMP_SEPARATOR}", stamp.as_ref());
        if let Some(message) = message {
            prefill.push_str(message);
        }

        file.write_all(prefill.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|err| EditorError::WriteDraft {
                source: err,
                path: file.path().into(),
            })?;

        Ok(Self { file })
    }

    /// Path to draft file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Let user edit draft.
    ///
    /// # Errors
    ///
    /// - Return [`EditorError`] if composition fails for any reason.
    pub fn edit(&self, composer: &(impl Compose + ?Sized)) -> Result<()> {
        composer.compose(self.path())
    }

    /// Read draft back as snippet, and delete draft file.
    ///
    /// Failure to delete the draft file is logged, but otherwise ignored.
    ///
    /// # Errors
    ///
    /// - Return [`EditorError::ReadDraft`] if draft cannot be read back.
    /// - Return [`EditorError::Snippet`] if draft is blank.
    pub fn finish(self) -> Result<Snippet> {
        let path = self.file.path().to_path_buf();
        let content = read(&path).map_err(|err| EditorError::ReadDraft {
            source: err,
            path: path.clone(),
        })?;

        if let Err(error) = self.file.close() {
            warn!("failed to delete draft at {:?}: {error}", path.display());
        }

        Ok(Snippet::new(content)?)
    }
}

fn syscall_interactive(
    cmd: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
) -> Result<()> {
    let program = cmd.as_ref().to_string_lossy().into_owned();
    let status = Command::new(cmd.as_ref())
        .args(args)
        .spawn()
        .and_then(|mut child| child.wait())
        .map_err(|err| EditorError::Spawn {
            source: err,
            program: program.clone(),
        })?;

    if !status.success() {
        return Err(EditorError::Exit { program, status });
    }

    Ok(())
}

/// Snippet composition error types.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Temporary draft file cannot be created.
    #[error("failed to create temporary file for editing snippet")]
    CreateDraft {
        #[source]
        source: std::io::Error,
    },

    /// Draft file cannot be prefilled.
    #[error("failed to write draft at {:?}", path.display())]
    WriteDraft {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Draft file cannot be read back after editing.
    #[error("failed to read draft at {:?} after editing", path.display())]
    ReadDraft {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Editor cannot be started.
    #[error("failed to run editor {program:?}")]
    Spawn {
        #[source]
        source: std::io::Error,
        program: String,
    },

    /// Editor exited unsuccessfully.
    #[error("editor {program:?} failed with {status}")]
    Exit { program: String, status: ExitStatus },

    /// Draft did not contain a usable snippet.
    #[error(transparent)]
    Snippet(#[from] SnippetError),
}

/// Friendly result alias :3
pub type Result<T, E = EditorError> = std::result::Result<T, E>;
