// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Recording a snippet from start to finish.
//!
//! Draft the snippet, let the user finish it when needed, then append it to
//! the day file of the given timestamp. Nothing touches the snippet directory
//! until the snippet is known to be good.

use crate::{
    assemble::Assembler,
    config::{ConfigError, Settings},
    editor::{Compose, Draft, EditorError},
    store::{SnippetStore, StoreError},
    timezone::TimezoneSource,
};

use chrono::NaiveDateTime;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Record one snippet into its day file.
///
/// The composer is only consulted when `edit` is set, or when `message` is
/// missing or empty, since there is nothing to record otherwise.
///
/// Returns path to the day file that was written.
///
/// # Errors
///
/// - Return [`RecordError::Config`] if the timestamp cannot be rendered.
/// - Return [`RecordError::Editor`] if composition fails, or leaves the
///   snippet blank.
/// - Return [`RecordError::Store`] if the day file cannot be updated.
#[instrument(skip(settings, composer, timezone), level = "debug")]
pub fn record(
    settings: &Settings,
    now: NaiveDateTime,
    message: Option<&str>,
    edit: bool,
    composer: &(impl Compose + ?Sized),
    timezone: &(impl TimezoneSource + ?Sized),
) -> Result<PathBuf> {
    let message = message.filter(|message| !message.is_empty());
    let stamp = settings.time_format.format(now)?;

    let draft = Draft::new(stamp, message)?;
    if edit || message.is_none() {
        draft.edit(composer)?;
    }
    let snippet = draft.finish()?;

    let assembler = Assembler::new(settings.include_header, timezone);
    let path = SnippetStore::new(&settings.snip_dir).append(&snippet, now, &assembler)?;
    debug!("recorded snippet into {:?}", path.display());

    Ok(path)
}

/// Snippet recording error types.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Settings cannot be applied.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Snippet could not be composed.
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Day file could not be updated.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Friendly result alias :3
pub type Result<T, E = RecordError> = std::result::Result<T, E>;
