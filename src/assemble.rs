// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Day file assembly.
//!
//! Snippets for a given calendar date all live in one __day file__. Adding a
//! snippet never edits the day file in place. Instead, the full new content of
//! the day file is assembled in memory from the old content and the new
//! snippet, and the caller replaces the whole file with it in one shot.
//!
//! # Day File Layout
//!
//! ```text
//! --- Wednesday Nov 20 2024 in Europe/Dublin ---
//! 09:30 | at desk
//! 09:53 | reviewed the quarterly numbers
//! ```
//!
//! The first line is an optional __header__ naming the date and timezone the
//! snippets were written in. Every other line is a snippet, in the order they
//! were added.
//!
//! Whether a day file already has a header is decided by looking at its first
//! three bytes only. Parsing the header back into a date would be far more
//! fragile than it is worth.

use crate::{
    snippet::Snippet,
    timezone::TimezoneSource,
};

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::{debug, warn};

/// Prefix that marks the first line of a day file as its header.
pub const HEADER_MARKER: &[u8] = b"---";

/// Timezone label used when the local timezone cannot be determined.
pub const UNKNOWN_TIMEZONE: &str = "<unknown timezone>";

/// Check if day file content already starts with a header.
pub fn has_header(existing: &[u8]) -> bool {
    existing.starts_with(HEADER_MARKER)
}

/// Decorative first line of a day file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    date: NaiveDate,
    timezone: String,
}

impl Header {
    /// Construct new header for a date written in a given timezone.
    pub fn new(date: NaiveDate, timezone: impl Into<String>) -> Self {
        Self {
            date,
            timezone: timezone.into(),
        }
    }
}

impl Display for Header {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(
            fmt,
            "--- {} in {} ---",
            self.date.format("%A %b %e %Y"),
            self.timezone
        )
    }
}

/// Assemble new day file content.
///
/// # Invariant
///
/// - Existing content is always kept verbatim, and always comes before the new
///   snippet.
/// - A day file that starts with a header keeps exactly that header, no matter
///   what `include_header` says.
/// - At most one header is ever added.
#[derive(Debug, Clone)]
pub struct Assembler<T>
where
    T: TimezoneSource,
{
    include_header: bool,
    timezone: T,
}

impl<T> Assembler<T>
where
    T: TimezoneSource,
{
    /// Construct new day file assembler.
    pub fn new(include_header: bool, timezone: T) -> Self {
        Self {
            include_header,
            timezone,
        }
    }

    /// Check if a header would be added in front of existing content.
    pub fn needs_header(&self, existing: &[u8]) -> bool {
        self.include_header && !has_header(existing)
    }

    /// Assemble full day file content with new snippet appended.
    ///
    /// The timezone is only resolved when a header is actually added. Failure
    /// to resolve it is logged, and [`UNKNOWN_TIMEZONE`] is used in its place.
    pub fn assemble(&self, existing: &[u8], snippet: &Snippet, now: NaiveDateTime) -> Vec<u8> {
        let mut assembled = Vec::with_capacity(existing.len() + snippet.as_bytes().len() + 64);

        if self.needs_header(existing) {
            let header = Header::new(now.date(), self.resolve_timezone());
            debug!("add header {header:?}");
            assembled.extend_from_slice(header.to_string().as_bytes());
            assembled.push(b'\n');
        }

        assembled.extend_from_slice(existing);

        // INVARIANT: New snippet always starts on its own line, but never
        // behind a leading blank line.
        if existing.last().is_some_and(|byte| *byte != b'\n') {
            assembled.push(b'\n');
        }

        assembled.extend_from_slice(snippet.as_bytes());

        assembled
    }

    fn resolve_timezone(&self) -> String {
        match self.timezone.local_timezone() {
            Ok(timezone) => timezone,
            Err(error) => {
                warn!("failed to infer local timezone: {error}");
                UNKNOWN_TIMEZONE.into()
            }
        }
    }
}
