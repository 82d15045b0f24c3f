// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Snippet normalization.
//!
//! A __snippet__ is one short note that occupies exactly one line of a day
//! file. Whatever the user typed, either through `-m` or through their editor,
//! is squeezed into that shape before it ever gets near the day file.

use std::{borrow::Cow, fmt::{Display, Formatter, Result as FmtResult}};

/// Single newline terminated line of text.
///
/// # Invariant
///
/// - Never empty, ignoring the trailing newline.
/// - Contains exactly one newline, and that newline is the final byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet(Vec<u8>);

impl Snippet {
    /// Construct new snippet from raw user input.
    ///
    /// Trims surrounding whitespace, collapses every embedded line break into
    /// a single space, and appends the trailing newline.
    ///
    /// # Errors
    ///
    /// - Return [`SnippetError::Empty`] if nothing but whitespace was given.
    pub fn new(raw: impl AsRef<[u8]>) -> Result<Self> {
        let raw = raw.as_ref();
        // INVARIANT: Unicode whitespace only counts when input is valid UTF-8.
        let trimmed = match std::str::from_utf8(raw) {
            Ok(text) => text.trim().as_bytes(),
            Err(_) => raw.trim_ascii(),
        };
        if trimmed.is_empty() {
            return Err(SnippetError::Empty);
        }

        let mut line = Vec::with_capacity(trimmed.len() + 1);
        let mut bytes = trimmed.iter().copied().peekable();
        while let Some(byte) = bytes.next() {
            match byte {
                b'\r' if bytes.peek() == Some(&b'\n') => {
                    bytes.next();
                    line.push(b' ');
                }
                b'\n' => line.push(b' '),
                _ => line.push(byte),
            }
        }
        line.push(b'\n');

        Ok(Self(line))
    }

    /// Snippet as raw bytes, trailing newline included.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Snippet text without its trailing newline.
    pub fn line(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0[..self.0.len() - 1])
    }
}

impl Display for Snippet {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.line().as_ref())
    }
}

/// Snippet validation error types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SnippetError {
    /// Nothing left after trimming whitespace.
    #[error("snippet is empty")]
    Empty,
}

/// Friendly result alias :3
pub type Result<T, E = SnippetError> = std::result::Result<T, E>;
