// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Timestamped personal notes, one day file at a time.
//!
//! Snip records short notes called __snippets__ into plain-text __day files__,
//! one per calendar date. Each snippet is a single line prefixed with the time
//! it was written. The first snippet of a day can also add a header naming the
//! date and timezone.
//!
//! [`record()`] ties everything together for a single snippet. The interesting
//! part is how a day file gets updated. See [`assemble`] for
//! how new content is merged with old content, and [`store`] for how the
//! result is written back without ever risking a half-written day file.

pub mod assemble;
pub mod config;
pub mod editor;
pub mod path;
pub mod record;
pub mod snippet;
pub mod store;
pub mod timezone;

pub use assemble::{Assembler, Header};
pub use config::{Settings, SnipConfig, TimeFormat};
pub use editor::{Compose, Draft, Editor};
pub use record::{record, RecordError};
pub use snippet::Snippet;
pub use store::SnippetStore;
pub use timezone::{FixedTimezone, SystemTimezone, TimezoneSource};
