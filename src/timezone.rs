// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Local timezone resolution.
//!
//! Day file headers record the IANA name of the timezone the snippets were
//! written in, e.g., "Europe/Stockholm" or "America/Los_Angeles". There is no
//! portable way to ask the operating system for that name, so figuring it out
//! is done on a best effort basis through the [`TimezoneSource`] trait.
//!
//! # System Resolution
//!
//! [`SystemTimezone`] first honors the `TZ` environment variable as long as it
//! names a zone that exists in a zoneinfo database on the system, or is plain
//! `UTC`. A `ZONEINFO` environment variable names an extra database directory
//! that is searched before the usual ones. Otherwise,
//! it assumes that `/etc/localtime` is a symlink into a zoneinfo database, and
//! treats everything after the `zoneinfo/` component of the resolved path as
//! the timezone name. On macOS that looks like this:
//!
//! ```text
//! $ readlink /etc/localtime
//! /var/db/timezone/zoneinfo/Europe/London
//! ```

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

/// Location of the system's local time file.
pub const LOCALTIME: &str = "/etc/localtime";

/// Timezone that needs no zoneinfo database.
pub const UTC: &str = "UTC";

const ZONEINFO_MARKER: &str = "zoneinfo/";

const ZONEINFO_DIRS: &[&str] = &[
    "/usr/share/zoneinfo",
    "/var/db/timezone/zoneinfo",
    "/usr/share/lib/zoneinfo",
    "/etc/zoneinfo",
];

/// Resolve name of local timezone.
pub trait TimezoneSource {
    /// Determine IANA name of local timezone.
    ///
    /// # Errors
    ///
    /// - Return [`TimezoneError`] if the name cannot be determined.
    fn local_timezone(&self) -> Result<String>;
}

/// Best effort timezone resolution through the host system.
#[derive(Debug, Clone)]
pub struct SystemTimezone {
    localtime: PathBuf,
    zoneinfo_dirs: Vec<PathBuf>,
}

impl SystemTimezone {
    /// Construct new system timezone resolver using `/etc/localtime`.
    pub fn new() -> Self {
        Self::with_localtime(LOCALTIME)
    }

    /// Construct new system timezone resolver using a custom local time file.
    pub fn with_localtime(path: impl Into<PathBuf>) -> Self {
        Self {
            localtime: path.into(),
            zoneinfo_dirs: ZONEINFO_DIRS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Replace zoneinfo database directories that `TZ` is checked against.
    pub fn with_zoneinfo_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.zoneinfo_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    fn timezone_from_env(&self) -> Option<String> {
        let tz = env::var("TZ").ok()?;
        // INVARIANT: POSIX allows a leading ':' before a zoneinfo name.
        let tz = tz.strip_prefix(':').unwrap_or(tz.as_str());
        if tz == UTC {
            return Some(UTC.into());
        }
        if !is_plausible_name(tz) {
            return None;
        }

        let extra = env::var_os("ZONEINFO")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        let found = extra
            .iter()
            .chain(self.zoneinfo_dirs.iter())
            .any(|dir| dir.join(tz).is_file());
        if !found {
            debug!("ignore TZ {tz:?}, no such zone in any zoneinfo directory");
            return None;
        }

        Some(tz.into())
    }

    fn timezone_from_localtime(&self) -> Result<String> {
        let real_path =
            self.localtime
                .canonicalize()
                .map_err(|err| TimezoneError::Symlink {
                    source: err,
                    path: self.localtime.clone(),
                })?;

        let name = zone_name_from_path(&real_path).ok_or_else(|| TimezoneError::MissingMarker {
            path: self.localtime.clone(),
            real_path: real_path.clone(),
        })?;

        if !is_plausible_name(name) {
            return Err(TimezoneError::Invalid { name: name.into() });
        }

        Ok(name.into())
    }
}

impl Default for SystemTimezone {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneSource for SystemTimezone {
    #[instrument(skip(self), level = "debug")]
    fn local_timezone(&self) -> Result<String> {
        if let Some(tz) = self.timezone_from_env() {
            debug!("use timezone {tz:?} from TZ environment variable");
            return Ok(tz);
        }

        let tz = self.timezone_from_localtime()?;
        debug!("infer timezone {tz:?} from {:?}", self.localtime.display());

        Ok(tz)
    }
}

/// Timezone resolver that always answers with the same name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FixedTimezone(String);

impl FixedTimezone {
    /// Construct new fixed timezone resolver.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl TimezoneSource for FixedTimezone {
    fn local_timezone(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

impl<T> TimezoneSource for &T
where
    T: TimezoneSource + ?Sized,
{
    fn local_timezone(&self) -> Result<String> {
        (**self).local_timezone()
    }
}

fn zone_name_from_path(path: &Path) -> Option<&str> {
    let path = path.to_str()?;
    path.find(ZONEINFO_MARKER)
        .map(|idx| &path[idx + ZONEINFO_MARKER.len()..])
}

fn is_plausible_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && !name.ends_with('/')
        && name.split('/').all(|part| !part.is_empty() && part != "." && part != "..")
}

/// Timezone resolution error types.
#[derive(Debug, thiserror::Error)]
pub enum TimezoneError {
    /// Local time file cannot be resolved as a symlink.
    #[error("failed to evaluate {:?} as a symlink", path.display())]
    Symlink {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Resolved local time path does not point into a zoneinfo database.
    #[error(
        "real path {:?} of {:?} does not contain \"zoneinfo/\"",
        real_path.display(),
        path.display()
    )]
    MissingMarker { path: PathBuf, real_path: PathBuf },

    /// Inferred name is not a usable timezone name.
    #[error("inferred timezone {name:?} is not a valid timezone name")]
    Invalid { name: String },
}

/// Friendly result alias :3
pub type Result<T, E = TimezoneError> = std::result::Result<T, E>;
