// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of snip's configuration file, and the immutable
//! [`Settings`] that get resolved from it. Every key of the configuration
//! file is optional. Command line flags are layered on top of the file
//! through [`SnipConfig::merge`] before settings are resolved.
//!
//! # Example
//!
//! ```toml
//! snip_dir = "$HOME/notes/snip"
//! time_format = "%H:%M"
//! include_header = true
//! editor = "nvim"
//! timezone = "Europe/Dublin"
//! ```

use crate::{
    editor::Editor,
    path::default_snip_dir,
    timezone::{FixedTimezone, SystemTimezone, TimezoneSource},
};

use chrono::{
    format::{Item, StrftimeItems},
    NaiveDateTime,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult, Write as _},
    fs::read_to_string,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

/// Default format of the timestamp that prefixes each snippet.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// Snip configuration file layout.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SnipConfig {
    /// Directory holding day files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snip_dir: Option<PathBuf>,

    /// Format of timestamp prefilled into each snippet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,

    /// Add header line to day files that lack one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_header: Option<bool>,

    /// Editor command used to compose snippets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Timezone name recorded in headers instead of inferring it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl SnipConfig {
    /// Load configuration file.
    ///
    /// A missing configuration file is not an error, it just means that every
    /// setting uses its default.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if configuration file exists but
    ///   cannot be read.
    /// - Return [`ConfigError::Deserialize`] if configuration file is
    ///   malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match read_to_string(path) {
            Ok(data) => {
                debug!("load configuration from {:?}", path.display());
                data.parse()
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no configuration at {:?}, use defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Read {
                source: err,
                path: path.into(),
            }),
        }
    }

    /// Layer another configuration on top of this one.
    ///
    /// Every key set in `other` wins over the same key in `self`.
    pub fn merge(self, other: SnipConfig) -> Self {
        Self {
            snip_dir: other.snip_dir.or(self.snip_dir),
            time_format: other.time_format.or(self.time_format),
            include_header: other.include_header.or(self.include_header),
            editor: other.editor.or(self.editor),
            timezone: other.timezone.or(self.timezone),
        }
    }
}

impl FromStr for SnipConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut config: SnipConfig = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on snippet directory field.
        if let Some(snip_dir) = config.snip_dir.take() {
            config.snip_dir = Some(expand_path(snip_dir)?);
        }

        Ok(config)
    }
}

impl Display for SnipConfig {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Fully resolved runtime settings.
///
/// Built once per invocation from a merged [`SnipConfig`], and only ever
/// passed around by reference afterwards. Paths are taken as given, shell
/// expansion only ever happens while parsing a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding day files.
    pub snip_dir: PathBuf,

    /// Format of timestamp prefilled into each snippet.
    pub time_format: TimeFormat,

    /// Add header line to day files that lack one.
    pub include_header: bool,

    /// Editor used to compose snippets.
    pub editor: Editor,

    /// Fixed timezone name, if inference should be skipped.
    pub timezone: Option<String>,
}

impl TryFrom<SnipConfig> for Settings {
    type Error = ConfigError;

    fn try_from(config: SnipConfig) -> Result<Self, Self::Error> {
        let snip_dir = match config.snip_dir {
            Some(path) => path,
            None => default_snip_dir()?,
        };
        let time_format = match config.time_format {
            Some(format) => format.parse()?,
            None => TimeFormat::default(),
        };

        Ok(Self {
            snip_dir,
            time_format,
            include_header: config.include_header.unwrap_or(true),
            editor: Editor::resolve(config.editor.as_deref()),
            timezone: config.timezone.filter(|timezone| !timezone.trim().is_empty()),
        })
    }
}

impl Settings {
    /// Source of the timezone name written into day file headers.
    ///
    /// A configured timezone always wins over asking the host system.
    pub fn timezone_source(&self) -> Box<dyn TimezoneSource> {
        match &self.timezone {
            Some(name) => Box::new(FixedTimezone::new(name)),
            None => Box::new(SystemTimezone::new()),
        }
    }
}

/// Validated strftime style timestamp format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormat(String);

impl TimeFormat {
    /// Render timestamp with this format.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::TimeFormat`] if the format asks for something
    ///   a local timestamp does not carry, e.g., a UTC offset.
    pub fn format(&self, timestamp: NaiveDateTime) -> Result<String> {
        let mut rendered = String::new();
        write!(rendered, "{}", timestamp.format(self.0.as_str())).map_err(|_| {
            ConfigError::TimeFormat {
                format: self.0.clone(),
            }
        })?;

        Ok(rendered)
    }

    /// Treat time format as string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self(DEFAULT_TIME_FORMAT.into())
    }
}

impl FromStr for TimeFormat {
    type Err = ConfigError;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        // INVARIANT: Reject formats chrono cannot render, because rendering
        // them panics instead of failing gracefully.
        if format.is_empty()
            || StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
        {
            return Err(ConfigError::TimeFormat {
                format: format.into(),
            });
        }

        Ok(Self(format.into()))
    }
}

impl Display for TimeFormat {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.as_str())
    }
}

fn expand_path(path: PathBuf) -> Result<PathBuf> {
    let path = path.to_string_lossy().into_owned();
    Ok(PathBuf::from(
        shellexpand::full(path.as_str())
            .map_err(ConfigError::ShellExpansion)?
            .into_owned(),
    ))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read configuration file at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),

    /// Timestamp format is empty or cannot be rendered.
    #[error("invalid time format {format:?}")]
    TimeFormat { format: String },

    /// Default snippet directory cannot be determined.
    #[error(transparent)]
    NoWayHome(#[from] crate::path::NoWayHome),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use indoc::indoc;
    use sealed_test::prelude::*;
    use simple_test_case::test_case;

    #[sealed_test(env = [("BLAH", "/home/blah/blah")])]
    fn deserialize_snip_config() -> anyhow::Result<()> {
        let result: SnipConfig = r#"
            snip_dir = "$BLAH/snip"
            time_format = "%H:%M:%S"
            include_header = false
            editor = "nvim -u NONE"
            timezone = "Europe/Dublin"
        "#
        .parse()?;

        let expect = SnipConfig {
            snip_dir: Some("/home/blah/blah/snip".into()),
            time_format: Some("%H:%M:%S".into()),
            include_header: Some(false),
            editor: Some("nvim -u NONE".into()),
            timezone: Some("Europe/Dublin".into()),
        };

        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn serialize_snip_config() {
        let result = SnipConfig {
            snip_dir: Some("/home/blah/.snip".into()),
            time_format: Some("%H:%M".into()),
            include_header: Some(true),
            editor: None,
            timezone: None,
        }
        .to_string();

        let expect = indoc! {r#"
            snip_dir = "/home/blah/.snip"
            time_format = "%H:%M"
            include_header = true
        "#};

        assert_eq!(result, expect);
    }

    #[test]
    fn deserialize_rejects_unknown_keys() {
        let result = "colour = \"blue\"".parse::<SnipConfig>();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn merge_prefers_overrides() {
        let file = SnipConfig {
            snip_dir: Some("/from/file".into()),
            time_format: Some("%H:%M".into()),
            include_header: Some(true),
            editor: Some("nano".into()),
            timezone: None,
        };
        let flags = SnipConfig {
            include_header: Some(false),
            editor: Some("nvim".into()),
            ..Default::default()
        };

        let expect = SnipConfig {
            snip_dir: Some("/from/file".into()),
            time_format: Some("%H:%M".into()),
            include_header: Some(false),
            editor: Some("nvim".into()),
            timezone: None,
        };

        assert_eq!(file.merge(flags), expect);
    }

    #[test]
    fn load_missing_config_uses_defaults() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let result = SnipConfig::load(root.path().join("config.toml"))?;
        assert_eq!(result, SnipConfig::default());
        Ok(())
    }

    #[test]
    fn load_malformed_config_fails() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let path = root.path().join("config.toml");
        std::fs::write(&path, "include_header = maybe")?;
        assert!(matches!(SnipConfig::load(&path), Err(ConfigError::Deserialize(_))));
        Ok(())
    }

    #[sealed_test(env = [("EDITOR", "")])]
    fn settings_from_config() -> anyhow::Result<()> {
        let config = SnipConfig {
            snip_dir: Some("/home/blah/.snip".into()),
            time_format: Some("%I:%M %p".into()),
            include_header: None,
            editor: None,
            timezone: Some("  ".into()),
        };

        let result = Settings::try_from(config)?;
        let expect = Settings {
            snip_dir: "/home/blah/.snip".into(),
            time_format: "%I:%M %p".parse()?,
            include_header: true,
            editor: Editor::parse("vim").expect("non-empty command"),
            timezone: None,
        };

        assert_eq!(result, expect);

        Ok(())
    }

    #[sealed_test(env = [("NOTES", "/data/$weird")])]
    fn settings_expand_config_paths_once() -> anyhow::Result<()> {
        let config: SnipConfig = r#"snip_dir = "$NOTES/snip""#.parse()?;
        assert_eq!(config.snip_dir.as_deref(), Some(Path::new("/data/$weird/snip")));

        let result = Settings::try_from(config)?;
        assert_eq!(result.snip_dir, PathBuf::from("/data/$weird/snip"));

        Ok(())
    }

    #[test]
    fn settings_keep_literal_dollar_in_paths() -> anyhow::Result<()> {
        let config = SnipConfig {
            snip_dir: Some("/tmp/cost$5".into()),
            ..Default::default()
        };

        let result = Settings::try_from(config)?;
        assert_eq!(result.snip_dir, PathBuf::from("/tmp/cost$5"));

        Ok(())
    }

    #[sealed_test(env = [("TZ", "UTC")])]
    fn settings_pick_timezone_source() -> anyhow::Result<()> {
        let config = SnipConfig {
            snip_dir: Some("/home/blah/.snip".into()),
            timezone: Some("Europe/Dublin".into()),
            ..Default::default()
        };
        let fixed = Settings::try_from(config.clone())?;
        assert_eq!(fixed.timezone_source().local_timezone()?, "Europe/Dublin");

        let system = Settings::try_from(SnipConfig {
            timezone: None,
            ..config
        })?;
        assert_eq!(system.timezone_source().local_timezone()?, "UTC");

        Ok(())
    }

    #[test_case(""; "empty")]
    #[test_case("%H:%J"; "unknown specifier")]
    #[test_case("%"; "dangling percent")]
    #[test]
    fn time_format_rejects_unrenderable(format: &str) {
        assert!(matches!(
            format.parse::<TimeFormat>(),
            Err(ConfigError::TimeFormat { .. })
        ));
    }

    #[test]
    fn time_format_without_offset_fails_to_render() -> anyhow::Result<()> {
        let now = NaiveDate::from_ymd_opt(2024, 11, 20)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid timestamp");
        let format: TimeFormat = "%H:%M %z".parse()?;
        assert!(matches!(format.format(now), Err(ConfigError::TimeFormat { .. })));
        Ok(())
    }

    #[test_case("%H:%M", "09:30"; "default")]
    #[test_case("%H:%M:%S", "09:30:00"; "seconds")]
    #[test_case("%I:%M %p", "09:30 AM"; "twelve hour")]
    #[test]
    fn time_format_renders(format: &str, expect: &str) {
        let now = NaiveDate::from_ymd_opt(2024, 11, 20)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid timestamp");
        let format: TimeFormat = format.parse().expect("valid format");
        assert_eq!(format.format(now).expect("renderable format"), expect);
    }
}
