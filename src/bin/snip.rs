// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use snip::{
    config::{Settings, SnipConfig},
    path::default_config_file,
    record,
};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{ArgAction, Parser};
use std::{path::PathBuf, process::exit};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(about, override_usage = "snip [options]", version)]
struct Cli {
    /// Title of the snippet. If empty, the editor opens to write the snippet.
    #[arg(short, long, value_name = "text")]
    pub message: Option<String>,

    /// Open editor to finish the snippet even when a title is given.
    #[arg(short, long)]
    pub edit: bool,

    /// Format of the timestamp prefilled into the snippet, in strftime syntax.
    #[arg(short, long, value_name = "format")]
    pub time_format: Option<String>,

    /// Add a header with the current date and timezone to new day files.
    #[arg(
        long,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub include_header: Option<bool>,

    /// Directory to write day files into.
    #[arg(long, value_name = "path")]
    pub snip_dir: Option<PathBuf>,

    /// Editor command used to compose the snippet.
    #[arg(long, value_name = "command")]
    pub editor: Option<String>,

    /// Path to configuration file.
    #[arg(short, long, value_name = "path")]
    pub config: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => default_config_file()?,
        };
        let file = SnipConfig::load(&path)
            .with_context(|| format!("load configuration from {:?}", path.display()))?;
        let flags = SnipConfig {
            snip_dir: self.snip_dir.clone(),
            time_format: self.time_format.clone(),
            include_header: self.include_header,
            editor: self.editor.clone(),
            timezone: None,
        };

        let settings = Settings::try_from(file.merge(flags))?;
        debug!("resolved settings {settings:?}");

        Ok(settings)
    }

    fn run(self) -> Result<()> {
        let settings = self.settings()?;
        let now = Local::now().naive_local();

        let timezone = settings.timezone_source();
        record(
            &settings,
            now,
            self.message.as_deref(),
            self.edit,
            &settings.editor,
            timezone.as_ref(),
        )
        .context("record snippet")?;

        Ok(())
    }
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}
