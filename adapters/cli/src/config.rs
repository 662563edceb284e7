//! Run settings merged from an optional TOML file and command-line arguments.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use snake_arcade_core::ModeId;
use thiserror::Error;

pub(crate) const DEFAULT_TICK_LIMIT: u32 = 2_000;
const DEFAULT_CLOCK_PERIOD_MS: u64 = 1_000;

/// How frames are presented during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RenderMode {
    /// Only the final summary is printed.
    #[default]
    None,
    /// Every frame is printed as a text grid.
    Text,
}

/// Contents of a configuration file. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) mode: Option<ModeId>,
    pub(crate) seed: Option<u64>,
    pub(crate) ticks: Option<u32>,
    pub(crate) clock_period_ms: Option<u64>,
    pub(crate) high_score_file: Option<PathBuf>,
    pub(crate) render: Option<RenderMode>,
}

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for the expected keys.
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// A countdown second must last at least one millisecond.
    #[error("clock_period_ms must be positive")]
    ZeroClockPeriod,
}

impl FileConfig {
    /// Loads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub(crate) fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Values given on the command line; they take precedence over the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) mode: Option<ModeId>,
    pub(crate) seed: Option<u64>,
    pub(crate) ticks: Option<u32>,
    pub(crate) high_score_file: Option<PathBuf>,
    pub(crate) render: Option<RenderMode>,
}

/// Fully resolved settings of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) mode: ModeId,
    pub(crate) seed: u64,
    pub(crate) ticks: u32,
    pub(crate) clock_period: Duration,
    pub(crate) high_score_file: Option<PathBuf>,
    pub(crate) render: RenderMode,
}

impl Settings {
    /// Merges the file values with the command-line overrides.
    pub(crate) fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let clock_period_ms = file.clock_period_ms.unwrap_or(DEFAULT_CLOCK_PERIOD_MS);
        if clock_period_ms == 0 {
            return Err(ConfigError::ZeroClockPeriod);
        }

        Ok(Self {
            mode: overrides.mode.or(file.mode).unwrap_or(ModeId::Classic),
            seed: overrides.seed.or(file.seed).unwrap_or_default(),
            ticks: overrides.ticks.or(file.ticks).unwrap_or(DEFAULT_TICK_LIMIT),
            clock_period: Duration::from_millis(clock_period_ms),
            high_score_file: overrides.high_score_file.or(file.high_score_file),
            render: overrides.render.or(file.render).unwrap_or_default(),
        })
    }
}
