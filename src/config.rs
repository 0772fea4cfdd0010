//! Optional runtime configuration.
//!
//! A plugin is launched by its host, so there is no command line to configure it with. Instead, a
//! JSON file is read once when an instance is created. Every field is optional; a missing file
//! simply means the defaults are used.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use serde::Deserialize;

/// Directory name used below the platform's config, data and log locations.
pub const APP_DIR: &str = "precision-poc";

/// Environment variable that overrides the location of the configuration file.
pub const CONFIG_ENV_VAR: &str = "PRECISION_POC_CONFIG";

const CONFIG_FILE: &str = "config.json";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub render_mode: RenderMode,
    pub profiler: ProfilerConfig,
    pub log: LogConfig,
    pub editor: EditorConfig,
}

/// How the single-precision entry point produces its output. The non-native modes exist to
/// measure the cost of routing single-precision audio through the double-precision path.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Render with the single-precision oscillator directly into the host's buffer.
    Native,
    /// Copy into a double-precision scratch buffer, render there, and copy back.
    SingleViaDouble,
    /// Like `SingleViaDouble`, but without rendering: only the copies are performed.
    CopyOnly,
}

impl Default for RenderMode {
    fn default() -> Self {
        RenderMode::Native
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProfilerConfig {
    pub enabled: bool,
    /// Render calls discarded before measurements start.
    pub warmup_cycles: u32,
    /// Measured render calls summarized in each report.
    pub report_interval: u32,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            warmup_cycles: 2000,
            report_interval: 500,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Directory the log file is written to. Defaults to a directory under the platform's local
    /// data directory.
    pub directory: Option<PathBuf>,
    pub file_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Debug,
            directory: None,
            file_name: format!("{}.txt", APP_DIR),
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> anyhow::Result<PathBuf> {
        let directory = match &self.directory {
            Some(directory) => directory.clone(),
            None => dirs::data_local_dir()
                .context("no local data directory on this platform")?
                .join(APP_DIR),
        };
        Ok(directory.join(&self.file_name))
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// TrueType/OpenType font used for the label. Common system fonts are tried if unset.
    pub font_path: Option<PathBuf>,
    /// How long after opening the editor waits before first reading the precision indicator.
    pub settle_delay_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            settle_delay_ms: 500,
        }
    }
}

impl EditorConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Config {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid configuration")
    }

    /// Reads the configuration at `path`. A missing file yields `None`.
    pub fn from_path(path: &Path) -> anyhow::Result<Option<Self>> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()))
            }
        };
        Self::from_json(&json)
            .with_context(|| format!("in {}", path.display()))
            .map(Some)
    }

    /// Location of the configuration file: the override from the environment if set, otherwise
    /// a file in the platform's config directory.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE)))
    }

    /// Loads the configuration from `default_path`.
    pub fn load() -> anyhow::Result<Self> {
        match Self::default_path() {
            Some(path) => Ok(Self::from_path(&path)?.unwrap_or_default()),
            None => Ok(Self::default()),
        }
    }
}
