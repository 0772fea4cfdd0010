//! Diagnostic log file shared by every plugin instance in the host process.
//!
//! The `log` facade is global, so the file logger is installed at most once per process; later
//! instances reuse it. The log's format and location are not a contract anything depends on.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::LevelFilter;
use once_cell::sync::OnceCell;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::LogConfig;

/// First line written to a fresh log session.
const WELCOME_MESSAGE: &str = "Processor started.";

static LOG_FILE: OnceCell<PathBuf> = OnceCell::new();

/// Installs the file logger described by `config`, returning the path of the log file. If a
/// logger has already been installed by another instance, its path is returned and `config` is
/// ignored.
pub fn init(config: &LogConfig) -> anyhow::Result<&'static Path> {
    LOG_FILE
        .get_or_try_init(|| {
            let path = config.file_path()?;
            if let Some(directory) = path.parent() {
                fs::create_dir_all(directory)
                    .with_context(|| format!("failed to create {}", directory.display()))?;
            }

            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            writeln!(file, "{}", WELCOME_MESSAGE)?;

            let log_config = ConfigBuilder::new()
                .set_thread_level(LevelFilter::Error)
                .set_target_level(LevelFilter::Off)
                .build();
            WriteLogger::init(config.level, log_config, file)
                .context("a different logger is already installed")?;

            Ok(path)
        })
        .map(PathBuf::as_path)
}

/// Path of the installed log file, if logging has been initialized.
pub fn log_file() -> Option<&'static Path> {
    LOG_FILE.get().map(PathBuf::as_path)
}
