//! File logging for the binary.
//!
//! The dashboard owns the terminal, so everything goes to a single file that
//! is truncated at the start of each session.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};

/// Installs the global file logger and returns the path it writes to.
pub fn initialize(path: &Path, level: LevelFilter) -> anyhow::Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create log directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    WriteLogger::init(level, build_config(), file).context("logger already initialized")?;
    Ok(path.to_path_buf())
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}
