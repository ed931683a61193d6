// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process environment: data directory, configuration, logging

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tandem_core::TandemConfig;
use tracing_appender::non_blocking::WorkerGuard;

/// Overrides the data directory when `--data-dir` is not given
pub const DATA_DIR_ENV: &str = "TANDEM_DATA_DIR";
/// Log filter directives, e.g. `tandem_engine=debug`
pub const LOG_ENV: &str = "TANDEM_LOG";

const CONFIG_FILE: &str = "tandem.toml";
const SOCKET_FILE: &str = "tandem.sock";

/// Resolved locations and configuration for one invocation
#[derive(Debug)]
pub struct Env {
    pub data_dir: PathBuf,
    pub config: TandemConfig,
}

impl Env {
    pub fn resolve(data_dir: Option<PathBuf>, config: Option<PathBuf>) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir, std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))?;
        let config = match config {
            // An explicit config file must exist
            Some(path) => TandemConfig::load(&path)?,
            None => TandemConfig::load_or_default(&data_dir.join(CONFIG_FILE))?,
        };
        Ok(Self { data_dir, config })
    }

    /// Socket the authoritative process listens on
    pub fn socket_path(&self) -> PathBuf {
        self.config
            .socket
            .clone()
            .unwrap_or_else(|| self.data_dir.join(SOCKET_FILE))
    }
}

fn resolve_data_dir(flag: Option<PathBuf>, from_env: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag.or(from_env) {
        return Ok(dir);
    }
    dirs::data_dir()
        .map(|dir| dir.join("tandem"))
        .ok_or_else(|| anyhow!("no data directory; pass --data-dir or set {DATA_DIR_ENV}"))
}

/// Install the global subscriber. Logs go to stderr, or to `log_file` when
/// given. Keep the returned guard alive until exit so buffered file output
/// is flushed.
pub fn init_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(log_file) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = log_file
        .file_name()
        .ok_or_else(|| anyhow!("log file has no name: {}", log_file.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(Some(guard))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
