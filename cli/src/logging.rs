//! Tracing setup driven by the `[app]` config table.
//!
//! Stdout carries the report, so logs go to `sif.log` under the configured
//! log directory. If that file cannot be opened, warnings and errors go to
//! stderr instead.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sif_config::SifConfig;

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_NAME: &str = "sif.log";

/// `RUST_LOG` wins, then `[app] log_filter`, then `info`.
fn env_filter(config: &SifConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter().unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing(config: &SifConfig) {
    let Some(dir) = config.log_dir() else {
        init_stderr(None);
        return;
    };

    match open_log(&dir) {
        Ok((path, file)) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter(config))
                .init();
            tracing::info!(path = %path.display(), "logging initialized");
        }
        Err(err) => init_stderr(Some((dir, err))),
    }
}

fn init_stderr(failure: Option<(PathBuf, io::Error)>) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_filter(LevelFilter::WARN))
        .init();
    if let Some((dir, err)) = failure {
        tracing::warn!(dir = %dir.display(), "cannot open log file: {err}");
    }
}

/// Create `dir` if needed and open `sif.log` in it for appending.
fn open_log(dir: &Path) -> io::Result<(PathBuf, File)> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((path, file))
}
