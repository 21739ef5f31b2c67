//! Configuration loading, parsing, and resolution for SIF.
//!
//! The raw TOML structs here keep every field optional. [`SifConfig::engine_settings`]
//! resolves them into the validated [`EngineSettings`] the engine consumes;
//! anything absent falls back to the engine's calibrated defaults.
//!
//! ```toml
//! [app]
//! log_filter = "sif_engine=debug"
//! log_dir = "${HOME}/.sif/logs"
//! export_dir = "${HOME}/sif-exports"
//!
//! [scoring]
//! shortlist_size = 4
//! max_per_family = 1
//!
//! [scoring.weights]
//! natural_instinct = 0.30
//! situational_fit = 0.25
//! social_expectation = 0.25
//! internal_consistency = 0.20
//!
//! [scoring.sif_bands]
//! medium = 0.30
//! high = 0.50
//!
//! [scoring.il_bands]
//! low_below = 1.60
//! high_above = 2.40
//!
//! [severity]
//! monitor_window_days = 21
//! ```

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use sif_types::{EngineSettings, IlBandThresholds, IlWeights, SettingsError, SifBandThresholds};

#[derive(Debug, Default, Deserialize)]
pub struct SifConfig {
    pub app: Option<AppConfig>,
    pub scoring: Option<ScoringConfig>,
    pub severity: Option<SeverityConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
    /// Directory holding `sif.log`. Supports `${VAR}` expansion.
    pub log_dir: Option<String>,
    /// Default directory for diagnostic exports. Supports `${VAR}` expansion.
    pub export_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScoringConfig {
    pub shortlist_size: Option<usize>,
    pub max_per_family: Option<usize>,
    /// All four weights are required together; they must be renormalized as a set.
    pub weights: Option<WeightsConfig>,
    pub sif_bands: Option<SifBandsConfig>,
    pub il_bands: Option<IlBandsConfig>,
}

#[derive(Debug, Deserialize)]
pub struct WeightsConfig {
    pub natural_instinct: f64,
    pub situational_fit: f64,
    pub social_expectation: f64,
    pub internal_consistency: f64,
}

#[derive(Debug, Deserialize)]
pub struct SifBandsConfig {
    pub medium: f64,
    pub high: f64,
}

#[derive(Debug, Deserialize)]
pub struct IlBandsConfig {
    pub low_below: f64,
    pub high_above: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeverityConfig {
    /// Days a Deep F line stays under watch after the counter-routine starts.
    pub monitor_window_days: Option<u32>,
}

/// Replace `${VAR}` references with environment values. Unset variables
/// expand to the empty string; an unterminated `${` is kept verbatim.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        if !name.is_empty() {
            out.push_str(&env::var(name).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl SifConfig {
    /// Load `~/.sif/config.toml`. A missing file is not an error.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|err| {
            tracing::warn!(path = %path.display(), "Failed to read config: {err}");
            ConfigError::Read {
                path: path.to_path_buf(),
                source: err,
            }
        })?;

        Self::parse(&content).map(Some).map_err(|err| {
            tracing::warn!(path = %path.display(), "Failed to parse config: {err}");
            ConfigError::Parse {
                path: path.to_path_buf(),
                source: err,
            }
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Resolve into validated engine settings.
    pub fn engine_settings(&self) -> Result<EngineSettings, SettingsError> {
        let scoring = self.scoring.as_ref();

        let weights = match scoring.and_then(|s| s.weights.as_ref()) {
            Some(w) => IlWeights::new(
                w.natural_instinct,
                w.situational_fit,
                w.social_expectation,
                w.internal_consistency,
            )?,
            None => IlWeights::DEFAULT,
        };
        let sif_bands = match scoring.and_then(|s| s.sif_bands.as_ref()) {
            Some(b) => SifBandThresholds::new(b.medium, b.high)?,
            None => SifBandThresholds::DEFAULT,
        };
        let il_bands = match scoring.and_then(|s| s.il_bands.as_ref()) {
            Some(b) => IlBandThresholds::new(b.low_below, b.high_above)?,
            None => IlBandThresholds::DEFAULT,
        };

        EngineSettings::new(
            weights,
            sif_bands,
            il_bands,
            scoring
                .and_then(|s| s.shortlist_size)
                .unwrap_or(EngineSettings::DEFAULT_SHORTLIST_SIZE),
            scoring
                .and_then(|s| s.max_per_family)
                .unwrap_or(EngineSettings::DEFAULT_MAX_PER_FAMILY),
            self.severity
                .as_ref()
                .and_then(|s| s.monitor_window_days)
                .unwrap_or(EngineSettings::DEFAULT_MONITOR_WINDOW_DAYS),
        )
    }

    #[must_use]
    pub fn log_filter(&self) -> Option<&str> {
        self.app.as_ref().and_then(|app| app.log_filter.as_deref())
    }

    /// The configured log directory, or `~/.sif/logs` when unset.
    #[must_use]
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.app
            .as_ref()
            .and_then(|app| app.log_dir.as_deref())
            .map(|raw| PathBuf::from(expand_env_vars(raw)))
            .or_else(default_log_dir)
    }

    #[must_use]
    pub fn export_dir(&self) -> Option<PathBuf> {
        self.app
            .as_ref()
            .and_then(|app| app.export_dir.as_deref())
            .map(|raw| PathBuf::from(expand_env_vars(raw)))
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sif").join("config.toml"))
}

#[must_use]
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sif").join("logs"))
}
