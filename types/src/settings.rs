//! Resolved scoring settings shared across crates.
//!
//! These types represent fully-validated configuration state. Raw TOML
//! structs (with `Option` fields) stay in `sif-config`, which resolves them
//! into these types at the parse boundary.
//!
//! Existence of a value is the proof of its validity.

use serde::Serialize;
use thiserror::Error;

/// Upper end of the installed-likelihood scale. IL is the weighted factor sum
/// stretched onto `[0, IL_SCALE]` so the absolute IL band thresholds apply.
pub const IL_SCALE: f64 = 3.0;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("IL weight `{name}` must be within [0, 1], got {value}")]
    WeightOutOfRange { name: &'static str, value: f64 },
    #[error("IL weights must sum to 1.0, got {sum}")]
    WeightsNotNormalized { sum: f64 },
    #[error("SIF band thresholds must satisfy 0 <= medium <= high <= 1 (medium {medium}, high {high})")]
    SifBands { medium: f64, high: f64 },
    #[error("IL band thresholds must satisfy 0 <= low <= high <= 3 (low {low}, high {high})")]
    IlBands { low: f64, high: f64 },
    #[error("shortlist size must be at least 2, got {0}")]
    ShortlistTooSmall(usize),
    #[error("max faces per family must be at least 1")]
    ZeroFamilyCap,
    #[error("monitor window must be at least one day")]
    ZeroMonitorWindow,
}

// ── IL weights ───────────────────────────────────────────────

/// Weights of the four installed-likelihood factors. Always sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IlWeights {
    natural_instinct: f64,
    situational_fit: f64,
    social_expectation: f64,
    internal_consistency: f64,
}

impl IlWeights {
    pub const DEFAULT: IlWeights = IlWeights {
        natural_instinct: 0.30,
        situational_fit: 0.25,
        social_expectation: 0.25,
        internal_consistency: 0.20,
    };

    pub fn new(
        natural_instinct: f64,
        situational_fit: f64,
        social_expectation: f64,
        internal_consistency: f64,
    ) -> Result<Self, SettingsError> {
        for (name, value) in [
            ("natural_instinct", natural_instinct),
            ("situational_fit", situational_fit),
            ("social_expectation", social_expectation),
            ("internal_consistency", internal_consistency),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::WeightOutOfRange { name, value });
            }
        }
        let sum = natural_instinct + situational_fit + social_expectation + internal_consistency;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SettingsError::WeightsNotNormalized { sum });
        }
        Ok(Self {
            natural_instinct,
            situational_fit,
            social_expectation,
            internal_consistency,
        })
    }

    #[must_use]
    pub const fn natural_instinct(self) -> f64 {
        self.natural_instinct
    }

    #[must_use]
    pub const fn situational_fit(self) -> f64 {
        self.situational_fit
    }

    #[must_use]
    pub const fn social_expectation(self) -> f64 {
        self.social_expectation
    }

    #[must_use]
    pub const fn internal_consistency(self) -> f64 {
        self.internal_consistency
    }
}

impl Default for IlWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── Bands ────────────────────────────────────────────────────

/// Thresholds on the normalized face-score ("how much this choice pattern
/// credited the face").
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SifBandThresholds {
    medium: f64,
    high: f64,
}

impl SifBandThresholds {
    pub const DEFAULT: SifBandThresholds = SifBandThresholds {
        medium: 0.30,
        high: 0.50,
    };

    pub fn new(medium: f64, high: f64) -> Result<Self, SettingsError> {
        if !(0.0..=1.0).contains(&medium) || !(0.0..=1.0).contains(&high) || medium > high {
            return Err(SettingsError::SifBands { medium, high });
        }
        Ok(Self { medium, high })
    }

    #[must_use]
    pub const fn medium(self) -> f64 {
        self.medium
    }

    #[must_use]
    pub const fn high(self) -> f64 {
        self.high
    }
}

/// Thresholds on the absolute IL score ("how likely the face is
/// structurally installed"). Calibrated independently of the SIF bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IlBandThresholds {
    low_below: f64,
    high_above: f64,
}

impl IlBandThresholds {
    pub const DEFAULT: IlBandThresholds = IlBandThresholds {
        low_below: 1.60,
        high_above: 2.40,
    };

    pub fn new(low_below: f64, high_above: f64) -> Result<Self, SettingsError> {
        let in_scale = |v: f64| (0.0..=IL_SCALE).contains(&v);
        if !in_scale(low_below) || !in_scale(high_above) || low_below > high_above {
            return Err(SettingsError::IlBands {
                low: low_below,
                high: high_above,
            });
        }
        Ok(Self {
            low_below,
            high_above,
        })
    }

    #[must_use]
    pub const fn low_below(self) -> f64 {
        self.low_below
    }

    #[must_use]
    pub const fn high_above(self) -> f64 {
        self.high_above
    }
}

// ── EngineSettings ───────────────────────────────────────────

/// Every tunable the engine reads, validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineSettings {
    weights: IlWeights,
    sif_bands: SifBandThresholds,
    il_bands: IlBandThresholds,
    shortlist_size: usize,
    max_per_family: usize,
    monitor_window_days: u32,
}

impl EngineSettings {
    pub const DEFAULT_SHORTLIST_SIZE: usize = 4;
    pub const DEFAULT_MAX_PER_FAMILY: usize = 1;
    pub const DEFAULT_MONITOR_WINDOW_DAYS: u32 = 21;

    pub fn new(
        weights: IlWeights,
        sif_bands: SifBandThresholds,
        il_bands: IlBandThresholds,
        shortlist_size: usize,
        max_per_family: usize,
        monitor_window_days: u32,
    ) -> Result<Self, SettingsError> {
        if shortlist_size < 2 {
            return Err(SettingsError::ShortlistTooSmall(shortlist_size));
        }
        if max_per_family == 0 {
            return Err(SettingsError::ZeroFamilyCap);
        }
        if monitor_window_days == 0 {
            return Err(SettingsError::ZeroMonitorWindow);
        }
        Ok(Self {
            weights,
            sif_bands,
            il_bands,
            shortlist_size,
            max_per_family,
            monitor_window_days,
        })
    }

    #[must_use]
    pub const fn weights(&self) -> IlWeights {
        self.weights
    }

    #[must_use]
    pub const fn sif_bands(&self) -> SifBandThresholds {
        self.sif_bands
    }

    #[must_use]
    pub const fn il_bands(&self) -> IlBandThresholds {
        self.il_bands
    }

    #[must_use]
    pub const fn shortlist_size(&self) -> usize {
        self.shortlist_size
    }

    #[must_use]
    pub const fn max_per_family(&self) -> usize {
        self.max_per_family
    }

    #[must_use]
    pub const fn monitor_window_days(&self) -> u32 {
        self.monitor_window_days
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            weights: IlWeights::DEFAULT,
            sif_bands: SifBandThresholds::DEFAULT,
            il_bands: IlBandThresholds::DEFAULT,
            shortlist_size: Self::DEFAULT_SHORTLIST_SIZE,
            max_per_family: Self::DEFAULT_MAX_PER_FAMILY,
            monitor_window_days: Self::DEFAULT_MONITOR_WINDOW_DAYS,
        }
    }
}
