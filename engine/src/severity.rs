//! Severity probe for failed lines.

use std::fmt;

use serde::{Deserialize, Serialize};

use sif_types::{Family, ValidationError, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeAnswer {
    /// The user kept going despite the failure.
    PushThrough,
    /// The line gave way entirely.
    Collapse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    #[serde(rename = "Light F")]
    LightF,
    #[serde(rename = "Deep F")]
    DeepF,
}

impl Severity {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Severity::LightF => "Light F",
            Severity::DeepF => "Deep F",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Remediation {
    Monitor,
    InstallCounterRoutine { monitor_days: u32 },
}

/// Which foreign family moves in when a line fails.
pub trait CreepSource: fmt::Debug {
    fn creeping_family(&self, failed: Family) -> Family;
}

/// Fixed failed-family to creeping-family table.
// TODO: weight the creeping family by the faceF credits the failed line's
// options actually handed out, falling back to this table on a tie.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCreepTable;

impl CreepSource for StaticCreepTable {
    fn creeping_family(&self, failed: Family) -> Family {
        match failed {
            Family::Control => Family::Pace,
            Family::Pace | Family::Vision => Family::Control,
            Family::Boundary => Family::Bonding,
            Family::Truth => Family::Recognition,
            Family::Recognition => Family::Truth,
            Family::Bonding => Family::Boundary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityReport {
    pub family: Family,
    pub answer: ProbeAnswer,
    pub severity: Severity,
    pub remediation: Remediation,
    pub creep: Family,
}

/// Classify a failed line from the probe answer.
pub fn resolve_probe(
    family: Family,
    verdict: Option<Verdict>,
    answer: ProbeAnswer,
    creep: &dyn CreepSource,
    monitor_days: u32,
) -> Result<SeverityReport, ValidationError> {
    if verdict != Some(Verdict::F) {
        return Err(ValidationError::ProbeOnNonFailedLine { family });
    }

    let (severity, remediation) = match answer {
        ProbeAnswer::PushThrough => (Severity::LightF, Remediation::Monitor),
        ProbeAnswer::Collapse => (
            Severity::DeepF,
            Remediation::InstallCounterRoutine { monitor_days },
        ),
    };
    let creep = creep.creeping_family(family);
    tracing::debug!(%family, %severity, creep = %creep, "severity probe resolved");

    Ok(SeverityReport {
        family,
        answer,
        severity,
        remediation,
        creep,
    })
}
