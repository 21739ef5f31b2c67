//! JSON-serializable snapshot of a session for offline inspection.

use serde::Serialize;

use sif_types::{Family, LinePath, Pick, Purity};

use crate::anchor::{AnchorCandidate, AnchorPhase, ResolvedAnchor};
use crate::ledger::Ledger;
use crate::line::LineVerdict;
use crate::scoring::FaceAssessment;
use crate::severity::SeverityReport;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineDiagnostic {
    pub family: Family,
    pub path: LinePath,
    pub picks: Vec<Pick>,
    pub verdict: LineVerdict,
    pub purity: Option<Purity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticExport {
    pub lines: Vec<LineDiagnostic>,
    pub faces: Vec<FaceAssessment>,
    pub anchor_phase: AnchorPhase,
    pub anchor_trail: Vec<AnchorPhase>,
    pub candidates: Vec<AnchorCandidate>,
    pub anchor: Option<ResolvedAnchor>,
    pub probes: Vec<SeverityReport>,
    pub counters: Ledger,
}

impl DiagnosticExport {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
