//! Identity resolution engine for SIF.
//!
//! Deterministic rules that turn a sequence of discrete choices into
//! counters, per-line verdicts, purity and likelihood scores, an anchor,
//! a ranked shortlist, and a final prize/alignment judgment.
//!
//! ```text
//! answers → Ledger → Verdict → Purity/IL → Anchor → Shortlist/Secondary → Prize
//! ```
//!
//! [`Session`] owns the answer log and drives every stage. The stage modules
//! are public for callers that want to run one rule in isolation.

mod anchor;
mod diagnostics;
mod ledger;
mod line;
mod prize;
mod result;
mod scoring;
mod session;
mod severity;
mod shortlist;
mod verdict;

pub use anchor::{
    AnchorCandidate, AnchorPhase, AnchorSelector, AnchorSource, CandidateTier, ResolvedAnchor,
    anchor_face,
};
pub use diagnostics::{DiagnosticExport, LineDiagnostic};
pub use ledger::Ledger;
pub use line::{LineState, LineVerdict};
pub use prize::{Badge, PrizeJudgment, judge, prize_for};
pub use result::{Friction, SifResult};
pub use scoring::{
    Classification, FaceAssessment, FactorLevel, IlBand, IlFactors, SifBand, assess_faces,
    derive_factors, evidence_purity, face_scores, module_purity, pick_weight, slot_contribution,
};
pub use session::{AnswerOutcome, LineProgress, Progress, Session, SessionEvent};
pub use severity::{
    CreepSource, ProbeAnswer, Remediation, Severity, SeverityReport, StaticCreepTable,
    resolve_probe,
};
pub use shortlist::{
    CollisionRecord, PRUNED, PrunedEntry, SecondaryResolution, Shortlist, ShortlistEntry,
    resolve_secondary,
};
pub use verdict::{evidence_verdict, module_verdict};

pub use sif_types::{
    BankError, EngineSettings, Face, Family, LinePath, Pick, Purity, QuestionBank, SifError,
    StateError, ValidationError, Verdict,
};
