//! Anchor selection: a small phase machine over complete lines.
//!
//! ```text
//! Building ──1 candidate──▶ AutoResolved ──▶ Resolved (AutoAnchor)
//!    │
//!    └──n candidates──▶ AwaitingTieBreak ──select──▶ Resolved (TieBreak)
//! ```
//!
//! With no candidates the selector stays in `Building`.

use std::collections::BTreeMap;

use serde::Serialize;

use sif_types::{Face, Family, LinePath, Pick, Purity, SifError, StateError, ValidationError};

use crate::ledger::Ledger;
use crate::line::LineState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnchorPhase {
    Building,
    AutoResolved,
    AwaitingTieBreak,
    Resolved,
}

/// Which priority rule admitted a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CandidateTier {
    /// Evidence line with both picks clean.
    PerfectEvidence,
    /// Module line tied at the top module purity.
    TopModule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnchorCandidate {
    pub family: Family,
    pub path: LinePath,
    pub purity: Purity,
    pub tier: CandidateTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnchorSource {
    AutoAnchor,
    TieBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedAnchor {
    pub family: Family,
    pub face: Face,
    pub purity: Purity,
    pub source: AnchorSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorSelector {
    phase: AnchorPhase,
    candidates: Vec<AnchorCandidate>,
    resolved: Option<ResolvedAnchor>,
    trail: Vec<AnchorPhase>,
}

impl Default for AnchorSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorSelector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: AnchorPhase::Building,
            candidates: Vec::new(),
            resolved: None,
            trail: vec![AnchorPhase::Building],
        }
    }

    #[must_use]
    pub const fn phase(&self) -> AnchorPhase {
        self.phase
    }

    #[must_use]
    pub fn candidates(&self) -> &[AnchorCandidate] {
        &self.candidates
    }

    #[must_use]
    pub const fn resolved(&self) -> Option<&ResolvedAnchor> {
        self.resolved.as_ref()
    }

    /// Every phase entered, in order.
    #[must_use]
    pub fn trail(&self) -> &[AnchorPhase] {
        &self.trail
    }

    /// Collect candidates from complete lines and advance the phase.
    ///
    /// Once resolved, this returns the cached candidates untouched.
    pub fn build_candidates(
        &mut self,
        lines: &BTreeMap<Family, LineState>,
        ledger: &Ledger,
    ) -> Result<&[AnchorCandidate], StateError> {
        if self.phase == AnchorPhase::Resolved {
            return Ok(&self.candidates);
        }

        let candidates = collect_candidates(lines);
        tracing::debug!(count = candidates.len(), "anchor candidates built");

        match candidates.as_slice() {
            [] => {
                self.candidates.clear();
                if self.phase != AnchorPhase::Building {
                    self.enter(AnchorPhase::Building);
                }
                return Err(StateError::NoAnchor);
            }
            [only] => {
                let only = *only;
                self.enter(AnchorPhase::AutoResolved);
                self.resolve(only, AnchorSource::AutoAnchor, ledger);
            }
            _ => self.enter(AnchorPhase::AwaitingTieBreak),
        }

        self.candidates = candidates;
        Ok(&self.candidates)
    }

    /// Resolve a pending tie-break in favor of `family`.
    pub fn select(&mut self, family: Family, ledger: &Ledger) -> Result<&ResolvedAnchor, SifError> {
        if self.phase != AnchorPhase::AwaitingTieBreak {
            return Err(StateError::NoTieBreakPending.into());
        }
        let candidate = self
            .candidates
            .iter()
            .find(|candidate| candidate.family == family)
            .copied()
            .ok_or(ValidationError::InvalidSelection { family })?;

        Ok(self.resolve(candidate, AnchorSource::TieBreak, ledger))
    }

    fn resolve(
        &mut self,
        candidate: AnchorCandidate,
        source: AnchorSource,
        ledger: &Ledger,
    ) -> &ResolvedAnchor {
        let face = anchor_face(candidate.family, ledger);
        tracing::info!(
            family = %candidate.family,
            face = %face,
            source = ?source,
            purity = %candidate.purity,
            "anchor resolved"
        );
        self.enter(AnchorPhase::Resolved);
        self.resolved.insert(ResolvedAnchor {
            family: candidate.family,
            face,
            purity: candidate.purity,
            source,
        })
    }

    fn enter(&mut self, phase: AnchorPhase) {
        self.phase = phase;
        self.trail.push(phase);
    }
}

fn collect_candidates(lines: &BTreeMap<Family, LineState>) -> Vec<AnchorCandidate> {
    let complete = || {
        lines
            .iter()
            .filter_map(|(&family, line)| line.purity().map(|purity| (family, line.path(), purity)))
    };

    let perfect: Vec<AnchorCandidate> = complete()
        .filter(|&(_, path, purity)| {
            path == LinePath::Evidence && purity == Purity::PERFECT_EVIDENCE
        })
        .map(|(family, path, purity)| AnchorCandidate {
            family,
            path,
            purity,
            tier: CandidateTier::PerfectEvidence,
        })
        .collect();
    if !perfect.is_empty() {
        return perfect;
    }

    let modules = || complete().filter(|&(_, path, _)| path == LinePath::Module);
    let Some(top) = modules().map(|(_, _, purity)| purity).max() else {
        return Vec::new();
    };
    modules()
        .filter(|&(_, _, purity)| purity == top)
        .map(|(family, path, purity)| AnchorCandidate {
            family,
            path,
            purity,
            tier: CandidateTier::TopModule,
        })
        .collect()
}

/// The family face with the most clean credits, then the most offset credits,
/// then the first in canonical order.
#[must_use]
pub fn anchor_face(family: Family, ledger: &Ledger) -> Face {
    let [first, second] = family.faces();
    let rank = |face| {
        (
            ledger.face_count(Pick::C, face),
            ledger.face_count(Pick::O, face),
        )
    };
    if rank(second) > rank(first) {
        second
    } else {
        first
    }
}
