//! Per-family line state on one of the two assessment paths.

use serde::Serialize;

use sif_types::{
    LinePath, ModuleSlot, Pick, Purity, Question, SifError, StateError, ValidationError, Verdict,
};

use crate::scoring::{evidence_purity, module_purity};
use crate::verdict::{evidence_verdict, module_verdict};

/// Recorded picks for one family. The path is fixed when the line is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "path", rename_all = "lowercase")]
pub enum LineState {
    Evidence {
        picks: Vec<Pick>,
    },
    Module {
        co1: Option<Pick>,
        co2: Option<Pick>,
        cf: Option<Pick>,
    },
}

/// Verdict of a line, or how far it still has to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LineVerdict {
    Incomplete { have: usize, need: usize },
    Resolved { verdict: Verdict },
}

impl LineVerdict {
    #[must_use]
    pub const fn verdict(self) -> Option<Verdict> {
        match self {
            LineVerdict::Resolved { verdict } => Some(verdict),
            LineVerdict::Incomplete { .. } => None,
        }
    }
}

impl LineState {
    #[must_use]
    pub const fn new(path: LinePath) -> Self {
        match path {
            LinePath::Evidence => LineState::Evidence { picks: Vec::new() },
            LinePath::Module => LineState::Module {
                co1: None,
                co2: None,
                cf: None,
            },
        }
    }

    #[must_use]
    pub const fn path(&self) -> LinePath {
        match self {
            LineState::Evidence { .. } => LinePath::Evidence,
            LineState::Module { .. } => LinePath::Module,
        }
    }

    /// Record the pick chosen on `question`. The question must belong to this
    /// line's path, and its slot (module) or position (evidence) must be open.
    pub fn record(&mut self, question: &Question, pick: Pick) -> Result<(), SifError> {
        let family = question.family;
        let path = self.path();
        if question.kind.path() != path {
            return Err(ValidationError::PathMismatch {
                question: question.id.clone(),
                family,
                kind: question.kind,
                path,
            }
            .into());
        }

        match self {
            LineState::Evidence { picks } => {
                if picks.len() >= LinePath::Evidence.required_picks() {
                    return Err(StateError::LineComplete { family }.into());
                }
                picks.push(pick);
            }
            LineState::Module { co1, co2, cf } => {
                let Some(slot) = question.kind.slot() else {
                    return Err(StateError::LineComplete { family }.into());
                };
                let target = match slot {
                    ModuleSlot::Co1 => co1,
                    ModuleSlot::Co2 => co2,
                    ModuleSlot::Cf => cf,
                };
                if target.is_some() {
                    return Err(StateError::SlotTaken { family, slot }.into());
                }
                *target = Some(pick);
            }
        }
        Ok(())
    }

    /// Picks recorded so far, in evidence order or slot order.
    #[must_use]
    pub fn picks(&self) -> Vec<Pick> {
        match self {
            LineState::Evidence { picks } => picks.clone(),
            LineState::Module { co1, co2, cf } => [*co1, *co2, *cf].into_iter().flatten().collect(),
        }
    }

    #[must_use]
    pub fn have(&self) -> usize {
        match self {
            LineState::Evidence { picks } => picks.len(),
            LineState::Module { co1, co2, cf } => {
                [co1, co2, cf].into_iter().filter(|p| p.is_some()).count()
            }
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.have() == self.path().required_picks()
    }

    pub fn verdict(&self) -> Result<LineVerdict, ValidationError> {
        let verdict = match self {
            LineState::Evidence { picks } => match picks.as_slice() {
                [first, second] => evidence_verdict(*first, *second),
                _ => return Ok(self.incomplete()),
            },
            LineState::Module {
                co1: Some(co1),
                co2: Some(co2),
                cf: Some(cf),
            } => module_verdict(*co1, *co2, *cf)?,
            LineState::Module { .. } => return Ok(self.incomplete()),
        };
        Ok(LineVerdict::Resolved { verdict })
    }

    /// Purity of a complete line; `None` while incomplete.
    #[must_use]
    pub fn purity(&self) -> Option<Purity> {
        match self {
            LineState::Evidence { picks } => match picks.as_slice() {
                [first, second] => Some(evidence_purity(*first, *second)),
                _ => None,
            },
            LineState::Module {
                co1: Some(co1),
                co2: Some(co2),
                cf: Some(cf),
            } => module_purity(*co1, *co2, *cf),
            LineState::Module { .. } => None,
        }
    }

    fn incomplete(&self) -> LineVerdict {
        LineVerdict::Incomplete {
            have: self.have(),
            need: self.path().required_picks(),
        }
    }
}
