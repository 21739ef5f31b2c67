//! Typed failures surfaced by the engine.
//!
//! Two families: [`ValidationError`] for malformed or out-of-domain input and
//! [`StateError`] for operations attempted in the wrong engine state. The
//! engine never substitutes a default for either.

use thiserror::Error;

use crate::{Face, Family, LinePath, ModuleSlot, QuestionKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown family `{key}`")]
    UnknownFamily { key: String },
    #[error("unknown face `{key}`")]
    UnknownFace { key: String },
    #[error("unknown question `{id}`")]
    UnknownQuestion { id: String },
    #[error("question `{question}` has no option `{key}`")]
    UnknownOption { question: String, key: String },
    #[error("question `{question}` belongs to {expected}, not {actual}")]
    FamilyMismatch {
        question: String,
        expected: Family,
        actual: Family,
    },
    #[error("question `{question}` is a {kind} question but {family} runs the {path} path")]
    PathMismatch {
        question: String,
        family: Family,
        kind: QuestionKind,
        path: LinePath,
    },
    #[error("verdict key {key} is outside the module table")]
    VerdictKeyOutOfDomain { key: String },
    #[error("{family} is not an anchor candidate")]
    InvalidSelection { family: Family },
    #[error("{face} is not on the shortlist")]
    NotInShortlist { face: Face },
    #[error("severity probe only runs on failed lines; {family} did not fail")]
    ProbeOnNonFailedLine { family: Family },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("no answers recorded")]
    NoAnswers,
    #[error("primary lines already selected")]
    PrimariesAlreadySelected,
    #[error("primary lines must be selected before the first answer")]
    PrimariesAfterAnswers,
    #[error("question `{id}` already answered")]
    AlreadyAnswered { id: String },
    #[error("{family} line already has all of its picks")]
    LineComplete { family: Family },
    #[error("{family} slot {slot} already answered")]
    SlotTaken { family: Family, slot: ModuleSlot },
    #[error("{family} line is not complete")]
    Incomplete { family: Family },
    #[error("no anchor: no complete line qualifies as a candidate")]
    NoAnchor,
    #[error("anchor not resolved")]
    AnchorUnresolved,
    #[error("anchor selector is not awaiting a tie-break")]
    NoTieBreakPending,
    #[error("installed choice not made")]
    InstalledMissing,
    #[error("shortlist has no entry other than the anchor")]
    NoSecondary,
    #[error("severity probe pending for {family}")]
    ProbePending { family: Family },
    #[error("severity probe for {family} already answered")]
    ProbeAnswered { family: Family },
    #[error("nothing to undo")]
    NothingToUndo,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SifError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    State(#[from] StateError),
}
