//! Core domain types for SIF.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies:
//! the family/face catalog, choice symbols, the validated question bank,
//! resolved scoring settings, and the typed error taxonomy.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod bank;
mod error;
mod family;
mod pick;
mod settings;

pub use bank::{
    AnswerOption, BankError, DebugTag, EffectPayload, Question, QuestionBank, QuestionKind,
};
pub use error::{SifError, StateError, ValidationError};
pub use family::{Face, Family};
pub use pick::{LinePath, ModuleSlot, Pick, Purity, Verdict};
pub use settings::{
    EngineSettings, IL_SCALE, IlBandThresholds, IlWeights, SettingsError, SifBandThresholds,
};
