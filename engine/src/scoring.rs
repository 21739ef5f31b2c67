//! Purity, face-score, and installed-likelihood (IL) scoring.
//!
//! Purity is exact fixed-point (see [`Purity`]). IL and face-scores are
//! continuous and rounded to four decimals at the edge so that band checks
//! on reported values agree with band checks on computed ones.

use std::collections::BTreeMap;

use serde::Serialize;

use sif_types::{
    EngineSettings, Face, Family, IL_SCALE, IlBandThresholds, IlWeights, LinePath, ModuleSlot,
    Pick, Purity, SifBandThresholds,
};

use crate::ledger::Ledger;
use crate::line::LineState;

/// Evidence purity base term, in tenths.
const EVIDENCE_BASE: i32 = 6;
const CO_SLOT_WEIGHT: i32 = 10;
const CF_SLOT_WEIGHT: i32 = 16;

const OFFSET_CREDIT: f64 = 0.6;

// ── Purity ───────────────────────────────────────────────────

/// Evidence-path contribution of one pick, in tenths.
#[must_use]
pub const fn pick_weight(pick: Pick) -> i32 {
    match pick {
        Pick::C => 10,
        Pick::O => 6,
        Pick::F => 0,
    }
}

/// `0.6 + s(first) + s(second)`, within `[0.6, 2.6]`.
#[must_use]
pub const fn evidence_purity(first: Pick, second: Pick) -> Purity {
    Purity::from_tenths(EVIDENCE_BASE + pick_weight(first) + pick_weight(second))
}

/// Signed contribution of one module slot, or `None` when the slot does not
/// accept `pick`.
#[must_use]
pub const fn slot_contribution(slot: ModuleSlot, pick: Pick) -> Option<Purity> {
    let tenths = match (slot, pick) {
        (ModuleSlot::Co1 | ModuleSlot::Co2, Pick::C) => CO_SLOT_WEIGHT,
        (ModuleSlot::Co1 | ModuleSlot::Co2, Pick::O) => -CO_SLOT_WEIGHT,
        (ModuleSlot::Cf, Pick::C) => CF_SLOT_WEIGHT,
        (ModuleSlot::Cf, Pick::F) => -CF_SLOT_WEIGHT,
        _ => return None,
    };
    Some(Purity::from_tenths(tenths))
}

/// Module purity within `[-3.6, 3.6]`.
#[must_use]
pub fn module_purity(co1: Pick, co2: Pick, cf: Pick) -> Option<Purity> {
    Some(
        slot_contribution(ModuleSlot::Co1, co1)?
            + slot_contribution(ModuleSlot::Co2, co2)?
            + slot_contribution(ModuleSlot::Cf, cf)?,
    )
}

/// Purity mapped onto `[0, 1]` for its path's range.
fn normalized_purity(path: LinePath, purity: Purity) -> f64 {
    let tenths = f64::from(purity.tenths());
    match path {
        LinePath::Evidence => (tenths - 6.0) / 20.0,
        LinePath::Module => (tenths + 36.0) / 72.0,
    }
}

// ── Levels and bands ─────────────────────────────────────────

/// Qualitative strength of one IL factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum FactorLevel {
    Absent,
    Weak,
    Moderate,
    Strong,
}

impl FactorLevel {
    /// Quantize a raw ratio in `[0, 1]`.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio <= 0.0 {
            FactorLevel::Absent
        } else if ratio < 1.0 / 3.0 {
            FactorLevel::Weak
        } else if ratio < 2.0 / 3.0 {
            FactorLevel::Moderate
        } else {
            FactorLevel::Strong
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            FactorLevel::Absent => 0.0,
            FactorLevel::Weak => 1.0 / 3.0,
            FactorLevel::Moderate => 2.0 / 3.0,
            FactorLevel::Strong => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IlFactors {
    pub natural_instinct: FactorLevel,
    pub situational_fit: FactorLevel,
    pub social_expectation: FactorLevel,
    /// `None` while the face's line has no purity yet.
    pub internal_consistency: Option<FactorLevel>,
}

impl IlFactors {
    /// `IL_SCALE × Σ wᵢ·fᵢ`, rounded to four decimals. `None` until every
    /// factor is known.
    #[must_use]
    pub fn il(&self, weights: IlWeights) -> Option<f64> {
        let consistency = self.internal_consistency?;
        let sum = weights.natural_instinct() * self.natural_instinct.value()
            + weights.situational_fit() * self.situational_fit.value()
            + weights.social_expectation() * self.social_expectation.value()
            + weights.internal_consistency() * consistency.value();
        Some(round4(IL_SCALE * sum))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IlBand {
    Low,
    Medium,
    High,
}

impl IlBand {
    #[must_use]
    pub fn classify(il: f64, thresholds: IlBandThresholds) -> Self {
        if il < thresholds.low_below() {
            IlBand::Low
        } else if il > thresholds.high_above() {
            IlBand::High
        } else {
            IlBand::Medium
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SifBand {
    Low,
    Medium,
    High,
}

impl SifBand {
    #[must_use]
    pub fn classify(score: f64, thresholds: SifBandThresholds) -> Self {
        if score >= thresholds.high() {
            SifBand::High
        } else if score >= thresholds.medium() {
            SifBand::Medium
        } else {
            SifBand::Low
        }
    }
}

/// Combined reading of the face-score band and the IL band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    Match,
    #[serde(rename = "Outside-only")]
    OutsideOnly,
    #[serde(rename = "Inside-only")]
    InsideOnly,
    #[serde(rename = "Low-both")]
    LowBoth,
}

impl Classification {
    /// First matching rule wins.
    #[must_use]
    pub fn classify(sif: SifBand, il: IlBand) -> Self {
        let il_present = matches!(il, IlBand::Medium | IlBand::High);
        match sif {
            SifBand::High if il_present => Classification::Match,
            SifBand::Low if il_present => Classification::OutsideOnly,
            SifBand::Medium | SifBand::High if il == IlBand::Low => Classification::InsideOnly,
            _ => Classification::LowBoth,
        }
    }
}

// ── Face scoring ─────────────────────────────────────────────

fn weighted_credit(ledger: &Ledger, face: Face) -> f64 {
    f64::from(ledger.face_count(Pick::C, face))
        + OFFSET_CREDIT * f64::from(ledger.face_count(Pick::O, face))
}

/// Each face's weighted credit divided by the session's top weighted credit.
#[must_use]
pub fn face_scores(ledger: &Ledger) -> BTreeMap<Face, f64> {
    let credits: Vec<(Face, f64)> = Face::ALL
        .into_iter()
        .map(|face| (face, weighted_credit(ledger, face)))
        .collect();
    let top = credits.iter().map(|&(_, c)| c).fold(0.0_f64, f64::max);

    credits
        .into_iter()
        .map(|(face, credit)| (face, round4(ratio(credit, top))))
        .collect()
}

/// Quantized IL factors for `face`, given its family's line (if any).
#[must_use]
pub fn derive_factors(face: Face, ledger: &Ledger, line: Option<&LineState>) -> IlFactors {
    let family = face.family();

    let natural = ratio(
        f64::from(ledger.face_count(Pick::C, face)),
        f64::from(ledger.answered(family)),
    );
    let situational = ratio(
        f64::from(ledger.face_count(Pick::O, face)),
        f64::from(ledger.max_face_count(Pick::O)),
    );
    let social = ratio(
        f64::from(ledger.face_count(Pick::F, face)),
        f64::from(ledger.max_face_count(Pick::F)),
    );

    let consistency = line
        .and_then(|line| line.purity().map(|p| normalized_purity(line.path(), p)))
        .map(|norm_purity| FactorLevel::from_ratio(norm_purity * clean_share(face, ledger)));

    IlFactors {
        natural_instinct: FactorLevel::from_ratio(natural),
        situational_fit: FactorLevel::from_ratio(situational),
        social_expectation: FactorLevel::from_ratio(social),
        internal_consistency: consistency,
    }
}

/// `face`'s share of clean credits among its family's two faces.
fn clean_share(face: Face, ledger: &Ledger) -> f64 {
    let total: u32 = face
        .family()
        .faces()
        .into_iter()
        .map(|sibling| ledger.face_count(Pick::C, sibling))
        .sum();
    if total == 0 {
        return 0.5;
    }
    f64::from(ledger.face_count(Pick::C, face)) / f64::from(total)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

// ── Assessment ───────────────────────────────────────────────

/// Full scoring breakdown for one face. The IL fields stay `None` until the
/// face's line is complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceAssessment {
    pub face: Face,
    pub face_score: f64,
    pub sif_band: SifBand,
    pub factors: IlFactors,
    pub il: Option<f64>,
    pub il_band: Option<IlBand>,
    pub classification: Option<Classification>,
}

/// Score all fourteen faces, in canonical order.
#[must_use]
pub fn assess_faces(
    ledger: &Ledger,
    lines: &BTreeMap<Family, LineState>,
    settings: &EngineSettings,
) -> Vec<FaceAssessment> {
    let scores = face_scores(ledger);

    Face::ALL
        .into_iter()
        .map(|face| {
            let face_score = scores.get(&face).copied().unwrap_or(0.0);
            let factors = derive_factors(face, ledger, lines.get(&face.family()));
            let il = factors.il(settings.weights());
            let sif_band = SifBand::classify(face_score, settings.sif_bands());
            let il_band = il.map(|il| IlBand::classify(il, settings.il_bands()));
            FaceAssessment {
                face,
                face_score,
                sif_band,
                factors,
                il,
                il_band,
                classification: il_band.map(|band| Classification::classify(sif_band, band)),
            }
        })
        .collect()
}
