//! Prize lookup and alignment badge.

use std::fmt;

use serde::Serialize;

use sif_types::Face;

use crate::shortlist::SecondaryResolution;

/// Canonical prize for `face`. The table is an involution: the prize of a
/// prize is the original face.
#[must_use]
pub const fn prize_for(face: Face) -> Face {
    match face {
        Face::ControlCommander => Face::BondingCaretaker,
        Face::BondingCaretaker => Face::ControlCommander,
        Face::ControlStrategist => Face::VisionPioneer,
        Face::VisionPioneer => Face::ControlStrategist,
        Face::PaceSprinter => Face::BoundaryGuardian,
        Face::BoundaryGuardian => Face::PaceSprinter,
        Face::PaceMarathoner => Face::RecognitionPerformer,
        Face::RecognitionPerformer => Face::PaceMarathoner,
        Face::BoundaryDiplomat => Face::TruthAnalyst,
        Face::TruthAnalyst => Face::BoundaryDiplomat,
        Face::TruthOracle => Face::BondingLoyalist,
        Face::BondingLoyalist => Face::TruthOracle,
        Face::RecognitionChampion => Face::VisionArchitect,
        Face::VisionArchitect => Face::RecognitionChampion,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    Aligned,
    #[serde(rename = "Installed from outside")]
    InstalledFromOutside,
    #[serde(rename = "Not yet aligned")]
    NotYetAligned,
}

impl Badge {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Badge::Aligned => "Aligned",
            Badge::InstalledFromOutside => "Installed from outside",
            Badge::NotYetAligned => "Not yet aligned",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrizeJudgment {
    pub prize: Face,
    pub aligned: bool,
    pub badge: Badge,
}

/// `aligned` compares the resolved secondary with the prize. The badge reads
/// the raw installed choice: the anchor itself is an inside choice, the prize
/// always lives in another family.
#[must_use]
pub fn judge(anchor: Face, resolution: &SecondaryResolution) -> PrizeJudgment {
    let prize = prize_for(anchor);
    let aligned = resolution.secondary == prize;
    let badge = if resolution.installed == anchor {
        Badge::Aligned
    } else if resolution.installed == prize {
        Badge::InstalledFromOutside
    } else {
        Badge::NotYetAligned
    };
    PrizeJudgment {
        prize,
        aligned,
        badge,
    }
}
