//! Families (behavioral lines) and the faces that live inside them.
//!
//! Both sets are closed: seven families, two archetypes per family, fourteen
//! faces. Declaration order is the canonical order used for every
//! deterministic tie-break downstream.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ── Family ───────────────────────────────────────────────────

/// One of the seven behavioral dimensions being assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Family {
    Control,
    Pace,
    Boundary,
    Truth,
    Recognition,
    Bonding,
    Vision,
}

impl Family {
    pub const ALL: [Family; 7] = [
        Family::Control,
        Family::Pace,
        Family::Boundary,
        Family::Truth,
        Family::Recognition,
        Family::Bonding,
        Family::Vision,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Family::Control => "Control",
            Family::Pace => "Pace",
            Family::Boundary => "Boundary",
            Family::Truth => "Truth",
            Family::Recognition => "Recognition",
            Family::Bonding => "Bonding",
            Family::Vision => "Vision",
        }
    }

    /// The two faces of this family, in canonical order.
    #[must_use]
    pub const fn faces(self) -> [Face; 2] {
        match self {
            Family::Control => [Face::ControlCommander, Face::ControlStrategist],
            Family::Pace => [Face::PaceSprinter, Face::PaceMarathoner],
            Family::Boundary => [Face::BoundaryGuardian, Face::BoundaryDiplomat],
            Family::Truth => [Face::TruthAnalyst, Face::TruthOracle],
            Family::Recognition => [Face::RecognitionPerformer, Face::RecognitionChampion],
            Family::Bonding => [Face::BondingCaretaker, Face::BondingLoyalist],
            Family::Vision => [Face::VisionPioneer, Face::VisionArchitect],
        }
    }

    /// Parse a family key. Matching is case-insensitive; anything outside the
    /// seven names is rejected rather than mapped to a fallback.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|family| family.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownFamily {
                key: raw.to_owned(),
            })
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Face ─────────────────────────────────────────────────────

/// A `(family, archetype)` pair, the atomic identity unit.
///
/// Serializes as its composite key, e.g. `"Control:Commander"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Face {
    ControlCommander,
    ControlStrategist,
    PaceSprinter,
    PaceMarathoner,
    BoundaryGuardian,
    BoundaryDiplomat,
    TruthAnalyst,
    TruthOracle,
    RecognitionPerformer,
    RecognitionChampion,
    BondingCaretaker,
    BondingLoyalist,
    VisionPioneer,
    VisionArchitect,
}

impl Face {
    pub const ALL: [Face; 14] = [
        Face::ControlCommander,
        Face::ControlStrategist,
        Face::PaceSprinter,
        Face::PaceMarathoner,
        Face::BoundaryGuardian,
        Face::BoundaryDiplomat,
        Face::TruthAnalyst,
        Face::TruthOracle,
        Face::RecognitionPerformer,
        Face::RecognitionChampion,
        Face::BondingCaretaker,
        Face::BondingLoyalist,
        Face::VisionPioneer,
        Face::VisionArchitect,
    ];

    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Face::ControlCommander | Face::ControlStrategist => Family::Control,
            Face::PaceSprinter | Face::PaceMarathoner => Family::Pace,
            Face::BoundaryGuardian | Face::BoundaryDiplomat => Family::Boundary,
            Face::TruthAnalyst | Face::TruthOracle => Family::Truth,
            Face::RecognitionPerformer | Face::RecognitionChampion => Family::Recognition,
            Face::BondingCaretaker | Face::BondingLoyalist => Family::Bonding,
            Face::VisionPioneer | Face::VisionArchitect => Family::Vision,
        }
    }

    #[must_use]
    pub const fn archetype(self) -> &'static str {
        match self {
            Face::ControlCommander => "Commander",
            Face::ControlStrategist => "Strategist",
            Face::PaceSprinter => "Sprinter",
            Face::PaceMarathoner => "Marathoner",
            Face::BoundaryGuardian => "Guardian",
            Face::BoundaryDiplomat => "Diplomat",
            Face::TruthAnalyst => "Analyst",
            Face::TruthOracle => "Oracle",
            Face::RecognitionPerformer => "Performer",
            Face::RecognitionChampion => "Champion",
            Face::BondingCaretaker => "Caretaker",
            Face::BondingLoyalist => "Loyalist",
            Face::VisionPioneer => "Pioneer",
            Face::VisionArchitect => "Architect",
        }
    }

    /// Composite `"Family:Archetype"` key.
    #[must_use]
    pub fn key(self) -> String {
        format!("{}:{}", self.family().as_str(), self.archetype())
    }

    /// Parse a composite key. The archetype must belong to the named family.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let unknown = || ValidationError::UnknownFace {
            key: raw.to_owned(),
        };
        let (family, archetype) = raw.trim().split_once(':').ok_or_else(unknown)?;
        let family = Family::parse(family).map_err(|_| unknown())?;
        family
            .faces()
            .into_iter()
            .find(|face| face.archetype().eq_ignore_ascii_case(archetype.trim()))
            .ok_or_else(unknown)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.family().as_str(), self.archetype())
    }
}

impl FromStr for Face {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Face {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Face> for String {
    fn from(value: Face) -> Self {
        value.key()
    }
}

#[cfg(test)]
mod tests {
    use super::{Face, Family};
    use crate::ValidationError;

    #[test]
    fn every_family_owns_exactly_its_two_faces() {
        for family in Family::ALL {
            for face in family.faces() {
                assert_eq!(face.family(), family);
            }
        }
        let owned: usize = Family::ALL.iter().map(|f| f.faces().len()).sum();
        assert_eq!(owned, Face::ALL.len());
    }

    #[test]
    fn family_parse_is_case_insensitive() {
        assert_eq!(Family::parse("control").unwrap(), Family::Control);
        assert_eq!(" Vision ".parse::<Family>().unwrap(), Family::Vision);
    }

    #[test]
    fn family_parse_rejects_unknown_key() {
        let err = Family::parse("Courage").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownFamily {
                key: "Courage".to_owned()
            }
        );
    }

    #[test]
    fn face_key_roundtrips_through_parse() {
        for face in Face::ALL {
            assert_eq!(Face::parse(&face.key()).unwrap(), face);
        }
    }

    #[test]
    fn face_parse_rejects_archetype_from_another_family() {
        assert!(Face::parse("Control:Caretaker").is_err());
        assert!(Face::parse("Commander").is_err());
    }

    #[test]
    fn face_serializes_as_composite_key() {
        let json = serde_json::to_string(&Face::TruthOracle).unwrap();
        assert_eq!(json, "\"Truth:Oracle\"");
        let back: Face = serde_json::from_str("\"Bonding:Loyalist\"").unwrap();
        assert_eq!(back, Face::BondingLoyalist);
    }
}
