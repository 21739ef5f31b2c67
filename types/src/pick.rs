//! Choice symbols, verdicts, module slots, and fixed-point purity.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize, Serializer};

// ── Pick ─────────────────────────────────────────────────────

/// One of the three discrete symbols recorded per answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pick {
    /// Aligned / clean.
    C,
    /// Offset / wobble.
    O,
    /// Fail / override.
    F,
}

impl Pick {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Pick::C => 'C',
            Pick::O => 'O',
            Pick::F => 'F',
        }
    }
}

impl fmt::Display for Pick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ── Verdict ──────────────────────────────────────────────────

/// Discrete outcome of a completed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verdict {
    C,
    O,
    F,
}

impl Verdict {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::C => "Clean",
            Verdict::O => "Offset",
            Verdict::F => "Fail",
        }
    }

    #[must_use]
    pub const fn is_fail(self) -> bool {
        matches!(self, Verdict::F)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::C => "C",
            Verdict::O => "O",
            Verdict::F => "F",
        })
    }
}

// ── Paths and slots ──────────────────────────────────────────

/// Which assessment path a line runs. Fixed per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinePath {
    /// Two ordered picks; used for lines selected as primary ("A") lines.
    Evidence,
    /// Three picks tagged `CO1`, `CO2`, `CF`.
    Module,
}

impl LinePath {
    /// Picks required before the line can produce a verdict.
    #[must_use]
    pub const fn required_picks(self) -> usize {
        match self {
            LinePath::Evidence => 2,
            LinePath::Module => 3,
        }
    }
}

impl fmt::Display for LinePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinePath::Evidence => "evidence",
            LinePath::Module => "module",
        })
    }
}

/// Sub-type of a module-path question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModuleSlot {
    #[serde(rename = "CO1")]
    Co1,
    #[serde(rename = "CO2")]
    Co2,
    #[serde(rename = "CF")]
    Cf,
}

impl ModuleSlot {
    pub const ALL: [ModuleSlot; 3] = [ModuleSlot::Co1, ModuleSlot::Co2, ModuleSlot::Cf];

    /// Picks an option in this slot may carry. CO slots choose between clean
    /// and offset; the terminal CF slot between clean and fail.
    #[must_use]
    pub const fn accepts(self, pick: Pick) -> bool {
        match self {
            ModuleSlot::Co1 | ModuleSlot::Co2 => matches!(pick, Pick::C | Pick::O),
            ModuleSlot::Cf => matches!(pick, Pick::C | Pick::F),
        }
    }
}

impl fmt::Display for ModuleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModuleSlot::Co1 => "CO1",
            ModuleSlot::Co2 => "CO2",
            ModuleSlot::Cf => "CF",
        })
    }
}

// ── Purity ───────────────────────────────────────────────────

/// Line purity in exact tenths.
///
/// Every purity input (0.6, 1.0, 1.6 and their negatives) is a whole number
/// of tenths, so equality against the perfect-evidence threshold and ties
/// between module lines are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Purity(i32);

impl Purity {
    pub const ZERO: Purity = Purity(0);
    /// Two clean evidence picks: `0.6 + 1.0 + 1.0`.
    pub const PERFECT_EVIDENCE: Purity = Purity(26);

    #[must_use]
    pub const fn from_tenths(tenths: i32) -> Self {
        Self(tenths)
    }

    #[must_use]
    pub const fn tenths(self) -> i32 {
        self.0
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl Add for Purity {
    type Output = Purity;

    fn add(self, rhs: Purity) -> Purity {
        Purity(self.0 + rhs.0)
    }
}

impl fmt::Display for Purity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.as_f64())
    }
}

impl Serialize for Purity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}
