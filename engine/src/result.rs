//! The final, immutable outcome of a session.

use serde::Serialize;

use sif_types::{Face, Family};

use crate::anchor::{AnchorSource, ResolvedAnchor};
use crate::prize::{Badge, PrizeJudgment};
use crate::severity::SeverityReport;
use crate::shortlist::{CollisionRecord, PrunedEntry, SecondaryResolution};

/// Everything that bent the straight path from answers to result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Friction {
    pub tie_break: bool,
    pub collision: Option<CollisionRecord>,
    pub pruned: Vec<PrunedEntry>,
    pub failed_lines: Vec<SeverityReport>,
}

impl Friction {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.tie_break
            && self.collision.is_none()
            && self.pruned.is_empty()
            && self.failed_lines.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SifResult {
    primary: Face,
    anchor_family: Family,
    anchor_source: AnchorSource,
    installed: Face,
    secondary: Face,
    prize: Face,
    badge: Badge,
    aligned: bool,
    friction: Friction,
}

impl SifResult {
    pub(crate) fn new(
        anchor: &ResolvedAnchor,
        resolution: &SecondaryResolution,
        judgment: PrizeJudgment,
        friction: Friction,
    ) -> Self {
        Self {
            primary: anchor.face,
            anchor_family: anchor.family,
            anchor_source: anchor.source,
            installed: resolution.installed,
            secondary: resolution.secondary,
            prize: judgment.prize,
            badge: judgment.badge,
            aligned: judgment.aligned,
            friction,
        }
    }

    #[must_use]
    pub const fn primary(&self) -> Face {
        self.primary
    }

    #[must_use]
    pub const fn anchor_family(&self) -> Family {
        self.anchor_family
    }

    #[must_use]
    pub const fn anchor_source(&self) -> AnchorSource {
        self.anchor_source
    }

    /// The installed choice as the user gave it, before collision handling.
    #[must_use]
    pub const fn installed(&self) -> Face {
        self.installed
    }

    #[must_use]
    pub const fn secondary(&self) -> Face {
        self.secondary
    }

    #[must_use]
    pub const fn prize(&self) -> Face {
        self.prize
    }

    #[must_use]
    pub const fn badge(&self) -> Badge {
        self.badge
    }

    #[must_use]
    pub const fn aligned(&self) -> bool {
        self.aligned
    }

    #[must_use]
    pub const fn friction(&self) -> &Friction {
        &self.friction
    }

    /// `Primary -> Secondary [Badge]`
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!("{} -> {} [{}]", self.primary, self.secondary, self.badge)
    }
}
