//! IL-ranked shortlist with a per-family cap, and secondary resolution.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use sif_types::{Face, Family, SifError, StateError, ValidationError};

use crate::scoring::FaceAssessment;

/// Reason recorded for faces skipped by the family cap.
pub const PRUNED: &str = "pruned";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShortlistEntry {
    pub face: Face,
    pub il: f64,
    pub face_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrunedEntry {
    pub face: Face,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortlist {
    entries: Vec<ShortlistEntry>,
    pruned: Vec<PrunedEntry>,
}

impl Shortlist {
    /// Rank by IL descending, then face-score descending, then canonical
    /// order, and fill `size` slots with at most `max_per_family` faces from
    /// any one family. Faces without an IL are not ranked.
    #[must_use]
    pub fn build(assessments: &[FaceAssessment], size: usize, max_per_family: usize) -> Self {
        let mut ranked: Vec<(&FaceAssessment, f64)> = assessments
            .iter()
            .filter_map(|assessment| assessment.il.map(|il| (assessment, il)))
            .collect();
        ranked.sort_by(|a, b| rank(*a, *b));

        let mut entries = Vec::with_capacity(size);
        let mut pruned = Vec::new();
        let mut per_family: BTreeMap<Family, usize> = BTreeMap::new();

        for (assessment, il) in ranked {
            if entries.len() == size {
                break;
            }
            let taken = per_family.entry(assessment.face.family()).or_insert(0);
            if *taken >= max_per_family {
                tracing::debug!(face = %assessment.face, il, "pruned");
                pruned.push(PrunedEntry {
                    face: assessment.face,
                    reason: PRUNED,
                });
                continue;
            }
            *taken += 1;
            entries.push(ShortlistEntry {
                face: assessment.face,
                il,
                face_score: assessment.face_score,
            });
        }

        Self { entries, pruned }
    }

    #[must_use]
    pub fn entries(&self) -> &[ShortlistEntry] {
        &self.entries
    }

    pub fn faces(&self) -> impl Iterator<Item = Face> + '_ {
        self.entries.iter().map(|entry| entry.face)
    }

    #[must_use]
    pub fn contains(&self, face: Face) -> bool {
        self.faces().any(|candidate| candidate == face)
    }

    #[must_use]
    pub fn pruned(&self) -> &[PrunedEntry] {
        &self.pruned
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn rank((a, a_il): (&FaceAssessment, f64), (b, b_il): (&FaceAssessment, f64)) -> Ordering {
    b_il.total_cmp(&a_il)
        .then_with(|| b.face_score.total_cmp(&a.face_score))
        .then_with(|| a.face.cmp(&b.face))
}

// ── Secondary ────────────────────────────────────────────────

/// The user picked the anchor itself as installed; the engine moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollisionRecord {
    pub requested: Face,
    pub resolved: Face,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecondaryResolution {
    /// Raw installed choice as given.
    pub installed: Face,
    pub secondary: Face,
    pub collision: Option<CollisionRecord>,
}

/// Resolve the secondary face from the user's installed choice.
pub fn resolve_secondary(
    shortlist: &Shortlist,
    anchor: Face,
    installed: Face,
) -> Result<SecondaryResolution, SifError> {
    if !shortlist.contains(installed) {
        return Err(ValidationError::NotInShortlist { face: installed }.into());
    }

    if installed != anchor {
        return Ok(SecondaryResolution {
            installed,
            secondary: installed,
            collision: None,
        });
    }

    let secondary = shortlist
        .faces()
        .find(|&face| face != anchor)
        .ok_or(StateError::NoSecondary)?;
    tracing::info!(requested = %installed, resolved = %secondary, "installed collides with anchor");

    Ok(SecondaryResolution {
        installed,
        secondary,
        collision: Some(CollisionRecord {
            requested: installed,
            resolved: secondary,
        }),
    })
}
