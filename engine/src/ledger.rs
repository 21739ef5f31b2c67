//! Effects ledger: the seven append-only counter maps.
//!
//! There is no decrement. The session rebuilds a ledger by folding its
//! answer log from scratch, so counters cannot drift from the log.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use sif_types::{EffectPayload, Face, Family, Pick};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ledger {
    family_c: BTreeMap<Family, u32>,
    family_o: BTreeMap<Family, u32>,
    family_f: BTreeMap<Family, u32>,
    severity_f: BTreeMap<Family, u32>,
    face_c: BTreeMap<Face, u32>,
    face_o: BTreeMap<Face, u32>,
    face_f: BTreeMap<Face, u32>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `family` under `pick`, then every distinct face in the payload's
    /// matching bucket. A face listed twice in one payload is credited once.
    pub fn record_effect(&mut self, family: Family, pick: Pick, payload: &EffectPayload) {
        *self.family_bucket_mut(pick).entry(family).or_insert(0) += 1;

        let mut credited = BTreeSet::new();
        for &face in payload.bucket(pick) {
            if credited.insert(face) {
                *self.face_bucket_mut(pick).entry(face).or_insert(0) += 1;
            }
        }

        tracing::trace!(%family, %pick, faces = credited.len(), "effect recorded");
    }

    /// Tally a structural (Deep F) failure for `family`.
    pub fn record_severity(&mut self, family: Family) {
        *self.severity_f.entry(family).or_insert(0) += 1;
    }

    #[must_use]
    pub fn family_count(&self, pick: Pick, family: Family) -> u32 {
        self.family_bucket(pick).get(&family).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn face_count(&self, pick: Pick, face: Face) -> u32 {
        self.face_bucket(pick).get(&face).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn severity_count(&self, family: Family) -> u32 {
        self.severity_f.get(&family).copied().unwrap_or(0)
    }

    /// Questions answered on `family`'s own line, across all three buckets.
    #[must_use]
    pub fn answered(&self, family: Family) -> u32 {
        [Pick::C, Pick::O, Pick::F]
            .into_iter()
            .map(|pick| self.family_count(pick, family))
            .sum()
    }

    /// Largest single-face tally in one bucket.
    #[must_use]
    pub fn max_face_count(&self, pick: Pick) -> u32 {
        self.face_bucket(pick).values().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.family_c.is_empty() && self.family_o.is_empty() && self.family_f.is_empty()
    }

    fn family_bucket(&self, pick: Pick) -> &BTreeMap<Family, u32> {
        match pick {
            Pick::C => &self.family_c,
            Pick::O => &self.family_o,
            Pick::F => &self.family_f,
        }
    }

    fn family_bucket_mut(&mut self, pick: Pick) -> &mut BTreeMap<Family, u32> {
        match pick {
            Pick::C => &mut self.family_c,
            Pick::O => &mut self.family_o,
            Pick::F => &mut self.family_f,
        }
    }

    fn face_bucket(&self, pick: Pick) -> &BTreeMap<Face, u32> {
        match pick {
            Pick::C => &self.face_c,
            Pick::O => &self.face_o,
            Pick::F => &self.face_f,
        }
    }

    fn face_bucket_mut(&mut self, pick: Pick) -> &mut BTreeMap<Face, u32> {
        match pick {
            Pick::C => &mut self.face_c,
            Pick::O => &mut self.face_o,
            Pick::F => &mut self.face_f,
        }
    }
}
