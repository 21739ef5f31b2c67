//! The session: an answer log and everything derived from it.
//!
//! The log is the only source of truth. Counters, line states and probe
//! reports are a fold over it; `go_back` drops the last event and folds
//! again from scratch. Anchor, shortlist and installed state are derived on
//! demand and cleared whenever the log changes.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::mem;

use serde::{Deserialize, Serialize};

use sif_types::{
    EngineSettings, Face, Family, LinePath, Pick, QuestionBank, SifError, StateError,
    ValidationError, Verdict,
};

use crate::anchor::{AnchorCandidate, AnchorPhase, AnchorSelector, AnchorSource, ResolvedAnchor};
use crate::diagnostics::{DiagnosticExport, LineDiagnostic};
use crate::ledger::Ledger;
use crate::line::{LineState, LineVerdict};
use crate::prize::judge;
use crate::result::{Friction, SifResult};
use crate::scoring::{FaceAssessment, assess_faces};
use crate::severity::{
    CreepSource, ProbeAnswer, Severity, SeverityReport, StaticCreepTable, resolve_probe,
};
use crate::shortlist::{SecondaryResolution, Shortlist, resolve_secondary};

/// One entry in the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Answer {
        question_id: String,
        family: Family,
        key: String,
    },
    Probe {
        family: Family,
        answer: ProbeAnswer,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub family: Family,
    pub pick: Pick,
    pub verdict: LineVerdict,
    /// The answer completed the line with an `F`; a severity probe is due.
    pub probe_required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineProgress {
    pub family: Family,
    pub path: LinePath,
    pub have: usize,
    pub need: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub lines: Vec<LineProgress>,
    pub complete: bool,
}

#[derive(Debug)]
pub struct Session {
    bank: QuestionBank,
    settings: EngineSettings,
    creep: Box<dyn CreepSource>,
    primaries: Option<BTreeSet<Family>>,
    history: Vec<SessionEvent>,

    // Folded from `history`.
    ledger: Ledger,
    lines: BTreeMap<Family, LineState>,
    answered: HashSet<String>,
    probes: BTreeMap<Family, SeverityReport>,

    // Derived on demand.
    anchor: AnchorSelector,
    shortlist: Option<Shortlist>,
    secondary: Option<SecondaryResolution>,
}

impl Session {
    #[must_use]
    pub fn new(bank: QuestionBank, settings: EngineSettings) -> Self {
        Self {
            bank,
            settings,
            creep: Box::new(StaticCreepTable),
            primaries: None,
            history: Vec::new(),
            ledger: Ledger::new(),
            lines: BTreeMap::new(),
            answered: HashSet::new(),
            probes: BTreeMap::new(),
            anchor: AnchorSelector::new(),
            shortlist: None,
            secondary: None,
        }
    }

    pub fn with_creep_source(mut self, creep: impl CreepSource + 'static) -> Self {
        self.creep = Box::new(creep);
        self
    }

    /// Rebuild a session from a recorded log.
    pub fn replay(
        bank: QuestionBank,
        settings: EngineSettings,
        primaries: impl IntoIterator<Item = Family>,
        events: impl IntoIterator<Item = SessionEvent>,
    ) -> Result<Self, SifError> {
        let mut session = Self::new(bank, settings);
        session.select_primary_lines(primaries)?;
        for event in events {
            session.apply(&event)?;
        }
        Ok(session)
    }

    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[must_use]
    pub const fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    // ── Answers ──────────────────────────────────────────────

    /// Choose which lines run the evidence path. Must happen once, before any
    /// answer; lines not chosen run the module path.
    pub fn select_primary_lines(
        &mut self,
        families: impl IntoIterator<Item = Family>,
    ) -> Result<(), StateError> {
        if !self.history.is_empty() {
            return Err(StateError::PrimariesAfterAnswers);
        }
        if self.primaries.is_some() {
            return Err(StateError::PrimariesAlreadySelected);
        }
        let primaries: BTreeSet<Family> = families.into_iter().collect();
        tracing::debug!(count = primaries.len(), "primary lines selected");
        self.primaries = Some(primaries);
        Ok(())
    }

    #[must_use]
    pub fn path_for(&self, family: Family) -> LinePath {
        match &self.primaries {
            Some(primaries) if primaries.contains(&family) => LinePath::Evidence,
            _ => LinePath::Module,
        }
    }

    /// Record the option `key` chosen on `question_id`. `family` is the
    /// caller's view of which line the question belongs to and must agree
    /// with the bank.
    pub fn answer(
        &mut self,
        question_id: &str,
        family: &str,
        key: &str,
    ) -> Result<AnswerOutcome, SifError> {
        let family = Family::parse(family)?;
        self.record_answer(question_id, family, key)
    }

    fn record_answer(
        &mut self,
        question_id: &str,
        family: Family,
        key: &str,
    ) -> Result<AnswerOutcome, SifError> {
        let question = self
            .bank
            .get(question_id)
            .ok_or_else(|| ValidationError::UnknownQuestion {
                id: question_id.to_owned(),
            })?;
        if question.family != family {
            return Err(ValidationError::FamilyMismatch {
                question: question.id.clone(),
                expected: question.family,
                actual: family,
            }
            .into());
        }
        let option = question
            .option(key)
            .ok_or_else(|| ValidationError::UnknownOption {
                question: question.id.clone(),
                key: key.to_owned(),
            })?;
        if self.answered.contains(question_id) {
            return Err(StateError::AlreadyAnswered {
                id: question_id.to_owned(),
            }
            .into());
        }

        // Work on a copy so a rejected pick leaves the session untouched.
        let mut line = self
            .lines
            .get(&family)
            .cloned()
            .unwrap_or_else(|| LineState::new(self.path_for(family)));
        line.record(question, option.pick)?;
        let verdict = line.verdict()?;

        let pick = option.pick;
        self.ledger.record_effect(family, pick, &option.effects);
        self.lines.insert(family, line);
        self.answered.insert(question_id.to_owned());
        self.history.push(SessionEvent::Answer {
            question_id: question_id.to_owned(),
            family,
            key: key.to_owned(),
        });
        self.invalidate_derived();

        let probe_required = verdict.verdict() == Some(Verdict::F);
        tracing::debug!(question = question_id, %family, %pick, probe_required, "answer recorded");

        Ok(AnswerOutcome {
            family,
            pick,
            verdict,
            probe_required,
        })
    }

    /// Answer the severity probe for a failed line.
    pub fn answer_probe(
        &mut self,
        family: Family,
        answer: ProbeAnswer,
    ) -> Result<SeverityReport, SifError> {
        let verdict = match self.lines.get(&family) {
            Some(line) => line.verdict()?.verdict(),
            None => None,
        };
        if self.probes.contains_key(&family) {
            return Err(StateError::ProbeAnswered { family }.into());
        }
        let report = resolve_probe(
            family,
            verdict,
            answer,
            self.creep.as_ref(),
            self.settings.monitor_window_days(),
        )?;

        if report.severity == Severity::DeepF {
            self.ledger.record_severity(family);
        }
        self.probes.insert(family, report);
        self.history.push(SessionEvent::Probe { family, answer });
        Ok(report)
    }

    /// Drop the most recent event and refold the log.
    pub fn go_back(&mut self) -> Result<SessionEvent, SifError> {
        let event = self.history.pop().ok_or(StateError::NothingToUndo)?;
        self.refold()?;
        tracing::debug!(remaining = self.history.len(), "stepped back");
        Ok(event)
    }

    /// Clear every answer, probe and primary selection.
    pub fn reset(&mut self) {
        self.primaries = None;
        self.history.clear();
        self.clear_folded();
        self.invalidate_derived();
    }

    fn apply(&mut self, event: &SessionEvent) -> Result<(), SifError> {
        match event {
            SessionEvent::Answer {
                question_id,
                family,
                key,
            } => self.record_answer(question_id, *family, key).map(|_| ()),
            SessionEvent::Probe { family, answer } => {
                self.answer_probe(*family, *answer).map(|_| ())
            }
        }
    }

    fn refold(&mut self) -> Result<(), SifError> {
        let events = mem::take(&mut self.history);
        self.clear_folded();
        self.invalidate_derived();
        for event in &events {
            self.apply(event)?;
        }
        Ok(())
    }

    fn clear_folded(&mut self) {
        self.ledger = Ledger::new();
        self.lines.clear();
        self.answered.clear();
        self.probes.clear();
    }

    fn invalidate_derived(&mut self) {
        self.anchor = AnchorSelector::new();
        self.shortlist = None;
        self.secondary = None;
    }

    fn require_answers(&self) -> Result<(), StateError> {
        if self.answered.is_empty() {
            return Err(StateError::NoAnswers);
        }
        Ok(())
    }

    /// Errors with the first family, in canonical order, still short of picks.
    fn require_complete(&self) -> Result<(), StateError> {
        match self.progress().lines.iter().find(|line| line.have != line.need) {
            Some(line) => Err(StateError::Incomplete {
                family: line.family,
            }),
            None => Ok(()),
        }
    }

    // ── Reads ────────────────────────────────────────────────

    #[must_use]
    pub fn history(&self) -> &[SessionEvent] {
        &self.history
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn counters(&self) -> Ledger {
        self.ledger.clone()
    }

    #[must_use]
    pub fn line(&self, family: Family) -> Option<&LineState> {
        self.lines.get(&family)
    }

    pub fn verdict(&self, family: Family) -> Result<LineVerdict, ValidationError> {
        match self.lines.get(&family) {
            Some(line) => line.verdict(),
            None => LineState::new(self.path_for(family)).verdict(),
        }
    }

    pub fn verdicts(&self) -> Result<BTreeMap<Family, LineVerdict>, ValidationError> {
        Family::ALL
            .into_iter()
            .map(|family| Ok((family, self.verdict(family)?)))
            .collect()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        let lines: Vec<LineProgress> = Family::ALL
            .into_iter()
            .map(|family| {
                let path = self.path_for(family);
                LineProgress {
                    family,
                    path,
                    have: self.lines.get(&family).map_or(0, LineState::have),
                    need: path.required_picks(),
                }
            })
            .collect();
        let complete = lines.iter().all(|line| line.have == line.need);
        Progress { lines, complete }
    }

    /// Failed lines whose severity probe has not been answered.
    pub fn pending_probes(&self) -> Result<Vec<Family>, ValidationError> {
        let mut pending = Vec::new();
        for (&family, line) in &self.lines {
            if line.verdict()?.verdict() == Some(Verdict::F) && !self.probes.contains_key(&family)
            {
                pending.push(family);
            }
        }
        Ok(pending)
    }

    #[must_use]
    pub fn probe(&self, family: Family) -> Option<&SeverityReport> {
        self.probes.get(&family)
    }

    #[must_use]
    pub fn assessments(&self) -> Vec<FaceAssessment> {
        assess_faces(&self.ledger, &self.lines, &self.settings)
    }

    // ── Anchor ───────────────────────────────────────────────

    pub fn build_candidates(&mut self) -> Result<&[AnchorCandidate], SifError> {
        self.require_answers()?;
        Ok(self.anchor.build_candidates(&self.lines, &self.ledger)?)
    }

    #[must_use]
    pub const fn anchor_phase(&self) -> AnchorPhase {
        self.anchor.phase()
    }

    #[must_use]
    pub fn anchor_candidates(&self) -> &[AnchorCandidate] {
        self.anchor.candidates()
    }

    #[must_use]
    pub const fn anchor(&self) -> Option<&ResolvedAnchor> {
        self.anchor.resolved()
    }

    pub fn select_tie_break(&mut self, family: Family) -> Result<&ResolvedAnchor, SifError> {
        self.anchor.select(family, &self.ledger)
    }

    // ── Shortlist and secondary ──────────────────────────────

    pub fn shortlist(&mut self) -> Result<&Shortlist, SifError> {
        self.require_answers()?;
        self.require_complete()?;
        let shortlist = match self.shortlist.take() {
            Some(cached) => cached,
            None => Shortlist::build(
                &self.assessments(),
                self.settings.shortlist_size(),
                self.settings.max_per_family(),
            ),
        };
        Ok(&*self.shortlist.insert(shortlist))
    }

    pub fn choose_installed(&mut self, face: Face) -> Result<&SecondaryResolution, SifError> {
        let anchor = self
            .anchor
            .resolved()
            .map(|anchor| anchor.face)
            .ok_or(StateError::AnchorUnresolved)?;
        let resolution = resolve_secondary(self.shortlist()?, anchor, face)?;
        Ok(&*self.secondary.insert(resolution))
    }

    // ── Result ───────────────────────────────────────────────

    pub fn finalize(&self) -> Result<SifResult, SifError> {
        self.require_answers()?;
        self.require_complete()?;
        let anchor = self.anchor.resolved().ok_or(StateError::AnchorUnresolved)?;
        let resolution = self.secondary.as_ref().ok_or(StateError::InstalledMissing)?;
        if let Some(&family) = self.pending_probes()?.first() {
            return Err(StateError::ProbePending { family }.into());
        }

        let judgment = judge(anchor.face, resolution);
        let friction = Friction {
            tie_break: anchor.source == AnchorSource::TieBreak,
            collision: resolution.collision,
            pruned: self
                .shortlist
                .as_ref()
                .map(|shortlist| shortlist.pruned().to_vec())
                .unwrap_or_default(),
            failed_lines: self.probes.values().copied().collect(),
        };
        let result = SifResult::new(anchor, resolution, judgment, friction);
        tracing::info!(summary = %result.summary_line(), "session finalized");
        Ok(result)
    }

    pub fn diagnostics(&self) -> Result<DiagnosticExport, ValidationError> {
        let lines = Family::ALL
            .into_iter()
            .map(|family| {
                let line = self
                    .lines
                    .get(&family)
                    .cloned()
                    .unwrap_or_else(|| LineState::new(self.path_for(family)));
                Ok(LineDiagnostic {
                    family,
                    path: line.path(),
                    picks: line.picks(),
                    verdict: line.verdict()?,
                    purity: line.purity(),
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(DiagnosticExport {
            lines,
            faces: self.assessments(),
            anchor_phase: self.anchor.phase(),
            anchor_trail: self.anchor.trail().to_vec(),
            candidates: self.anchor.candidates().to_vec(),
            anchor: self.anchor.resolved().copied(),
            probes: self.probes.values().copied().collect(),
            counters: self.counters(),
        })
    }
}
