//! Full sessions, from first answer to final result.

use insta::assert_snapshot;

use sif_engine::{
    AnchorPhase, AnchorSource, Badge, CandidateTier, CreepSource, EngineSettings, Face, Family,
    LineVerdict, ProbeAnswer, Purity, Remediation, Session, SessionEvent, Severity, SifError,
    StateError, ValidationError, Verdict,
};

use crate::common::{
    answer_evidence, answer_module, bank, evidence_except, fill_remaining, session,
};

fn shortlist_keys(session: &mut Session) -> Vec<String> {
    session
        .shortlist()
        .expect("shortlist")
        .faces()
        .map(|face| face.key())
        .collect()
}

#[test]
fn clean_evidence_line_collides_into_first_outside_face() {
    let mut session = session(&Family::ALL);
    answer_evidence(&mut session, Family::Control, ["c", "c"]);
    fill_remaining(&mut session);

    assert_eq!(
        session.verdict(Family::Control).unwrap(),
        LineVerdict::Resolved { verdict: Verdict::C }
    );
    assert_eq!(
        session.line(Family::Control).unwrap().purity(),
        Some(Purity::from_tenths(26))
    );

    let candidates = session.build_candidates().unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].tier, CandidateTier::PerfectEvidence);
    assert_eq!(session.anchor().unwrap().face, Face::ControlCommander);

    assert_eq!(
        shortlist_keys(&mut session),
        [
            "Control:Commander",
            "Pace:Sprinter",
            "Boundary:Guardian",
            "Truth:Analyst"
        ]
    );
    let shortlist = session.shortlist().unwrap();
    assert!((shortlist.entries()[0].il - 1.5).abs() < 1e-9);
    let pruned: Vec<Face> = shortlist.pruned().iter().map(|entry| entry.face).collect();
    assert_eq!(
        pruned,
        [
            Face::ControlStrategist,
            Face::PaceMarathoner,
            Face::BoundaryDiplomat
        ]
    );

    let resolution = *session.choose_installed(Face::ControlCommander).unwrap();
    assert_eq!(resolution.secondary, Face::PaceSprinter);

    let result = session.finalize().unwrap();
    assert_eq!(result.anchor_source(), AnchorSource::AutoAnchor);
    assert_eq!(result.prize(), Face::BondingCaretaker);
    assert_eq!(result.badge(), Badge::Aligned);
    assert!(!result.aligned());
    assert_eq!(result.friction().pruned.len(), 3);
    assert_snapshot!(result.summary_line(), @"Control:Commander -> Pace:Sprinter [Aligned]");
}

#[test]
fn installing_the_prize_aligns_from_outside() {
    let mut session = session(&evidence_except(&[Family::Bonding]));
    answer_evidence(&mut session, Family::Control, ["c", "c"]);
    answer_module(&mut session, Family::Bonding, ["c", "c", "c"]);
    fill_remaining(&mut session);

    session.build_candidates().unwrap();
    assert_eq!(session.anchor().unwrap().family, Family::Control);
    assert_eq!(
        shortlist_keys(&mut session),
        [
            "Bonding:Caretaker",
            "Control:Commander",
            "Pace:Sprinter",
            "Boundary:Guardian"
        ]
    );

    session.choose_installed(Face::BondingCaretaker).unwrap();
    let result = session.finalize().unwrap();
    assert!(result.aligned());
    assert_eq!(result.badge(), Badge::InstalledFromOutside);
    assert!(result.friction().collision.is_none());
    assert_snapshot!(result.summary_line(), @"Control:Commander -> Bonding:Caretaker [Installed from outside]");
}

#[test]
fn failed_module_line_is_probed_before_the_result() {
    let mut session = session(&evidence_except(&[Family::Pace]));
    answer_evidence(&mut session, Family::Control, ["c", "c"]);
    answer_module(&mut session, Family::Pace, ["o", "o", "f"]);
    fill_remaining(&mut session);

    assert_eq!(
        session.verdict(Family::Pace).unwrap(),
        LineVerdict::Resolved { verdict: Verdict::F }
    );
    assert_eq!(session.pending_probes().unwrap(), [Family::Pace]);

    session.build_candidates().unwrap();
    assert_eq!(
        shortlist_keys(&mut session),
        [
            "Control:Commander",
            "Boundary:Guardian",
            "Pace:Sprinter",
            "Truth:Analyst"
        ]
    );
    session.choose_installed(Face::BoundaryGuardian).unwrap();
    assert_eq!(
        session.finalize().unwrap_err(),
        SifError::State(StateError::ProbePending {
            family: Family::Pace
        })
    );

    let report = session
        .answer_probe(Family::Pace, ProbeAnswer::Collapse)
        .unwrap();
    assert_eq!(report.severity, Severity::DeepF);
    assert_eq!(report.creep, Family::Control);
    assert_eq!(
        report.remediation,
        Remediation::InstallCounterRoutine { monitor_days: 21 }
    );

    let result = session.finalize().unwrap();
    assert_eq!(result.badge(), Badge::NotYetAligned);
    assert_eq!(result.friction().failed_lines, [report]);
    assert_snapshot!(result.summary_line(), @"Control:Commander -> Boundary:Guardian [Not yet aligned]");
}

#[test]
fn tied_module_lines_wait_for_a_tie_break() {
    let mut session = session(&evidence_except(&[Family::Truth, Family::Vision]));
    answer_module(&mut session, Family::Truth, ["c", "o", "c"]);
    answer_module(&mut session, Family::Vision, ["o", "c", "c"]);
    fill_remaining(&mut session);

    let families: Vec<Family> = session
        .build_candidates()
        .unwrap()
        .iter()
        .map(|candidate| candidate.family)
        .collect();
    assert_eq!(families, [Family::Truth, Family::Vision]);
    assert_eq!(session.anchor_phase(), AnchorPhase::AwaitingTieBreak);
    assert_eq!(
        session.choose_installed(Face::TruthAnalyst).unwrap_err(),
        SifError::State(StateError::AnchorUnresolved)
    );
    assert_eq!(
        session.select_tie_break(Family::Control).unwrap_err(),
        SifError::Validation(ValidationError::InvalidSelection {
            family: Family::Control
        })
    );

    let anchor = *session.select_tie_break(Family::Vision).unwrap();
    assert_eq!(anchor.face, Face::VisionPioneer);
    assert_eq!(anchor.source, AnchorSource::TieBreak);

    let installed = session
        .shortlist()
        .unwrap()
        .faces()
        .find(|&face| face != anchor.face)
        .unwrap();
    session.choose_installed(installed).unwrap();
    let result = session.finalize().unwrap();
    assert_eq!(result.anchor_family(), Family::Vision);
    assert!(result.friction().tie_break);
}

#[test]
fn going_back_refolds_and_drops_the_anchor() {
    let mut session = session(&Family::ALL);
    session.answer("control-e1", "Control", "c").unwrap();
    fill_remaining(&mut session);
    session.answer("control-e2", "Control", "c").unwrap();
    session.build_candidates().unwrap();
    session.shortlist().unwrap();

    session.go_back().unwrap();
    assert!(session.anchor().is_none());
    assert_eq!(session.anchor_phase(), AnchorPhase::Building);
    assert_eq!(session.counters().answered(Family::Control), 1);

    session.answer("control-e2", "Control", "o").unwrap();
    assert_eq!(
        session.build_candidates().unwrap_err(),
        SifError::State(StateError::NoAnchor)
    );
}

#[test]
fn unfinished_lines_block_the_shortlist_and_the_result() {
    let mut session = session(&[Family::Control]);
    answer_evidence(&mut session, Family::Control, ["c", "c"]);
    session.build_candidates().unwrap();
    assert_eq!(session.anchor().unwrap().face, Face::ControlCommander);

    let unfinished = SifError::State(StateError::Incomplete {
        family: Family::Pace,
    });
    assert_eq!(session.shortlist().unwrap_err(), unfinished);
    assert_eq!(session.finalize().unwrap_err(), unfinished);
}

#[test]
fn lone_top_module_line_anchors_without_a_tie_break() {
    let mut session = session(&evidence_except(&[Family::Pace, Family::Bonding]));
    answer_evidence(&mut session, Family::Control, ["c", "o"]);
    answer_module(&mut session, Family::Pace, ["o", "o", "c"]);
    answer_module(&mut session, Family::Bonding, ["c", "c", "c"]);
    fill_remaining(&mut session);

    let candidates = session.build_candidates().unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].family, Family::Bonding);
    assert_eq!(candidates[0].tier, CandidateTier::TopModule);
    assert_eq!(session.anchor_phase(), AnchorPhase::Resolved);
    let anchor = *session.anchor().unwrap();
    assert_eq!(anchor.face, Face::BondingCaretaker);
    assert_eq!(anchor.source, AnchorSource::AutoAnchor);
}

#[test]
fn recorded_log_replays_to_the_same_state() {
    let mut live = session(&[Family::Control]);
    answer_evidence(&mut live, Family::Control, ["c", "o"]);
    answer_module(&mut live, Family::Truth, ["o", "c", "f"]);
    live.answer_probe(Family::Truth, ProbeAnswer::PushThrough)
        .unwrap();

    let log = serde_json::to_string(live.history()).unwrap();
    let events: Vec<SessionEvent> = serde_json::from_str(&log).unwrap();
    let replayed =
        Session::replay(bank(), *live.settings(), [Family::Control], events).unwrap();

    assert_eq!(replayed.counters(), live.counters());
    assert_eq!(replayed.verdicts().unwrap(), live.verdicts().unwrap());
    assert_eq!(
        replayed.probe(Family::Truth).unwrap().severity,
        Severity::LightF
    );
    assert_eq!(
        replayed.probe(Family::Truth).unwrap().remediation,
        Remediation::Monitor
    );
}

#[derive(Debug)]
struct AlwaysVision;

impl CreepSource for AlwaysVision {
    fn creeping_family(&self, _failed: Family) -> Family {
        Family::Vision
    }
}

#[test]
fn creep_source_is_pluggable() {
    let mut session =
        Session::new(bank(), EngineSettings::default()).with_creep_source(AlwaysVision);
    answer_module(&mut session, Family::Boundary, ["o", "o", "f"]);

    let report = session
        .answer_probe(Family::Boundary, ProbeAnswer::Collapse)
        .unwrap();
    assert_eq!(report.creep, Family::Vision);
}
