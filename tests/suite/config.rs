//! Settings resolved from a config file drive the engine.

use std::fs;

use sif_config::SifConfig;
use sif_engine::{Family, ProbeAnswer, Remediation};
use sif_types::SettingsError;

use crate::common::{answer_evidence, answer_module, evidence_except, fill_remaining, session_with};

fn load(toml: &str) -> SifConfig {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, toml).expect("write config");
    SifConfig::load_from(&path)
        .expect("config parses")
        .expect("config exists")
}

#[test]
fn missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let loaded = SifConfig::load_from(&dir.path().join("absent.toml")).expect("load");
    assert!(loaded.is_none());
}

#[test]
fn scoring_overrides_reach_the_session() {
    let config = load(
        r#"
        [scoring]
        shortlist_size = 2

        [severity]
        monitor_window_days = 14
        "#,
    );
    let settings = config.engine_settings().expect("valid settings");
    let mut session = session_with(&evidence_except(&[Family::Pace]), settings);
    answer_evidence(&mut session, Family::Control, ["c", "c"]);
    answer_module(&mut session, Family::Pace, ["o", "o", "f"]);
    fill_remaining(&mut session);

    session.build_candidates().expect("anchor");
    assert_eq!(session.shortlist().expect("shortlist").len(), 2);

    let report = session
        .answer_probe(Family::Pace, ProbeAnswer::Collapse)
        .expect("probe");
    assert_eq!(
        report.remediation,
        Remediation::InstallCounterRoutine { monitor_days: 14 }
    );
}

#[test]
fn unnormalized_weights_are_rejected() {
    let config = load(
        r"
        [scoring.weights]
        natural_instinct = 0.5
        situational_fit = 0.5
        social_expectation = 0.5
        internal_consistency = 0.5
        ",
    );
    assert!(matches!(
        config.engine_settings(),
        Err(SettingsError::WeightsNotNormalized { .. })
    ));
}

#[test]
fn malformed_file_reports_its_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[scoring\nshortlist_size = ").expect("write config");

    let err = SifConfig::load_from(&path).expect_err("parse failure");
    assert_eq!(err.path(), path.as_path());
}
