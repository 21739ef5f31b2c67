//! Bank loading and the diagnostic export on disk.

use std::fs;

use serde_json::Value;

use sif_engine::{BankError, Family, QuestionBank};
use sif_utils::{Overwrite, WriteOptions, atomic_write, atomic_write_with};

use crate::common::{answer_evidence, answer_module, bank_json, session};

#[test]
fn fixture_bank_covers_every_line() {
    let bank = QuestionBank::from_json(&bank_json()).expect("valid bank");
    assert_eq!(bank.len(), 35);
    for family in Family::ALL {
        assert_eq!(bank.for_family(family).count(), 5);
    }
}

#[test]
fn clean_credit_outside_the_family_is_rejected() {
    let raw = r#"{"questions":[
        {"id":"control-e1","family":"Control","type":"evidence","options":[
            {"key":"c","pick":"C","effects":{"faceC":["Pace:Sprinter"]}}
        ]}
    ]}"#;
    assert!(matches!(
        QuestionBank::from_json(raw),
        Err(BankError::CleanCreditOutsideFamily { .. })
    ));
}

#[test]
fn module_question_rejects_out_of_slot_pick() {
    let raw = r#"{"questions":[
        {"id":"pace-cf","family":"Pace","type":"cf","options":[
            {"key":"o","pick":"O","effects":{"faceO":["Boundary:Guardian"]}}
        ]}
    ]}"#;
    assert!(matches!(
        QuestionBank::from_json(raw),
        Err(BankError::PickOutOfDomain { .. })
    ));
}

#[test]
fn diagnostics_round_trip_through_disk() {
    let mut session = session(&[Family::Control]);
    answer_evidence(&mut session, Family::Control, ["c", "c"]);
    answer_module(&mut session, Family::Truth, ["c", "o", "f"]);
    session.build_candidates().expect("anchor");

    let json = session
        .diagnostics()
        .expect("diagnostics")
        .to_json_pretty()
        .expect("serialize");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("exports").join("sif-diagnostics.json");
    atomic_write(&path, json.as_bytes()).expect("export");

    let written: Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
    assert_eq!(written["lines"].as_array().map(Vec::len), Some(7));
    assert_eq!(written["faces"].as_array().map(Vec::len), Some(14));
    assert_eq!(written["anchor"]["face"], "Control:Commander");
    assert_eq!(written["anchor_phase"], "Resolved");

    let commander = &written["faces"][0];
    assert_eq!(commander["face"], "Control:Commander");
    assert!(commander["il"].is_number());
    let sprinter = &written["faces"][2];
    assert_eq!(sprinter["face"], "Pace:Sprinter");
    assert!(sprinter["il"].is_null());
    assert!(sprinter["factors"]["internal_consistency"].is_null());

    let truth = &written["lines"][3];
    assert_eq!(truth["family"], "Truth");
    assert_eq!(truth["path"], "module");
    assert_eq!(truth["verdict"]["status"], "resolved");
    assert_eq!(truth["verdict"]["verdict"], "F");
}

#[test]
fn refusing_overwrite_keeps_the_previous_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sif-diagnostics.json");
    atomic_write(&path, b"{\"run\":1}").expect("first export");

    let options = WriteOptions {
        overwrite: Overwrite::Refuse,
        ..WriteOptions::default()
    };
    assert!(atomic_write_with(&path, b"{\"run\":2}", options).is_err());
    assert_eq!(fs::read_to_string(&path).expect("read"), "{\"run\":1}");
}
