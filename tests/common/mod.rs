//! Shared test utilities and fixtures
//!
//! Every family gets two evidence questions (`<family>-e1`, `<family>-e2`)
//! and three module questions (`<family>-co1`, `-co2`, `-cf`). Option keys
//! are the lowercase pick. A clean option credits the family's first face;
//! offset and fail options credit that face's prize. Evidence questions also
//! carry a neutral `n` option (an F pick crediting nothing) used to complete
//! lines a test does not care about.

#![allow(dead_code)]

use serde_json::{Value, json};

use sif_engine::{EngineSettings, Family, LinePath, QuestionBank, Session, prize_for};

fn option(family: Family, pick: &str) -> Value {
    if pick == "N" {
        return json!({ "key": "n", "pick": "F", "effects": {} });
    }
    let home = family.faces()[0];
    let (bucket, face) = match pick {
        "C" => ("faceC", home),
        "O" => ("faceO", prize_for(home)),
        _ => ("faceF", prize_for(home)),
    };
    json!({
        "key": pick.to_lowercase(),
        "pick": pick,
        "effects": { (bucket): [face.key()] },
    })
}

fn question(family: Family, suffix: &str, kind: &str, picks: &[&str]) -> Value {
    json!({
        "id": format!("{}-{suffix}", family.as_str().to_lowercase()),
        "family": family.as_str(),
        "type": kind,
        "options": picks.iter().map(|pick| option(family, pick)).collect::<Vec<_>>(),
    })
}

/// The fixture bank as JSON text, the shape `sif validate` reads.
pub fn bank_json() -> String {
    let mut questions = Vec::new();
    for family in Family::ALL {
        questions.push(question(family, "e1", "evidence", &["C", "O", "F", "N"]));
        questions.push(question(family, "e2", "evidence", &["C", "O", "F", "N"]));
        questions.push(question(family, "co1", "co1", &["C", "O"]));
        questions.push(question(family, "co2", "co2", &["C", "O"]));
        questions.push(question(family, "cf", "cf", &["C", "F"]));
    }
    json!({ "questions": questions }).to_string()
}

pub fn bank() -> QuestionBank {
    QuestionBank::from_json(&bank_json()).expect("fixture bank is valid")
}

/// Session with the given lines on the evidence path.
pub fn session(primaries: &[Family]) -> Session {
    session_with(primaries, EngineSettings::default())
}

/// Every family except `module`, for sessions whose remaining lines get filled.
pub fn evidence_except(module: &[Family]) -> Vec<Family> {
    Family::ALL
        .into_iter()
        .filter(|family| !module.contains(family))
        .collect()
}

pub fn session_with(primaries: &[Family], settings: EngineSettings) -> Session {
    let mut session = Session::new(bank(), settings);
    session
        .select_primary_lines(primaries.iter().copied())
        .expect("fresh session accepts primaries");
    session
}

pub fn answer_evidence(session: &mut Session, family: Family, keys: [&str; 2]) {
    let prefix = family.as_str().to_lowercase();
    for (slot, key) in ["e1", "e2"].into_iter().zip(keys) {
        session
            .answer(&format!("{prefix}-{slot}"), family.as_str(), key)
            .expect("evidence answer");
    }
}

pub fn answer_module(session: &mut Session, family: Family, keys: [&str; 3]) {
    let prefix = family.as_str().to_lowercase();
    for (slot, key) in ["co1", "co2", "cf"].into_iter().zip(keys) {
        session
            .answer(&format!("{prefix}-{slot}"), family.as_str(), key)
            .expect("module answer");
    }
}

/// Answers `n`, `n` on every evidence line not yet touched. The filled lines
/// score zero and never become anchor candidates.
pub fn fill_remaining(session: &mut Session) {
    for family in Family::ALL {
        if session.line(family).is_none() && session.path_for(family) == LinePath::Evidence {
            answer_evidence(session, family, ["n", "n"]);
        }
    }
}
