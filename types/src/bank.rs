//! Question bank: static question definitions and their effect payloads.
//!
//! The bank is validated when it is loaded. Every invariant the engine relies
//! on downstream (pick domain per question type, same-family clean credits,
//! cross-family offset/fail credits, well-formed debug tags) is checked here,
//! so a bank that deserializes is a bank the engine can fold without guessing.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Face, Family, LinePath, ModuleSlot, Pick};

// ── Question kinds ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Evidence,
    Co1,
    Co2,
    Cf,
}

impl QuestionKind {
    #[must_use]
    pub const fn path(self) -> LinePath {
        match self {
            QuestionKind::Evidence => LinePath::Evidence,
            QuestionKind::Co1 | QuestionKind::Co2 | QuestionKind::Cf => LinePath::Module,
        }
    }

    #[must_use]
    pub const fn slot(self) -> Option<ModuleSlot> {
        match self {
            QuestionKind::Evidence => None,
            QuestionKind::Co1 => Some(ModuleSlot::Co1),
            QuestionKind::Co2 => Some(ModuleSlot::Co2),
            QuestionKind::Cf => Some(ModuleSlot::Cf),
        }
    }

    /// Evidence questions take any pick; module questions defer to their slot.
    #[must_use]
    pub const fn accepts(self, pick: Pick) -> bool {
        match self.slot() {
            None => true,
            Some(slot) => slot.accepts(pick),
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuestionKind::Evidence => "evidence",
            QuestionKind::Co1 => "CO1",
            QuestionKind::Co2 => "CO2",
            QuestionKind::Cf => "CF",
        })
    }
}

// ── Effects ──────────────────────────────────────────────────

/// Debug/annotation tag attached to an option, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DebugTag {
    /// Short label for the behavioral signal this option expresses.
    Signal { label: String },
    /// Names the foreign family whose pattern this option lets in.
    Creep { family: Family },
    /// Free-form author note.
    Note { text: String },
}

/// Declarative credits carried by one answer option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectPayload {
    #[serde(default)]
    pub face_c: Vec<Face>,
    #[serde(default)]
    pub face_o: Vec<Face>,
    #[serde(default)]
    pub face_f: Vec<Face>,
    #[serde(default)]
    pub tags: Vec<DebugTag>,
}

impl EffectPayload {
    /// Faces credited under `pick`.
    #[must_use]
    pub fn bucket(&self, pick: Pick) -> &[Face] {
        match pick {
            Pick::C => &self.face_c,
            Pick::O => &self.face_o,
            Pick::F => &self.face_f,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub key: String,
    pub pick: Pick,
    #[serde(default)]
    pub effects: EffectPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub family: Family,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.key == key)
    }
}

// ── Validation errors ────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BankError {
    #[error("question bank must contain at least one question")]
    EmptyBank,
    #[error("question id must not be empty")]
    EmptyQuestionId,
    #[error("duplicate question id `{id}`")]
    DuplicateQuestion { id: String },
    #[error("question `{question}` has no options")]
    EmptyOptions { question: String },
    #[error("question `{question}` repeats option key `{key}`")]
    DuplicateOption { question: String, key: String },
    #[error("question `{question}` option `{key}`: pick {pick} is not allowed on a {kind} question")]
    PickOutOfDomain {
        question: String,
        key: String,
        pick: Pick,
        kind: QuestionKind,
    },
    #[error(
        "question `{question}` option `{key}`: clean pick credits {face} outside its own family"
    )]
    CleanCreditOutsideFamily {
        question: String,
        key: String,
        face: Face,
    },
    #[error(
        "question `{question}` option `{key}`: {pick} pick credits {face} inside its own family"
    )]
    OffsetCreditInsideFamily {
        question: String,
        key: String,
        pick: Pick,
        face: Face,
    },
    #[error("question `{question}` option `{key}`: credits listed under {bucket} but pick is {pick}")]
    MismatchedBucket {
        question: String,
        key: String,
        bucket: Pick,
        pick: Pick,
    },
    #[error("question `{question}` option `{key}`: creep tag names its own family")]
    CreepTagOwnFamily { question: String, key: String },
    #[error("question `{question}` option `{key}`: {kind} tag is empty")]
    EmptyTag {
        question: String,
        key: String,
        kind: &'static str,
    },
    #[error("invalid question bank JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Bank ─────────────────────────────────────────────────────

/// Validated question bank. Construction via [`QuestionBank::new`] or
/// deserialization checks every invariant; invalid banks are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl<'de> Deserialize<'de> for QuestionBank {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct BankWire {
            questions: Vec<Question>,
        }
        let wire = BankWire::deserialize(deserializer)?;
        QuestionBank::new(wire.questions).map_err(D::Error::custom)
    }
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::EmptyBank);
        }

        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if question.id.trim().is_empty() {
                return Err(BankError::EmptyQuestionId);
            }
            if index.insert(question.id.clone(), position).is_some() {
                return Err(BankError::DuplicateQuestion {
                    id: question.id.clone(),
                });
            }
            validate_question(question)?;
        }

        Ok(Self { questions, index })
    }

    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        #[derive(Deserialize)]
        struct BankWire {
            questions: Vec<Question>,
        }
        let wire: BankWire = serde_json::from_str(raw)?;
        Self::new(wire.questions)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Question> {
        self.index.get(id).map(|&position| &self.questions[position])
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn for_family(&self, family: Family) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.family == family)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn validate_question(question: &Question) -> Result<(), BankError> {
    if question.options.is_empty() {
        return Err(BankError::EmptyOptions {
            question: question.id.clone(),
        });
    }

    let mut keys = HashSet::new();
    for option in &question.options {
        if !keys.insert(option.key.as_str()) {
            return Err(BankError::DuplicateOption {
                question: question.id.clone(),
                key: option.key.clone(),
            });
        }
        validate_option(question, option)?;
    }
    Ok(())
}

fn validate_option(question: &Question, option: &AnswerOption) -> Result<(), BankError> {
    let pick = option.pick;
    if !question.kind.accepts(pick) {
        return Err(BankError::PickOutOfDomain {
            question: question.id.clone(),
            key: option.key.clone(),
            pick,
            kind: question.kind,
        });
    }

    for bucket in [Pick::C, Pick::O, Pick::F] {
        if bucket != pick && !option.effects.bucket(bucket).is_empty() {
            return Err(BankError::MismatchedBucket {
                question: question.id.clone(),
                key: option.key.clone(),
                bucket,
                pick,
            });
        }
    }

    for &face in option.effects.bucket(pick) {
        let inside = face.family() == question.family;
        match pick {
            Pick::C if !inside => {
                return Err(BankError::CleanCreditOutsideFamily {
                    question: question.id.clone(),
                    key: option.key.clone(),
                    face,
                });
            }
            Pick::O | Pick::F if inside => {
                return Err(BankError::OffsetCreditInsideFamily {
                    question: question.id.clone(),
                    key: option.key.clone(),
                    pick,
                    face,
                });
            }
            _ => {}
        }
    }

    for tag in &option.effects.tags {
        let empty_kind = match tag {
            DebugTag::Signal { label } if label.trim().is_empty() => Some("signal"),
            DebugTag::Note { text } if text.trim().is_empty() => Some("note"),
            DebugTag::Creep { family } if *family == question.family => {
                return Err(BankError::CreepTagOwnFamily {
                    question: question.id.clone(),
                    key: option.key.clone(),
                });
            }
            _ => None,
        };
        if let Some(kind) = empty_kind {
            return Err(BankError::EmptyTag {
                question: question.id.clone(),
                key: option.key.clone(),
                kind,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BankError, DebugTag, QuestionBank, QuestionKind};
    use crate::{Face, Family, Pick};

    fn bank_json(options: &str) -> String {
        format!(
            r#"{{"questions":[{{"id":"ctl-cf","family":"Control","type":"cf","options":{options}}}]}}"#
        )
    }

    #[test]
    fn loads_valid_bank_and_indexes_by_id() {
        let raw = bank_json(
            r#"[
                {"key":"a","pick":"C","effects":{"faceC":["Control:Commander"],"tags":[{"kind":"signal","label":"holds the line"}]}},
                {"key":"b","pick":"F","effects":{"faceF":["Pace:Sprinter"],"tags":[{"kind":"creep","family":"Pace"}]}}
            ]"#,
        );
        let bank = QuestionBank::from_json(&raw).unwrap();
        let question = bank.get("ctl-cf").unwrap();
        assert_eq!(question.kind, QuestionKind::Cf);
        assert_eq!(question.family, Family::Control);
        let option = question.option("b").unwrap();
        assert_eq!(option.effects.bucket(Pick::F), &[Face::PaceSprinter]);
        assert_eq!(
            option.effects.tags,
            vec![DebugTag::Creep {
                family: Family::Pace
            }]
        );
        assert!(bank.get("missing").is_none());
    }

    #[test]
    fn rejects_offset_in_cf_slot() {
        let raw = bank_json(r#"[{"key":"a","pick":"O"}]"#);
        let err = QuestionBank::from_json(&raw).unwrap_err();
        assert!(matches!(
            err,
            BankError::PickOutOfDomain {
                pick: Pick::O,
                kind: QuestionKind::Cf,
                ..
            }
        ));
    }

    #[test]
    fn rejects_fail_credit_inside_own_family() {
        let raw = bank_json(r#"[{"key":"a","pick":"F","effects":{"faceF":["Control:Strategist"]}}]"#);
        let err = QuestionBank::from_json(&raw).unwrap_err();
        assert!(matches!(err, BankError::OffsetCreditInsideFamily { .. }));
    }

    #[test]
    fn rejects_clean_credit_outside_own_family() {
        let raw = bank_json(r#"[{"key":"a","pick":"C","effects":{"faceC":["Truth:Oracle"]}}]"#);
        let err = QuestionBank::from_json(&raw).unwrap_err();
        assert!(matches!(err, BankError::CleanCreditOutsideFamily { .. }));
    }

    #[test]
    fn rejects_credits_in_a_bucket_the_pick_never_reads() {
        let raw = bank_json(r#"[{"key":"a","pick":"C","effects":{"faceF":["Truth:Oracle"]}}]"#);
        let err = QuestionBank::from_json(&raw).unwrap_err();
        assert!(matches!(
            err,
            BankError::MismatchedBucket {
                bucket: Pick::F,
                pick: Pick::C,
                ..
            }
        ));
    }

    #[test]
    fn rejects_creep_tag_naming_own_family() {
        let raw = bank_json(
            r#"[{"key":"a","pick":"F","effects":{"tags":[{"kind":"creep","family":"Control"}]}}]"#,
        );
        let err = QuestionBank::from_json(&raw).unwrap_err();
        assert!(matches!(err, BankError::CreepTagOwnFamily { .. }));
    }

    #[test]
    fn rejects_unknown_tag_kind() {
        let raw = bank_json(
            r#"[{"key":"a","pick":"C","effects":{"tags":[{"kind":"mystery","value":1}]}}]"#,
        );
        assert!(matches!(
            QuestionBank::from_json(&raw).unwrap_err(),
            BankError::Json(_)
        ));
    }

    #[test]
    fn rejects_duplicate_ids_and_option_keys() {
        let raw = r#"{"questions":[
            {"id":"q","family":"Pace","type":"evidence","options":[{"key":"a","pick":"C"}]},
            {"id":"q","family":"Pace","type":"evidence","options":[{"key":"a","pick":"C"}]}
        ]}"#;
        assert!(matches!(
            QuestionBank::from_json(raw).unwrap_err(),
            BankError::DuplicateQuestion { .. }
        ));

        let raw = bank_json(r#"[{"key":"a","pick":"C"},{"key":"a","pick":"F"}]"#);
        assert!(matches!(
            QuestionBank::from_json(&raw).unwrap_err(),
            BankError::DuplicateOption { .. }
        ));
    }

    #[test]
    fn deserialize_validates_on_load() {
        let raw = bank_json(r#"[{"key":"a","pick":"O"}]"#);
        let parsed: Result<QuestionBank, _> = serde_json::from_str(&raw);
        assert!(parsed.is_err());
    }

    #[test]
    fn rejects_empty_bank() {
        assert!(matches!(
            QuestionBank::from_json(r#"{"questions":[]}"#).unwrap_err(),
            BankError::EmptyBank
        ));
    }
}
