//! Scripted sessions: a JSON file standing in for the interactive flow.
//!
//! ```json
//! {
//!   "primaries": ["Control"],
//!   "answers": [
//!     {"question_id": "control-e1", "family": "Control", "key": "a"},
//!     {"question_id": "control-e2", "family": "Control", "key": "a"}
//!   ],
//!   "probes": [{"family": "Pace", "answer": "collapse"}],
//!   "tie_break": "Truth",
//!   "installed": "Bonding:Caretaker"
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use sif_engine::{
    AnchorPhase, DiagnosticExport, EngineSettings, Face, Family, LineVerdict, ProbeAnswer,
    QuestionBank, Session, Shortlist, SifResult,
};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionScript {
    #[serde(default)]
    pub primaries: Vec<String>,
    #[serde(default)]
    pub answers: Vec<AnswerStep>,
    #[serde(default)]
    pub probes: Vec<ProbeStep>,
    pub tie_break: Option<String>,
    pub installed: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerStep {
    pub question_id: String,
    pub family: String,
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct ProbeStep {
    pub family: String,
    pub answer: ProbeAnswer,
}

impl SessionScript {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid session script")
    }
}

#[derive(Debug)]
pub struct ScriptOutcome {
    pub result: SifResult,
    pub shortlist: Shortlist,
    pub verdicts: BTreeMap<Family, LineVerdict>,
    pub diagnostics: DiagnosticExport,
}

pub fn run_script(
    bank: QuestionBank,
    settings: EngineSettings,
    script: &SessionScript,
) -> Result<ScriptOutcome> {
    let mut session = Session::new(bank, settings);

    let primaries = script
        .primaries
        .iter()
        .map(|raw| Family::parse(raw))
        .collect::<Result<Vec<_>, _>>()
        .context("invalid primary line")?;
    session.select_primary_lines(primaries)?;

    for (index, step) in script.answers.iter().enumerate() {
        let outcome = session
            .answer(&step.question_id, &step.family, &step.key)
            .with_context(|| format!("answer #{} ({})", index + 1, step.question_id))?;
        if outcome.probe_required {
            tracing::info!(family = %outcome.family, "line failed; severity probe due");
        }
    }

    for step in &script.probes {
        let family = Family::parse(&step.family).context("invalid probe family")?;
        session
            .answer_probe(family, step.answer)
            .with_context(|| format!("severity probe for {family}"))?;
    }

    session
        .build_candidates()
        .context("no anchor could be resolved")?;
    if session.anchor_phase() == AnchorPhase::AwaitingTieBreak {
        let Some(raw) = script.tie_break.as_deref() else {
            let names: Vec<&str> = session
                .anchor_candidates()
                .iter()
                .map(|candidate| candidate.family.as_str())
                .collect();
            bail!("tie-break required between {}", names.join(", "));
        };
        let family = Family::parse(raw).context("invalid tie-break")?;
        session.select_tie_break(family)?;
    }

    let shortlist = session
        .shortlist()
        .context("every line needs all of its picks before the shortlist")?
        .clone();
    let Some(raw) = script.installed.as_deref() else {
        let faces: Vec<String> = shortlist.faces().map(|face| face.key()).collect();
        bail!("installed choice required; shortlist is {}", faces.join(", "));
    };
    let installed = Face::parse(raw).context("invalid installed face")?;
    session.choose_installed(installed)?;

    let result = session.finalize()?;
    Ok(ScriptOutcome {
        result,
        shortlist,
        verdicts: session.verdicts()?,
        diagnostics: session.diagnostics()?,
    })
}

/// Plain-text report for stdout.
#[must_use]
pub fn render(outcome: &ScriptOutcome) -> String {
    let mut out = String::new();

    out.push_str("Lines:\n");
    for (family, verdict) in &outcome.verdicts {
        let status = match verdict {
            LineVerdict::Resolved { verdict } => format!("{verdict} ({})", verdict.label()),
            LineVerdict::Incomplete { have, need } => format!("incomplete {have}/{need}"),
        };
        let _ = writeln!(out, "  {:<12} {status}", family.as_str());
    }

    out.push_str("Shortlist:\n");
    for (rank, entry) in outcome.shortlist.entries().iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {:<22} IL {:.4}  score {:.4}",
            rank + 1,
            entry.face.key(),
            entry.il,
            entry.face_score
        );
    }

    let result = &outcome.result;
    let friction = result.friction();
    if let Some(collision) = friction.collision {
        let _ = writeln!(
            out,
            "Collision: {} is the anchor; using {}",
            collision.requested, collision.resolved
        );
    }
    for report in &friction.failed_lines {
        let _ = writeln!(
            out,
            "Failed line: {} ({}), {} creeping in",
            report.family, report.severity, report.creep
        );
    }

    let _ = writeln!(out, "Prize: {}", result.prize());
    let _ = writeln!(out, "Result: {}", result.summary_line());
    out
}
