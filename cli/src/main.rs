//! SIF CLI: drive the identity resolution engine from files.
//!
//! ```text
//! sif validate --bank bank.json
//! sif run --bank bank.json --session session.json [--export diagnostics.json]
//! ```
//!
//! Settings come from `~/.sif/config.toml` (or `--config`); logs go to
//! `sif.log` under `[app] log_dir`, `~/.sif/logs` by default. Stdout carries
//! only the report.

mod logging;
mod script;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sif_config::SifConfig;
use sif_engine::QuestionBank;

use crate::script::{SessionScript, render, run_script};

const EXPORT_FILE_NAME: &str = "sif-diagnostics.json";

#[derive(Parser)]
#[command(name = "sif")]
#[command(about = "Resolve anchor, secondary and prize identities from a scripted session")]
struct Cli {
    /// Config file to use instead of ~/.sif/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted session and print the result
    Run {
        /// Question bank JSON
        #[arg(long)]
        bank: PathBuf,
        /// Session script JSON
        #[arg(long)]
        session: PathBuf,
        /// Write the diagnostic export here (defaults to the configured export_dir)
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Load and validate a question bank
    Validate {
        /// Question bank JSON
        #[arg(long)]
        bank: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SifConfig::load_from(path)?,
        None => SifConfig::load()?,
    }
    .unwrap_or_default();
    logging::init_tracing(&config);

    match cli.command {
        Commands::Run {
            bank,
            session,
            export,
        } => run(&config, &bank, &session, export),
        Commands::Validate { bank } => validate(&bank),
    }
}

fn load_bank(path: &Path) -> Result<QuestionBank> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank {}", path.display()))?;
    QuestionBank::from_json(&raw)
        .with_context(|| format!("invalid question bank {}", path.display()))
}

fn validate(bank_path: &Path) -> Result<()> {
    let bank = load_bank(bank_path)?;
    let families: BTreeSet<_> = bank.questions().iter().map(|q| q.family).collect();
    tracing::info!(path = %bank_path.display(), questions = bank.len(), "bank validated");
    println!(
        "ok: {} questions across {} families",
        bank.len(),
        families.len()
    );
    Ok(())
}

fn run(
    config: &SifConfig,
    bank_path: &Path,
    session_path: &Path,
    export: Option<PathBuf>,
) -> Result<()> {
    let settings = config
        .engine_settings()
        .context("invalid scoring settings in config")?;
    let bank = load_bank(bank_path)?;
    let raw = fs::read_to_string(session_path)
        .with_context(|| format!("failed to read session script {}", session_path.display()))?;
    let script = SessionScript::from_json(&raw)?;

    let outcome = run_script(bank, settings, &script)?;
    print!("{}", render(&outcome));

    let export_path =
        export.or_else(|| config.export_dir().map(|dir| dir.join(EXPORT_FILE_NAME)));
    if let Some(path) = export_path {
        let json = outcome
            .diagnostics
            .to_json_pretty()
            .context("failed to serialize diagnostics")?;
        sif_utils::recover_bak_file(&path);
        sif_utils::atomic_write(&path, json.as_bytes())
            .with_context(|| format!("failed to write export {}", path.display()))?;
        tracing::info!(path = %path.display(), "diagnostics exported");
        println!("Diagnostics: {}", path.display());
    }

    Ok(())
}
