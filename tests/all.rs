//! Integration test aggregator
//!
//! Drives the engine end to end through the public crates: a question bank
//! loaded from JSON, settings resolved from TOML, and diagnostics written to
//! disk. Individual test modules are declared in `suite/mod.rs`.

mod common;
mod suite;
