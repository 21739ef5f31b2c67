//! Shared infrastructure utilities for SIF.
//!
//! - **`persist`**: crash-safe file persistence for diagnostic exports
//!   (temp file in the target directory, then rename)

pub mod persist;

pub use persist::{Overwrite, WriteOptions, atomic_write, atomic_write_with, recover_bak_file};
