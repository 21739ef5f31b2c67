//! Atomic file persistence.
//!
//! Bytes go to a temp file next to the destination, which is then renamed
//! into place. A reader never sees a half-written export. Where rename over
//! an existing file is refused by the platform, the old file is moved to
//! `<name>.bak` for the duration of the swap and restored on failure.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// What to do when the destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overwrite {
    #[default]
    Replace,
    /// Fail with `AlreadyExists` instead of touching the existing file.
    Refuse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub overwrite: Overwrite,
    /// `sync_all` the temp file before the rename.
    pub sync: bool,
    /// Create missing parent directories.
    pub create_parent: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            overwrite: Overwrite::Replace,
            sync: true,
            create_parent: true,
        }
    }
}

/// Restore `path` from `path.bak` left behind by an interrupted swap.
pub fn recover_bak_file(path: &Path) {
    let backup = path.with_extension("bak");
    if path.exists() || !backup.exists() {
        return;
    }
    match fs::rename(&backup, path) {
        Ok(()) => tracing::warn!(
            path = %path.display(),
            "Recovered .bak file from interrupted export"
        ),
        Err(e) => tracing::warn!(path = %path.display(), "Failed to recover .bak file: {e}"),
    }
}

pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    atomic_write_with(path, bytes, WriteOptions::default())
}

pub fn atomic_write_with(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: WriteOptions,
) -> io::Result<()> {
    let path = path.as_ref();
    let parent = parent_dir(path);
    if options.create_parent {
        fs::create_dir_all(parent)?;
    }

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    if options.sync {
        tmp.as_file().sync_all()?;
    }

    match options.overwrite {
        Overwrite::Refuse => {
            tmp.persist_noclobber(path).map_err(|err| err.error)?;
        }
        Overwrite::Replace => {
            if let Err(err) = tmp.persist(path) {
                if !path.exists() {
                    return Err(err.error);
                }
                swap_through_backup(path, err.file)?;
            }
        }
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "file persisted");
    Ok(())
}

fn swap_through_backup(path: &Path, tmp: NamedTempFile) -> io::Result<()> {
    let backup = path.with_extension("bak");
    let _ = fs::remove_file(&backup);
    fs::rename(path, &backup)?;

    if let Err(err) = tmp.persist(path) {
        let _ = fs::rename(&backup, path);
        return Err(err.error);
    }
    if let Err(e) = fs::remove_file(&backup) {
        tracing::warn!(path = %backup.display(), "Failed to remove .bak after export: {e}");
    }
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
