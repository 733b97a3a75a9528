//! Listing, inspecting, and clearing named guards in a lock directory.

use super::metadata::HolderMetadata;
use super::named::is_contended;
use super::naming::{self, LOCK_EXTENSION};
use crate::error::{GuardError, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Observed state of a named guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Nobody holds it and no stale metadata is left.
    Free,
    /// A live handle (in this or another process) holds it.
    Held,
    /// Nobody holds it, but a previous holder left metadata behind.
    Abandoned,
}

impl GuardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardState::Free => "free",
            GuardState::Held => "held",
            GuardState::Abandoned => "abandoned",
        }
    }
}

/// Information about a named guard found in a lock directory.
#[derive(Debug, Clone)]
pub struct GuardInfo {
    /// The lock file path.
    pub path: PathBuf,

    /// The decoded guard name.
    pub name: String,

    /// The observed state.
    pub state: GuardState,

    /// Holder metadata, if any was readable.
    pub holder: Option<HolderMetadata>,
}

impl std::fmt::Display for GuardInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.holder {
            Some(holder) => write!(
                f,
                "{} ({}, owner: {}, age: {})",
                self.name,
                self.state.as_str(),
                holder.owner,
                holder.age_string()
            ),
            None => write!(f, "{} ({})", self.name, self.state.as_str()),
        }
    }
}

/// List all named guards in `lock_dir`, sorted by name.
///
/// Probing takes each lock file's advisory lock for an instant, so a
/// concurrent zero-timeout acquisition may spuriously time out.
pub fn list_named_guards(lock_dir: &Path) -> Result<Vec<GuardInfo>> {
    let mut guards = Vec::new();

    if !lock_dir.exists() {
        return Ok(guards);
    }

    let entries = fs::read_dir(lock_dir).map_err(|e| {
        GuardError::LockFile(format!(
            "failed to read lock directory '{}': {}",
            lock_dir.display(),
            e
        ))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            GuardError::LockFile(format!("failed to read lock directory entry: {}", e))
        })?;

        let path = entry.path();

        // Skip non-lock files
        if path.extension().and_then(|e| e.to_str()) != Some(LOCK_EXTENSION) {
            continue;
        }

        // Skip files whose names we could not have produced
        let Some(name) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(naming::decode_name)
        else {
            continue;
        };

        guards.push(probe(path, name)?);
    }

    guards.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(guards)
}

/// Inspect a single named guard.
pub fn inspect_named_guard(lock_dir: &Path, name: &str) -> Result<GuardInfo> {
    let path = naming::lock_path(lock_dir, name)?;

    if !path.exists() {
        return Err(GuardError::UserError(format!(
            "guard '{}' does not exist at: {}",
            name,
            path.display()
        )));
    }

    probe(path, name.to_string())
}

/// Clear metadata left behind by an abandoned holder.
///
/// Returns the cleared metadata, or `None` if there was nothing to clear.
/// Fails with `Busy` when the guard is currently held, since the metadata
/// then belongs to a live holder.
pub fn clear_abandoned(lock_dir: &Path, name: &str) -> Result<Option<HolderMetadata>> {
    let path = naming::lock_path(lock_dir, name)?;

    if !path.exists() {
        return Err(GuardError::UserError(format!(
            "guard '{}' does not exist at: {}",
            name,
            path.display()
        )));
    }

    let file = open_existing(&path)?;
    if !try_lock(&file, &path)? {
        return Err(GuardError::Busy(format!(
            "guard '{}' is held; refusing to clear live holder metadata",
            name
        )));
    }

    let content = fs::read_to_string(&path);
    let cleared = file.set_len(0);
    let _ = FileExt::unlock(&file);

    let content = content.map_err(|e| {
        GuardError::LockFile(format!(
            "failed to read lock file '{}': {}",
            path.display(),
            e
        ))
    })?;
    cleared.map_err(|e| {
        GuardError::LockFile(format!(
            "failed to clear lock file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let holder = HolderMetadata::parse(&content).unwrap_or(None);
    if !content.trim().is_empty() {
        tracing::info!(guard = %name, "cleared abandoned holder metadata");
    }
    Ok(holder)
}

fn probe(path: PathBuf, name: String) -> Result<GuardInfo> {
    let file = open_existing(&path)?;
    let free = try_lock(&file, &path)?;
    if free {
        let _ = FileExt::unlock(&file);
    }

    // Metadata may be mid-write by a live holder; unreadable is reported as absent.
    let content = fs::read_to_string(&path).unwrap_or_default();
    let has_content = !content.trim().is_empty();
    let holder = HolderMetadata::parse(&content).unwrap_or(None);

    let state = match (free, has_content) {
        (false, _) => GuardState::Held,
        (true, true) => GuardState::Abandoned,
        (true, false) => GuardState::Free,
    };

    Ok(GuardInfo {
        path,
        name,
        state,
        holder,
    })
}

fn open_existing(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| {
            GuardError::LockFile(format!(
                "failed to open lock file '{}': {}",
                path.display(),
                e
            ))
        })
}

fn try_lock(file: &File, path: &Path) -> Result<bool> {
    match FileExt::try_lock_exclusive(file) {
        Ok(()) => Ok(true),
        Err(e) if is_contended(&e) => Ok(false),
        Err(e) => Err(GuardError::LockFile(format!(
            "failed to probe lock '{}': {}",
            path.display(),
            e
        ))),
    }
}
