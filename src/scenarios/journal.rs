//! Output collaborators written to only while a guard is held.

use crate::error::{GuardError, Result};
use crate::guard::{Guard, Protected};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// An append-only text file.
///
/// With a [`crate::guard::NamedGuard`] the appends of independent processes
/// never interleave.
#[derive(Debug)]
pub struct Journal<G: Guard> {
    path: PathBuf,
    guard: G,
}

impl<G: Guard> Journal<G> {
    pub fn new(path: impl Into<PathBuf>, guard: G) -> Self {
        Self {
            path: path.into(),
            guard,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `line` followed by a newline.
    pub fn append(&self, line: &str) -> Result<()> {
        let _held = self.guard.hold_blocking()?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                GuardError::UserError(format!(
                    "failed to create journal directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                GuardError::UserError(format!(
                    "failed to open journal '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", line).map_err(|e| {
            GuardError::UserError(format!(
                "failed to append to journal '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// A line-oriented log sink shared between threads.
///
/// Each entry is written whole while the guard is held, so lines from
/// different threads never interleave.
#[derive(Debug)]
pub struct ConsoleLog<W: Write + Send, G: Guard> {
    out: Protected<W, G>,
}

impl<W: Write + Send, G: Guard> ConsoleLog<W, G> {
    pub fn new(guard: G, out: W) -> Self {
        Self {
            out: Protected::with_guard(guard, out),
        }
    }

    /// Write `[log] <local timestamp>: <message>`.
    pub fn log(&self, message: &str) -> Result<()> {
        let line = format!(
            "[log] {}: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            message
        );
        self.out
            .with_blocking(|out| writeln!(out, "{}", line).and_then(|_| out.flush()))?
            .map_err(|e| GuardError::UserError(format!("failed to write log line: {}", e)))
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}
