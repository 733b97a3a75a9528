//! Cross-process named guard backed by an advisory lock on a lock file.

use super::metadata::HolderMetadata;
use super::naming;
use super::types::{Acquisition, Timeout};
use super::Guard;
use crate::error::{GuardError, Result};
use fs2::FileExt;
use parking_lot::{Condvar, Mutex};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Default interval between attempts to take a contended lock file.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A guard addressable by name from any process sharing the lock directory.
///
/// The lock file is opened once and kept open for the life of the handle. The
/// operating system drops the advisory lock when the holding process exits,
/// so a holder that dies never deadlocks later acquirers; they observe the
/// metadata it left behind and get [`Acquisition::Recovered`].
///
/// Threads sharing one handle are serialized by the handle's own phase, since
/// an advisory lock is already satisfied for its own file handle. Release
/// clears the metadata, unlocks the file and frees the handle in one critical
/// section, so a racing acquire never sees a half-released guard.
#[derive(Debug)]
pub struct NamedGuard {
    name: String,
    path: PathBuf,
    file: File,
    phase: Mutex<Phase>,
    free: Condvar,
    poll_interval: Duration,
}

/// Where this handle stands. Only one thread per handle may be past `Free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Free,
    /// A thread owns the handle and is polling the lock file.
    Acquiring,
    Held,
}

impl NamedGuard {
    /// Open (creating if needed) the named guard in `lock_dir`. Does not acquire.
    pub fn open(lock_dir: &Path, name: &str) -> Result<Self> {
        Self::open_with(lock_dir, name, DEFAULT_POLL_INTERVAL)
    }

    /// Like [`NamedGuard::open`] with an explicit poll interval.
    pub fn open_with(lock_dir: &Path, name: &str, poll_interval: Duration) -> Result<Self> {
        let path = naming::lock_path(lock_dir, name)?;

        if !lock_dir.exists() {
            fs::create_dir_all(lock_dir).map_err(|e| {
                GuardError::LockFile(format!(
                    "failed to create lock directory '{}': {}",
                    lock_dir.display(),
                    e
                ))
            })?;
        }

        // Never truncate on open: the content may be a live holder's metadata.
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                GuardError::LockFile(format!(
                    "failed to open lock file '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self {
            name: name.to_string(),
            path,
            file,
            phase: Mutex::new(Phase::Free),
            free: Condvar::new(),
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        })
    }

    /// Open the named guard and try to take it without waiting.
    ///
    /// Returns the handle together with `created_fresh`: `true` when this call
    /// established the guard in the acquired state (including taking over from
    /// an abandoned holder), `false` when another live holder has it. A fresh
    /// guard stays held until it is released or the handle is dropped.
    pub fn try_create(lock_dir: &Path, name: &str) -> Result<(Self, bool)> {
        Self::try_create_with(lock_dir, name, DEFAULT_POLL_INTERVAL)
    }

    /// Like [`NamedGuard::try_create`] with an explicit poll interval.
    pub fn try_create_with(
        lock_dir: &Path,
        name: &str,
        poll_interval: Duration,
    ) -> Result<(Self, bool)> {
        let guard = Self::open_with(lock_dir, name, poll_interval)?;
        let created_fresh = guard.acquire(Timeout::IMMEDIATE)?.is_acquired();
        Ok((guard, created_fresh))
    }

    /// The guard name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path to the backing lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Poll the advisory lock until it is taken or `deadline` passes.
    ///
    /// Returns `Ok(false)` on timeout.
    fn lock_file_until(&self, deadline: Option<Instant>) -> Result<bool> {
        loop {
            match FileExt::try_lock_exclusive(&self.file) {
                Ok(()) => return Ok(true),
                Err(e) if is_contended(&e) => {}
                Err(e) => {
                    return Err(GuardError::LockFile(format!(
                        "failed to lock '{}': {}",
                        self.path.display(),
                        e
                    )));
                }
            }

            let pause = match deadline {
                None => self.poll_interval,
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(false);
                    }
                    self.poll_interval.min(deadline - now)
                }
            };
            std::thread::sleep(pause);
        }
    }

    fn read_holder(&self) -> Result<String> {
        let mut content = String::new();
        let mut file = &self.file;
        file.seek(SeekFrom::Start(0))
            .and_then(|_| file.read_to_string(&mut content))
            .map_err(|e| {
                GuardError::LockFile(format!(
                    "failed to read lock file '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;
        Ok(content)
    }

    fn write_holder(&self, metadata: &HolderMetadata) -> Result<()> {
        let json = metadata.to_json()?;
        let mut file = &self.file;
        file.set_len(0)
            .and_then(|_| file.seek(SeekFrom::Start(0)))
            .and_then(|_| file.write_all(json.as_bytes()))
            .and_then(|_| file.sync_data())
            .map_err(|e| {
                GuardError::LockFile(format!(
                    "failed to write holder metadata to '{}': {}",
                    self.path.display(),
                    e
                ))
            })
    }

    fn clear_holder(&self) -> Result<()> {
        self.file.set_len(0).map_err(|e| {
            GuardError::LockFile(format!(
                "failed to clear holder metadata in '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Record this process as holder and report any abandoned predecessor.
    fn take_over(&self) -> Result<Acquisition> {
        let previous = self.read_holder()?;
        self.write_holder(&HolderMetadata::new(&self.name))?;

        if previous.trim().is_empty() {
            tracing::debug!(guard = %self.name, "acquired");
            return Ok(Acquisition::Acquired);
        }

        let holder = HolderMetadata::parse(&previous).unwrap_or(None);
        match &holder {
            Some(meta) => tracing::warn!(
                guard = %self.name,
                previous_owner = %meta.owner,
                previous_pid = ?meta.pid,
                held_for = %meta.age_string(),
                "recovered abandoned guard"
            ),
            None => tracing::warn!(
                guard = %self.name,
                "recovered abandoned guard with unreadable holder metadata"
            ),
        }
        Ok(Acquisition::Recovered(holder))
    }
}

impl Guard for NamedGuard {
    fn label(&self) -> &str {
        &self.name
    }

    fn acquire(&self, timeout: Timeout) -> Result<Acquisition> {
        let deadline = timeout.deadline_from(Instant::now());

        // Claim the handle for this thread.
        {
            let mut phase = self.phase.lock();
            while *phase != Phase::Free {
                match deadline {
                    None => self.free.wait(&mut phase),
                    Some(deadline) => {
                        if Instant::now() >= deadline {
                            tracing::debug!(guard = %self.name, %timeout, "acquire timed out");
                            return Ok(Acquisition::TimedOut);
                        }
                        let _ = self.free.wait_until(&mut phase, deadline);
                    }
                }
            }
            *phase = Phase::Acquiring;
        }

        let locked = self.lock_file_until(deadline);

        let mut phase = self.phase.lock();
        let outcome = match locked {
            Ok(true) => match self.take_over() {
                Ok(acquisition) => {
                    *phase = Phase::Held;
                    return Ok(acquisition);
                }
                Err(e) => {
                    let _ = FileExt::unlock(&self.file);
                    Err(e)
                }
            },
            Ok(false) => {
                tracing::debug!(guard = %self.name, %timeout, "acquire timed out");
                Ok(Acquisition::TimedOut)
            }
            Err(e) => Err(e),
        };

        *phase = Phase::Free;
        drop(phase);
        self.free.notify_one();
        outcome
    }

    fn release(&self) -> Result<()> {
        let mut phase = self.phase.lock();

        if *phase != Phase::Held {
            tracing::error!(guard = %self.name, "release without acquire");
            return Err(GuardError::ReleaseWithoutAcquire(self.name.clone()));
        }

        // Clear before unlocking so the next holder does not see stale metadata.
        let cleared = self.clear_holder();
        let unlocked = FileExt::unlock(&self.file).map_err(|e| {
            GuardError::LockFile(format!(
                "failed to unlock '{}': {}",
                self.path.display(),
                e
            ))
        });

        *phase = Phase::Free;
        drop(phase);
        self.free.notify_one();

        cleared?;
        unlocked?;

        tracing::debug!(guard = %self.name, "released");
        Ok(())
    }

    fn is_held(&self) -> bool {
        *self.phase.lock() == Phase::Held
    }
}

impl Drop for NamedGuard {
    fn drop(&mut self) {
        if self.is_held()
            && let Err(e) = self.release()
        {
            tracing::warn!(guard = %self.name, error = %e, "failed to release guard on drop");
        }
    }
}

/// Whether a failed non-blocking lock attempt means "someone else holds it".
pub(crate) fn is_contended(err: &io::Error) -> bool {
    err.raw_os_error().is_some()
        && err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
        || err.kind() == io::ErrorKind::WouldBlock
}
