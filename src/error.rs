//! Error types for muxguard.
//!
//! Uses thiserror for derive macros. A timed-out acquisition is *not* an
//! error; it is reported through [`crate::guard::Acquisition::TimedOut`] so
//! callers can choose their own fallback. The variants here are usage bugs,
//! I/O failures on lock files, and the CLI-level outcomes that map to exit
//! codes.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for muxguard operations.
#[derive(Error, Debug)]
pub enum GuardError {
    /// A guard was released while nobody held it.
    #[error("release without acquire: guard '{0}' is not held")]
    ReleaseWithoutAcquire(String),

    /// A guard with owner-only release was released by a different thread.
    #[error("guard '{0}' can only be released by the thread that acquired it")]
    NotOwner(String),

    /// The name given to a named guard cannot be used.
    #[error("invalid guard name: {0}")]
    InvalidName(String),

    /// Reading, writing, or locking a lock file failed.
    #[error("lock file failure: {0}")]
    LockFile(String),

    /// The guard was held by someone else and the caller chose to give up.
    #[error("guard is busy: {0}")]
    Busy(String),

    /// The single-instance check found another live instance.
    #[error("another instance is already running: {0}")]
    AlreadyRunning(String),

    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),
}

impl GuardError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GuardError::ReleaseWithoutAcquire(_) | GuardError::NotOwner(_) => {
                exit_codes::USAGE_ERROR
            }
            GuardError::InvalidName(_) | GuardError::UserError(_) => exit_codes::USER_ERROR,
            GuardError::LockFile(_) => exit_codes::LOCK_FAILURE,
            GuardError::Busy(_) => exit_codes::GUARD_BUSY,
            GuardError::AlreadyRunning(_) => exit_codes::ALREADY_RUNNING,
        }
    }
}

/// Result type alias for muxguard operations.
pub type Result<T> = std::result::Result<T, GuardError>;
