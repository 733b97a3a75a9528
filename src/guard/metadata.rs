//! Holder metadata written into named-guard lock files.

use crate::error::{GuardError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Record of who holds a named guard.
///
/// Written into the lock file right after the advisory lock is taken and
/// truncated on release. Finding a record on acquisition means the previous
/// holder went away without releasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderMetadata {
    /// Owner of the guard (e.g., `user@HOST`).
    pub owner: String,

    /// Process ID of the holder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Timestamp when the guard was acquired (RFC3339).
    pub acquired_at: DateTime<Utc>,

    /// The guard name as given by the holder.
    pub name: String,
}

impl HolderMetadata {
    /// Create metadata for the current process with the current timestamp.
    pub fn new(name: &str) -> Self {
        Self {
            owner: get_owner_string(),
            pid: Some(std::process::id()),
            acquired_at: Utc::now(),
            name: name.to_string(),
        }
    }

    /// Parse metadata from lock file content.
    ///
    /// Empty (or whitespace-only) content means nobody recorded a hold, which
    /// yields `Ok(None)`.
    pub fn parse(content: &str) -> Result<Option<Self>> {
        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(content)
            .map(Some)
            .map_err(|e| GuardError::LockFile(format!("failed to parse holder metadata: {}", e)))
    }

    /// Serialize metadata to JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            GuardError::LockFile(format!("failed to serialize holder metadata: {}", e))
        })
    }

    /// How long ago the guard was acquired.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.acquired_at)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }
}

/// Get the owner string for holder metadata.
pub(crate) fn get_owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}
