//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::{DEFAULT_JOURNAL_FILE_NAME, DEFAULT_LOCK_DIR_NAME, MAX_COUNTER_WORKERS};
use crate::error::{GuardError, Result};
use crate::guard::Timeout;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the current directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "muxguard.yaml";

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the config file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(GuardError::UserError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            GuardError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the config for a CLI invocation.
    ///
    /// An explicit path must exist. Without one, `muxguard.yaml` in the current
    /// directory is used when present, otherwise the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let candidate = Path::new(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    Self::load(candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| GuardError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            GuardError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `poll_interval_ms` must be positive
    /// - `attempt_timeout_ms` must be positive
    /// - `counter_workers` must be between 1 and 10000
    /// - `log_filter` must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(GuardError::UserError(
                "config validation failed: poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.attempt_timeout_ms == 0 {
            return Err(GuardError::UserError(
                "config validation failed: attempt_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.counter_workers == 0 || self.counter_workers > MAX_COUNTER_WORKERS {
            return Err(GuardError::UserError(format!(
                "config validation failed: counter_workers must be between 1 and {} (found {})",
                MAX_COUNTER_WORKERS, self.counter_workers
            )));
        }

        if self.log_filter.trim().is_empty() {
            return Err(GuardError::UserError(
                "config validation failed: log_filter must be non-empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Directory holding named-guard lock files.
    pub fn lock_dir(&self) -> PathBuf {
        self.lock_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOCK_DIR_NAME))
    }

    /// File appended to by the journal scenario.
    pub fn journal_file(&self) -> PathBuf {
        self.journal_file
            .clone()
            .unwrap_or_else(|| self.lock_dir().join(DEFAULT_JOURNAL_FILE_NAME))
    }

    /// Interval between attempts on a contended named guard.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Timeout for acquisitions with no explicit timeout.
    pub fn default_timeout(&self) -> Timeout {
        Timeout::from_millis(self.default_timeout_ms)
    }

    /// Timeout used by the timed-attempt scenario.
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }
}
