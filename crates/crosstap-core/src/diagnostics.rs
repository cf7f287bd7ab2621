//! Diagnostics: the per-thread step log and failure artifact store.
//!
//! The step log is a product feature, not tracing plumbing: a test thread
//! accumulates numbered, timestamped entries for each successful operation
//! and can export the whole sequence as JSON for attachment to a test
//! report. `tracing` diagnostics run alongside it.
//!
//! The artifact store persists failure screenshots under a per-category
//! subdirectory (`android`/`ios` for element failures, `fails` for
//! test-level captures). Artifact writes are best-effort at call sites: a
//! failed write is reported as [`Error::ArtifactWrite`] but must never
//! replace the error that triggered the capture.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::Error;

/// One numbered, timestamped step-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// 1-based position within the log.
    pub step_number: u32,
    /// When the step completed.
    pub timestamp: DateTime<Utc>,
    /// Human-readable description of the step.
    pub message: String,
}

/// An append-only, per-thread sequence of step entries.
#[derive(Debug, Default)]
pub struct StepLog {
    entries: Vec<LogEntry>,
}

impl StepLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, assigning the next step number and the current
    /// timestamp.
    pub fn append(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(step = self.entries.len() + 1, %message, "step logged");
        self.entries.push(LogEntry {
            step_number: self.entries.len() as u32 + 1,
            timestamp: Utc::now(),
            message,
        });
    }

    /// The entries in append order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Drops all entries and resets numbering to 1.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Exports the log as a JSON array.
    pub fn to_json(&self) -> String {
        // Vec<LogEntry> serialization cannot fail.
        serde_json::to_string_pretty(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Encodes screenshot bytes for embedding in reports.
pub fn to_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Filesystem store for failure screenshots.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at the given directory. Nothing is created on
    /// disk until the first capture.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Captures a screenshot and writes it to
    /// `{root}/{subdir}/{label}-{timestamp}.jpg`, returning the raw bytes.
    ///
    /// Write failures map to [`Error::ArtifactWrite`]; callers already
    /// holding a triggering error must log and discard this one instead of
    /// propagating it.
    pub async fn capture_failure(
        &self,
        backend: &dyn Backend,
        subdir: &str,
        label: &str,
    ) -> Result<Vec<u8>, Error> {
        let bytes = backend.screenshot().await?;
        let dir = self.root.join(subdir);
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::ArtifactWrite(format!("creating {}: {e}", dir.display())))?;

        let timestamp = Utc::now().format("%Y-%m-%d_%H-%M-%S");
        let path = dir.join(format!("{label}-{timestamp}.jpg"));
        std::fs::write(&path, &bytes)
            .map_err(|e| Error::ArtifactWrite(format!("writing {}: {e}", path.display())))?;
        debug!(path = %path.display(), "failure artifact written");
        Ok(bytes)
    }

    /// Removes artifacts older than `days` across all subdirectories.
    ///
    /// Returns how many files were removed. Files whose age cannot be
    /// determined are left in place.
    pub fn prune_older_than(&self, days: u64) -> Result<u64, Error> {
        let cutoff = std::time::Duration::from_secs(days * 24 * 60 * 60);
        let now = SystemTime::now();
        let mut removed = 0;

        if !self.root.exists() {
            return Ok(0);
        }
        for subdir in std::fs::read_dir(&self.root)? {
            let subdir = subdir?.path();
            if !subdir.is_dir() {
                continue;
            }
            for entry in std::fs::read_dir(&subdir)? {
                let path = entry?.path();
                let Ok(modified) = path.metadata().and_then(|m| m.modified()) else {
                    continue;
                };
                let Ok(age) = now.duration_since(modified) else {
                    continue;
                };
                if age > cutoff {
                    match std::fs::remove_file(&path) {
                        Ok(()) => removed += 1,
                        Err(e) => warn!(path = %path.display(), error = %e, "prune failed"),
                    }
                }
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_number_from_one() {
        let mut log = StepLog::new();
        log.append("Clicked on login-button");
        log.append("Entered text in username-field");
        let entries = log.entries();
        assert_eq!(entries[0].step_number, 1);
        assert_eq!(entries[1].step_number, 2);
        assert_eq!(entries[1].message, "Entered text in username-field");
    }

    #[test]
    fn clear_resets_numbering() {
        let mut log = StepLog::new();
        log.append("first");
        log.clear();
        log.append("after clear");
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].step_number, 1);
    }

    #[test]
    fn json_export_shape() {
        let mut log = StepLog::new();
        log.append("Clicked on save-button");
        let json = log.to_json();
        assert!(json.contains("\"stepNumber\": 1"));
        assert!(json.contains("\"message\": \"Clicked on save-button\""));

        let parsed: Vec<LogEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, log.entries());
    }

    #[test]
    fn base64_helper_roundtrip() {
        let encoded = to_base64(b"\xff\xd8\xff");
        assert_eq!(BASE64.decode(encoded).unwrap(), b"\xff\xd8\xff");
    }
}
