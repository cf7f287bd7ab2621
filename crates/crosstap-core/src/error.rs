//! Error taxonomy for the interaction engine.
//!
//! This module defines [`Error`], which unifies failures from descriptor
//! construction, session-context misuse, element resolution, wait timeouts,
//! scroll-search exhaustion, and diagnostics I/O behind a single type, the
//! same way all backends report through one error enum.
//!
//! Resolution and interaction failures are never silently recovered under
//! the strict action policy: they are logged, a failure artifact is
//! attempted, and the original error is returned to the caller. Best-effort
//! actions convert the same failures into sentinel return values instead.

use thiserror::Error;

use crate::query::Platform;

/// Errors produced by the interaction engine.
#[derive(Error, Debug)]
pub enum Error {
    /// A locator strategy name is not a recognized capability of the
    /// backend for the given platform.
    #[error("Unknown locator strategy '{name}' for {platform}")]
    InvalidStrategy {
        /// The platform the strategy was looked up for.
        platform: Platform,
        /// The unrecognized strategy name.
        name: String,
    },

    /// An operation was attempted before a backend handle exists for the
    /// active platform, or before a platform was selected.
    #[error("Session context not initialized")]
    SessionNotInitialized,

    /// A platform tag is neither "android" nor "ios".
    #[error("Invalid platform tag '{0}'")]
    InvalidPlatform(String),

    /// No element matched the query.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A descriptor carries no locator for the requested platform.
    #[error("Descriptor '{name}' has no locator for {platform}")]
    MissingLocator {
        /// The descriptor's element name.
        name: String,
        /// The platform the lookup was attempted on.
        platform: Platform,
    },

    /// A readiness condition never held within the allotted time.
    #[error("Timed out after {waited_ms}ms")]
    Timeout {
        /// How long the wait controller polled before giving up.
        waited_ms: u64,
    },

    /// A resolved element became invalid between check and use.
    #[error("Stale element reference")]
    StaleReference,

    /// An indexed lookup fell outside the result set.
    #[error("Index {index} out of range for {len} matched element(s)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The size of the result set.
        len: usize,
    },

    /// A nested chain was extended past the supported depth.
    #[error("Nested chain depth {depth} exceeds the maximum of {max}")]
    ChainTooDeep {
        /// The depth the chain would have reached.
        depth: usize,
        /// The supported maximum depth.
        max: usize,
    },

    /// Scroll search exhausted its attempt budget without the element
    /// becoming visible.
    #[error("Element not found after {attempts} scroll attempt(s)")]
    ElementNotFoundAfterScroll {
        /// How many visibility probes were made.
        attempts: u32,
        /// The search text for text-qualified scroll searches.
        search_text: Option<String>,
    },

    /// A failure screenshot could not be persisted. Must never replace the
    /// error that triggered the capture.
    #[error("Failed to write diagnostic artifact: {0}")]
    ArtifactWrite(String),

    /// A backend command failed for a reason outside the taxonomy above.
    #[error("Backend error: {0}")]
    Backend(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` for failures the best-effort policy converts into a
    /// sentinel value: the element is absent, never became ready, went
    /// stale, or cannot exist on the active platform. Everything else
    /// (I/O, backend faults, misuse) still raises.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Error::ElementNotFound(_)
                | Error::MissingLocator { .. }
                | Error::Timeout { .. }
                | Error::StaleReference
                | Error::IndexOutOfRange { .. }
                | Error::ElementNotFoundAfterScroll { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = Error::InvalidStrategy {
            platform: Platform::Android,
            name: "cssSelector".to_string(),
        };
        assert!(err.to_string().contains("cssSelector"));

        let err = Error::Timeout { waited_ms: 30000 };
        assert!(err.to_string().contains("30000"));

        let err = Error::IndexOutOfRange { index: 5, len: 3 };
        assert!(err.to_string().contains("5"));
        assert!(err.to_string().contains("3"));

        let err = Error::ElementNotFoundAfterScroll {
            attempts: 12,
            search_text: Some("Settings".to_string()),
        };
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn resolution_failure_classifier() {
        assert!(Error::ElementNotFound("x".into()).is_resolution_failure());
        assert!(Error::Timeout { waited_ms: 1 }.is_resolution_failure());
        assert!(Error::StaleReference.is_resolution_failure());
        assert!(Error::IndexOutOfRange { index: 0, len: 0 }.is_resolution_failure());
        assert!(Error::MissingLocator {
            name: "x".into(),
            platform: Platform::Ios,
        }
        .is_resolution_failure());

        assert!(!Error::SessionNotInitialized.is_resolution_failure());
        assert!(!Error::ChainTooDeep { depth: 4, max: 3 }.is_resolution_failure());
        assert!(!Error::Backend("boom".into()).is_resolution_failure());
        assert!(!Error::ArtifactWrite("disk full".into()).is_resolution_failure());
    }
}
