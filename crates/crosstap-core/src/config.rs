//! Persistent engine configuration.
//!
//! Stores wait profiles, scroll limits, and artifact settings in
//! `~/.crosstap/config.json`. Every knob has a documented default, so a
//! missing or unparsable file yields a fully usable configuration.
//!
//! # Example
//!
//! ```no_run
//! use crosstap_core::config::EngineConfig;
//!
//! // Load (returns defaults if file doesn't exist)
//! let config = EngineConfig::load();
//! assert_eq!(config.default_wait().as_secs(), config.default_wait_secs);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const CONFIG_FILENAME: &str = "config.json";

/// Returns the crosstap home directory (`~/.crosstap/`).
///
/// Falls back to a relative `.crosstap/` when no home directory can be
/// determined.
pub fn crosstap_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".crosstap")
}

fn default_wait_secs() -> u64 {
    30
}
fn long_wait_secs() -> u64 {
    60
}
fn short_wait_secs() -> u64 {
    10
}
fn probe_wait_secs() -> u64 {
    5
}
fn poll_interval_ms() -> u64 {
    250
}
fn max_scroll_attempts() -> u32 {
    12
}
fn screenshot_dir() -> PathBuf {
    PathBuf::from("screenshots")
}
fn retention_days() -> u64 {
    7
}

/// Engine configuration: wait profiles, scroll limits, and artifact
/// settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Standard wait used by most operations (default 30 s).
    #[serde(default = "default_wait_secs")]
    pub default_wait_secs: u64,

    /// Extended wait for slow screens (default 60 s).
    #[serde(default = "long_wait_secs")]
    pub long_wait_secs: u64,

    /// Reduced wait for presence checks (default 10 s).
    #[serde(default = "short_wait_secs")]
    pub short_wait_secs: u64,

    /// Per-probe wait inside the scroll-search loop (default 5 s).
    #[serde(default = "probe_wait_secs")]
    pub probe_wait_secs: u64,

    /// Delay between readiness polls (default 250 ms).
    #[serde(default = "poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Scroll-search attempt budget (default 12).
    #[serde(default = "max_scroll_attempts")]
    pub max_scroll_attempts: u32,

    /// Root directory for failure screenshots (default `screenshots`).
    #[serde(default = "screenshot_dir")]
    pub screenshot_dir: PathBuf,

    /// Artifacts older than this many days are pruned (default 7).
    #[serde(default = "retention_days")]
    pub retention_days: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_wait_secs: default_wait_secs(),
            long_wait_secs: long_wait_secs(),
            short_wait_secs: short_wait_secs(),
            probe_wait_secs: probe_wait_secs(),
            poll_interval_ms: poll_interval_ms(),
            max_scroll_attempts: max_scroll_attempts(),
            screenshot_dir: screenshot_dir(),
            retention_days: retention_days(),
        }
    }
}

impl EngineConfig {
    /// Load config from `~/.crosstap/config.json`.
    ///
    /// Returns [`Default`] if the file does not exist or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(crosstap_dir().join(CONFIG_FILENAME))
    }

    /// Load config from an explicit path, with the same fallback behavior
    /// as [`EngineConfig::load`].
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        std::fs::read_to_string(path.as_ref())
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to `~/.crosstap/config.json`.
    pub fn save(&self) -> std::io::Result<()> {
        let dir = crosstap_dir();
        std::fs::create_dir_all(&dir)?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(dir.join(CONFIG_FILENAME), json)
    }

    /// The standard wait profile.
    pub fn default_wait(&self) -> Duration {
        Duration::from_secs(self.default_wait_secs)
    }

    /// The extended wait profile.
    pub fn long_wait(&self) -> Duration {
        Duration::from_secs(self.long_wait_secs)
    }

    /// The reduced wait profile.
    pub fn short_wait(&self) -> Duration {
        Duration::from_secs(self.short_wait_secs)
    }

    /// The scroll-probe wait profile.
    pub fn probe_wait(&self) -> Duration {
        Duration::from_secs(self.probe_wait_secs)
    }

    /// The readiness poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
