//! Session context: the per-test-thread platform and backend state.
//!
//! The original design hid platform selection in ambient global state; here
//! it is an explicit [`SessionContext`] value owned by one test thread and
//! passed to (or embedded in) the action executor. The context is not shared
//! across threads; each test thread builds its own.
//!
//! A context starts uninitialized. Operations that need the active platform
//! or its backend fail with [`Error::SessionNotInitialized`] until both have
//! been set, so misordered setup surfaces immediately instead of as a
//! confusing resolution failure later.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::backend::Backend;
use crate::error::Error;
use crate::query::Platform;

/// Per-thread session state: the active platform and the backend handle
/// registered for each platform.
#[derive(Default)]
pub struct SessionContext {
    platform: Option<Platform>,
    backends: HashMap<Platform, Arc<dyn Backend>>,
}

impl SessionContext {
    /// Creates an empty, uninitialized context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the active platform.
    pub fn set_platform(&mut self, platform: Platform) {
        debug!(%platform, "session platform set");
        self.platform = Some(platform);
    }

    /// Selects the active platform from a string tag ("android" / "ios",
    /// case-insensitive). Fails with [`Error::InvalidPlatform`] for anything
    /// else, leaving the context unchanged.
    pub fn set_platform_tag(&mut self, tag: &str) -> Result<(), Error> {
        let platform: Platform = tag.parse()?;
        self.set_platform(platform);
        Ok(())
    }

    /// The active platform, or [`Error::SessionNotInitialized`] when none
    /// has been selected.
    pub fn platform(&self) -> Result<Platform, Error> {
        self.platform.ok_or(Error::SessionNotInitialized)
    }

    /// Registers the backend session handle for a platform. Replaces any
    /// previous handle for that platform.
    pub fn set_backend(&mut self, platform: Platform, backend: Arc<dyn Backend>) {
        debug!(%platform, "session backend registered");
        self.backends.insert(platform, backend);
    }

    /// The backend for the active platform.
    ///
    /// Fails with [`Error::SessionNotInitialized`] when no platform is
    /// selected or no backend has been registered for it.
    pub fn backend(&self) -> Result<Arc<dyn Backend>, Error> {
        let platform = self.platform()?;
        self.backends
            .get(&platform)
            .cloned()
            .ok_or(Error::SessionNotInitialized)
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("platform", &self.platform)
            .field("backends", &self.backends.keys().collect::<Vec<_>>())
            .finish()
    }
}
