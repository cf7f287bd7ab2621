//! Shared test helpers for crosstap-core integration tests.
//!
//! [`MockBackend`] is a programmable in-memory backend: tests script which
//! locators resolve, when elements appear (after N probes or N swipes),
//! which handles go stale, and what lives inside which subtree. Every
//! interaction is recorded so tests can assert on exactly what the engine
//! did.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crosstap_core::backend::{
    Backend, ElementHandle, GestureSequence, GestureStep, Point, Size,
};
use crosstap_core::config::EngineConfig;
use crosstap_core::error::Error;
use crosstap_core::query::Query;

/// Fake JPEG payload returned by [`MockBackend::screenshot`].
pub const FAKE_JPEG: &[u8] = b"\xff\xd8\xffmock-jpeg";

/// One scripted element: its handle id plus the state the backend reports.
#[derive(Debug, Clone)]
pub struct MockElement {
    pub id: String,
    pub displayed: bool,
    pub enabled: bool,
    pub selected: bool,
    pub text: String,
    pub location: Point,
}

impl MockElement {
    /// A visible, enabled element with the given handle id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            displayed: true,
            enabled: true,
            selected: false,
            text: String::new(),
            location: Point { x: 10, y: 20 },
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

#[derive(Default)]
struct MockState {
    /// Locator string -> matching elements, in document order.
    elements: HashMap<String, Vec<MockElement>>,
    /// Handle id -> element state, across all scopes.
    by_id: HashMap<String, MockElement>,
    /// Parent handle id -> locator -> scoped children.
    subtrees: HashMap<String, HashMap<String, Vec<MockElement>>>,
    /// Locator -> number of find calls that must fail before it resolves.
    appear_after: HashMap<String, u32>,
    /// Locator -> find calls seen so far.
    find_counts: HashMap<String, u32>,
    /// Locator -> number of swipes required before it resolves.
    reveal_after_swipes: HashMap<String, u32>,
    /// Locator -> number of find calls that fail stale before resolving.
    stale_finds: HashMap<String, u32>,
    /// Handle ids whose interactions fail stale.
    stale_on_use: Vec<String>,
    swipes: u32,
    window: Size,
    clicks: Vec<String>,
    keys: Vec<(String, String)>,
    cleared: Vec<String>,
    gestures: Vec<GestureSequence>,
}

/// Programmable in-memory backend.
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MockState {
                window: Size {
                    width: 360,
                    height: 800,
                },
                ..Default::default()
            }),
        })
    }

    /// Registers an element matching the given locator string.
    pub fn add_element(&self, locator: &str, element: MockElement) {
        let mut state = self.state.lock().unwrap();
        state.by_id.insert(element.id.clone(), element.clone());
        state
            .elements
            .entry(locator.to_string())
            .or_default()
            .push(element);
    }

    /// Registers an element inside the subtree of `parent_id` only.
    pub fn add_child(&self, parent_id: &str, locator: &str, element: MockElement) {
        let mut state = self.state.lock().unwrap();
        state.by_id.insert(element.id.clone(), element.clone());
        state
            .subtrees
            .entry(parent_id.to_string())
            .or_default()
            .entry(locator.to_string())
            .or_default()
            .push(element);
    }

    /// The locator fails its first `probes` find calls, then resolves.
    pub fn appear_after(&self, locator: &str, probes: u32) {
        self.state
            .lock()
            .unwrap()
            .appear_after
            .insert(locator.to_string(), probes);
    }

    /// The locator stays unresolved until `swipes` swipe gestures have been
    /// performed.
    pub fn reveal_after_swipes(&self, locator: &str, swipes: u32) {
        self.state
            .lock()
            .unwrap()
            .reveal_after_swipes
            .insert(locator.to_string(), swipes);
    }

    /// The locator's first `count` find calls fail with a stale reference.
    pub fn stale_finds(&self, locator: &str, count: u32) {
        self.state
            .lock()
            .unwrap()
            .stale_finds
            .insert(locator.to_string(), count);
    }

    /// Interactions with the given handle fail with a stale reference while
    /// state checks still succeed.
    pub fn stale_on_use(&self, id: &str) {
        self.state.lock().unwrap().stale_on_use.push(id.to_string());
    }

    pub fn set_window(&self, width: i32, height: i32) {
        self.state.lock().unwrap().window = Size { width, height };
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn keys(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().keys.clone()
    }

    pub fn cleared(&self) -> Vec<String> {
        self.state.lock().unwrap().cleared.clone()
    }

    pub fn gestures(&self) -> Vec<GestureSequence> {
        self.state.lock().unwrap().gestures.clone()
    }

    /// How many swipe gestures (sequences containing a pause-drag) were
    /// performed.
    pub fn swipe_count(&self) -> u32 {
        self.state.lock().unwrap().swipes
    }

    /// How many find calls the locator has received.
    pub fn find_count(&self, locator: &str) -> u32 {
        self.state
            .lock()
            .unwrap()
            .find_counts
            .get(locator)
            .copied()
            .unwrap_or(0)
    }

    fn resolve_locator(&self, locator: &str) -> Result<Vec<ElementHandle>, Error> {
        let mut state = self.state.lock().unwrap();
        let seen = state.find_counts.entry(locator.to_string()).or_default();
        *seen += 1;
        let seen = *seen;

        if let Some(&stale) = state.stale_finds.get(locator) {
            if seen <= stale {
                return Err(Error::StaleReference);
            }
        }
        if let Some(&probes) = state.appear_after.get(locator) {
            if seen <= probes {
                return Ok(vec![]);
            }
        }
        if let Some(&swipes) = state.reveal_after_swipes.get(locator) {
            if state.swipes < swipes {
                return Ok(vec![]);
            }
        }
        Ok(state
            .elements
            .get(locator)
            .map(|els| els.iter().map(|e| ElementHandle::new(&e.id)).collect())
            .unwrap_or_default())
    }

    fn element(&self, handle: &ElementHandle) -> Result<MockElement, Error> {
        self.state
            .lock()
            .unwrap()
            .by_id
            .get(handle.id())
            .cloned()
            .ok_or_else(|| Error::Backend(format!("unknown element '{}'", handle.id())))
    }

    fn check_stale(&self, handle: &ElementHandle) -> Result<(), Error> {
        if self
            .state
            .lock()
            .unwrap()
            .stale_on_use
            .iter()
            .any(|id| id == handle.id())
        {
            return Err(Error::StaleReference);
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn find_one(&self, query: &Query) -> Result<ElementHandle, Error> {
        self.resolve_locator(&query.locator)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::ElementNotFound(query.to_string()))
    }

    async fn find_all(&self, query: &Query) -> Result<Vec<ElementHandle>, Error> {
        self.resolve_locator(&query.locator)
    }

    async fn find_all_within(
        &self,
        parent: &ElementHandle,
        query: &Query,
    ) -> Result<Vec<ElementHandle>, Error> {
        let state = self.state.lock().unwrap();
        Ok(state
            .subtrees
            .get(parent.id())
            .and_then(|scoped| scoped.get(&query.locator))
            .map(|els| els.iter().map(|e| ElementHandle::new(&e.id)).collect())
            .unwrap_or_default())
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), Error> {
        self.check_stale(element)?;
        self.element(element)?;
        self.state
            .lock()
            .unwrap()
            .clicks
            .push(element.id().to_string());
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), Error> {
        self.check_stale(element)?;
        self.element(element)?;
        self.state
            .lock()
            .unwrap()
            .keys
            .push((element.id().to_string(), text.to_string()));
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), Error> {
        self.check_stale(element)?;
        self.element(element)?;
        self.state
            .lock()
            .unwrap()
            .cleared
            .push(element.id().to_string());
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, Error> {
        self.check_stale(element)?;
        Ok(self.element(element)?.text)
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, Error> {
        Ok(self.element(element)?.displayed)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool, Error> {
        Ok(self.element(element)?.enabled)
    }

    async fn is_selected(&self, element: &ElementHandle) -> Result<bool, Error> {
        Ok(self.element(element)?.selected)
    }

    async fn location(&self, element: &ElementHandle) -> Result<Point, Error> {
        Ok(self.element(element)?.location)
    }

    async fn window_size(&self) -> Result<Size, Error> {
        Ok(self.state.lock().unwrap().window)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, Error> {
        Ok(FAKE_JPEG.to_vec())
    }

    async fn perform_gesture(&self, gesture: &GestureSequence) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        let is_swipe = gesture
            .steps()
            .iter()
            .any(|step| matches!(step, GestureStep::Pause { .. }));
        if is_swipe {
            state.swipes += 1;
        }
        state.gestures.push(gesture.clone());
        Ok(())
    }
}

/// An engine config with short waits, suitable for tests that run under
/// real (unpaused) time.
pub fn fast_config() -> EngineConfig {
    EngineConfig {
        default_wait_secs: 0,
        long_wait_secs: 0,
        short_wait_secs: 0,
        probe_wait_secs: 0,
        poll_interval_ms: 1,
        ..Default::default()
    }
}
