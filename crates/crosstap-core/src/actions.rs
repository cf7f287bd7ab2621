//! Action executor: the outward-facing interaction surface.
//!
//! [`Ui`] owns one session context, step log, artifact store, and config.
//! One instance belongs to one test thread; nothing here is shared or
//! locked.
//!
//! Two failure policies exist:
//!
//! - **Strict** operations log the failure, attempt a screenshot artifact
//!   under `{root}/{platform}/`, and return the original error. An artifact
//!   write failure is logged and discarded so it can never mask the error
//!   that triggered it.
//! - **Best-effort** operations (`if_*`, `try_*`) convert resolution
//!   failures (absent, timed out, stale, out of range) into sentinel return
//!   values. Backend faults and session misuse still raise. Mutating an
//!   element best-effort is an explicit opt-in through the `try_*` name.
//!
//! Every successful operation appends a human-readable step-log entry.

use std::sync::Arc;
use std::time::Duration;

use tracing::{instrument, warn};

use crate::backend::{Backend, ElementHandle, GestureSequence, Point};
use crate::config::EngineConfig;
use crate::descriptor::{ElementDescriptor, NestedChain};
use crate::diagnostics::{to_base64, ArtifactStore, StepLog};
use crate::error::Error;
use crate::query::{Platform, Query};
use crate::resolve::{resolve_indexed, resolve_nested};
use crate::scroll::{
    scroll_until_visible, scroll_until_visible_text, ScrollDirection, ScrollOptions,
};
use crate::session::SessionContext;
use crate::wait::{await_gone, await_ready, ReadyCondition};

/// Subdirectory for test-level failure captures.
const FAILS_SUBDIR: &str = "fails";

/// Direction of an element-anchored swipe.
#[derive(Debug, Clone, Copy)]
enum SwipeDirection {
    Left,
    Right,
    Up,
}

impl SwipeDirection {
    fn name(self) -> &'static str {
        match self {
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
            SwipeDirection::Up => "up",
        }
    }
}

/// Which element state a strict check reads.
#[derive(Debug, Clone, Copy)]
enum StateProbe {
    Displayed,
    Enabled,
    Selected,
}

impl StateProbe {
    fn name(self) -> &'static str {
        match self {
            StateProbe::Displayed => "displayed",
            StateProbe::Enabled => "enabled",
            StateProbe::Selected => "selected",
        }
    }
}

/// The interaction engine for one test thread.
pub struct Ui {
    session: SessionContext,
    log: StepLog,
    artifacts: ArtifactStore,
    config: EngineConfig,
}

impl Ui {
    /// Builds an engine with the given configuration. The artifact store is
    /// rooted at the configured screenshot directory.
    pub fn new(config: EngineConfig) -> Self {
        let artifacts = ArtifactStore::new(config.screenshot_dir.clone());
        Self {
            session: SessionContext::new(),
            log: StepLog::new(),
            artifacts,
            config,
        }
    }

    /// Builds an engine with the configuration loaded from
    /// `~/.crosstap/config.json` (defaults when absent).
    pub fn from_default_config() -> Self {
        Self::new(EngineConfig::load())
    }

    /// Selects the active platform.
    pub fn set_platform(&mut self, platform: Platform) {
        self.session.set_platform(platform);
    }

    /// Selects the active platform from a string tag.
    pub fn set_platform_tag(&mut self, tag: &str) -> Result<(), Error> {
        self.session.set_platform_tag(tag)
    }

    /// Registers the backend session handle for a platform.
    pub fn set_backend(&mut self, platform: Platform, backend: Arc<dyn Backend>) {
        self.session.set_backend(platform, backend);
    }

    /// The step log accumulated so far.
    pub fn step_log(&self) -> &StepLog {
        &self.log
    }

    /// Clears the step log, resetting numbering.
    pub fn clear_step_log(&mut self) {
        self.log.clear();
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn scroll_options(&self) -> ScrollOptions {
        ScrollOptions {
            probe_timeout: self.config.probe_wait(),
            poll_interval: self.config.poll_interval(),
            max_attempts: self.config.max_scroll_attempts,
        }
    }

    /// Waits for the descriptor's element under the given condition.
    async fn ready(
        &self,
        element: &ElementDescriptor,
        condition: ReadyCondition,
        timeout: Duration,
    ) -> Result<ElementHandle, Error> {
        let backend = self.session.backend()?;
        let query = element.query(self.session.platform()?)?;
        await_ready(
            backend.as_ref(),
            &query,
            condition,
            timeout,
            self.config.poll_interval(),
        )
        .await
    }

    /// Strict failure path: log, attempt a platform-subdir artifact, return
    /// the original error.
    async fn on_failure(&mut self, label: &str, err: Error) -> Error {
        warn!(element = label, error = %err, "operation failed");
        if let (Ok(platform), Ok(backend)) = (self.session.platform(), self.session.backend()) {
            if let Err(artifact_err) = self
                .artifacts
                .capture_failure(backend.as_ref(), platform.tag(), label)
                .await
            {
                warn!(element = label, error = %artifact_err, "failure artifact not written");
            }
        }
        err
    }

    // --- strict resolution ------------------------------------------------

    /// Waits for the element to exist and returns its handle.
    #[instrument(skip_all, fields(element = %element.name))]
    pub async fn find(&mut self, element: &ElementDescriptor) -> Result<ElementHandle, Error> {
        match self
            .ready(element, ReadyCondition::Exists, self.config.default_wait())
            .await
        {
            Ok(handle) => {
                self.log.append(format!("Found {}", element.name));
                Ok(handle)
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// Counts how many elements currently match the descriptor. Zero is a
    /// valid answer, not an error.
    pub async fn find_all_count(&mut self, element: &ElementDescriptor) -> Result<usize, Error> {
        let result = async {
            let backend = self.session.backend()?;
            let query = element.query(self.session.platform()?)?;
            Ok(backend.find_all(&query).await?.len())
        }
        .await;
        match result {
            Ok(count) => {
                self.log
                    .append(format!("Counted {count} match(es) for {}", element.name));
                Ok(count)
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    // --- strict interaction ----------------------------------------------

    /// Waits until the element is clickable, then clicks it.
    #[instrument(skip_all, fields(element = %element.name))]
    pub async fn click_with_wait(&mut self, element: &ElementDescriptor) -> Result<(), Error> {
        let result = async {
            let handle = self
                .ready(element, ReadyCondition::Clickable, self.config.default_wait())
                .await?;
            self.session.backend()?.click(&handle).await
        }
        .await;
        match result {
            Ok(()) => {
                self.log.append(format!("Clicked on {}", element.name));
                Ok(())
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// Waits until the element is visible, then types into it.
    #[instrument(skip_all, fields(element = %element.name))]
    pub async fn send_text_with_wait(
        &mut self,
        element: &ElementDescriptor,
        text: &str,
    ) -> Result<(), Error> {
        let result = async {
            let handle = self
                .ready(element, ReadyCondition::Visible, self.config.default_wait())
                .await?;
            self.session.backend()?.send_keys(&handle, text).await
        }
        .await;
        match result {
            Ok(()) => {
                self.log
                    .append(format!("Entered text '{text}' in {}", element.name));
                Ok(())
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// Waits until the element is visible, then sends the enter key.
    pub async fn send_enter_with_wait(&mut self, element: &ElementDescriptor) -> Result<(), Error> {
        let result = async {
            let handle = self
                .ready(element, ReadyCondition::Visible, self.config.default_wait())
                .await?;
            self.session.backend()?.send_keys(&handle, "\n").await
        }
        .await;
        match result {
            Ok(()) => {
                self.log.append(format!("Sent enter to {}", element.name));
                Ok(())
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// Waits until the element is visible, then clears its text.
    pub async fn clear_text_with_wait(&mut self, element: &ElementDescriptor) -> Result<(), Error> {
        let result = async {
            let handle = self
                .ready(element, ReadyCondition::Visible, self.config.default_wait())
                .await?;
            self.session.backend()?.clear(&handle).await
        }
        .await;
        match result {
            Ok(()) => {
                self.log.append(format!("Cleared text in {}", element.name));
                Ok(())
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// Waits until the element is visible, then reads its text.
    #[instrument(skip_all, fields(element = %element.name))]
    pub async fn get_text_with_wait(
        &mut self,
        element: &ElementDescriptor,
    ) -> Result<String, Error> {
        let result = async {
            let handle = self
                .ready(element, ReadyCondition::Visible, self.config.default_wait())
                .await?;
            self.session.backend()?.text(&handle).await
        }
        .await;
        match result {
            Ok(text) => {
                self.log
                    .append(format!("Read text '{text}' from {}", element.name));
                Ok(text)
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    // --- text-qualified interaction ----------------------------------------

    /// The descriptor's query narrowed to elements matching `text`.
    fn text_query(&self, element: &ElementDescriptor, text: &str) -> Result<Query, Error> {
        Ok(element.query(self.session.platform()?)?.with_text(text))
    }

    /// Waits for an element of the descriptor's kind matching `text` to
    /// exist and returns its handle.
    #[instrument(skip_all, fields(element = %element.name, text))]
    pub async fn find_with_text(
        &mut self,
        element: &ElementDescriptor,
        text: &str,
    ) -> Result<ElementHandle, Error> {
        let result = async {
            let backend = self.session.backend()?;
            let query = self.text_query(element, text)?;
            await_ready(
                backend.as_ref(),
                &query,
                ReadyCondition::Exists,
                self.config.default_wait(),
                self.config.poll_interval(),
            )
            .await
        }
        .await;
        match result {
            Ok(handle) => {
                self.log
                    .append(format!("Found {} with text '{text}'", element.name));
                Ok(handle)
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// Waits until an element of the descriptor's kind matching `text` is
    /// clickable, then clicks it.
    #[instrument(skip_all, fields(element = %element.name, text))]
    pub async fn click_with_text(
        &mut self,
        element: &ElementDescriptor,
        text: &str,
    ) -> Result<(), Error> {
        let result = async {
            let backend = self.session.backend()?;
            let query = self.text_query(element, text)?;
            let handle = await_ready(
                backend.as_ref(),
                &query,
                ReadyCondition::Clickable,
                self.config.default_wait(),
                self.config.poll_interval(),
            )
            .await?;
            backend.click(&handle).await
        }
        .await;
        match result {
            Ok(()) => {
                self.log
                    .append(format!("Clicked on {} with text '{text}'", element.name));
                Ok(())
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// Clicks the `index`-th element of the descriptor's kind matching
    /// `text`, bounds-checked against the narrowed result set.
    pub async fn click_with_text_at_index(
        &mut self,
        element: &ElementDescriptor,
        text: &str,
        index: usize,
    ) -> Result<(), Error> {
        let result = async {
            let backend = self.session.backend()?;
            let query = self.text_query(element, text)?;
            await_ready(
                backend.as_ref(),
                &query,
                ReadyCondition::Exists,
                self.config.default_wait(),
                self.config.poll_interval(),
            )
            .await?;
            let handle = resolve_indexed(backend.as_ref(), &query, index).await?;
            backend.click(&handle).await
        }
        .await;
        match result {
            Ok(()) => {
                self.log.append(format!(
                    "Clicked on {}[{index}] with text '{text}'",
                    element.name
                ));
                Ok(())
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    // --- strict state checks ----------------------------------------------

    /// Waits for the element to exist, then reports whether it is displayed.
    pub async fn is_displayed(&mut self, element: &ElementDescriptor) -> Result<bool, Error> {
        self.state_check(element, StateProbe::Displayed).await
    }

    /// Waits for the element to exist, then reports whether it is enabled.
    pub async fn is_enabled(&mut self, element: &ElementDescriptor) -> Result<bool, Error> {
        self.state_check(element, StateProbe::Enabled).await
    }

    /// Waits for the element to exist, then reports whether it is selected.
    pub async fn is_selected(&mut self, element: &ElementDescriptor) -> Result<bool, Error> {
        self.state_check(element, StateProbe::Selected).await
    }

    async fn state_check(
        &mut self,
        element: &ElementDescriptor,
        probe: StateProbe,
    ) -> Result<bool, Error> {
        let result = async {
            let handle = self
                .ready(element, ReadyCondition::Exists, self.config.default_wait())
                .await?;
            let backend = self.session.backend()?;
            match probe {
                StateProbe::Displayed => backend.is_displayed(&handle).await,
                StateProbe::Enabled => backend.is_enabled(&handle).await,
                StateProbe::Selected => backend.is_selected(&handle).await,
            }
        }
        .await;
        match result {
            Ok(value) => {
                self.log.append(format!(
                    "Checked {} is {}: {value}",
                    element.name,
                    probe.name()
                ));
                Ok(value)
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// Waits for the result set to populate, then reports whether the
    /// `index`-th match is enabled.
    pub async fn is_enabled_at_index(
        &mut self,
        element: &ElementDescriptor,
        index: usize,
    ) -> Result<bool, Error> {
        let result = async {
            self.ready(element, ReadyCondition::Exists, self.config.default_wait())
                .await?;
            let backend = self.session.backend()?;
            let query = element.query(self.session.platform()?)?;
            let handle = resolve_indexed(backend.as_ref(), &query, index).await?;
            backend.is_enabled(&handle).await
        }
        .await;
        match result {
            Ok(value) => {
                self.log.append(format!(
                    "Checked {}[{index}] is enabled: {value}",
                    element.name
                ));
                Ok(value)
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// The element's top-left corner in screen coordinates.
    pub async fn location(&mut self, element: &ElementDescriptor) -> Result<Point, Error> {
        let result = async {
            let handle = self
                .ready(element, ReadyCondition::Exists, self.config.default_wait())
                .await?;
            self.session.backend()?.location(&handle).await
        }
        .await;
        match result {
            Ok(point) => {
                self.log.append(format!(
                    "Located {} at ({}, {})",
                    element.name, point.x, point.y
                ));
                Ok(point)
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    // --- gestures ----------------------------------------------------------

    /// Taps at absolute screen coordinates.
    pub async fn tap_at(&mut self, x: i32, y: i32) -> Result<(), Error> {
        let result = async {
            let backend = self.session.backend()?;
            backend
                .perform_gesture(&GestureSequence::tap(Point { x, y }))
                .await
        }
        .await;
        match result {
            Ok(()) => {
                self.log.append(format!("Tapped at ({x}, {y})"));
                Ok(())
            }
            Err(e) => Err(self.on_failure("tap", e).await),
        }
    }

    /// Swipes left across the element's row.
    pub async fn swipe_element_left(&mut self, element: &ElementDescriptor) -> Result<(), Error> {
        self.swipe_element(element, SwipeDirection::Left).await
    }

    /// Swipes right across the element's row.
    pub async fn swipe_element_right(&mut self, element: &ElementDescriptor) -> Result<(), Error> {
        self.swipe_element(element, SwipeDirection::Right).await
    }

    /// Swipes upward starting from the element.
    pub async fn swipe_element_up(&mut self, element: &ElementDescriptor) -> Result<(), Error> {
        self.swipe_element(element, SwipeDirection::Up).await
    }

    async fn swipe_element(
        &mut self,
        element: &ElementDescriptor,
        direction: SwipeDirection,
    ) -> Result<(), Error> {
        let result = async {
            let handle = self
                .ready(element, ReadyCondition::Visible, self.config.default_wait())
                .await?;
            let backend = self.session.backend()?;
            let anchor = backend.location(&handle).await?;
            let window = backend.window_size().await?;
            let target = match direction {
                SwipeDirection::Left => Point {
                    x: window.width / 10,
                    y: anchor.y,
                },
                SwipeDirection::Right => Point {
                    x: window.width * 9 / 10,
                    y: anchor.y,
                },
                SwipeDirection::Up => Point {
                    x: anchor.x,
                    y: window.height / 5,
                },
            };
            backend
                .perform_gesture(&GestureSequence::swipe(anchor, target))
                .await
        }
        .await;
        match result {
            Ok(()) => {
                self.log
                    .append(format!("Swiped {} on {}", direction.name(), element.name));
                Ok(())
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    // --- scroll search ------------------------------------------------------

    /// Scrolls down until the element is visible. Returns the 1-based probe
    /// number on which it was found.
    #[instrument(skip_all, fields(element = %element.name))]
    pub async fn scroll_to(&mut self, element: &ElementDescriptor) -> Result<u32, Error> {
        self.scroll_search(element, None, ScrollDirection::Down).await
    }

    /// Scrolls down until an element matching the descriptor's class and the
    /// given text is visible.
    pub async fn scroll_to_text(
        &mut self,
        element: &ElementDescriptor,
        text: &str,
    ) -> Result<u32, Error> {
        self.scroll_search(element, Some(text), ScrollDirection::Down)
            .await
    }

    /// Scrolls up until the element is visible.
    pub async fn scroll_up_to(&mut self, element: &ElementDescriptor) -> Result<u32, Error> {
        self.scroll_search(element, None, ScrollDirection::Up).await
    }

    async fn scroll_search(
        &mut self,
        element: &ElementDescriptor,
        text: Option<&str>,
        direction: ScrollDirection,
    ) -> Result<u32, Error> {
        let result = async {
            let backend = self.session.backend()?;
            let query = element.query(self.session.platform()?)?;
            let opts = self.scroll_options();
            match text {
                Some(text) => {
                    scroll_until_visible_text(backend.as_ref(), &query, text, direction, opts).await
                }
                None => scroll_until_visible(backend.as_ref(), &query, direction, opts).await,
            }
        }
        .await;
        match result {
            Ok(attempt) => {
                self.log.append(format!(
                    "Scrolled to {} in {attempt} attempt(s)",
                    element.name
                ));
                Ok(attempt)
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    // --- indexed interaction ------------------------------------------------

    /// Clicks the `index`-th match for the descriptor.
    pub async fn click_at_index(
        &mut self,
        element: &ElementDescriptor,
        index: usize,
    ) -> Result<(), Error> {
        let result = async {
            let handle = self.indexed(element, index).await?;
            self.session.backend()?.click(&handle).await
        }
        .await;
        match result {
            Ok(()) => {
                self.log
                    .append(format!("Clicked on {}[{index}]", element.name));
                Ok(())
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// Types into the `index`-th match for the descriptor.
    pub async fn send_text_at_index(
        &mut self,
        element: &ElementDescriptor,
        index: usize,
        text: &str,
    ) -> Result<(), Error> {
        let result = async {
            let handle = self.indexed(element, index).await?;
            self.session.backend()?.send_keys(&handle, text).await
        }
        .await;
        match result {
            Ok(()) => {
                self.log
                    .append(format!("Entered text '{text}' in {}[{index}]", element.name));
                Ok(())
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// Reads the text of the `index`-th match for the descriptor.
    pub async fn get_text_at_index(
        &mut self,
        element: &ElementDescriptor,
        index: usize,
    ) -> Result<String, Error> {
        let result = async {
            let handle = self.indexed(element, index).await?;
            self.session.backend()?.text(&handle).await
        }
        .await;
        match result {
            Ok(text) => {
                self.log
                    .append(format!("Read text '{text}' from {}[{index}]", element.name));
                Ok(text)
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// Clears the text of the `index`-th match for the descriptor.
    pub async fn clear_text_at_index(
        &mut self,
        element: &ElementDescriptor,
        index: usize,
    ) -> Result<(), Error> {
        let result = async {
            let handle = self.indexed(element, index).await?;
            self.session.backend()?.clear(&handle).await
        }
        .await;
        match result {
            Ok(()) => {
                self.log
                    .append(format!("Cleared text in {}[{index}]", element.name));
                Ok(())
            }
            Err(e) => Err(self.on_failure(&element.name, e).await),
        }
    }

    /// Waits for the result set to populate, then resolves the indexed
    /// match bounds-checked.
    async fn indexed(
        &self,
        element: &ElementDescriptor,
        index: usize,
    ) -> Result<ElementHandle, Error> {
        self.ready(element, ReadyCondition::Exists, self.config.default_wait())
            .await?;
        let backend = self.session.backend()?;
        let query = element.query(self.session.platform()?)?;
        resolve_indexed(backend.as_ref(), &query, index).await
    }

    // --- nested interaction ---------------------------------------------------

    /// Clicks a child element scoped within its parent's subtree.
    pub async fn click_within(
        &mut self,
        parent: &ElementDescriptor,
        child: &ElementDescriptor,
        index: usize,
    ) -> Result<(), Error> {
        let chain = NestedChain::root(parent.clone()).child(child.clone(), index)?;
        self.click_nested(&chain).await
    }

    /// Types into a child element scoped within its parent's subtree.
    pub async fn send_text_within(
        &mut self,
        parent: &ElementDescriptor,
        child: &ElementDescriptor,
        index: usize,
        text: &str,
    ) -> Result<(), Error> {
        let chain = NestedChain::root(parent.clone()).child(child.clone(), index)?;
        self.send_text_nested(&chain, text).await
    }

    /// Reads the text of a child element scoped within its parent's subtree.
    pub async fn get_text_within(
        &mut self,
        parent: &ElementDescriptor,
        child: &ElementDescriptor,
        index: usize,
    ) -> Result<String, Error> {
        let chain = NestedChain::root(parent.clone()).child(child.clone(), index)?;
        self.get_text_nested(&chain).await
    }

    /// Clicks the leaf of a nested chain.
    #[instrument(skip_all, fields(leaf = %chain.leaf().name))]
    pub async fn click_nested(&mut self, chain: &NestedChain) -> Result<(), Error> {
        let leaf = chain.leaf().name.clone();
        let result = async {
            let handle = self.nested(chain).await?;
            self.session.backend()?.click(&handle).await
        }
        .await;
        match result {
            Ok(()) => {
                self.log.append(format!("Clicked on {leaf}"));
                Ok(())
            }
            Err(e) => Err(self.on_failure(&leaf, e).await),
        }
    }

    /// Types into the leaf of a nested chain.
    pub async fn send_text_nested(
        &mut self,
        chain: &NestedChain,
        text: &str,
    ) -> Result<(), Error> {
        let leaf = chain.leaf().name.clone();
        let result = async {
            let handle = self.nested(chain).await?;
            self.session.backend()?.send_keys(&handle, text).await
        }
        .await;
        match result {
            Ok(()) => {
                self.log.append(format!("Entered text '{text}' in {leaf}"));
                Ok(())
            }
            Err(e) => Err(self.on_failure(&leaf, e).await),
        }
    }

    /// Reads the text of the leaf of a nested chain.
    pub async fn get_text_nested(&mut self, chain: &NestedChain) -> Result<String, Error> {
        let leaf = chain.leaf().name.clone();
        let result = async {
            let handle = self.nested(chain).await?;
            self.session.backend()?.text(&handle).await
        }
        .await;
        match result {
            Ok(text) => {
                self.log.append(format!("Read text '{text}' from {leaf}"));
                Ok(text)
            }
            Err(e) => Err(self.on_failure(&leaf, e).await),
        }
    }

    /// Waits for the root, then resolves the chain leaf.
    async fn nested(&self, chain: &NestedChain) -> Result<ElementHandle, Error> {
        self.ready(
            chain.root_descriptor(),
            ReadyCondition::Exists,
            self.config.default_wait(),
        )
        .await?;
        let backend = self.session.backend()?;
        resolve_nested(backend.as_ref(), self.session.platform()?, chain).await
    }

    // --- best-effort -----------------------------------------------------------

    /// Reports whether the element becomes visible within the short wait.
    /// Absence is `Ok(false)`, never an error.
    pub async fn if_displayed(&mut self, element: &ElementDescriptor) -> Result<bool, Error> {
        let result = self
            .ready(element, ReadyCondition::Visible, self.config.short_wait())
            .await;
        self.sentinel_bool(element, "displayed", result.map(|_| ())).await
    }

    /// Reports whether an element matching the descriptor's class and the
    /// given text becomes visible within the short wait.
    pub async fn if_displayed_with_text(
        &mut self,
        element: &ElementDescriptor,
        text: &str,
    ) -> Result<bool, Error> {
        let result = async {
            let backend = self.session.backend()?;
            let query = self.text_query(element, text)?;
            await_ready(
                backend.as_ref(),
                &query,
                ReadyCondition::Visible,
                self.config.short_wait(),
                self.config.poll_interval(),
            )
            .await
            .map(|_| ())
        }
        .await;
        self.sentinel_bool(element, "displayed", result).await
    }

    /// Reports whether no element of the descriptor's kind matching `text`
    /// remains displayed by the end of the short wait. An element that was
    /// never there counts as gone; one still displayed at expiry yields
    /// `Ok(false)`, never an error.
    pub async fn if_not_displayed_with_text(
        &mut self,
        element: &ElementDescriptor,
        text: &str,
    ) -> Result<bool, Error> {
        let result = async {
            let backend = self.session.backend()?;
            let query = self.text_query(element, text)?;
            await_gone(
                backend.as_ref(),
                &query,
                self.config.short_wait(),
                self.config.poll_interval(),
            )
            .await
        }
        .await;
        match result {
            Ok(()) => {
                self.log.append(format!(
                    "Checked {} with text '{text}' is gone: true",
                    element.name
                ));
                Ok(true)
            }
            Err(e) if e.is_resolution_failure() => {
                self.log.append(format!(
                    "Checked {} with text '{text}' is gone: false",
                    element.name
                ));
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Clicks the element if it becomes clickable within the short wait.
    /// Returns whether the click happened.
    pub async fn try_click(&mut self, element: &ElementDescriptor) -> Result<bool, Error> {
        let result = async {
            let handle = self
                .ready(element, ReadyCondition::Clickable, self.config.short_wait())
                .await?;
            self.session.backend()?.click(&handle).await
        }
        .await;
        match result {
            Ok(()) => {
                self.log.append(format!("Clicked on {}", element.name));
                Ok(true)
            }
            Err(e) if e.is_resolution_failure() => {
                self.log
                    .append(format!("Skipped click on absent {}", element.name));
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Types into the element if it becomes visible within the short wait.
    /// Returns whether the text was sent.
    pub async fn try_send_text(
        &mut self,
        element: &ElementDescriptor,
        text: &str,
    ) -> Result<bool, Error> {
        let result = async {
            let handle = self
                .ready(element, ReadyCondition::Visible, self.config.short_wait())
                .await?;
            self.session.backend()?.send_keys(&handle, text).await
        }
        .await;
        match result {
            Ok(()) => {
                self.log
                    .append(format!("Entered text '{text}' in {}", element.name));
                Ok(true)
            }
            Err(e) if e.is_resolution_failure() => {
                self.log
                    .append(format!("Skipped text entry in absent {}", element.name));
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Reads the element's text if it becomes visible within the short wait.
    /// Absence yields `Ok(None)`.
    pub async fn try_get_text(
        &mut self,
        element: &ElementDescriptor,
    ) -> Result<Option<String>, Error> {
        let result = async {
            let handle = self
                .ready(element, ReadyCondition::Visible, self.config.short_wait())
                .await?;
            self.session.backend()?.text(&handle).await
        }
        .await;
        match result {
            Ok(text) => {
                self.log
                    .append(format!("Read text '{text}' from {}", element.name));
                Ok(Some(text))
            }
            Err(e) if e.is_resolution_failure() => {
                self.log
                    .append(format!("No text read from absent {}", element.name));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn sentinel_bool(
        &mut self,
        element: &ElementDescriptor,
        what: &str,
        result: Result<(), Error>,
    ) -> Result<bool, Error> {
        match result {
            Ok(()) => {
                self.log
                    .append(format!("Checked {} is {what}: true", element.name));
                Ok(true)
            }
            Err(e) if e.is_resolution_failure() => {
                self.log
                    .append(format!("Checked {} is {what}: false", element.name));
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    // --- diagnostics ------------------------------------------------------------

    /// Captures a test-level failure screenshot under `{root}/fails/` and
    /// returns it base64-encoded.
    pub async fn capture_test_failure(&mut self, test_name: &str) -> Result<String, Error> {
        let backend = self.session.backend()?;
        let bytes = self
            .artifacts
            .capture_failure(backend.as_ref(), FAILS_SUBDIR, test_name)
            .await?;
        self.log
            .append(format!("Captured failure screenshot for {test_name}"));
        Ok(to_base64(&bytes))
    }

    /// Removes failure artifacts older than the configured retention.
    pub fn prune_artifacts(&self) -> Result<u64, Error> {
        self.artifacts.prune_older_than(self.config.retention_days)
    }
}
