//! Backend trait for platform-agnostic UI automation.
//!
//! This module defines the [`Backend`] trait, the interface the engine
//! expects from a driver session provider (e.g. the UiAutomator2 or XCUITest
//! session behind an automation server). The engine is written once against
//! this trait; platform branching lives in the session context, not in the
//! operations.
//!
//! Element references are opaque [`ElementHandle`]s minted by the backend.
//! A handle may go stale if the screen changes; backends report that as
//! [`Error::StaleReference`](crate::error::Error::StaleReference), which the
//! wait controller treats as "re-resolve on next poll" and actions surface
//! to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::query::Query;

/// Opaque backend reference to a resolved element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    /// Wraps a backend element id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw backend id.
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate in screen points.
    pub x: i32,
    /// Y-coordinate in screen points.
    pub y: i32,
}

/// Screen or element dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in screen points.
    pub width: i32,
    /// Height in screen points.
    pub height: i32,
}

/// One step of a pointer gesture sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GestureStep {
    /// Move the pointer to a viewport position over `duration_ms`.
    MoveTo {
        /// Target x-coordinate.
        x: i32,
        /// Target y-coordinate.
        y: i32,
        /// Movement duration in milliseconds (0 = instant).
        duration_ms: u64,
    },
    /// Press the pointer down at its current position.
    Down,
    /// Hold the pointer still.
    Pause {
        /// Pause duration in milliseconds.
        ms: u64,
    },
    /// Release the pointer.
    Up,
}

/// An ordered pointer gesture (down/move/pause/up), performed atomically by
/// the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureSequence(pub Vec<GestureStep>);

/// How long the finger rests before dragging, in milliseconds.
const PRESS_PAUSE_MS: u64 = 600;

/// How long the drag itself takes, in milliseconds.
const DRAG_MS: u64 = 600;

impl GestureSequence {
    /// A single tap at the given point.
    pub fn tap(at: Point) -> Self {
        Self(vec![
            GestureStep::MoveTo {
                x: at.x,
                y: at.y,
                duration_ms: 0,
            },
            GestureStep::Down,
            GestureStep::Up,
        ])
    }

    /// A press-pause-drag swipe from one point to another.
    ///
    /// The finger lands on `from`, rests briefly so the platform does not
    /// interpret the gesture as a fling, then drags to `to` and lifts.
    pub fn swipe(from: Point, to: Point) -> Self {
        Self(vec![
            GestureStep::MoveTo {
                x: from.x,
                y: from.y,
                duration_ms: 0,
            },
            GestureStep::Down,
            GestureStep::Pause { ms: PRESS_PAUSE_MS },
            GestureStep::MoveTo {
                x: to.x,
                y: to.y,
                duration_ms: DRAG_MS,
            },
            GestureStep::Up,
        ])
    }

    /// The steps in order.
    pub fn steps(&self) -> &[GestureStep] {
        &self.0
    }

    /// The final pointer position of the sequence, if any move step exists.
    pub fn end_point(&self) -> Option<Point> {
        self.0.iter().rev().find_map(|step| match step {
            GestureStep::MoveTo { x, y, .. } => Some(Point { x: *x, y: *y }),
            _ => None,
        })
    }
}

/// Trait for a platform automation backend session.
///
/// One implementation exists per platform backend; the engine holds it as
/// `Arc<dyn Backend>` via the session context. All methods are async so
/// implementations can be network clients.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Resolves the first element matching the query within the full
    /// document. Fails with `ElementNotFound` when nothing matches.
    async fn find_one(&self, query: &Query) -> Result<ElementHandle, Error>;

    /// Resolves every element matching the query within the full document.
    /// An empty result set is `Ok(vec![])`, not an error.
    async fn find_all(&self, query: &Query) -> Result<Vec<ElementHandle>, Error>;

    /// Resolves every element matching the query **within the subtree of
    /// `parent`**. Must never match an element outside that subtree.
    async fn find_all_within(
        &self,
        parent: &ElementHandle,
        query: &Query,
    ) -> Result<Vec<ElementHandle>, Error>;

    /// Clicks the element.
    async fn click(&self, element: &ElementHandle) -> Result<(), Error>;

    /// Types text into the element.
    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), Error>;

    /// Clears the element's text content.
    async fn clear(&self, element: &ElementHandle) -> Result<(), Error>;

    /// Reads the element's visible text.
    async fn text(&self, element: &ElementHandle) -> Result<String, Error>;

    /// Whether the element is currently displayed.
    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, Error>;

    /// Whether the element is enabled for interaction.
    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool, Error>;

    /// Whether the element is in a selected state.
    async fn is_selected(&self, element: &ElementHandle) -> Result<bool, Error>;

    /// The element's top-left corner in screen coordinates.
    async fn location(&self, element: &ElementHandle) -> Result<Point, Error>;

    /// The current window dimensions.
    async fn window_size(&self) -> Result<Size, Error>;

    /// Captures a raw screenshot of the current screen.
    async fn screenshot(&self) -> Result<Vec<u8>, Error>;

    /// Performs a pointer gesture sequence.
    async fn perform_gesture(&self, gesture: &GestureSequence) -> Result<(), Error>;
}
