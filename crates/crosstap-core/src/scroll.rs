//! Scroll-search: alternate visibility probes with directional swipes until
//! the target scrolls into view or the attempt budget runs out.
//!
//! Each probe uses the short probe timeout rather than the standard wait, so
//! a target several screens away is reached quickly. An element visible on
//! probe *k* cost exactly *k − 1* swipe gestures; no gesture follows the
//! final failed probe.

use std::time::Duration;

use tracing::debug;

use crate::backend::{Backend, GestureSequence, Point, Size};
use crate::error::Error;
use crate::query::Query;
use crate::wait::{await_ready, ReadyCondition};

/// Which way the content moves into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Reveal content below the viewport (finger drags upward).
    Down,
    /// Reveal content above the viewport (finger drags downward).
    Up,
}

/// Tuning for one scroll search.
#[derive(Debug, Clone, Copy)]
pub struct ScrollOptions {
    /// Per-probe visibility wait.
    pub probe_timeout: Duration,
    /// Poll interval within each probe.
    pub poll_interval: Duration,
    /// Visibility probe budget.
    pub max_attempts: u32,
}

/// Builds the directional swipe for the current window dimensions.
///
/// A down-scroll drags the finger from 8/10 of the height up to 1/5; an
/// up-scroll runs the same track in reverse. Horizontal position is the
/// window midline.
fn swipe_for(direction: ScrollDirection, window: Size) -> GestureSequence {
    let x = window.width / 2;
    let lower = Point {
        x,
        y: window.height * 8 / 10,
    };
    let upper = Point {
        x,
        y: window.height / 5,
    };
    match direction {
        ScrollDirection::Down => GestureSequence::swipe(lower, upper),
        ScrollDirection::Up => GestureSequence::swipe(upper, lower),
    }
}

/// Scrolls until the query resolves to a visible element.
///
/// Returns the 1-based probe number on which the element was found. Fails
/// with [`Error::ElementNotFoundAfterScroll`] once `max_attempts` probes
/// have failed; the final failed probe is not followed by a gesture.
pub async fn scroll_until_visible(
    backend: &dyn Backend,
    query: &Query,
    direction: ScrollDirection,
    opts: ScrollOptions,
) -> Result<u32, Error> {
    scroll_search(backend, query, direction, opts, None).await
}

/// Text-qualified scroll search: narrows the query to elements matching
/// `text` before probing, and carries the text in the exhaustion error.
pub async fn scroll_until_visible_text(
    backend: &dyn Backend,
    query: &Query,
    text: &str,
    direction: ScrollDirection,
    opts: ScrollOptions,
) -> Result<u32, Error> {
    let narrowed = query.with_text(text);
    scroll_search(backend, &narrowed, direction, opts, Some(text.to_string())).await
}

async fn scroll_search(
    backend: &dyn Backend,
    query: &Query,
    direction: ScrollDirection,
    opts: ScrollOptions,
    search_text: Option<String>,
) -> Result<u32, Error> {
    for attempt in 1..=opts.max_attempts {
        match await_ready(
            backend,
            query,
            ReadyCondition::Visible,
            opts.probe_timeout,
            opts.poll_interval,
        )
        .await
        {
            Ok(_) => {
                debug!(%query, attempt, "scroll target visible");
                return Ok(attempt);
            }
            Err(e) if e.is_resolution_failure() => {
                if attempt == opts.max_attempts {
                    break;
                }
                let window = backend.window_size().await?;
                backend
                    .perform_gesture(&swipe_for(direction, window))
                    .await?;
            }
            Err(e) => return Err(e),
        }
    }
    Err(Error::ElementNotFoundAfterScroll {
        attempts: opts.max_attempts,
        search_text,
    })
}
