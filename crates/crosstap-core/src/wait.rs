//! Wait/retry controller: poll a readiness condition until it holds.
//!
//! [`await_ready`] is the single suspension point behind every `*_with_wait`
//! operation. It resolves the query and checks the condition on each poll;
//! absence and staleness during a poll are treated as "not ready yet" and
//! retried, while the overall deadline converts persistent non-readiness
//! into [`Error::Timeout`]. A handle that goes stale after the wait has
//! returned surfaces as [`Error::StaleReference`] from the action that uses
//! it.

use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::backend::{Backend, ElementHandle};
use crate::error::Error;
use crate::query::Query;

/// What "ready" means for a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyCondition {
    /// The element resolves at all.
    Exists,
    /// The element resolves and is displayed.
    Visible,
    /// The element resolves, is displayed, and is enabled.
    Clickable,
}

/// Polls until the condition holds for the query, returning the resolved
/// handle from the successful poll.
///
/// The condition is probed at least once even with a zero timeout. Polls
/// where the element is missing, not yet ready, or stale are retried after
/// `poll_interval`; backend faults and I/O errors abort immediately.
pub async fn await_ready(
    backend: &dyn Backend,
    query: &Query,
    condition: ReadyCondition,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<ElementHandle, Error> {
    let start = Instant::now();
    loop {
        if let Some(handle) = probe(backend, query, condition).await? {
            return Ok(handle);
        }
        let waited = start.elapsed();
        if waited >= timeout {
            trace!(%query, ?condition, waited_ms = waited.as_millis() as u64, "wait expired");
            return Err(Error::Timeout {
                waited_ms: waited.as_millis() as u64,
            });
        }
        tokio::time::sleep(poll_interval).await;
    }
}

/// Polls until the query no longer resolves to a displayed element.
///
/// Absent, stale, and hidden all count as gone; the check is satisfied
/// immediately for an element that never existed. Fails with
/// [`Error::Timeout`] if the element is still displayed at expiry.
pub async fn await_gone(
    backend: &dyn Backend,
    query: &Query,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<(), Error> {
    let start = Instant::now();
    loop {
        let displayed = match backend.find_one(query).await {
            Ok(handle) => check(backend.is_displayed(&handle).await)?,
            Err(Error::ElementNotFound(_)) | Err(Error::StaleReference) => false,
            Err(e) => return Err(e),
        };
        if !displayed {
            return Ok(());
        }
        let waited = start.elapsed();
        if waited >= timeout {
            trace!(%query, waited_ms = waited.as_millis() as u64, "absence wait expired");
            return Err(Error::Timeout {
                waited_ms: waited.as_millis() as u64,
            });
        }
        tokio::time::sleep(poll_interval).await;
    }
}

/// One resolution-plus-condition check. `Ok(None)` means "not ready yet".
async fn probe(
    backend: &dyn Backend,
    query: &Query,
    condition: ReadyCondition,
) -> Result<Option<ElementHandle>, Error> {
    let handle = match backend.find_one(query).await {
        Ok(handle) => handle,
        Err(Error::ElementNotFound(_)) | Err(Error::StaleReference) => return Ok(None),
        Err(e) => return Err(e),
    };

    let ready = match condition {
        ReadyCondition::Exists => true,
        ReadyCondition::Visible => check(backend.is_displayed(&handle).await)?,
        ReadyCondition::Clickable => {
            check(backend.is_displayed(&handle).await)? && check(backend.is_enabled(&handle).await)?
        }
    };
    Ok(ready.then_some(handle))
}

/// Stale during a state check means the screen moved under us; treat the
/// probe as not ready and re-resolve on the next poll.
fn check(result: Result<bool, Error>) -> Result<bool, Error> {
    match result {
        Ok(value) => Ok(value),
        Err(Error::StaleReference) => Ok(false),
        Err(e) => Err(e),
    }
}
