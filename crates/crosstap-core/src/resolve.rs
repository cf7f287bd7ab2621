//! Descriptor resolution: single, indexed, and nested lookups.
//!
//! Nested resolution walks a [`NestedChain`] level by level. The root is
//! resolved against the full document; every subsequent link is resolved
//! with a subtree-scoped query against the previous level's handle, so a
//! child locator can never match an element outside its parent.

use tracing::trace;

use crate::backend::{Backend, ElementHandle};
use crate::descriptor::NestedChain;
use crate::error::Error;
use crate::query::{Platform, Query};

/// Resolves the first match for the query.
pub async fn resolve_single(backend: &dyn Backend, query: &Query) -> Result<ElementHandle, Error> {
    backend.find_one(query).await
}

/// Resolves the `index`-th match for the query, bounds-checked against the
/// full result set.
pub async fn resolve_indexed(
    backend: &dyn Backend,
    query: &Query,
    index: usize,
) -> Result<ElementHandle, Error> {
    let matches = backend.find_all(query).await?;
    let len = matches.len();
    matches
        .into_iter()
        .nth(index)
        .ok_or(Error::IndexOutOfRange { index, len })
}

/// Resolves a nested chain to its leaf element.
///
/// The root link is indexed against the whole document only when the chain
/// is a bare root; scoped links are indexed within their parent's subtree.
pub async fn resolve_nested(
    backend: &dyn Backend,
    platform: Platform,
    chain: &NestedChain,
) -> Result<ElementHandle, Error> {
    let root_query = chain.root_descriptor().query(platform)?;
    let mut current = resolve_single(backend, &root_query).await?;
    trace!(root = %chain.root_descriptor().name, depth = chain.depth(), "nested resolve");

    for link in chain.links() {
        let query = link.descriptor.query(platform)?;
        let scoped = backend.find_all_within(&current, &query).await?;
        let len = scoped.len();
        current = scoped
            .into_iter()
            .nth(link.index)
            .ok_or(Error::IndexOutOfRange {
                index: link.index,
                len,
            })?;
    }
    Ok(current)
}
