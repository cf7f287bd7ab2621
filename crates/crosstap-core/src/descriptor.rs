//! Platform-paired element descriptors and nested descriptor chains.
//!
//! An [`ElementDescriptor`] names one logical UI element and carries a
//! validated (strategy, locator) pair for each platform. Descriptors are
//! immutable once built; strategy names are checked against the closed
//! strategy table at construction time, so a typo fails fast instead of at
//! the first interaction.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::query::{Platform, Query, Strategy};

/// A validated (strategy, locator) pair for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformLocator {
    /// The locator strategy.
    pub strategy: Strategy,
    /// The strategy-specific locator string.
    pub locator: String,
}

/// A named, platform-paired locator definition for one logical UI element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Human-readable element name, used in log entries and artifact labels.
    pub name: String,
    android: PlatformLocator,
    ios: PlatformLocator,
}

impl ElementDescriptor {
    /// Builds a descriptor, validating both strategy names up front.
    ///
    /// Fails with [`Error::InvalidStrategy`] if either name is not a
    /// recognized capability of its platform's backend.
    pub fn new(
        name: impl Into<String>,
        android_strategy: &str,
        android_locator: impl Into<String>,
        ios_strategy: &str,
        ios_locator: impl Into<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            name: name.into(),
            android: PlatformLocator {
                strategy: Strategy::parse(Platform::Android, android_strategy)?,
                locator: android_locator.into(),
            },
            ios: PlatformLocator {
                strategy: Strategy::parse(Platform::Ios, ios_strategy)?,
                locator: ios_locator.into(),
            },
        })
    }

    /// The locator pair for the given platform.
    pub fn locator(&self, platform: Platform) -> &PlatformLocator {
        match platform {
            Platform::Android => &self.android,
            Platform::Ios => &self.ios,
        }
    }

    /// Builds the backend query for the given platform.
    ///
    /// Fails with [`Error::MissingLocator`] if the locator string for that
    /// platform is empty — a descriptor is only usable on a platform when
    /// its pair is populated.
    pub fn query(&self, platform: Platform) -> Result<Query, Error> {
        let pair = self.locator(platform);
        if pair.locator.is_empty() {
            return Err(Error::MissingLocator {
                name: self.name.clone(),
                platform,
            });
        }
        Ok(Query {
            platform,
            strategy: pair.strategy,
            locator: pair.locator.clone(),
        })
    }
}

/// One link in a nested chain: a descriptor plus the index to select within
/// the parent-scoped result set.
#[derive(Debug, Clone)]
pub struct NestedLink {
    /// The descriptor resolved within the previous link's subtree.
    pub descriptor: ElementDescriptor,
    /// Index into the scoped result set.
    pub index: usize,
}

/// An ordered parent → child → grandchild element reference.
///
/// The root is resolved against the full document; each subsequent link is
/// resolved scoped to the previous link's subtree. Depth is capped at three
/// levels (self, child, grandchild).
#[derive(Debug, Clone)]
pub struct NestedChain {
    root: ElementDescriptor,
    links: Vec<NestedLink>,
}

impl NestedChain {
    /// Maximum number of scoped links below the root.
    pub const MAX_LINKS: usize = 2;

    /// Starts a chain at the given root descriptor.
    pub fn root(descriptor: ElementDescriptor) -> Self {
        Self {
            root: descriptor,
            links: Vec::new(),
        }
    }

    /// Appends a child link. Fails with [`Error::ChainTooDeep`] when the
    /// chain already has its grandchild level.
    pub fn child(mut self, descriptor: ElementDescriptor, index: usize) -> Result<Self, Error> {
        if self.links.len() >= Self::MAX_LINKS {
            return Err(Error::ChainTooDeep {
                depth: self.depth() + 1,
                max: 1 + Self::MAX_LINKS,
            });
        }
        self.links.push(NestedLink { descriptor, index });
        Ok(self)
    }

    /// The root descriptor.
    pub fn root_descriptor(&self) -> &ElementDescriptor {
        &self.root
    }

    /// The scoped links below the root, in traversal order.
    pub fn links(&self) -> &[NestedLink] {
        &self.links
    }

    /// The descriptor naming the final element of the chain.
    pub fn leaf(&self) -> &ElementDescriptor {
        self.links
            .last()
            .map(|link| &link.descriptor)
            .unwrap_or(&self.root)
    }

    /// Total chain depth including the root (1..=3).
    pub fn depth(&self) -> usize {
        1 + self.links.len()
    }
}
