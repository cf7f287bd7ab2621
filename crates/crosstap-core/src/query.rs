//! Locator strategy table: platform tags, strategy names, and query objects.
//!
//! A [`Query`] is the backend-specific form of an element locator. It is
//! built from a platform tag, a strategy name, and a locator string. The
//! strategy table is a closed mapping — every recognized strategy is an enum
//! variant, validated when the descriptor is constructed rather than when
//! the query is used.
//!
//! Two families exist per platform:
//!
//! - the **plain** family (`xpath` on both platforms) builds structural-path
//!   queries;
//! - the **extended** family covers backend-specific queries: Android
//!   `uiautomator` / `accessibilityId` / `id`, iOS `nsPredicate` /
//!   `classChain` / `accessibilityId`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The mobile platform a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android, driven through the UiAutomator2 backend.
    Android,
    /// iOS, driven through the XCUITest backend.
    Ios,
}

impl Platform {
    /// Short lowercase tag, used in artifact paths and log lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        if s.eq_ignore_ascii_case("android") {
            Ok(Platform::Android)
        } else if s.eq_ignore_ascii_case("ios") {
            Ok(Platform::Ios)
        } else {
            Err(Error::InvalidPlatform(s.to_string()))
        }
    }
}

/// A recognized locator strategy for one platform.
///
/// The set is closed and exhaustively enumerable; unknown names fail with
/// [`Error::InvalidStrategy`] at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Structural-path query (the plain family, both platforms).
    Xpath,
    /// Android UiAutomator selector expression.
    UiAutomator,
    /// Accessibility identifier (both platforms).
    AccessibilityId,
    /// Android resource id.
    Id,
    /// iOS NSPredicate query string.
    NsPredicate,
    /// iOS class-chain query string.
    ClassChain,
}

impl Strategy {
    /// Looks up a strategy by name within the given platform's capability
    /// set.
    pub fn parse(platform: Platform, name: &str) -> Result<Self, Error> {
        let strategy = match (platform, name) {
            (_, "xpath") => Strategy::Xpath,
            (_, "accessibilityId") => Strategy::AccessibilityId,
            (Platform::Android, "uiautomator") => Strategy::UiAutomator,
            (Platform::Android, "id") => Strategy::Id,
            (Platform::Ios, "nsPredicate") => Strategy::NsPredicate,
            (Platform::Ios, "classChain") => Strategy::ClassChain,
            _ => {
                return Err(Error::InvalidStrategy {
                    platform,
                    name: name.to_string(),
                })
            }
        };
        Ok(strategy)
    }

    /// The canonical strategy name.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Xpath => "xpath",
            Strategy::UiAutomator => "uiautomator",
            Strategy::AccessibilityId => "accessibilityId",
            Strategy::Id => "id",
            Strategy::NsPredicate => "nsPredicate",
            Strategy::ClassChain => "classChain",
        }
    }

    /// Returns `true` for the plain (structural-path) query family.
    pub fn is_plain(&self) -> bool {
        matches!(self, Strategy::Xpath)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A backend-specific element query. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// The platform this query targets.
    pub platform: Platform,
    /// The locator strategy.
    pub strategy: Strategy,
    /// The strategy-specific locator string.
    pub locator: String,
}

impl Query {
    /// Builds a query, validating the strategy name against the platform's
    /// capability set.
    pub fn resolve(platform: Platform, strategy_name: &str, locator: &str) -> Result<Self, Error> {
        let strategy = Strategy::parse(platform, strategy_name)?;
        Ok(Self {
            platform,
            strategy,
            locator: locator.to_string(),
        })
    }

    /// Narrows the query to elements containing or matching `text`.
    ///
    /// For xpath the locator is treated as an element class and wrapped in a
    /// text predicate; for the extended iOS families the text is spliced
    /// into the predicate/chain expression; for accessibility-id and
    /// UiAutomator queries the text replaces the locator outright.
    pub fn with_text(&self, text: &str) -> Query {
        let locator = match (self.platform, self.strategy) {
            (Platform::Android, Strategy::Xpath) => {
                format!("(//{}[contains(@text, \"{}\")])", self.locator, text)
            }
            (Platform::Ios, Strategy::Xpath) => {
                format!("//{}[@name=\"{}\"]", self.locator, text)
            }
            (_, Strategy::NsPredicate) => {
                format!("type == \"{}\" AND name CONTAINS \"{}\"", self.locator, text)
            }
            (_, Strategy::ClassChain) => {
                format!("**/{}[`label CONTAINS \"{}\"`]", self.locator, text)
            }
            // accessibilityId, uiautomator, id: the text is the locator.
            _ => text.to_string(),
        };
        Query {
            platform: self.platform,
            strategy: self.strategy,
            locator,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.locator)
    }
}
