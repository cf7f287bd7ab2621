//! # crosstap-core
//!
//! Cross-platform mobile UI interaction engine.
//!
//! This crate sits between test code and a mobile automation backend
//! (UiAutomator2 on Android, XCUITest on iOS). Tests describe elements once
//! with platform-paired descriptors; the engine resolves them through the
//! active platform's backend, waits for readiness, retries transient
//! failures, scrolls targets into view, and records a numbered step log plus
//! failure screenshots along the way.
//!
//! ## Modules
//!
//! - [`query`] - Platform tags, the closed locator strategy table, and query objects
//! - [`descriptor`] - Platform-paired element descriptors and nested chains
//! - [`backend`] - The [`Backend`](backend::Backend) trait a driver session implements
//! - [`session`] - Per-thread platform and backend state
//! - [`wait`] - Readiness polling with timeout
//! - [`scroll`] - Scroll-search with directional swipes
//! - [`resolve`] - Single, indexed, and subtree-scoped resolution
//! - [`actions`] - The [`Ui`](actions::Ui) action executor
//! - [`diagnostics`] - Step log and failure artifact store
//! - [`config`] - Wait profiles and artifact settings (`~/.crosstap/config.json`)
//! - [`error`] - The engine error taxonomy
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use crosstap_core::actions::Ui;
//! use crosstap_core::config::EngineConfig;
//! use crosstap_core::descriptor::ElementDescriptor;
//! use crosstap_core::query::Platform;
//! # use crosstap_core::backend::Backend;
//! # async fn demo(backend: Arc<dyn Backend>) -> Result<(), crosstap_core::error::Error> {
//! let mut ui = Ui::new(EngineConfig::default());
//! ui.set_platform(Platform::Android);
//! ui.set_backend(Platform::Android, backend);
//!
//! let login = ElementDescriptor::new(
//!     "login-button",
//!     "id", "com.example:id/login",
//!     "accessibilityId", "login-button",
//! )?;
//! ui.click_with_wait(&login).await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod backend;
pub mod config;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod query;
pub mod resolve;
pub mod scroll;
pub mod session;
pub mod wait;

pub use actions::Ui;
pub use backend::Backend;
pub use descriptor::{ElementDescriptor, NestedChain};
pub use error::Error;
pub use query::{Platform, Query, Strategy};
