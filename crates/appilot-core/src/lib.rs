//! # appilot-core
//!
//! Core library for fluent mobile UI test automation.
//!
//! This crate gives test authors a chainable facade over an abstract mobile
//! UI driver: tap, type, swipe, scroll-until-visible, and polled presence
//! checks against a remote device session. The two load-bearing subsystems
//! are the session-bootstrap retry machinery and the gesture geometry engine
//! that computes swipe coordinates and corrects for platform-specific
//! coordinate semantics.
//!
//! ## Modules
//!
//! - [`config`] - Immutable per-run configuration (platform, endpoint, retries, timeouts)
//! - [`capabilities`] - Capability-map derivation for session creation
//! - [`driver`] - The abstract driver and driver-factory capability surface
//! - [`element`] - Selectors, element handles, and the `Target` resolution seam
//! - [`geometry`] - Pure gesture geometry: directions, corners, clamping, relativization
//! - [`gesture`] - Touch-sequence dispatch (press/long-press, move, release)
//! - [`search`] - Scroll-until-visible swipe search
//! - [`session`] - Session ownership and bounded-retry bootstrap
//! - [`shutdown`] - Best-effort quit-on-exit registry
//! - [`automator`] - The fluent facade tying it all together
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use appilot_core::automator::Automator;
//! use appilot_core::config::AutomationConfig;
//! use appilot_core::driver::DriverFactory;
//! use appilot_core::element::Selector;
//! use appilot_core::geometry::Direction;
//!
//! async fn smoke(config: AutomationConfig, factory: Arc<dyn DriverFactory>) {
//!     let mut app = Automator::start(config, factory).await.unwrap();
//!     app.tap(&Selector::id("menu")).await.unwrap();
//!     app.scroll_down().await.unwrap();
//!     if let Some(row) = app
//!         .swipe_to_from(Direction::Up, &Selector::text("Settings"))
//!         .await
//!         .unwrap()
//!     {
//!         app.tap(&row).await.unwrap();
//!     }
//!     app.quit().await;
//! }
//! ```

pub mod automator;
pub mod capabilities;
pub mod config;
pub mod driver;
pub mod element;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod search;
pub mod session;
pub mod shutdown;
