//! Driver capability surface.
//!
//! This module defines the [`MobileDriver`] trait — the abstract session,
//! lookup, and gesture protocol the core consumes — and the
//! [`DriverFactory`] trait through which platform-specific driver instances
//! are constructed. The core owns no wire format of its own; it is purely a
//! caller of these capabilities. Concrete implementations (a local driver
//! service, a remote hub client) live outside this crate.
//!
//! All methods are async and are awaited to completion in sequence; the core
//! never dispatches two driver calls concurrently for one session.

use async_trait::async_trait;
use thiserror::Error;

use crate::capabilities::Capabilities;
use crate::config::Endpoint;
use crate::element::{ElementRef, Rect, Selector};
use crate::geometry::{Point, ScreenSize};

/// Errors reported by a driver backend.
#[derive(Error, Debug)]
pub enum DriverError {
    /// No element matched the selector. Non-fatal for presence checks and
    /// swipe-search, which convert it to a negative result.
    #[error("Element not found: {0}")]
    NotFound(String),

    /// The driver could not create a session.
    #[error("Session not created: {0}")]
    SessionNotCreated(String),

    /// A command was dispatched and failed.
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// The connection to the driver endpoint was lost.
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// A driver-side operation timed out.
    #[error("Operation timed out")]
    Timeout,

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a touch sequence begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    /// A plain press.
    Press,
    /// A long press.
    LongPress,
}

/// Platform-specific biometric actions, expressed as one closed capability
/// interface rather than driver downcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricAction {
    /// Toggle Touch ID enrollment (iOS).
    EnrollTouchId(bool),
    /// Simulate a Touch ID scan; the flag is whether the finger matches (iOS).
    TouchId(bool),
    /// Scan the enrolled fingerprint with the given id (Android).
    FingerPrint(i32),
}

/// Abstract mobile UI driver bound to one live session.
///
/// Implementations are expected to be cheap to call repeatedly; the core
/// re-queries [`window_size`](MobileDriver::window_size) before every
/// gesture rather than caching it, because orientation and device state can
/// change between calls.
#[async_trait]
pub trait MobileDriver: Send + Sync {
    /// The driver-assigned session identifier, or `None` if the session is
    /// no longer active.
    async fn session_id(&self) -> Option<String>;

    /// Current screen/viewport size in pixels.
    async fn window_size(&self) -> Result<ScreenSize, DriverError>;

    /// Find a single element. Fails with [`DriverError::NotFound`] when
    /// nothing matches.
    async fn find_element(&self, selector: &Selector) -> Result<ElementRef, DriverError>;

    /// Find all matching elements; an empty list is not an error.
    async fn find_elements(&self, selector: &Selector) -> Result<Vec<ElementRef>, DriverError>;

    /// Whether the element is currently visible on screen.
    async fn is_displayed(&self, element: &ElementRef) -> Result<bool, DriverError>;

    /// Tap the element.
    async fn tap(&self, element: &ElementRef) -> Result<(), DriverError>;

    /// The element's text content.
    async fn element_text(&self, element: &ElementRef) -> Result<String, DriverError>;

    /// Replace the element's text content.
    async fn set_element_text(&self, element: &ElementRef, text: &str)
        -> Result<(), DriverError>;

    /// Read a named attribute, `None` if the element does not carry it.
    async fn element_attribute(
        &self,
        element: &ElementRef,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    /// The element's on-screen frame.
    async fn element_rect(&self, element: &ElementRef) -> Result<Rect, DriverError>;

    /// Dispatch one atomic touch sequence: press (or long-press) at `from`,
    /// wait `wait_millis`, move to `to`, release.
    async fn perform_gesture(
        &self,
        press: PressKind,
        from: Point,
        to: Point,
        wait_millis: u32,
    ) -> Result<(), DriverError>;

    /// Dismiss the on-screen keyboard if shown.
    async fn hide_keyboard(&self) -> Result<(), DriverError>;

    /// Perform a platform-specific biometric action.
    async fn biometric(&self, action: BiometricAction) -> Result<(), DriverError>;

    /// The current UI hierarchy as a source string.
    async fn page_source(&self) -> Result<String, DriverError>;

    /// End the session. Idempotent: tolerates an already-closed session.
    async fn quit(&self) -> Result<(), DriverError>;
}

/// Constructs platform-specific driver instances.
///
/// Session bootstrap invokes exactly one of these per attempt, chosen by the
/// configured platform kind. The endpoint variant — not the URL string —
/// decides local vs. remote.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Create an Android driver session.
    async fn create_android(
        &self,
        endpoint: &Endpoint,
        capabilities: &Capabilities,
    ) -> Result<Box<dyn MobileDriver>, DriverError>;

    /// Create an iOS driver session.
    async fn create_ios(
        &self,
        endpoint: &Endpoint,
        capabilities: &Capabilities,
    ) -> Result<Box<dyn MobileDriver>, DriverError>;
}
