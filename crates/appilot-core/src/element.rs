//! Selectors, element handles, and element resolution.
//!
//! The core deliberately keeps element lookup abstract: a [`Selector`] is an
//! opaque description the driver interprets, and an [`ElementRef`] is a
//! handle the driver has already resolved. Every facade operation that acts
//! on an element is written once against the [`Target`] resolution
//! capability, and both `Selector` and `ElementRef` implement it — the
//! "find it for me" path and the "I already have it" path are just two
//! resolvers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::driver::{DriverError, MobileDriver};
use crate::geometry::Point;

/// A description of an element for the driver to look up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Selector {
    /// Match by accessibility/resource identifier.
    Id(String),
    /// Match by visible text.
    Text(String),
}

impl Selector {
    /// Selector matching an accessibility or resource id.
    pub fn id(value: impl Into<String>) -> Self {
        Selector::Id(value.into())
    }

    /// Selector matching visible text.
    pub fn text(value: impl Into<String>) -> Self {
        Selector::Text(value.into())
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Id(v) => write!(f, "id={}", v),
            Selector::Text(v) => write!(f, "text={}", v),
        }
    }
}

/// A handle to an element the driver has already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    /// Driver-assigned element handle.
    pub handle: String,
}

impl ElementRef {
    /// Wraps a raw driver handle.
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
        }
    }
}

/// An element's on-screen frame in pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// X of the top-left corner.
    pub x: i32,
    /// Y of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// The center point of this frame.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2,
            y: self.y + self.height / 2,
        }
    }
}

/// Element-resolution capability.
///
/// Facade operations take `&impl Target` instead of overloading on selector
/// vs. handle types.
#[async_trait]
pub trait Target: Send + Sync {
    /// Resolve to a concrete element handle via the driver.
    async fn resolve(&self, driver: &dyn MobileDriver) -> Result<ElementRef, DriverError>;
}

#[async_trait]
impl Target for Selector {
    async fn resolve(&self, driver: &dyn MobileDriver) -> Result<ElementRef, DriverError> {
        driver.find_element(self).await
    }
}

#[async_trait]
impl Target for ElementRef {
    /// A prebuilt handle resolves to itself without touching the driver.
    async fn resolve(&self, _driver: &dyn MobileDriver) -> Result<ElementRef, DriverError> {
        Ok(self.clone())
    }
}
