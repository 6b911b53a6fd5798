//! Gesture geometry: pure coordinate math, no I/O.
//!
//! Everything a swipe needs before it touches the driver is computed here:
//! translating a semantic [`Direction`] plus a fraction into a destination
//! point, anchoring gestures in screen corners, and correcting for the one
//! platform family whose gesture API disagrees with the documented
//! move-target contract.
//!
//! # Direction semantics
//!
//! A `Direction` names where the *content* moves, not where the viewport
//! scrolls. Scrolling the viewport down means the content moves up, so a
//! public "scroll down" operation issues a geometric `Up` swipe. The facade
//! preserves this mapping exactly: scroll down ↔ `Up`, scroll up ↔ `Down`,
//! scroll right ↔ `Left`, scroll left ↔ `Right`.

use serde::{Deserialize, Serialize};

use crate::config::Platform;
use crate::error::AutomationError;

/// Standard swipe throw: a quarter of the relevant dimension.
pub const SWIPE_FRACTION: f32 = 0.25;
/// Long swipe throw: half of the relevant dimension. Used by scroll
/// operations and swipe-search.
pub const SWIPE_FRACTION_LONG: f32 = 0.5;
/// Maximum swipe throw: the full relevant dimension (clamped at the edge).
pub const SWIPE_FRACTION_SUPER_LONG: f32 = 1.0;
/// Default gesture duration when the caller passes zero.
pub const DEFAULT_SWIPE_DURATION_MS: u32 = 2000;
/// Default inset from screen edges for corner-anchored gestures.
pub const SCREEN_MARGIN: i32 = 10;

/// An integer pixel coordinate, screen-space, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the left edge.
    pub x: i32,
    /// Vertical offset from the top edge.
    pub y: i32,
}

impl Point {
    /// Builds a point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The current screen/viewport size in pixels.
///
/// Queried fresh from the driver before every gesture; never cached, since
/// orientation can change between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl ScreenSize {
    /// The center of the screen.
    pub fn center(&self) -> Point {
        Point {
            x: self.width / 2,
            y: self.height / 2,
        }
    }
}

/// Semantic direction of content movement during a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Content moves toward the top of the screen.
    Up,
    /// Content moves toward the bottom of the screen.
    Down,
    /// Content moves toward the left edge.
    Left,
    /// Content moves toward the right edge.
    Right,
}

/// A screen corner used to anchor edge gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Corner {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

fn check_fraction(fraction: f32) -> Result<(), AutomationError> {
    if fraction > 0.0 && fraction <= 1.0 {
        Ok(())
    } else {
        Err(AutomationError::InvalidArgument(format!(
            "swipe fraction must be in (0, 1], got {}",
            fraction
        )))
    }
}

/// Computes the destination of a directional swipe starting at `from`.
///
/// `Up` and `Left` scale the *current coordinate* by the fraction; `Down`
/// and `Right` scale the *screen dimension*. Results are clamped to stay at
/// least one pixel inside the screen on the moving axis:
///
/// | direction | formula            | clamp              |
/// |-----------|--------------------|--------------------|
/// | `Up`      | `y − y·fraction`   | `≥ 1`              |
/// | `Down`    | `y + H·fraction`   | `≤ height − 1`     |
/// | `Left`    | `x − x·fraction`   | `≥ 1`              |
/// | `Right`   | `x + W·fraction`   | `≤ width − 1`      |
///
/// Fails with an invalid-argument error when `fraction` is outside `(0, 1]`.
pub fn destination(
    direction: Direction,
    from: Point,
    screen: ScreenSize,
    fraction: f32,
) -> Result<Point, AutomationError> {
    check_fraction(fraction)?;
    let point = match direction {
        Direction::Up => {
            let to_y = (from.y as f32 - from.y as f32 * fraction) as i32;
            Point::new(from.x, if to_y <= 0 { 1 } else { to_y })
        }
        Direction::Down => {
            let to_y = (from.y as f32 + screen.height as f32 * fraction) as i32;
            Point::new(
                from.x,
                if to_y >= screen.height {
                    screen.height - 1
                } else {
                    to_y
                },
            )
        }
        Direction::Left => {
            let to_x = (from.x as f32 - from.x as f32 * fraction) as i32;
            Point::new(if to_x <= 0 { 1 } else { to_x }, from.y)
        }
        Direction::Right => {
            let to_x = (from.x as f32 + screen.width as f32 * fraction) as i32;
            Point::new(
                if to_x >= screen.width {
                    screen.width - 1
                } else {
                    to_x
                },
                from.y,
            )
        }
    };
    Ok(point)
}

/// Computes the anchor point for a corner gesture, inset `margin` pixels
/// from each adjoining screen edge.
pub fn corner_anchor(corner: Corner, screen: ScreenSize, margin: i32) -> Point {
    match corner {
        Corner::TopLeft => Point::new(margin, margin),
        Corner::TopRight => Point::new(screen.width - margin, margin),
        Corner::BottomLeft => Point::new(margin, screen.height - margin),
        Corner::BottomRight => Point::new(screen.width - margin, screen.height - margin),
    }
}

/// Computes the destination of a corner-anchored swipe.
///
/// Unlike [`destination`], all four arms scale by the relevant *screen*
/// dimension: vertical throws by the height, horizontal throws by the width.
/// The same edge clamps apply.
pub fn corner_destination(
    direction: Direction,
    from: Point,
    screen: ScreenSize,
    fraction: f32,
) -> Result<Point, AutomationError> {
    check_fraction(fraction)?;
    let point = match direction {
        Direction::Up => {
            let to_y = (from.y as f32 - screen.height as f32 * fraction) as i32;
            Point::new(from.x, if to_y <= 0 { 1 } else { to_y })
        }
        Direction::Down => {
            let to_y = (from.y as f32 + screen.height as f32 * fraction) as i32;
            Point::new(
                from.x,
                if to_y >= screen.height {
                    screen.height - 1
                } else {
                    to_y
                },
            )
        }
        Direction::Left => {
            let to_x = (from.x as f32 - screen.width as f32 * fraction) as i32;
            Point::new(if to_x <= 0 { 1 } else { to_x }, from.y)
        }
        Direction::Right => {
            let to_x = (from.x as f32 + screen.width as f32 * fraction) as i32;
            Point::new(
                if to_x >= screen.width {
                    screen.width - 1
                } else {
                    to_x
                },
                from.y,
            )
        }
    };
    Ok(point)
}

/// Corrects a gesture endpoint for the platform's move-target semantics.
///
/// The gesture protocol documents the move target as *relative* to the press
/// point. The iOS driver honors that contract, so the absolute endpoint the
/// geometry produces must be converted to an offset (`to − from`) before
/// dispatch. The Android driver treats the move target as absolute despite
/// the documentation, so it receives the endpoint unchanged; `None` also
/// passes through.
pub fn relativize(platform: Platform, from: Point, to: Point) -> Point {
    match platform {
        Platform::Ios => Point::new(to.x - from.x, to.y - from.y),
        Platform::Android | Platform::None => to,
    }
}
