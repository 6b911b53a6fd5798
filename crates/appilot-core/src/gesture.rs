//! Gesture execution.
//!
//! [`GestureExecutor`] turns a `(from, to, duration, press-kind)` tuple into
//! one atomic driver touch sequence: press or long-press at the origin, wait
//! for the duration, move to the (relativized) destination, release. The
//! destination can be given directly or as a direction resolved through the
//! geometry engine against a freshly queried screen size.
//!
//! A gesture is dispatched exactly once; mid-sequence failures propagate to
//! the caller without retry. Repeat variants issue N independent sequential
//! gestures with no batching and no early exit.

use crate::config::Platform;
use crate::driver::{MobileDriver, PressKind};
use crate::element::ElementRef;
use crate::error::AutomationError;
use crate::geometry::{
    self, Corner, Direction, Point, ScreenSize, DEFAULT_SWIPE_DURATION_MS, SCREEN_MARGIN,
};

/// Where a swipe ends: a concrete point, or a direction plus throw fraction
/// resolved by the geometry engine.
#[derive(Debug, Clone, Copy)]
pub enum SwipeEnd {
    /// Swipe to this exact point.
    At(Point),
    /// Swipe toward a direction, covering `fraction` of the relevant
    /// dimension.
    Toward {
        /// Direction of content movement.
        direction: Direction,
        /// Throw fraction in `(0, 1]`.
        fraction: f32,
    },
}

/// Executes swipe gestures against one driver session.
pub struct GestureExecutor<'a> {
    driver: &'a dyn MobileDriver,
    platform: Platform,
}

impl<'a> GestureExecutor<'a> {
    /// Binds an executor to a driver and the platform it is driving.
    pub fn new(driver: &'a dyn MobileDriver, platform: Platform) -> Self {
        Self { driver, platform }
    }

    /// Swipe from an explicit origin.
    ///
    /// A zero duration is replaced with the 2000 ms default.
    pub async fn swipe(
        &self,
        from: Point,
        end: SwipeEnd,
        duration_ms: u32,
        press: PressKind,
    ) -> Result<(), AutomationError> {
        let screen = self.driver.window_size().await?;
        self.dispatch(screen, from, end, duration_ms, press).await
    }

    /// Swipe from the center of the screen.
    pub async fn center_swipe(
        &self,
        direction: Direction,
        fraction: f32,
        duration_ms: u32,
        press: PressKind,
    ) -> Result<(), AutomationError> {
        let screen = self.driver.window_size().await?;
        self.dispatch(
            screen,
            screen.center(),
            SwipeEnd::Toward {
                direction,
                fraction,
            },
            duration_ms,
            press,
        )
        .await
    }

    /// Issues `times` independent center swipes in sequence.
    ///
    /// The origin and screen size are re-derived for every swipe; a failure
    /// aborts the remainder and propagates.
    pub async fn center_swipe_repeated(
        &self,
        direction: Direction,
        fraction: f32,
        duration_ms: u32,
        press: PressKind,
        times: u32,
    ) -> Result<(), AutomationError> {
        for _ in 0..times {
            self.center_swipe(direction, fraction, duration_ms, press)
                .await?;
        }
        Ok(())
    }

    /// Swipe starting from the center of an element.
    pub async fn element_swipe(
        &self,
        element: &ElementRef,
        direction: Direction,
        fraction: f32,
        duration_ms: u32,
        press: PressKind,
    ) -> Result<(), AutomationError> {
        let screen = self.driver.window_size().await?;
        let from = self.driver.element_rect(element).await?.center();
        self.dispatch(
            screen,
            from,
            SwipeEnd::Toward {
                direction,
                fraction,
            },
            duration_ms,
            press,
        )
        .await
    }

    /// Swipe anchored in a screen corner, inset by the standard margin.
    ///
    /// Corner throws scale by the screen dimension on both axes (see
    /// [`geometry::corner_destination`]).
    pub async fn corner_swipe(
        &self,
        corner: Corner,
        direction: Direction,
        fraction: f32,
        duration_ms: u32,
    ) -> Result<(), AutomationError> {
        let screen = self.driver.window_size().await?;
        let from = geometry::corner_anchor(corner, screen, SCREEN_MARGIN);
        let to = geometry::corner_destination(direction, from, screen, fraction)?;
        self.dispatch(screen, from, SwipeEnd::At(to), duration_ms, PressKind::Press)
            .await
    }

    async fn dispatch(
        &self,
        screen: ScreenSize,
        from: Point,
        end: SwipeEnd,
        duration_ms: u32,
        press: PressKind,
    ) -> Result<(), AutomationError> {
        let to = match end {
            SwipeEnd::At(point) => point,
            SwipeEnd::Toward {
                direction,
                fraction,
            } => geometry::destination(direction, from, screen, fraction)?,
        };
        let to = geometry::relativize(self.platform, from, to);
        let duration = if duration_ms == 0 {
            DEFAULT_SWIPE_DURATION_MS
        } else {
            duration_ms
        };
        self.driver.perform_gesture(press, from, to, duration).await?;
        Ok(())
    }
}
