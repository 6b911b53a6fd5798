//! Scroll-until-visible search.
//!
//! Repeats a long-throw directional swipe and an element lookup until the
//! element is found *and* visible, or the attempt budget is exhausted.
//! Exhaustion is an explicit not-found result, not an error; a lookup that
//! raises a not-found condition just continues the loop.

use tracing::{debug, warn};

use crate::config::Platform;
use crate::driver::{DriverError, MobileDriver, PressKind};
use crate::element::{ElementRef, Selector};
use crate::error::AutomationError;
use crate::geometry::{Direction, SWIPE_FRACTION_LONG};
use crate::gesture::GestureExecutor;

/// Default number of swipe+lookup cycles.
pub const DEFAULT_SEARCH_ATTEMPTS: u32 = 3;
/// Default search direction: content scrolls toward the top.
pub const DEFAULT_SEARCH_DIRECTION: Direction = Direction::Up;

/// Swipes in `direction` up to `max_attempts` times, looking up `selector`
/// after each swipe.
///
/// Returns `Ok(Some(element))` as soon as the element is found and visible,
/// short-circuiting remaining attempts. Returns `Ok(None)` — with one
/// warning naming the selector — when the budget is exhausted. Driver errors
/// other than not-found propagate.
pub async fn find_by_swipe(
    driver: &dyn MobileDriver,
    platform: Platform,
    direction: Direction,
    selector: &Selector,
    max_attempts: u32,
) -> Result<Option<ElementRef>, AutomationError> {
    let gestures = GestureExecutor::new(driver, platform);
    for attempt in 1..=max_attempts {
        gestures
            .center_swipe(direction, SWIPE_FRACTION_LONG, 0, PressKind::Press)
            .await?;
        match driver.find_element(selector).await {
            Ok(element) => match driver.is_displayed(&element).await {
                Ok(true) => {
                    debug!(%selector, attempt, "element visible after swipe");
                    return Ok(Some(element));
                }
                // Found but still off-screen, or gone stale between lookup
                // and visibility check: keep scrolling.
                Ok(false) | Err(DriverError::NotFound(_)) => {}
                Err(error) => return Err(error.into()),
            },
            Err(DriverError::NotFound(_)) => {}
            Err(error) => return Err(error.into()),
        }
    }
    warn!(%selector, attempts = max_attempts, "element not found by swipe search");
    Ok(None)
}

/// [`find_by_swipe`] with the default direction and attempt budget.
pub async fn find_by_swipe_default(
    driver: &dyn MobileDriver,
    platform: Platform,
    selector: &Selector,
) -> Result<Option<ElementRef>, AutomationError> {
    find_by_swipe(
        driver,
        platform,
        DEFAULT_SEARCH_DIRECTION,
        selector,
        DEFAULT_SEARCH_ATTEMPTS,
    )
    .await
}
