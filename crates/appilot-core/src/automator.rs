//! Fluent automation facade.
//!
//! [`Automator`] wraps one live [`Session`] and exposes the chainable
//! surface test authors use: tap, type, read text, presence checks, polled
//! waits, directional swipes and scrolls, corner gestures, scroll-until-
//! visible search, and biometric shortcuts. Each concept exists once,
//! parameterized over the [`Target`] element-resolution capability, instead
//! of overload families per selector type.
//!
//! # Scroll vs. swipe direction
//!
//! Scroll methods name the *viewport* movement and issue the inverted
//! geometric swipe, because a [`Direction`] names where the *content*
//! moves: `scroll_down` swipes `Up`, `scroll_up` swipes `Down`,
//! `scroll_right` swipes `Left`, and `scroll_left` swipes `Right`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use appilot_core::automator::Automator;
//! use appilot_core::config::AutomationConfig;
//! use appilot_core::driver::DriverFactory;
//! use appilot_core::element::Selector;
//!
//! async fn login(config: AutomationConfig, factory: Arc<dyn DriverFactory>) {
//!     let mut app = Automator::start(config, factory).await.unwrap();
//!     app.set_text(&Selector::id("email"), "qa@example.com").await.unwrap();
//!     app.tap(&Selector::id("login-button")).await.unwrap();
//!     assert!(app.is_present_wait(&Selector::id("home")).await.unwrap());
//!     app.quit().await;
//! }
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::config::AutomationConfig;
use crate::driver::{BiometricAction, DriverError, DriverFactory, MobileDriver, PressKind};
use crate::element::{ElementRef, Selector, Target};
use crate::error::AutomationError;
use crate::geometry::{
    Corner, Direction, Point, SWIPE_FRACTION, SWIPE_FRACTION_LONG, SWIPE_FRACTION_SUPER_LONG,
};
use crate::gesture::{GestureExecutor, SwipeEnd};
use crate::search;
use crate::session::{Session, SessionBootstrap};

/// Default timeout for [`Automator::is_present_wait`], in seconds.
const PRESENT_WAIT_TIMEOUT_SECS: u64 = 5;
/// Poll interval for presence waits, in milliseconds.
const PRESENT_WAIT_POLL_MS: u64 = 200;

/// Boxed future returned by a wait condition. The condition owns its driver
/// handle, so the future carries no borrows.
pub type ConditionFuture = Pin<Box<dyn Future<Output = Result<bool, DriverError>> + Send>>;

/// Fluent facade over one driver session.
pub struct Automator {
    config: AutomationConfig,
    session: Session,
    vars: HashMap<String, String>,
}

impl std::fmt::Debug for Automator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Automator")
            .field("config", &self.config)
            .field("vars", &self.vars)
            .finish_non_exhaustive()
    }
}

impl Automator {
    /// Bootstraps a session and wraps it.
    pub async fn start(
        config: AutomationConfig,
        factory: Arc<dyn DriverFactory>,
    ) -> Result<Self, AutomationError> {
        Self::start_with(SessionBootstrap::new(config, factory)).await
    }

    /// Bootstraps via a prepared [`SessionBootstrap`] (e.g. one carrying a
    /// capability hook) and wraps the session.
    pub async fn start_with(bootstrap: SessionBootstrap) -> Result<Self, AutomationError> {
        let config = bootstrap.config().clone();
        let session = bootstrap.start(None).await?;
        Ok(Self {
            config,
            session,
            vars: HashMap::new(),
        })
    }

    /// Wraps an already-established session.
    pub fn with_session(config: AutomationConfig, session: Session) -> Self {
        Self {
            config,
            session,
            vars: HashMap::new(),
        }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn driver(&self) -> &dyn MobileDriver {
        self.session.driver()
    }

    fn gestures(&self) -> GestureExecutor<'_> {
        GestureExecutor::new(self.session.driver(), self.config.platform)
    }

    // --- element interaction ------------------------------------------------

    /// Taps an element.
    pub async fn tap(&mut self, target: &impl Target) -> Result<&mut Self, AutomationError> {
        let element = target.resolve(self.driver()).await?;
        self.driver().tap(&element).await?;
        Ok(self)
    }

    /// Replaces an element's text.
    pub async fn set_text(
        &mut self,
        target: &impl Target,
        text: &str,
    ) -> Result<&mut Self, AutomationError> {
        let element = target.resolve(self.driver()).await?;
        self.driver().set_element_text(&element, text).await?;
        Ok(self)
    }

    /// Reads an element's text.
    pub async fn text(&self, target: &impl Target) -> Result<String, AutomationError> {
        let element = target.resolve(self.driver()).await?;
        Ok(self.driver().element_text(&element).await?)
    }

    /// Reads a named attribute of an element.
    pub async fn attribute(
        &self,
        target: &impl Target,
        name: &str,
    ) -> Result<Option<String>, AutomationError> {
        let element = target.resolve(self.driver()).await?;
        Ok(self.driver().element_attribute(&element, name).await?)
    }

    /// All elements matching the selector; possibly empty.
    pub async fn elements(&self, selector: &Selector) -> Result<Vec<ElementRef>, AutomationError> {
        Ok(self.driver().find_elements(selector).await?)
    }

    /// Whether the current UI hierarchy contains the given text.
    pub async fn page_source_contains(&self, text: &str) -> Result<bool, AutomationError> {
        Ok(self.driver().page_source().await?.contains(text))
    }

    /// Dismisses the keyboard; a driver failure is logged and swallowed
    /// (there may be no keyboard to hide).
    pub async fn hide_keyboard(&mut self) -> &mut Self {
        if let Err(error) = self.driver().hide_keyboard().await {
            warn!(%error, "could not hide keyboard");
        }
        self
    }

    // --- presence and waiting ----------------------------------------------

    /// Whether at least one element matches right now.
    pub async fn is_present(&self, selector: &Selector) -> Result<bool, AutomationError> {
        Ok(!self.driver().find_elements(selector).await?.is_empty())
    }

    /// Whether the target resolves and is currently visible. A not-found
    /// lookup is a negative result, not an error.
    pub async fn is_displayed(&self, target: &impl Target) -> Result<bool, AutomationError> {
        match target.resolve(self.driver()).await {
            Ok(element) => Ok(self.driver().is_displayed(&element).await?),
            Err(DriverError::NotFound(_)) => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    /// [`is_present_wait_timeout`](Self::is_present_wait_timeout) with the
    /// default 5 second timeout.
    pub async fn is_present_wait(&mut self, selector: &Selector) -> Result<bool, AutomationError> {
        self.is_present_wait_timeout(selector, PRESENT_WAIT_TIMEOUT_SECS)
            .await
    }

    /// Polls until the element is present and visible, suppressing the
    /// timeout condition into `false`. Other errors propagate.
    pub async fn is_present_wait_timeout(
        &mut self,
        selector: &Selector,
        timeout_secs: u64,
    ) -> Result<bool, AutomationError> {
        let sel = selector.clone();
        let condition = move |driver: Arc<dyn MobileDriver>| -> ConditionFuture {
            let sel = sel.clone();
            Box::pin(async move {
                let element = driver.find_element(&sel).await?;
                driver.is_displayed(&element).await
            })
        };
        match self
            .wait_for_condition(condition, timeout_secs, PRESENT_WAIT_POLL_MS)
            .await
        {
            Ok(_) => Ok(true),
            Err(AutomationError::Timeout { .. }) => Ok(false),
            Err(error) => Err(error),
        }
    }

    /// Polls `condition` every `poll_ms` milliseconds until it yields true
    /// or `timeout_secs` elapses, then fails with a timeout. A not-found
    /// driver error from the condition counts as "not yet".
    pub async fn wait_for_condition<F>(
        &mut self,
        mut condition: F,
        timeout_secs: u64,
        poll_ms: u64,
    ) -> Result<&mut Self, AutomationError>
    where
        F: FnMut(Arc<dyn MobileDriver>) -> ConditionFuture,
    {
        let deadline = Instant::now() + Duration::from_secs(timeout_secs);
        loop {
            match condition(self.session.driver_handle()).await {
                Ok(true) => return Ok(self),
                Ok(false) | Err(DriverError::NotFound(_)) => {}
                Err(error) => return Err(error.into()),
            }
            if Instant::now() >= deadline {
                return Err(AutomationError::Timeout {
                    waited_secs: timeout_secs,
                });
            }
            tokio::time::sleep(Duration::from_millis(poll_ms)).await;
        }
    }

    /// [`wait_for_condition`](Self::wait_for_condition) with the configured
    /// request timeout and poll interval.
    pub async fn wait_for<F>(&mut self, condition: F) -> Result<&mut Self, AutomationError>
    where
        F: FnMut(Arc<dyn MobileDriver>) -> ConditionFuture,
    {
        let timeout = self.config.request_timeout_secs;
        let poll = self.config.poll_interval_ms;
        self.wait_for_condition(condition, timeout, poll).await
    }

    /// Waits until no visible element matches the selector.
    pub async fn wait_until_gone(
        &mut self,
        selector: &Selector,
    ) -> Result<&mut Self, AutomationError> {
        let sel = selector.clone();
        let condition = move |driver: Arc<dyn MobileDriver>| -> ConditionFuture {
            let sel = sel.clone();
            Box::pin(async move {
                match driver.find_element(&sel).await {
                    Ok(element) => match driver.is_displayed(&element).await {
                        Ok(visible) => Ok(!visible),
                        Err(DriverError::NotFound(_)) => Ok(true),
                        Err(error) => Err(error),
                    },
                    Err(DriverError::NotFound(_)) => Ok(true),
                    Err(error) => Err(error),
                }
            })
        };
        self.wait_for(condition).await
    }

    // --- swipes -------------------------------------------------------------

    /// Standard-throw swipe from the screen center.
    pub async fn swipe_center(
        &mut self,
        direction: Direction,
    ) -> Result<&mut Self, AutomationError> {
        self.gestures()
            .center_swipe(direction, SWIPE_FRACTION, 0, PressKind::Press)
            .await?;
        Ok(self)
    }

    /// Long-throw swipe from the screen center.
    pub async fn swipe_center_long(
        &mut self,
        direction: Direction,
    ) -> Result<&mut Self, AutomationError> {
        self.gestures()
            .center_swipe(direction, SWIPE_FRACTION_LONG, 0, PressKind::Press)
            .await?;
        Ok(self)
    }

    /// Full-throw swipe from the screen center.
    pub async fn swipe_center_super_long(
        &mut self,
        direction: Direction,
    ) -> Result<&mut Self, AutomationError> {
        self.gestures()
            .center_swipe(direction, SWIPE_FRACTION_SUPER_LONG, 0, PressKind::Press)
            .await?;
        Ok(self)
    }

    /// `times` independent center swipes with explicit fraction and
    /// duration.
    pub async fn swipe_center_times(
        &mut self,
        direction: Direction,
        fraction: f32,
        duration_ms: u32,
        times: u32,
    ) -> Result<&mut Self, AutomationError> {
        self.gestures()
            .center_swipe_repeated(direction, fraction, duration_ms, PressKind::Press, times)
            .await?;
        Ok(self)
    }

    /// Swipe starting from an element's center.
    pub async fn swipe_element(
        &mut self,
        direction: Direction,
        target: &impl Target,
        fraction: f32,
        duration_ms: u32,
    ) -> Result<&mut Self, AutomationError> {
        let element = target.resolve(self.driver()).await?;
        self.gestures()
            .element_swipe(&element, direction, fraction, duration_ms, PressKind::Press)
            .await?;
        Ok(self)
    }

    /// Swipe between two explicit points.
    pub async fn swipe_points(
        &mut self,
        from: Point,
        to: Point,
        duration_ms: u32,
    ) -> Result<&mut Self, AutomationError> {
        self.gestures()
            .swipe(from, SwipeEnd::At(to), duration_ms, PressKind::Press)
            .await?;
        Ok(self)
    }

    /// Long-press variant of [`swipe_center`](Self::swipe_center) with
    /// explicit fraction and duration.
    pub async fn long_press_swipe_center(
        &mut self,
        direction: Direction,
        fraction: f32,
        duration_ms: u32,
    ) -> Result<&mut Self, AutomationError> {
        self.gestures()
            .center_swipe(direction, fraction, duration_ms, PressKind::LongPress)
            .await?;
        Ok(self)
    }

    /// Long-press swipe starting from an element's center.
    pub async fn long_press_swipe_element(
        &mut self,
        direction: Direction,
        target: &impl Target,
        fraction: f32,
        duration_ms: u32,
    ) -> Result<&mut Self, AutomationError> {
        let element = target.resolve(self.driver()).await?;
        self.gestures()
            .element_swipe(
                &element,
                direction,
                fraction,
                duration_ms,
                PressKind::LongPress,
            )
            .await?;
        Ok(self)
    }

    /// Long-press swipe between two explicit points.
    pub async fn long_press_swipe_points(
        &mut self,
        from: Point,
        to: Point,
        duration_ms: u32,
    ) -> Result<&mut Self, AutomationError> {
        self.gestures()
            .swipe(from, SwipeEnd::At(to), duration_ms, PressKind::LongPress)
            .await?;
        Ok(self)
    }

    /// Long-throw swipe anchored in a screen corner.
    pub async fn swipe_corner_long(
        &mut self,
        corner: Corner,
        direction: Direction,
        duration_ms: u32,
    ) -> Result<&mut Self, AutomationError> {
        self.gestures()
            .corner_swipe(corner, direction, SWIPE_FRACTION_LONG, duration_ms)
            .await?;
        Ok(self)
    }

    /// Full-throw swipe anchored in a screen corner.
    pub async fn swipe_corner_super_long(
        &mut self,
        corner: Corner,
        direction: Direction,
        duration_ms: u32,
    ) -> Result<&mut Self, AutomationError> {
        self.gestures()
            .corner_swipe(corner, direction, SWIPE_FRACTION_SUPER_LONG, duration_ms)
            .await?;
        Ok(self)
    }

    /// Edge-to-edge swipe at the vertical center, triggering the system
    /// back gesture on platforms that support it.
    pub async fn swipe_system_back(&mut self) -> Result<&mut Self, AutomationError> {
        let screen = self.driver().window_size().await?;
        let y = screen.height / 2;
        let from = Point::new(screen.width - 2, y);
        let to = Point::new(2, y);
        self.swipe_points(from, to, 0).await
    }

    // --- scrolls (inverted swipes) ------------------------------------------

    /// Scrolls the viewport down (content moves up).
    pub async fn scroll_down(&mut self) -> Result<&mut Self, AutomationError> {
        self.swipe_center_long(Direction::Up).await
    }

    /// Scrolls down `times` times.
    pub async fn scroll_down_times(&mut self, times: u32) -> Result<&mut Self, AutomationError> {
        self.swipe_center_times(Direction::Up, SWIPE_FRACTION_LONG, 0, times)
            .await
    }

    /// Scrolls the viewport up (content moves down).
    pub async fn scroll_up(&mut self) -> Result<&mut Self, AutomationError> {
        self.swipe_center_long(Direction::Down).await
    }

    /// Scrolls up `times` times.
    pub async fn scroll_up_times(&mut self, times: u32) -> Result<&mut Self, AutomationError> {
        self.swipe_center_times(Direction::Down, SWIPE_FRACTION_LONG, 0, times)
            .await
    }

    /// Scrolls the viewport right (content moves left).
    pub async fn scroll_right(&mut self) -> Result<&mut Self, AutomationError> {
        self.swipe_center_long(Direction::Left).await
    }

    /// Scrolls right `times` times.
    pub async fn scroll_right_times(&mut self, times: u32) -> Result<&mut Self, AutomationError> {
        self.swipe_center_times(Direction::Left, SWIPE_FRACTION_LONG, 0, times)
            .await
    }

    /// Scrolls the viewport left (content moves right).
    pub async fn scroll_left(&mut self) -> Result<&mut Self, AutomationError> {
        self.swipe_center_long(Direction::Right).await
    }

    /// Scrolls left `times` times.
    pub async fn scroll_left_times(&mut self, times: u32) -> Result<&mut Self, AutomationError> {
        self.swipe_center_times(Direction::Right, SWIPE_FRACTION_LONG, 0, times)
            .await
    }

    // --- scroll-until-visible -----------------------------------------------

    /// Scrolls toward the top until the element is visible, with the
    /// default direction and attempt budget.
    pub async fn swipe_to(
        &mut self,
        selector: &Selector,
    ) -> Result<Option<ElementRef>, AutomationError> {
        search::find_by_swipe_default(self.session.driver(), self.config.platform, selector).await
    }

    /// Scrolls in `direction` until the element is visible, with the
    /// default attempt budget.
    pub async fn swipe_to_from(
        &mut self,
        direction: Direction,
        selector: &Selector,
    ) -> Result<Option<ElementRef>, AutomationError> {
        self.swipe_to_in(direction, selector, search::DEFAULT_SEARCH_ATTEMPTS)
            .await
    }

    /// Scrolls in `direction` up to `attempts` times until the element is
    /// visible. Exhaustion returns `Ok(None)`.
    pub async fn swipe_to_in(
        &mut self,
        direction: Direction,
        selector: &Selector,
        attempts: u32,
    ) -> Result<Option<ElementRef>, AutomationError> {
        search::find_by_swipe(
            self.session.driver(),
            self.config.platform,
            direction,
            selector,
            attempts,
        )
        .await
    }

    // --- biometrics ---------------------------------------------------------

    /// Toggles biometric enrollment. Only meaningful on iOS; a no-op
    /// elsewhere.
    pub async fn enroll_biometrics(
        &mut self,
        enabled: bool,
    ) -> Result<&mut Self, AutomationError> {
        match self.config.platform {
            crate::config::Platform::Ios => {
                self.driver()
                    .biometric(BiometricAction::EnrollTouchId(enabled))
                    .await?;
            }
            crate::config::Platform::Android | crate::config::Platform::None => {}
        }
        Ok(self)
    }

    /// Performs a biometric scan: a forced match/non-match on iOS, the
    /// enrolled fingerprint id on Android, a no-op without a platform.
    pub async fn perform_biometric(
        &mut self,
        matching: bool,
        finger_id: i32,
    ) -> Result<&mut Self, AutomationError> {
        match self.config.platform {
            crate::config::Platform::Ios => {
                self.driver()
                    .biometric(BiometricAction::TouchId(matching))
                    .await?;
            }
            crate::config::Platform::Android => {
                self.driver()
                    .biometric(BiometricAction::FingerPrint(finger_id))
                    .await?;
            }
            crate::config::Platform::None => {}
        }
        Ok(self)
    }

    // --- scratch store ------------------------------------------------------

    /// Stores a value for later steps of the same test.
    pub fn store(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Reads a stored value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Reads a stored value, falling back to a default for missing or empty
    /// entries.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.vars.get(key) {
            Some(value) if !value.is_empty() => value,
            _ => default,
        }
    }

    // --- teardown -----------------------------------------------------------

    /// Ends the session.
    pub async fn quit(mut self) {
        self.session.quit().await;
    }
}
