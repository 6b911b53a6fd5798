//! Session ownership and bootstrap.
//!
//! A [`Session`] owns exactly one live driver handle and the session
//! identifier the driver reported at creation, scoped to one logical task —
//! sessions are never shared between concurrent tasks. [`SessionBootstrap`]
//! establishes the session against a local or remote endpoint with a bounded
//! retry budget.
//!
//! # Bootstrap contract
//!
//! - Re-entering [`SessionBootstrap::start`] with a session whose driver
//!   still reports an active id is a no-op: the session is returned
//!   unchanged and zero creation attempts are made.
//! - Each attempt derives capabilities fresh from the config, lets the
//!   optional capability hook adjust them, and invokes exactly one of the
//!   two platform-specific factory constructors. An unconfigured platform is
//!   a fatal configuration error raised before the first attempt.
//! - Transient creation errors are logged and retried in an explicit
//!   bounded loop — `retries + 1` total attempts — after which a fatal
//!   startup error naming the attempted capability set is returned.
//! - On success the driver is registered with the quit-on-exit registry;
//!   [`Session::quit`] reverses the registration.

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::capabilities::{derive_capabilities, Capabilities};
use crate::config::{AutomationConfig, Platform};
use crate::driver::{DriverFactory, MobileDriver};
use crate::error::AutomationError;
use crate::shutdown::{deregister_quit_hook, register_quit_hook, QuitHook};

/// Hook applied to the derived capability set before each creation attempt.
pub type CapabilityHook = Box<dyn Fn(&mut Capabilities) + Send + Sync>;

/// One live driver session.
pub struct Session {
    driver: Arc<dyn MobileDriver>,
    session_id: String,
    local_id: Uuid,
    quit_hook: Option<QuitHook>,
}

impl Session {
    /// The driver handle.
    pub fn driver(&self) -> &dyn MobileDriver {
        self.driver.as_ref()
    }

    /// A cloneable driver handle, used by polled wait conditions.
    pub fn driver_handle(&self) -> Arc<dyn MobileDriver> {
        self.driver.clone()
    }

    /// The driver-reported session identifier, captured at creation. Kept
    /// for the session's lifetime and never reused across sessions.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Locally generated correlation id for this bootstrap.
    pub fn local_id(&self) -> Uuid {
        self.local_id
    }

    /// Whether the driver still reports an active session.
    pub async fn is_active(&self) -> bool {
        self.driver.session_id().await.is_some()
    }

    /// Ends the session: quits the driver (errors logged and swallowed, the
    /// driver's quit is idempotent) and reverses the quit-on-exit
    /// registration. Safe to call more than once.
    pub async fn quit(&mut self) {
        if let Err(err) = self.driver.quit().await {
            error!(error = %err, "driver error during quit");
        }
        if let Some(hook) = self.quit_hook.take() {
            deregister_quit_hook(hook);
        }
    }

    /// Drops the quit-on-exit registration without quitting, used when a
    /// stale session is replaced during bootstrap.
    fn release_hook(&mut self) {
        if let Some(hook) = self.quit_hook.take() {
            deregister_quit_hook(hook);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.session_id)
            .field("local_id", &self.local_id)
            .field("driver", &"<dyn MobileDriver>")
            .finish()
    }
}

/// Establishes driver sessions with bounded retries.
pub struct SessionBootstrap {
    config: AutomationConfig,
    factory: Arc<dyn DriverFactory>,
    on_capabilities: Option<CapabilityHook>,
}

impl SessionBootstrap {
    /// Builds a bootstrap over a config and a driver factory.
    pub fn new(config: AutomationConfig, factory: Arc<dyn DriverFactory>) -> Self {
        Self {
            config,
            factory,
            on_capabilities: None,
        }
    }

    /// Installs the single extension hook that may adjust the derived
    /// capability set before each creation attempt.
    pub fn with_capability_hook(
        mut self,
        hook: impl Fn(&mut Capabilities) + Send + Sync + 'static,
    ) -> Self {
        self.on_capabilities = Some(Box::new(hook));
        self
    }

    /// The configuration this bootstrap was built with.
    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    /// Produces a live session, reusing `existing` if it is still active.
    ///
    /// See the module docs for the full contract. The retry loop is an
    /// explicit bounded iteration, not recursion.
    pub async fn start(&self, existing: Option<Session>) -> Result<Session, AutomationError> {
        if let Some(mut session) = existing {
            if session.is_active().await {
                debug!(session_id = %session.session_id(), "session already active, skipping bootstrap");
                return Ok(session);
            }
            // Stale handle: forget its exit registration and start over.
            session.release_hook();
        }

        let max_attempts = self.config.start_session_retries + 1;
        // Raises the fatal unknown-platform error before any attempt is made.
        let mut attempted = self.derived_capabilities()?;

        for attempt in 1..=max_attempts {
            let caps = self.derived_capabilities()?;
            attempted = caps.clone();

            let created = match self.config.platform {
                Platform::Android => {
                    self.factory
                        .create_android(&self.config.endpoint, &caps)
                        .await
                }
                Platform::Ios => self.factory.create_ios(&self.config.endpoint, &caps).await,
                Platform::None => unreachable!("rejected by capability derivation"),
            };

            match created {
                Ok(driver) => {
                    let driver: Arc<dyn MobileDriver> = Arc::from(driver);
                    // The id is captured immediately; a driver that comes
                    // back without one counts as a failed attempt.
                    match driver.session_id().await {
                        Some(id) => {
                            let quit_hook = register_quit_hook(driver.clone());
                            info!(session_id = %id, attempt, "driver session started");
                            return Ok(Session {
                                driver,
                                session_id: id,
                                local_id: Uuid::new_v4(),
                                quit_hook: Some(quit_hook),
                            });
                        }
                        None => {
                            error!(attempt, "driver created without an active session id");
                        }
                    }
                }
                Err(err) => {
                    error!(error = %err, attempt, "failed to start driver session");
                }
            }
        }

        Err(AutomationError::SessionStart {
            attempts: max_attempts,
            capabilities: attempted.to_string(),
        })
    }

    fn derived_capabilities(&self) -> Result<Capabilities, AutomationError> {
        let mut caps = derive_capabilities(&self.config)?;
        if let Some(hook) = &self.on_capabilities {
            hook(&mut caps);
        }
        Ok(caps)
    }
}
