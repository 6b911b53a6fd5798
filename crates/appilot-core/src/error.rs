//! Core error types.
//!
//! Errors split into two layers: [`DriverError`](crate::driver::DriverError)
//! covers the external driver capability surface, while [`AutomationError`]
//! covers everything the core itself can get wrong — bad configuration,
//! exhausted session-start budgets, invalid gesture arguments, and expired
//! waits. Driver errors convert into `AutomationError` via `From` so `?`
//! works across the seam.

use thiserror::Error;

use crate::driver::DriverError;

/// Errors produced by the automation core.
#[derive(Error, Debug)]
pub enum AutomationError {
    /// The configuration is invalid. Never retried; surfaces to the caller
    /// unchanged.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A driver session could not be started within the configured retry
    /// budget. Carries the capability set that was attempted.
    #[error("Could not start driver session after {attempts} attempts with capabilities: {capabilities}")]
    SessionStart {
        /// Total number of creation attempts made (retry limit + 1).
        attempts: u32,
        /// The derived capability set, rendered for diagnostics.
        capabilities: String,
    },

    /// An argument was outside its valid domain (e.g. a swipe fraction
    /// outside `(0, 1]`).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A polled condition did not become true before its deadline.
    #[error("Condition not met within {waited_secs}s")]
    Timeout {
        /// How long the condition was polled, in whole seconds.
        waited_secs: u64,
    },

    /// An error from the underlying driver.
    #[error(transparent)]
    Driver(#[from] DriverError),
}
