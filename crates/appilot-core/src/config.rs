//! Automation configuration.
//!
//! [`AutomationConfig`] is the immutable value read once per test run: which
//! platform to drive, where the driver endpoint lives, the capability inputs
//! handed to the driver at session creation, and the retry/timeout knobs the
//! core consults. It is constructed (typically deserialized from JSON) before
//! the first session starts and never mutated afterwards.
//!
//! # Example
//!
//! ```
//! use appilot_core::config::{AutomationConfig, Platform, Endpoint};
//!
//! let config: AutomationConfig = serde_json::from_str(r#"{
//!     "platform": "ANDROID",
//!     "endpoint": { "kind": "remote", "url": "http://hub.example:4723/wd/hub" },
//!     "device_name": "Pixel 7",
//!     "app_path": "/builds/app.apk"
//! }"#).unwrap();
//!
//! assert_eq!(config.platform, Platform::Android);
//! assert_eq!(config.start_session_retries, 3);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The platform family a session targets.
///
/// This is a closed set: platform-conditional behavior in the core (the
/// move-target relativization quirk, biometric dispatch, capability
/// derivation) matches on it exhaustively rather than downcasting driver
/// types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    /// Android device or emulator.
    Android,
    /// iOS device or simulator.
    Ios,
    /// No platform configured. Starting a session against this is a fatal
    /// configuration error.
    #[default]
    None,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Android => write!(f, "ANDROID"),
            Platform::Ios => write!(f, "IOS"),
            Platform::None => write!(f, "NONE"),
        }
    }
}

/// Where the driver session is created.
///
/// The variant is an explicit flag; the core never infers local vs. remote
/// by inspecting an endpoint string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Endpoint {
    /// Start an in-process/local driver service.
    #[default]
    Local,
    /// Connect to a remote hub.
    Remote {
        /// The hub URL, passed to the driver factory verbatim.
        url: String,
    },
}

fn default_retries() -> u32 {
    3
}

fn default_request_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    1000
}

/// Immutable configuration for one automation run.
///
/// Optional fields that are `None` are simply omitted from the derived
/// capability set. The retry and timeout fields have serde defaults so a
/// minimal config only needs `platform` and a device/app description.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AutomationConfig {
    /// Target platform family.
    #[serde(default)]
    pub platform: Platform,

    /// Local service or remote hub.
    #[serde(default)]
    pub endpoint: Endpoint,

    /// Device UDID.
    #[serde(default)]
    pub udid: Option<String>,

    /// Device name. An empty or missing name is replaced with a sentinel
    /// placeholder during capability derivation.
    #[serde(default)]
    pub device_name: Option<String>,

    /// Path to the application under test.
    #[serde(default)]
    pub app_path: Option<String>,

    /// Initial device orientation (e.g. "PORTRAIT").
    #[serde(default)]
    pub orientation: Option<String>,

    /// Platform OS version.
    #[serde(default)]
    pub platform_version: Option<String>,

    /// Driver automation engine name (e.g. "UiAutomator2"). Only included in
    /// the capability set when non-empty.
    #[serde(default)]
    pub automation_name: Option<String>,

    /// Grant all app permissions automatically at install time.
    #[serde(default)]
    pub auto_grant_permissions: bool,

    /// Reinstall the app and wipe its data before the session.
    #[serde(default)]
    pub full_reset: bool,

    /// Keep app state between sessions.
    #[serde(default)]
    pub no_reset: bool,

    /// Android emulator AVD name.
    #[serde(default)]
    pub avd: Option<String>,

    /// Extra arguments for launching the AVD.
    #[serde(default)]
    pub avd_args: Option<String>,

    /// Android activity to launch.
    #[serde(default)]
    pub app_activity: Option<String>,

    /// Android activity to wait for after launch.
    #[serde(default)]
    pub app_wait_activity: Option<String>,

    /// Android intent category.
    #[serde(default)]
    pub intent_category: Option<String>,

    /// iOS code-signing identity.
    #[serde(default)]
    pub xcode_signing_id: Option<String>,

    /// iOS development team organization id.
    #[serde(default)]
    pub xcode_org_id: Option<String>,

    /// iOS: wait for the app to become idle before each command.
    #[serde(default)]
    pub wait_for_quiescence: bool,

    /// Use the cheap visibility heuristic instead of a full hit test.
    #[serde(default)]
    pub simple_is_visible_check: bool,

    /// Driver-side timeout before an idle session is reaped, in seconds.
    #[serde(default)]
    pub new_command_timeout_secs: Option<u64>,

    /// Grid-side idle timeout, in seconds.
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,

    /// How many times session creation is retried after the first failed
    /// attempt.
    #[serde(default = "default_retries")]
    pub start_session_retries: u32,

    /// Default timeout for polled waits, in whole seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Default poll interval for [`wait_for_condition`], in milliseconds.
    ///
    /// [`wait_for_condition`]: crate::automator::Automator::wait_for_condition
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Free-form capabilities merged into the derived set last; they win
    /// over everything derived from the fields above.
    #[serde(default)]
    pub custom_capabilities: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: AutomationConfig =
            serde_json::from_str(r#"{ "platform": "IOS" }"#).unwrap();
        assert_eq!(config.platform, Platform::Ios);
        assert_eq!(config.endpoint, Endpoint::Local);
        assert_eq!(config.start_session_retries, 3);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.poll_interval_ms, 1000);
        assert!(config.custom_capabilities.is_empty());
    }

    #[test]
    fn endpoint_is_an_explicit_tag() {
        let config: AutomationConfig = serde_json::from_str(
            r#"{
                "platform": "ANDROID",
                "endpoint": { "kind": "remote", "url": "http://localhost:4723" }
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.endpoint,
            Endpoint::Remote {
                url: "http://localhost:4723".to_string()
            }
        );
    }

    #[test]
    fn platform_uses_uppercase_names() {
        assert_eq!(
            serde_json::to_string(&Platform::Android).unwrap(),
            "\"ANDROID\""
        );
        let p: Platform = serde_json::from_str("\"NONE\"").unwrap();
        assert_eq!(p, Platform::None);
    }

    #[test]
    fn default_platform_is_none() {
        let config: AutomationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.platform, Platform::None);
    }
}
