//! Capability derivation for session creation.
//!
//! A [`Capabilities`] map is derived from the [`AutomationConfig`] once per
//! bootstrap attempt, handed to the extension hook for adjustment, and then
//! passed to the driver factory. Keys are unique and ordered, which keeps
//! the rendering in error messages deterministic.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::{AutomationConfig, Platform};
use crate::error::AutomationError;

/// Placeholder substituted for an empty device name, so downstream consumers
/// never have to disambiguate "" from "not set".
pub const EMPTY_DEVICE_NAME: &str = "Empty Device Name";

/// An ordered key→value capability map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(BTreeMap<String, Value>);

impl Capabilities {
    /// An empty capability set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a capability, replacing any existing value under the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Reads a capability.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Removes a capability.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl std::fmt::Display for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (key, value) in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

fn set_opt(caps: &mut Capabilities, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        caps.set(key, v.clone());
    }
}

/// Derives the capability set for one session-creation attempt.
///
/// Common device/app fields come first, then the platform's extension
/// fields, then the config's custom capabilities, which are merged last and
/// override anything derived. An empty or missing device name is replaced
/// with [`EMPTY_DEVICE_NAME`].
///
/// Fails with a fatal configuration error for [`Platform::None`]; that error
/// is never retried.
pub fn derive_capabilities(config: &AutomationConfig) -> Result<Capabilities, AutomationError> {
    if config.platform == Platform::None {
        return Err(AutomationError::Config(format!(
            "unknown platform: {}",
            config.platform
        )));
    }

    let mut caps = Capabilities::new();
    caps.set("platformName", config.platform.to_string());

    let device_name = match config.device_name.as_deref() {
        Some("") | None => EMPTY_DEVICE_NAME.to_string(),
        Some(name) => name.to_string(),
    };
    caps.set("deviceName", device_name);

    set_opt(&mut caps, "udid", &config.udid);
    set_opt(&mut caps, "app", &config.app_path);
    set_opt(&mut caps, "orientation", &config.orientation);
    set_opt(&mut caps, "platformVersion", &config.platform_version);
    caps.set("autoGrantPermissions", config.auto_grant_permissions);
    caps.set("fullReset", config.full_reset);
    caps.set("noReset", config.no_reset);
    caps.set("simpleIsVisibleCheck", config.simple_is_visible_check);
    if let Some(secs) = config.new_command_timeout_secs {
        caps.set("newCommandTimeout", secs);
    }
    if let Some(secs) = config.idle_timeout_secs {
        caps.set("idleTimeout", secs);
    }
    match config.automation_name.as_deref() {
        Some(name) if !name.is_empty() => caps.set("automationName", name),
        _ => {}
    }

    match config.platform {
        Platform::Android => {
            set_opt(&mut caps, "avd", &config.avd);
            set_opt(&mut caps, "avdArgs", &config.avd_args);
            set_opt(&mut caps, "appActivity", &config.app_activity);
            set_opt(&mut caps, "appWaitActivity", &config.app_wait_activity);
            set_opt(&mut caps, "intentCategory", &config.intent_category);
        }
        Platform::Ios => {
            set_opt(&mut caps, "xcodeSigningId", &config.xcode_signing_id);
            set_opt(&mut caps, "xcodeOrgId", &config.xcode_org_id);
            caps.set("waitForQuiescence", config.wait_for_quiescence);
        }
        Platform::None => unreachable!("rejected above"),
    }

    // Custom capabilities win over everything derived.
    for (key, value) in &config.custom_capabilities {
        caps.set(key.clone(), value.clone());
    }

    Ok(caps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_config(platform: Platform) -> AutomationConfig {
        AutomationConfig {
            platform,
            device_name: Some("Pixel 7".to_string()),
            app_path: Some("/builds/app.apk".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_device_name_gets_sentinel() {
        let mut config = base_config(Platform::Android);
        config.device_name = Some(String::new());
        let caps = derive_capabilities(&config).unwrap();
        assert_eq!(caps.get("deviceName"), Some(&json!(EMPTY_DEVICE_NAME)));

        config.device_name = None;
        let caps = derive_capabilities(&config).unwrap();
        assert_eq!(caps.get("deviceName"), Some(&json!(EMPTY_DEVICE_NAME)));
    }

    #[test]
    fn android_gets_android_extension_fields_only() {
        let mut config = base_config(Platform::Android);
        config.avd = Some("pixel_api_34".to_string());
        config.app_activity = Some(".MainActivity".to_string());
        config.xcode_org_id = Some("TEAM123".to_string());

        let caps = derive_capabilities(&config).unwrap();
        assert_eq!(caps.get("avd"), Some(&json!("pixel_api_34")));
        assert_eq!(caps.get("appActivity"), Some(&json!(".MainActivity")));
        assert!(caps.get("xcodeOrgId").is_none());
        assert!(caps.get("waitForQuiescence").is_none());
    }

    #[test]
    fn ios_gets_ios_extension_fields_only() {
        let mut config = base_config(Platform::Ios);
        config.xcode_signing_id = Some("iPhone Developer".to_string());
        config.avd = Some("pixel_api_34".to_string());

        let caps = derive_capabilities(&config).unwrap();
        assert_eq!(caps.get("xcodeSigningId"), Some(&json!("iPhone Developer")));
        assert_eq!(caps.get("waitForQuiescence"), Some(&json!(false)));
        assert!(caps.get("avd").is_none());
    }

    #[test]
    fn custom_capabilities_override_derived() {
        let mut config = base_config(Platform::Android);
        config
            .custom_capabilities
            .insert("deviceName".to_string(), json!("Overridden"));
        config
            .custom_capabilities
            .insert("extra".to_string(), json!(42));

        let caps = derive_capabilities(&config).unwrap();
        assert_eq!(caps.get("deviceName"), Some(&json!("Overridden")));
        assert_eq!(caps.get("extra"), Some(&json!(42)));
    }

    #[test]
    fn platform_none_is_a_fatal_config_error() {
        let config = base_config(Platform::None);
        let err = derive_capabilities(&config).unwrap_err();
        assert!(matches!(err, AutomationError::Config(_)));
        assert!(err.to_string().contains("NONE"));
    }

    #[test]
    fn empty_automation_name_is_omitted() {
        let mut config = base_config(Platform::Android);
        config.automation_name = Some(String::new());
        let caps = derive_capabilities(&config).unwrap();
        assert!(caps.get("automationName").is_none());

        config.automation_name = Some("UiAutomator2".to_string());
        let caps = derive_capabilities(&config).unwrap();
        assert_eq!(caps.get("automationName"), Some(&json!("UiAutomator2")));
    }

    #[test]
    fn display_is_deterministic_and_names_entries() {
        let caps = derive_capabilities(&base_config(Platform::Android)).unwrap();
        let rendered = caps.to_string();
        assert!(rendered.starts_with('{'));
        assert!(rendered.contains("deviceName: \"Pixel 7\""));
        assert!(rendered.contains("platformName: \"ANDROID\""));
    }
}
