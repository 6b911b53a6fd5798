//! Shared test helpers for appilot-core integration tests.
//!
//! Provides a scripted mock driver whose behavior is programmed per-call and
//! whose state is shared with the test through an `Arc`, plus a mock driver
//! factory with a configurable failure budget for bootstrap tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use appilot_core::capabilities::Capabilities;
use appilot_core::config::{AutomationConfig, Endpoint, Platform};
use appilot_core::driver::{
    BiometricAction, DriverError, DriverFactory, MobileDriver, PressKind,
};
use appilot_core::element::{ElementRef, Rect, Selector};
use appilot_core::geometry::{Point, ScreenSize};

/// One recorded touch sequence.
#[derive(Debug, Clone)]
pub struct RecordedGesture {
    pub press: PressKind,
    pub from: Point,
    pub to: Point,
    pub wait_millis: u32,
}

/// Shared state behind a [`MockDriver`]; tests keep an `Arc` to it and
/// inspect calls after exercising the code under test.
pub struct MockState {
    pub session: Mutex<Option<String>>,
    pub screen: Mutex<ScreenSize>,
    pub gestures: Mutex<Vec<RecordedGesture>>,
    pub taps: Mutex<Vec<ElementRef>>,
    pub set_texts: Mutex<Vec<(String, String)>>,
    pub biometrics: Mutex<Vec<BiometricAction>>,
    /// Scripted `find_element` outcomes; when exhausted, lookups fail with
    /// not-found.
    pub find_script: Mutex<VecDeque<Result<ElementRef, DriverError>>>,
    /// Scripted `find_elements` outcomes; when exhausted, lookups return
    /// an empty list.
    pub find_all_script: Mutex<VecDeque<Vec<ElementRef>>>,
    /// Scripted `is_displayed` outcomes; when exhausted, elements report
    /// visible.
    pub displayed_script: Mutex<VecDeque<bool>>,
    /// One-shot error injected into the next `perform_gesture`.
    pub gesture_error: Mutex<Option<DriverError>>,
    /// When true, `hide_keyboard` fails.
    pub hide_keyboard_fails: Mutex<bool>,
    pub element_rect: Mutex<Rect>,
    pub element_text: Mutex<String>,
    pub page_source: Mutex<String>,
    pub window_size_calls: AtomicU32,
    pub find_calls: AtomicU32,
    pub quit_calls: AtomicU32,
}

impl MockState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(Some("mock-session".to_string())),
            screen: Mutex::new(ScreenSize {
                width: 1000,
                height: 2000,
            }),
            gestures: Mutex::new(Vec::new()),
            taps: Mutex::new(Vec::new()),
            set_texts: Mutex::new(Vec::new()),
            biometrics: Mutex::new(Vec::new()),
            find_script: Mutex::new(VecDeque::new()),
            find_all_script: Mutex::new(VecDeque::new()),
            displayed_script: Mutex::new(VecDeque::new()),
            gesture_error: Mutex::new(None),
            hide_keyboard_fails: Mutex::new(false),
            element_rect: Mutex::new(Rect {
                x: 100,
                y: 200,
                width: 200,
                height: 100,
            }),
            element_text: Mutex::new("hello".to_string()),
            page_source: Mutex::new(String::new()),
            window_size_calls: AtomicU32::new(0),
            find_calls: AtomicU32::new(0),
            quit_calls: AtomicU32::new(0),
        })
    }

    pub fn script_find(&self, outcomes: Vec<Result<ElementRef, DriverError>>) {
        *self.find_script.lock().unwrap() = outcomes.into();
    }

    pub fn script_displayed(&self, outcomes: Vec<bool>) {
        *self.displayed_script.lock().unwrap() = outcomes.into();
    }

    pub fn recorded_gestures(&self) -> Vec<RecordedGesture> {
        self.gestures.lock().unwrap().clone()
    }
}

/// Mock driver: a thin handle over shared [`MockState`].
pub struct MockDriver(pub Arc<MockState>);

#[async_trait]
impl MobileDriver for MockDriver {
    async fn session_id(&self) -> Option<String> {
        self.0.session.lock().unwrap().clone()
    }

    async fn window_size(&self) -> Result<ScreenSize, DriverError> {
        self.0.window_size_calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.0.screen.lock().unwrap())
    }

    async fn find_element(&self, selector: &Selector) -> Result<ElementRef, DriverError> {
        self.0.find_calls.fetch_add(1, Ordering::SeqCst);
        self.0
            .find_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DriverError::NotFound(selector.to_string())))
    }

    async fn find_elements(&self, _selector: &Selector) -> Result<Vec<ElementRef>, DriverError> {
        Ok(self
            .0
            .find_all_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn is_displayed(&self, _element: &ElementRef) -> Result<bool, DriverError> {
        Ok(self
            .0
            .displayed_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(true))
    }

    async fn tap(&self, element: &ElementRef) -> Result<(), DriverError> {
        self.0.taps.lock().unwrap().push(element.clone());
        Ok(())
    }

    async fn element_text(&self, _element: &ElementRef) -> Result<String, DriverError> {
        Ok(self.0.element_text.lock().unwrap().clone())
    }

    async fn set_element_text(
        &self,
        element: &ElementRef,
        text: &str,
    ) -> Result<(), DriverError> {
        self.0
            .set_texts
            .lock()
            .unwrap()
            .push((element.handle.clone(), text.to_string()));
        Ok(())
    }

    async fn element_attribute(
        &self,
        _element: &ElementRef,
        _name: &str,
    ) -> Result<Option<String>, DriverError> {
        Ok(None)
    }

    async fn element_rect(&self, _element: &ElementRef) -> Result<Rect, DriverError> {
        Ok(*self.0.element_rect.lock().unwrap())
    }

    async fn perform_gesture(
        &self,
        press: PressKind,
        from: Point,
        to: Point,
        wait_millis: u32,
    ) -> Result<(), DriverError> {
        if let Some(error) = self.0.gesture_error.lock().unwrap().take() {
            return Err(error);
        }
        self.0.gestures.lock().unwrap().push(RecordedGesture {
            press,
            from,
            to,
            wait_millis,
        });
        Ok(())
    }

    async fn hide_keyboard(&self) -> Result<(), DriverError> {
        if *self.0.hide_keyboard_fails.lock().unwrap() {
            Err(DriverError::CommandFailed("no keyboard shown".to_string()))
        } else {
            Ok(())
        }
    }

    async fn biometric(&self, action: BiometricAction) -> Result<(), DriverError> {
        self.0.biometrics.lock().unwrap().push(action);
        Ok(())
    }

    async fn page_source(&self) -> Result<String, DriverError> {
        Ok(self.0.page_source.lock().unwrap().clone())
    }

    async fn quit(&self) -> Result<(), DriverError> {
        self.0.quit_calls.fetch_add(1, Ordering::SeqCst);
        *self.0.session.lock().unwrap() = None;
        Ok(())
    }
}

/// Mock factory that fails its first `fail_first` creation attempts and
/// then hands out drivers over shared [`MockState`].
pub struct MockFactory {
    pub state: Arc<MockState>,
    pub fail_first: u32,
    pub attempts: AtomicU32,
    pub android_calls: AtomicU32,
    pub ios_calls: AtomicU32,
    pub last_capabilities: Mutex<Option<Capabilities>>,
    pub last_endpoint: Mutex<Option<Endpoint>>,
}

impl MockFactory {
    pub fn new(fail_first: u32) -> Self {
        Self {
            state: MockState::new(),
            fail_first,
            attempts: AtomicU32::new(0),
            android_calls: AtomicU32::new(0),
            ios_calls: AtomicU32::new(0),
            last_capabilities: Mutex::new(None),
            last_endpoint: Mutex::new(None),
        }
    }

    fn create(
        &self,
        endpoint: &Endpoint,
        capabilities: &Capabilities,
    ) -> Result<Box<dyn MobileDriver>, DriverError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_capabilities.lock().unwrap() = Some(capabilities.clone());
        *self.last_endpoint.lock().unwrap() = Some(endpoint.clone());
        if attempt <= self.fail_first {
            return Err(DriverError::SessionNotCreated(format!(
                "simulated failure on attempt {}",
                attempt
            )));
        }
        *self.state.session.lock().unwrap() = Some(format!("session-{}", attempt));
        Ok(Box::new(MockDriver(self.state.clone())))
    }
}

#[async_trait]
impl DriverFactory for MockFactory {
    async fn create_android(
        &self,
        endpoint: &Endpoint,
        capabilities: &Capabilities,
    ) -> Result<Box<dyn MobileDriver>, DriverError> {
        self.android_calls.fetch_add(1, Ordering::SeqCst);
        self.create(endpoint, capabilities)
    }

    async fn create_ios(
        &self,
        endpoint: &Endpoint,
        capabilities: &Capabilities,
    ) -> Result<Box<dyn MobileDriver>, DriverError> {
        self.ios_calls.fetch_add(1, Ordering::SeqCst);
        self.create(endpoint, capabilities)
    }
}

/// A minimal config for the given platform, with one retry budget knob.
pub fn test_config(platform: Platform, retries: u32) -> AutomationConfig {
    AutomationConfig {
        platform,
        device_name: Some("Test Device".to_string()),
        app_path: Some("/builds/app.bin".to_string()),
        start_session_retries: retries,
        ..Default::default()
    }
}
