//! Best-effort quit-on-exit registry.
//!
//! Session bootstrap registers every driver it creates here so that a test
//! harness can end stray sessions when the process exits; normal session
//! teardown reverses the registration. All operations are idempotent and
//! never panic or propagate: once [`run_quit_hooks`] has started the
//! registry is considered closing, and registration/deregistration become
//! silent no-ops — too late to matter, same as registering a JVM shutdown
//! hook during shutdown.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing::debug;

use crate::driver::MobileDriver;

struct Registry {
    next_id: u64,
    drivers: HashMap<u64, Arc<dyn MobileDriver>>,
    closing: bool,
}

static REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();

fn registry() -> MutexGuard<'static, Registry> {
    let lock = REGISTRY.get_or_init(|| {
        Mutex::new(Registry {
            next_id: 0,
            drivers: HashMap::new(),
            closing: false,
        })
    });
    // A poisoned registry is still usable; the state is a plain map.
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Token for one registered quit hook. Inert tokens (issued while the
/// registry is closing) deregister as a no-op.
#[derive(Debug)]
pub struct QuitHook(Option<u64>);

/// Registers a driver to be quit at process exit.
pub fn register_quit_hook(driver: Arc<dyn MobileDriver>) -> QuitHook {
    let mut reg = registry();
    if reg.closing {
        return QuitHook(None);
    }
    reg.next_id += 1;
    let id = reg.next_id;
    reg.drivers.insert(id, driver);
    QuitHook(Some(id))
}

/// Reverses a registration. Safe to call with an inert token or after the
/// registry has started closing.
pub fn deregister_quit_hook(hook: QuitHook) {
    let QuitHook(Some(id)) = hook else { return };
    let mut reg = registry();
    if reg.closing {
        return;
    }
    reg.drivers.remove(&id);
}

/// Quits every still-registered driver, swallowing individual failures.
///
/// Intended to be called once by the host harness as the process winds
/// down; calling it again is harmless. Returns how many drivers were quit.
pub async fn run_quit_hooks() -> usize {
    let drained: Vec<Arc<dyn MobileDriver>> = {
        let mut reg = registry();
        reg.closing = true;
        reg.drivers.drain().map(|(_, driver)| driver).collect()
    };
    let count = drained.len();
    for driver in drained {
        if let Err(error) = driver.quit().await {
            debug!(%error, "ignoring driver error during exit cleanup");
        }
    }
    count
}
