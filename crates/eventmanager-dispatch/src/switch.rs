//! Enable/disable switch
//!
//! One switch belongs to each [`EventManager`](crate::EventManager) and is
//! shared by every dispatch it runs, across threads. Bulk operations flip it
//! off to keep their own saves from re-entering the subscribers, then restore
//! the previous state:
//!
//! ```ignore
//! let previous = manager.disable();
//! import_products(&catalog)?;
//! manager.set_enabled(previous);
//! ```
//!
//! Subscribers use the same type for their own state, usually as a `static`
//! so that every instance of the subscriber class shares it.

use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide boolean with swap semantics
///
/// Every setter returns the state it replaced.
#[derive(Debug)]
pub struct Switch {
    enabled: AtomicBool,
}

impl Switch {
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn enable(&self) -> bool {
        self.set_enabled(true)
    }

    pub fn disable(&self) -> bool {
        self.set_enabled(false)
    }

    pub fn set_enabled(&self, enabled: bool) -> bool {
        self.enabled.swap(enabled, Ordering::SeqCst)
    }
}

impl Default for Switch {
    fn default() -> Self {
        Self::new(true)
    }
}
