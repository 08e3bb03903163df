//! Shared latest-version handle
//!
//! The producer replaces the stored value wholesale; readers clone the Arc
//! and work with a consistent version for as long as they hold it. The lock
//! is held only for the pointer swap, so a slow reader never blocks the
//! producer and vice versa.

use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct Latest<T> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self { slot: Mutex::new(None) }
    }

    /// Publish a new version, replacing whatever was there.
    pub fn publish(&self, value: T) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(value));
    }

    /// The newest published version, or None before the first publish.
    pub fn get(&self) -> Option<Arc<T>> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_replaces_wholesale() {
        let latest: Latest<u32> = Latest::new();
        assert!(latest.get().is_none());
        latest.publish(1);
        let held = latest.get().unwrap();
        latest.publish(2);
        // The old version stays valid for whoever holds it
        assert_eq!(*held, 1);
        assert_eq!(*latest.get().unwrap(), 2);
    }
}
