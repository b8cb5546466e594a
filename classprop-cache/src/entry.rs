//! Per-class cache entry.

use std::time::{Duration, Instant};

use classprop_core::ClassKey;

/// Cached value for one class.
#[derive(Clone, Debug)]
pub(crate) struct CacheEntry<V> {
    pub(crate) owning_class: ClassKey,
    pub(crate) computed_value: V,
    pub(crate) computed_at: Instant,
}

impl<V> CacheEntry<V> {
    pub(crate) fn new(owning_class: ClassKey, computed_value: V, computed_at: Instant) -> Self {
        Self {
            owning_class,
            computed_value,
            computed_at,
        }
    }

    /// Valid while `now - computed_at < timeout`; always valid without a timeout.
    pub(crate) fn is_valid(&self, now: Instant, timeout: Option<Duration>) -> bool {
        match timeout {
            None => true,
            Some(timeout) => now.saturating_duration_since(self.computed_at) < timeout,
        }
    }
}
