//! Common traits for classprop.
//!
//! These traits define the seams a cache depends on, so time can be
//! driven by hand in tests.

use std::fmt::Debug;
use std::time::Instant;

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of monotonic time for staleness checks.
///
/// Implementations might use:
/// - The system monotonic clock (production)
/// - A manually advanced clock (deterministic tests)
pub trait Clock: Send + Sync + Debug {
    /// Returns the current instant.
    ///
    /// Successive calls must never go backwards.
    fn now(&self) -> Instant;
}
