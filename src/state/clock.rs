//! Logical clock driven by the host's tick signal.

use std::sync::atomic::{AtomicU64, Ordering};

/// Logical time unit: one per fixed host quantum.
pub type LogicalTick = u64;

/// Monotonic tick counter.
///
/// Advanced exactly once per external tick signal and never reset within a
/// process. Reads are a single atomic load and never block.
#[derive(Debug, Default)]
pub struct LogicalClock {
    tick: AtomicU64,
}

impl LogicalClock {
    /// Create a clock starting at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tick.
    #[inline]
    pub fn now(&self) -> LogicalTick {
        self.tick.load(Ordering::Acquire)
    }

    /// Advance by one quantum, returning the new tick.
    #[inline]
    pub fn advance(&self) -> LogicalTick {
        self.tick.fetch_add(1, Ordering::AcqRel) + 1
    }
}
