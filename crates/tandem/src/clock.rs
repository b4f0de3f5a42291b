//! The monotonic timestamp source.

use std::time::Instant;

use tandem_core::Timestamp;

/// Monotonic nanosecond ticks since the clock's construction.
///
/// The trace layer treats timestamps as opaque non-decreasing integers;
/// this is the concrete source the harness injects. Nanosecond resolution
/// is enough to order events across two threads in practice, and `Instant`
/// is monotonic by contract.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts a clock; `now()` counts from this moment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Nanoseconds elapsed since construction.
    #[inline]
    #[must_use]
    pub fn now(&self) -> Timestamp {
        // u64 nanoseconds cover ~584 years of run time.
        self.origin.elapsed().as_nanos() as Timestamp
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_non_decreasing() {
        let clock = MonotonicClock::new();
        let mut previous = clock.now();
        for _ in 0..1_000 {
            let current = clock.now();
            assert!(current >= previous);
            previous = current;
        }
    }
}
