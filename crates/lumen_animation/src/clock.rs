//! Monotonic clocks
//!
//! The scheduler never reads time on its own; the host passes timestamps in,
//! usually from one of these clocks.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of monotonic timestamps in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall-clock time measured from construction
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually advanced clock
///
/// Clones share the same time, so a test can hold one copy while the code
/// under test reads another.
#[derive(Clone, Debug, Default)]
pub struct VirtualClock {
    now: Rc<Cell<f64>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `delta_ms` (negative deltas are ignored)
    pub fn advance(&self, delta_ms: f64) -> f64 {
        let next = self.now.get() + delta_ms.max(0.0);
        self.now.set(next);
        next
    }

    /// Jump to an absolute time; earlier times are ignored
    pub fn set(&self, now_ms: f64) {
        if now_ms < self.now.get() {
            tracing::debug!(
                "VirtualClock: ignoring backwards jump {} -> {}",
                self.now.get(),
                now_ms
            );
            return;
        }
        self.now.set(now_ms);
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_clock_shared() {
        let clock = VirtualClock::new();
        let other = clock.clone();
        clock.advance(16.0);
        assert_eq!(other.now_ms(), 16.0);
    }

    #[test]
    fn test_virtual_clock_monotonic() {
        let clock = VirtualClock::new();
        clock.set(100.0);
        clock.set(50.0);
        clock.advance(-10.0);
        assert_eq!(clock.now_ms(), 100.0);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
