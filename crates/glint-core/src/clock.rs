// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Millisecond clocks used for cooldowns, frame sampling, and cache ages.
//!
//! Every timestamp in the runtime is a monotonic millisecond value expressed
//! as `f64`, so sub-millisecond frame deltas survive (8.33 ms at 120 Hz).

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// A monotonic source of millisecond timestamps.
///
/// Cooldown math and cache ages are only correct if successive calls never
/// go backwards.
pub trait Clock: Send + Sync + Debug + 'static {
    /// Returns the current timestamp in milliseconds.
    fn now_ms(&self) -> f64;
}

/// A wall-independent clock measuring milliseconds since its creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose origin is the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to.
///
/// Used by tests and by replay tooling that feeds recorded timestamps back
/// through the runtime.
#[derive(Debug)]
pub struct ManualClock {
    now_bits: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at `start_ms`.
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_bits: AtomicU64::new(start_ms.to_bits()),
        }
    }

    /// Moves the clock to `ms`. Attempts to move backwards are ignored.
    pub fn set(&self, ms: f64) {
        let current = self.now_ms();
        if ms < current {
            log::warn!("ManualClock: refusing to move backwards ({current} -> {ms})");
            return;
        }
        self.now_bits.store(ms.to_bits(), Ordering::SeqCst);
    }

    /// Advances the clock by `delta_ms`.
    pub fn advance(&self, delta_ms: f64) {
        if delta_ms > 0.0 {
            self.set(self.now_ms() + delta_ms);
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.now_bits.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
        assert!(a >= 0.0);
    }

    #[test]
    fn manual_clock_advances_and_sets() {
        let clock = ManualClock::new(100.0);
        assert_eq!(clock.now_ms(), 100.0);

        clock.advance(16.5);
        assert_eq!(clock.now_ms(), 116.5);

        clock.set(200.0);
        assert_eq!(clock.now_ms(), 200.0);
    }

    #[test]
    fn manual_clock_refuses_to_rewind() {
        let clock = ManualClock::new(50.0);
        clock.set(10.0);
        assert_eq!(clock.now_ms(), 50.0);

        clock.advance(-5.0);
        assert_eq!(clock.now_ms(), 50.0);
    }
}
