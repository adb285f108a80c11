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

//! Display refresh rates and the sources that report them.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::atomic::{AtomicU32, Ordering};

/// The refresh rates the runtime budgets for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefreshRate {
    /// 60 Hz, the baseline for most phones.
    #[default]
    Hz60,
    /// 120 Hz "ProMotion"-class panels.
    Hz120,
    /// 240 Hz gaming panels.
    Hz240,
}

impl RefreshRate {
    /// The nominal rate in hertz.
    pub const fn hz(self) -> u32 {
        match self {
            RefreshRate::Hz60 => 60,
            RefreshRate::Hz120 => 120,
            RefreshRate::Hz240 => 240,
        }
    }

    /// Snaps an arbitrary measured rate to the nearest supported one.
    ///
    /// Non-finite or non-positive values fall back to 60 Hz.
    pub fn from_hz(hz: f64) -> Self {
        if !hz.is_finite() || hz <= 0.0 {
            return RefreshRate::Hz60;
        }
        if hz < 90.0 {
            RefreshRate::Hz60
        } else if hz < 180.0 {
            RefreshRate::Hz120
        } else {
            RefreshRate::Hz240
        }
    }

    /// Snaps a millihertz reading (as reported by windowing systems).
    pub fn from_millihertz(millihertz: u32) -> Self {
        Self::from_hz(f64::from(millihertz) / 1000.0)
    }
}

/// Reports the refresh rate of the display the chat surface renders on.
pub trait RefreshRateSource: Send + Sync + Debug + 'static {
    /// Returns the current refresh rate.
    fn refresh_rate(&self) -> RefreshRate;
}

/// A source that always reports the same rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRefreshRate(pub RefreshRate);

impl RefreshRateSource for FixedRefreshRate {
    fn refresh_rate(&self) -> RefreshRate {
        self.0
    }
}

/// A synchronous cache in front of a slow (possibly asynchronous) detector.
///
/// The detector stores its result whenever it completes; readers always get
/// the last known value without waiting.
#[derive(Debug)]
pub struct CachedRefreshRate {
    hz: AtomicU32,
}

impl CachedRefreshRate {
    /// Creates a cache holding `initial` until the first detection lands.
    pub fn new(initial: RefreshRate) -> Self {
        Self {
            hz: AtomicU32::new(initial.hz()),
        }
    }

    /// Stores a freshly detected rate.
    pub fn store(&self, rate: RefreshRate) {
        let previous = self.hz.swap(rate.hz(), Ordering::Relaxed);
        if previous != rate.hz() {
            log::debug!("Refresh rate changed: {previous} Hz -> {} Hz", rate.hz());
        }
    }
}

impl Default for CachedRefreshRate {
    fn default() -> Self {
        Self::new(RefreshRate::default())
    }
}

impl RefreshRateSource for CachedRefreshRate {
    fn refresh_rate(&self) -> RefreshRate {
        RefreshRate::from_hz(f64::from(self.hz.load(Ordering::Relaxed)))
    }
}
