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

use glint_core::platform::{CachedRefreshRate, RefreshRate, RefreshRateSource};
use winit::monitor::MonitorHandle;

/// Snaps a winit millihertz reading to a supported rate.
///
/// Monitors that do not report a rate are treated as 60 Hz.
pub fn refresh_rate_from_millihertz(millihertz: Option<u32>) -> RefreshRate {
    match millihertz {
        Some(mhz) if mhz > 0 => RefreshRate::from_millihertz(mhz),
        _ => RefreshRate::default(),
    }
}

/// Refresh rate of the monitor the chat surface is displayed on.
///
/// The rate is read when the source is created and again whenever the host
/// calls [`update`](Self::update) (window moved, display mode changed), so
/// [`refresh_rate`](RefreshRateSource::refresh_rate) never touches winit.
#[derive(Debug, Default)]
pub struct MonitorRefreshRate {
    cached: CachedRefreshRate,
}

impl MonitorRefreshRate {
    /// Reads the current rate of `monitor`.
    pub fn from_monitor(monitor: &MonitorHandle) -> Self {
        let source = Self::default();
        source.update(monitor);
        source
    }

    /// Re-reads the rate of `monitor`.
    pub fn update(&self, monitor: &MonitorHandle) {
        let rate = refresh_rate_from_millihertz(monitor.refresh_rate_millihertz());
        log::debug!("Monitor {:?} refresh rate: {} Hz", monitor.name(), rate.hz());
        self.cached.store(rate);
    }
}

impl RefreshRateSource for MonitorRefreshRate {
    fn refresh_rate(&self) -> RefreshRate {
        self.cached.refresh_rate()
    }
}
