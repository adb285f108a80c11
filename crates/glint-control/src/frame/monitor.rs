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

//! The continuous dropped-frame monitor.
//!
//! A monitor backs one active measurement. Hosts with a vsync callback feed
//! it directly through [`FrameBudgetMonitor::record_frame`]; hosts without
//! one spawn it on a ticker thread scheduled at the frame cadence and read
//! the counters back through the returned [`FrameMonitorHandle`].

use crate::frame::budget::{frame_budget_ms, is_dropped_frame, performance_metrics, PerformanceMetrics};
use crate::frame::window::DroppedFrameWindow;
use glint_core::utils::{spawn_ticker, TickerHandle};
use glint_core::Clock;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Tunables for dropped-frame classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameMonitorConfig {
    /// Span of the trailing dropped-frame window.
    pub window_size_ms: f64,
    /// Multiple of the frame budget above which a frame counts as dropped.
    pub drop_slack: f64,
    /// Drops inside the window above which a warning is logged.
    pub warn_threshold: usize,
}

impl Default for FrameMonitorConfig {
    fn default() -> Self {
        Self {
            window_size_ms: 300.0,
            drop_slack: crate::frame::budget::DROPPED_FRAME_SLACK,
            warn_threshold: 2,
        }
    }
}

/// The classification of one observed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Time since the previous frame.
    pub frame_time_ms: f64,
    /// Whether the frame exceeded the slack-adjusted budget.
    pub dropped: bool,
    /// Drops inside the trailing window after pruning.
    pub drops_in_window: usize,
}

/// Classifies frames of one animation against the device frame budget.
#[derive(Debug, Clone)]
pub struct FrameBudgetMonitor {
    hz: f64,
    budget_ms: f64,
    config: FrameMonitorConfig,
    started_at_ms: f64,
    last_frame_ms: f64,
    window: DroppedFrameWindow,
    dropped_frames: u64,
    total_frames: u64,
}

impl FrameBudgetMonitor {
    /// Starts a measurement at `start_ms` for a display running at `hz`.
    pub fn new(hz: f64, config: FrameMonitorConfig, start_ms: f64) -> Self {
        Self {
            hz,
            budget_ms: frame_budget_ms(hz),
            config,
            started_at_ms: start_ms,
            last_frame_ms: start_ms,
            window: DroppedFrameWindow::new(config.window_size_ms),
            dropped_frames: 0,
            total_frames: 0,
        }
    }

    /// Records a frame presented at `now_ms`.
    pub fn record_frame(&mut self, now_ms: f64) -> FrameSample {
        let frame_time_ms = now_ms - self.last_frame_ms;
        let dropped = is_dropped_frame(frame_time_ms, self.budget_ms, self.config.drop_slack);
        if dropped {
            self.window.record_drop(now_ms);
            self.dropped_frames += 1;
        }
        self.last_frame_ms = now_ms;
        self.total_frames += 1;

        let drops_in_window = self.window.prune(now_ms);
        if drops_in_window > self.config.warn_threshold {
            log::warn!(
                "High dropped-frame count: {} drops in the last {:.0}ms (budget {:.2}ms @ {} Hz)",
                drops_in_window,
                self.window.window_ms(),
                self.budget_ms,
                self.hz
            );
        }

        FrameSample {
            frame_time_ms,
            dropped,
            drops_in_window,
        }
    }

    /// Cumulative dropped frames since the measurement started.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// Cumulative frames observed since the measurement started.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Drops currently inside the trailing window.
    pub fn drops_in_window(&self) -> usize {
        self.window.len()
    }

    /// The per-frame budget in milliseconds.
    pub fn frame_budget_ms(&self) -> f64 {
        self.budget_ms
    }

    /// The refresh rate this measurement budgets for.
    pub fn hz(&self) -> f64 {
        self.hz
    }

    /// Milliseconds between the start of the measurement and `now_ms`.
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.started_at_ms).max(0.0)
    }

    /// Aggregate metrics for everything observed up to `now_ms`.
    pub fn metrics(&self, now_ms: f64) -> PerformanceMetrics {
        performance_metrics(
            self.dropped_frames,
            self.total_frames,
            self.elapsed_ms(now_ms),
            self.hz,
        )
    }

    /// Runs the monitor on its own thread, sampling once per frame budget.
    pub fn spawn(self, clock: Arc<dyn Clock>) -> io::Result<FrameMonitorHandle> {
        let interval = Duration::from_secs_f64(self.budget_ms / 1000.0);
        let state = Arc::new(Mutex::new(self));
        let tick_state = Arc::clone(&state);
        let tick_clock = Arc::clone(&clock);
        let ticker = spawn_ticker("glint-frame-monitor", interval, move || {
            let now = tick_clock.now_ms();
            tick_state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .record_frame(now);
        })?;
        Ok(FrameMonitorHandle {
            state,
            clock,
            ticker,
        })
    }
}

/// Owner of a running monitor loop.
///
/// Stopping cancels the next scheduled tick; counters stay readable.
#[derive(Debug)]
pub struct FrameMonitorHandle {
    state: Arc<Mutex<FrameBudgetMonitor>>,
    clock: Arc<dyn Clock>,
    ticker: TickerHandle,
}

impl FrameMonitorHandle {
    /// Stops the loop. Safe to call more than once.
    pub fn stop(&mut self) {
        self.ticker.stop();
    }

    /// Returns `true` until [`stop`](Self::stop) is called.
    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// A copy of the monitor's current state.
    pub fn snapshot(&self) -> FrameBudgetMonitor {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cumulative dropped frames.
    pub fn dropped_frames(&self) -> u64 {
        self.snapshot().dropped_frames()
    }

    /// Cumulative observed frames.
    pub fn total_frames(&self) -> u64 {
        self.snapshot().total_frames()
    }

    /// Aggregate metrics up to now.
    pub fn metrics(&self) -> PerformanceMetrics {
        self.snapshot().metrics(self.clock.now_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glint_core::MonotonicClock;

    #[test]
    fn on_budget_frames_are_not_dropped() {
        let mut monitor = FrameBudgetMonitor::new(60.0, FrameMonitorConfig::default(), 0.0);
        let mut now = 0.0;
        for _ in 0..10 {
            now += 16.7;
            let sample = monitor.record_frame(now);
            assert!(!sample.dropped);
        }
        assert_eq!(monitor.total_frames(), 10);
        assert_eq!(monitor.dropped_frames(), 0);
    }

    #[test]
    fn a_20ms_frame_at_120hz_is_dropped() {
        let mut monitor = FrameBudgetMonitor::new(120.0, FrameMonitorConfig::default(), 1000.0);
        let sample = monitor.record_frame(1020.0);
        assert!(sample.dropped);
        assert_relative_eq!(sample.frame_time_ms, 20.0);
        assert_eq!(sample.drops_in_window, 1);
        assert_eq!(monitor.dropped_frames(), 1);
    }

    #[test]
    fn last_frame_time_advances_even_on_drops() {
        let mut monitor = FrameBudgetMonitor::new(60.0, FrameMonitorConfig::default(), 0.0);
        assert!(monitor.record_frame(50.0).dropped);
        // Measured from 50, not from 0.
        let sample = monitor.record_frame(66.0);
        assert_relative_eq!(sample.frame_time_ms, 16.0);
        assert!(!sample.dropped);
    }

    #[test]
    fn window_forgets_old_drops_but_total_keeps_them() {
        let mut monitor = FrameBudgetMonitor::new(60.0, FrameMonitorConfig::default(), 0.0);
        monitor.record_frame(40.0);
        monitor.record_frame(80.0);
        monitor.record_frame(120.0);
        assert_eq!(monitor.drops_in_window(), 3);

        // Smooth frames well past the window.
        let mut now = 120.0;
        while now < 600.0 {
            now += 16.0;
            monitor.record_frame(now);
        }
        assert_eq!(monitor.drops_in_window(), 0);
        assert_eq!(monitor.dropped_frames(), 3);
    }

    #[test]
    fn metrics_cover_the_whole_measurement() {
        let mut monitor = FrameBudgetMonitor::new(60.0, FrameMonitorConfig::default(), 100.0);
        monitor.record_frame(116.0);
        monitor.record_frame(132.0);
        monitor.record_frame(180.0);
        let metrics = monitor.metrics(180.0);
        assert_relative_eq!(metrics.dropped_frame_rate, 1.0 / 3.0);
        assert_relative_eq!(metrics.average_frame_time, 80.0 / 3.0);
        assert!(!metrics.within_budget);
    }

    #[test]
    fn spawned_monitor_counts_frames_and_stops() {
        let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());
        let monitor = FrameBudgetMonitor::new(240.0, FrameMonitorConfig::default(), clock.now_ms());
        let mut handle = monitor.spawn(clock).unwrap();

        std::thread::sleep(Duration::from_millis(80));
        handle.stop();
        handle.stop();

        let total = handle.total_frames();
        assert!(total > 0, "the loop should have sampled frames");
        assert!(!handle.is_running());

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(handle.total_frames(), total);
        assert!(handle.dropped_frames() <= total);
    }
}
