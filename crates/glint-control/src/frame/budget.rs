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

//! Per-device frame budgets and the pure predicates built on them.

use serde::Serialize;

/// A frame is dropped when it takes more than this multiple of the budget.
pub const DROPPED_FRAME_SLACK: f64 = 1.5;

/// Refresh rate assumed when a caller passes an unusable value.
const FALLBACK_HZ: f64 = 60.0;

fn sanitize_hz(hz: f64) -> f64 {
    if hz.is_finite() && hz > 0.0 {
        hz
    } else {
        log::warn!("Invalid refresh rate {hz}, clamping to {FALLBACK_HZ} Hz");
        FALLBACK_HZ
    }
}

/// The time one frame may take at `hz`, in milliseconds.
///
/// 16.67 ms at 60 Hz, 8.33 ms at 120 Hz, 4.17 ms at 240 Hz.
pub fn frame_budget_ms(hz: f64) -> f64 {
    1000.0 / sanitize_hz(hz)
}

/// Returns `true` if `duration_ms` does not fit in one frame at `hz`.
pub fn exceeds_frame_budget(duration_ms: f64, hz: f64) -> bool {
    duration_ms > frame_budget_ms(hz)
}

/// Returns `true` if a measured frame time counts as a dropped frame.
pub fn is_dropped_frame(frame_time_ms: f64, budget_ms: f64, slack: f64) -> bool {
    frame_time_ms > budget_ms * slack
}

/// Aggregate frame statistics for one measured animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Fraction of frames that were dropped, in `[0, 1]`.
    pub dropped_frame_rate: f64,
    /// Mean time per frame in milliseconds.
    pub average_frame_time: f64,
    /// The per-frame budget at the measured refresh rate.
    pub frame_budget: f64,
    /// Whether the average frame fit in the budget.
    pub within_budget: bool,
}

/// Summarizes `total` frames rendered over `duration_ms` at `hz`.
///
/// With `total == 0` both the rate and the average are zero rather than NaN.
pub fn performance_metrics(dropped: u64, total: u64, duration_ms: f64, hz: f64) -> PerformanceMetrics {
    let frame_budget = frame_budget_ms(hz);
    let (dropped_frame_rate, average_frame_time) = if total == 0 {
        (0.0, 0.0)
    } else {
        (dropped as f64 / total as f64, duration_ms / total as f64)
    };
    PerformanceMetrics {
        dropped_frame_rate,
        average_frame_time,
        frame_budget,
        within_budget: average_frame_time <= frame_budget,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn budgets_for_supported_rates() {
        assert_relative_eq!(frame_budget_ms(60.0), 16.666_666, epsilon = 1e-4);
        assert_relative_eq!(frame_budget_ms(120.0), 8.333_333, epsilon = 1e-4);
        assert_relative_eq!(frame_budget_ms(240.0), 4.166_666, epsilon = 1e-4);
    }

    #[test]
    fn invalid_rates_fall_back_to_60hz() {
        assert_relative_eq!(frame_budget_ms(0.0), frame_budget_ms(60.0));
        assert_relative_eq!(frame_budget_ms(-120.0), frame_budget_ms(60.0));
        assert_relative_eq!(frame_budget_ms(f64::INFINITY), frame_budget_ms(60.0));
    }

    #[test]
    fn twenty_ms_at_120hz_is_a_dropped_frame() {
        let budget = frame_budget_ms(120.0);
        assert!(is_dropped_frame(20.0, budget, DROPPED_FRAME_SLACK));
        // 12.5 ms is exactly the threshold and is not dropped.
        assert!(!is_dropped_frame(12.5, budget, DROPPED_FRAME_SLACK));
        assert!(!is_dropped_frame(9.0, budget, DROPPED_FRAME_SLACK));
    }

    #[test]
    fn exceeds_budget_is_strict() {
        assert!(exceeds_frame_budget(17.0, 60.0));
        assert!(!exceeds_frame_budget(16.0, 60.0));
        assert!(exceeds_frame_budget(9.0, 120.0));
    }

    #[test]
    fn metrics_for_a_healthy_run() {
        let metrics = performance_metrics(3, 60, 900.0, 60.0);
        assert_relative_eq!(metrics.dropped_frame_rate, 0.05);
        assert_relative_eq!(metrics.average_frame_time, 15.0);
        assert_relative_eq!(metrics.frame_budget, 1000.0 / 60.0);
        assert!(metrics.within_budget);
    }

    #[test]
    fn metrics_for_a_slow_run() {
        let metrics = performance_metrics(10, 30, 600.0, 120.0);
        assert_relative_eq!(metrics.average_frame_time, 20.0);
        assert!(!metrics.within_budget);
    }

    #[test]
    fn zero_frames_never_produce_nan() {
        let metrics = performance_metrics(0, 0, 250.0, 60.0);
        assert_eq!(metrics.dropped_frame_rate, 0.0);
        assert_eq!(metrics.average_frame_time, 0.0);
        assert!(!metrics.dropped_frame_rate.is_nan());
        assert!(!metrics.average_frame_time.is_nan());
        assert!(metrics.within_budget);
    }
}
