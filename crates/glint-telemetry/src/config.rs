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

//! Thresholds of the effect correlator.

use serde::{Deserialize, Serialize};

/// Limits and thresholds used by [`EffectTelemetry`](crate::EffectTelemetry).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Records kept per effect name for regression comparison.
    pub max_history_size: usize,
    /// Only records younger than this take part in regression comparison.
    pub regression_window_ms: f64,
    /// Most recent records averaged into the baseline.
    pub regression_sample_size: usize,
    /// Fewer records than this never yield a verdict.
    pub regression_min_samples: usize,
    /// A run slower than this multiple of the baseline duration regresses.
    pub duration_regression_factor: f64,
    /// A run dropping more than this multiple of the baseline drops regresses.
    pub dropped_frames_regression_factor: f64,
    /// Sessions dropping more frames than this emit a performance issue.
    pub performance_issue_threshold: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            max_history_size: 100,
            regression_window_ms: 60.0 * 60.0 * 1000.0,
            regression_sample_size: 10,
            regression_min_samples: 3,
            duration_regression_factor: 1.5,
            dropped_frames_regression_factor: 2.0,
            performance_issue_threshold: 2,
        }
    }
}
