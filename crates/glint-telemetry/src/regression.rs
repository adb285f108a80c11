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

//! Per-effect performance history and regression detection.

use crate::config::TelemetryConfig;
use glint_core::utils::RingBuffer;
use serde::Serialize;
use std::collections::HashMap;

/// One finished run of an effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceRecord {
    /// Run duration.
    pub duration_ms: f64,
    /// Dropped frames of the run.
    pub dropped_frames: u64,
    /// Clock timestamp at which the run was recorded.
    pub timestamp_ms: f64,
}

/// Outcome of comparing a run against the recent history of its effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum RegressionVerdict {
    /// Not enough recent runs to form a baseline.
    InsufficientData {
        /// Recent runs available.
        samples: usize,
    },
    /// The run is in line with the baseline.
    Normal,
    /// The run is abnormally slow or janky.
    Regressed {
        /// Average duration of the compared runs.
        baseline_duration_ms: f64,
        /// Average dropped frames of the compared runs.
        baseline_dropped_frames: f64,
    },
}

impl RegressionVerdict {
    /// Returns `true` for [`RegressionVerdict::Regressed`].
    pub fn is_regression(&self) -> bool {
        matches!(self, RegressionVerdict::Regressed { .. })
    }
}

/// Bounded run history, one ring buffer per effect name.
#[derive(Debug, Clone)]
pub struct PerformanceHistory {
    config: TelemetryConfig,
    records: HashMap<String, RingBuffer<PerformanceRecord>>,
}

impl PerformanceHistory {
    /// Creates an empty history.
    pub fn new(config: TelemetryConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
        }
    }

    /// Compares a run against the baseline, then records it.
    ///
    /// The baseline is the average of the most recent in-window records,
    /// excluding the run being checked.
    pub fn check_and_record(
        &mut self,
        effect_name: &str,
        duration_ms: f64,
        dropped_frames: u64,
        now_ms: f64,
    ) -> RegressionVerdict {
        let config = self.config;
        let buffer = self
            .records
            .entry(effect_name.to_string())
            .or_insert_with(|| RingBuffer::new(config.max_history_size));

        let window_start = now_ms - config.regression_window_ms;
        let recent: Vec<&PerformanceRecord> = buffer
            .iter()
            .rev()
            .filter(|r| r.timestamp_ms >= window_start)
            .take(config.regression_sample_size)
            .collect();

        let verdict = if recent.len() < config.regression_min_samples {
            RegressionVerdict::InsufficientData {
                samples: recent.len(),
            }
        } else {
            let n = recent.len() as f64;
            let baseline_duration_ms = recent.iter().map(|r| r.duration_ms).sum::<f64>() / n;
            let baseline_dropped_frames =
                recent.iter().map(|r| r.dropped_frames as f64).sum::<f64>() / n;

            let slower = duration_ms > baseline_duration_ms * config.duration_regression_factor;
            let jankier =
                dropped_frames as f64 > baseline_dropped_frames * config.dropped_frames_regression_factor;
            if slower || jankier {
                RegressionVerdict::Regressed {
                    baseline_duration_ms,
                    baseline_dropped_frames,
                }
            } else {
                RegressionVerdict::Normal
            }
        };

        buffer.push(PerformanceRecord {
            duration_ms,
            dropped_frames,
            timestamp_ms: now_ms,
        });
        verdict
    }

    /// Records stored for `effect_name`.
    pub fn len(&self, effect_name: &str) -> usize {
        self.records.get(effect_name).map_or(0, RingBuffer::len)
    }

    /// Returns `true` when no effect has any record.
    pub fn is_empty(&self) -> bool {
        self.records.values().all(RingBuffer::is_empty)
    }

    /// Forgets every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn history() -> PerformanceHistory {
        PerformanceHistory::new(TelemetryConfig::default())
    }

    #[test]
    fn needs_three_prior_records() {
        let mut history = history();
        // Even a wildly slow run cannot regress without a baseline.
        assert_eq!(
            history.check_and_record("glow", 100.0, 0, 0.0),
            RegressionVerdict::InsufficientData { samples: 0 }
        );
        history.check_and_record("glow", 100.0, 0, 1.0);
        assert_eq!(
            history.check_and_record("glow", 10_000.0, 50, 2.0),
            RegressionVerdict::InsufficientData { samples: 2 }
        );
        assert_eq!(history.len("glow"), 3);
    }

    #[test]
    fn flags_slow_runs() {
        let mut history = history();
        for t in 0..3 {
            history.check_and_record("glow", 100.0, 1, f64::from(t));
        }
        assert_eq!(history.check_and_record("glow", 140.0, 1, 10.0), RegressionVerdict::Normal);

        match history.check_and_record("glow", 400.0, 1, 11.0) {
            RegressionVerdict::Regressed {
                baseline_duration_ms,
                baseline_dropped_frames,
            } => {
                assert_relative_eq!(baseline_duration_ms, 110.0);
                assert_relative_eq!(baseline_dropped_frames, 1.0);
            }
            other => panic!("expected a regression, got {other:?}"),
        }
    }

    #[test]
    fn flags_janky_runs() {
        let mut history = history();
        for t in 0..3 {
            history.check_and_record("ribbon", 200.0, 2, f64::from(t));
        }
        assert!(!history.check_and_record("ribbon", 200.0, 4, 5.0).is_regression());
        assert!(history.check_and_record("ribbon", 200.0, 6, 6.0).is_regression());
    }

    #[test]
    fn only_recent_records_form_the_baseline() {
        let mut history = history();
        let hour = TelemetryConfig::default().regression_window_ms;
        for t in 0..5 {
            history.check_and_record("zoom", 100.0, 0, f64::from(t));
        }
        // Everything above has aged out of the window.
        assert_eq!(
            history.check_and_record("zoom", 1_000.0, 9, hour + 10.0),
            RegressionVerdict::InsufficientData { samples: 0 }
        );
    }

    #[test]
    fn history_is_bounded_and_per_effect() {
        let config = TelemetryConfig {
            max_history_size: 4,
            ..TelemetryConfig::default()
        };
        let mut history = PerformanceHistory::new(config);
        for t in 0..10 {
            history.check_and_record("a", 10.0, 0, f64::from(t));
        }
        history.check_and_record("b", 10.0, 0, 0.0);

        assert_eq!(history.len("a"), 4);
        assert_eq!(history.len("b"), 1);
        assert_eq!(history.len("c"), 0);
        history.clear();
        assert!(history.is_empty());
    }
}
