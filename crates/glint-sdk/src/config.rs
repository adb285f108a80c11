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

//! Runtime configuration.
//!
//! Every tunable of the runtime lives in [`EffectsConfig`], loadable from
//! JSON. Out-of-range values never fail a load: [`EffectsConfig::sanitized`]
//! clamps them to the nearest valid bound and logs a warning.

use glint_control::{FrameMonitorConfig, HapticConfig};
use glint_data::SurfaceCacheConfig;
use glint_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest accepted blur radius, in pixels.
pub const MIN_BLUR_RADIUS: f64 = 0.0;
/// Largest accepted blur radius, in pixels.
pub const MAX_BLUR_RADIUS: f64 = 50.0;

/// An error raised while loading or saving a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid configuration document.
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Frame budget settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Dropped-frame classification.
    #[serde(flatten)]
    pub monitor: FrameMonitorConfig,
    /// Refresh rate assumed when no platform source is configured.
    pub default_refresh_hz: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            monitor: FrameMonitorConfig::default(),
            default_refresh_hz: 60.0,
        }
    }
}

/// Every tunable of the effects runtime.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Offscreen surface cache limits.
    pub cache: SurfaceCacheConfig,
    /// Haptic coordinator settings.
    pub haptics: HapticConfig,
    /// Frame budget settings.
    pub frame: FrameConfig,
    /// Telemetry thresholds.
    pub telemetry: TelemetryConfig,
}

impl EffectsConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Saves the configuration as pretty-printed JSON.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Returns a copy with every out-of-range value clamped to its nearest
    /// valid bound.
    pub fn sanitized(mut self) -> Self {
        let cache = &mut self.cache;
        cache.max_cache_size = clamp_usize("cache.max_cache_size", cache.max_cache_size, 1, usize::MAX);
        cache.max_age_ms = clamp_f64("cache.max_age_ms", cache.max_age_ms, 0.0, f64::MAX);
        cache.sweep_interval_ms = clamp_u64("cache.sweep_interval_ms", cache.sweep_interval_ms, 1, u64::MAX);

        self.haptics.cooldown_ms = clamp_f64("haptics.cooldown_ms", self.haptics.cooldown_ms, 0.0, f64::MAX);

        let frame = &mut self.frame;
        frame.monitor.window_size_ms =
            clamp_f64("frame.window_size_ms", frame.monitor.window_size_ms, 1.0, f64::MAX);
        frame.monitor.drop_slack = clamp_f64("frame.drop_slack", frame.monitor.drop_slack, 1.0, f64::MAX);
        frame.default_refresh_hz =
            clamp_f64("frame.default_refresh_hz", frame.default_refresh_hz, 1.0, 1000.0);

        let telemetry = &mut self.telemetry;
        telemetry.max_history_size =
            clamp_usize("telemetry.max_history_size", telemetry.max_history_size, 1, usize::MAX);
        telemetry.regression_window_ms =
            clamp_f64("telemetry.regression_window_ms", telemetry.regression_window_ms, 1.0, f64::MAX);
        telemetry.regression_sample_size = clamp_usize(
            "telemetry.regression_sample_size",
            telemetry.regression_sample_size,
            1,
            telemetry.max_history_size,
        );
        telemetry.regression_min_samples = clamp_usize(
            "telemetry.regression_min_samples",
            telemetry.regression_min_samples,
            1,
            telemetry.regression_sample_size,
        );
        telemetry.duration_regression_factor = clamp_f64(
            "telemetry.duration_regression_factor",
            telemetry.duration_regression_factor,
            1.0,
            f64::MAX,
        );
        telemetry.dropped_frames_regression_factor = clamp_f64(
            "telemetry.dropped_frames_regression_factor",
            telemetry.dropped_frames_regression_factor,
            1.0,
            f64::MAX,
        );
        self
    }
}

/// Clamps a blur radius to `MIN_BLUR_RADIUS..=MAX_BLUR_RADIUS`.
pub fn clamp_blur_radius(radius: f64) -> f64 {
    clamp_f64("blur radius", radius, MIN_BLUR_RADIUS, MAX_BLUR_RADIUS)
}

fn clamp_f64(name: &str, value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        log::warn!("{name} is NaN, using {min}");
        return min;
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("{name} {value} out of range, clamped to {clamped}");
    }
    clamped
}

fn clamp_usize(name: &str, value: usize, min: usize, max: usize) -> usize {
    let clamped = value.clamp(min, max.max(min));
    if clamped != value {
        log::warn!("{name} {value} out of range, clamped to {clamped}");
    }
    clamped
}

fn clamp_u64(name: &str, value: u64, min: u64, max: u64) -> u64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("{name} {value} out of range, clamped to {clamped}");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = EffectsConfig::default();
        assert_eq!(config.cache.max_cache_size, 10);
        assert_eq!(config.cache.max_age_ms, 60_000.0);
        assert_eq!(config.cache.sweep_interval_ms, 10_000);
        assert_eq!(config.haptics.cooldown_ms, 50.0);
        assert_eq!(config.frame.monitor.window_size_ms, 300.0);
        assert_eq!(config.frame.monitor.drop_slack, 1.5);
        assert_eq!(config.frame.default_refresh_hz, 60.0);
        assert_eq!(config.telemetry.max_history_size, 100);
        assert_eq!(config.telemetry.performance_issue_threshold, 2);
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EffectsConfig::from_json(
            r#"{ "haptics": { "cooldown_ms": 250 }, "frame": { "window_size_ms": 500 } }"#,
        )
        .unwrap();
        assert_eq!(config.haptics.cooldown_ms, 250.0);
        assert_eq!(config.frame.monitor.window_size_ms, 500.0);
        assert_eq!(config.frame.monitor.drop_slack, 1.5);
        assert_eq!(config.cache, SurfaceCacheConfig::default());
    }

    #[test]
    fn sanitize_clamps_instead_of_failing() {
        let mut config = EffectsConfig::default();
        config.cache.max_cache_size = 0;
        config.haptics.cooldown_ms = -5.0;
        config.frame.monitor.drop_slack = 0.5;
        config.frame.default_refresh_hz = f64::NAN;
        config.telemetry.regression_min_samples = 50;

        let config = config.sanitized();
        assert_eq!(config.cache.max_cache_size, 1);
        assert_eq!(config.haptics.cooldown_ms, 0.0);
        assert_eq!(config.frame.monitor.drop_slack, 1.0);
        assert_eq!(config.frame.default_refresh_hz, 1.0);
        assert_eq!(config.telemetry.regression_min_samples, 10);
    }

    #[test]
    fn blur_radius_is_clamped() {
        assert_eq!(clamp_blur_radius(12.5), 12.5);
        assert_eq!(clamp_blur_radius(-3.0), 0.0);
        assert_eq!(clamp_blur_radius(80.0), 50.0);
        assert_eq!(clamp_blur_radius(f64::NAN), 0.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EffectsConfig::from_json("{ not json").is_err());
        assert!(EffectsConfig::from_json(r#"{ "cache": { "max_cache_size": -1 } }"#).is_err());
    }
}
