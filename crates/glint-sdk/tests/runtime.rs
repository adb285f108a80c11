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

use glint_core::platform::{FixedRefreshRate, RefreshRate};
use glint_core::ManualClock;
use glint_infra::{HeadlessSurfaceAllocator, LoggingHapticProvider};
use glint_sdk::prelude::*;
use glint_telemetry::sinks::MemorySink;
use std::sync::Arc;

struct Harness {
    runtime: EffectsRuntime,
    clock: Arc<ManualClock>,
    sink: Arc<MemorySink>,
    haptics: Arc<LoggingHapticProvider>,
}

fn harness(config: EffectsConfig) -> Harness {
    let clock = Arc::new(ManualClock::new(0.0));
    let sink = Arc::new(MemorySink::new());
    let haptics = Arc::new(LoggingHapticProvider::new());
    let runtime = EffectsRuntime::builder(HeadlessSurfaceAllocator::new())
        .config(config)
        .clock(clock.clone())
        .telemetry_sink(sink.clone())
        .haptic_provider(haptics.clone(), 1.0)
        .refresh_rate(Arc::new(FixedRefreshRate(RefreshRate::Hz60)))
        .sweeper(false)
        .build()
        .unwrap();
    Harness {
        runtime,
        clock,
        sink,
        haptics,
    }
}

#[test]
fn config_round_trips_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("effects.json");

    let mut config = EffectsConfig::default();
    config.haptics.cooldown_ms = 250.0;
    config.cache.max_cache_size = 4;
    config.to_file(&path).unwrap();

    let loaded = EffectsConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);

    std::fs::write(&path, "{ broken").unwrap();
    assert!(matches!(
        EffectsConfig::from_file(&path),
        Err(glint_sdk::ConfigError::Json(_))
    ));
    assert!(matches!(
        EffectsConfig::from_file(dir.path().join("missing.json")),
        Err(glint_sdk::ConfigError::Io(_))
    ));
}

#[test]
fn builder_sanitizes_the_config() {
    let mut config = EffectsConfig::default();
    config.cache.max_cache_size = 0;
    let h = harness(config);
    assert_eq!(h.runtime.config().cache.max_cache_size, 1);
    assert_eq!(h.runtime.surfaces().config().max_cache_size, 1);
}

#[test]
fn janky_effect_reports_a_performance_issue() {
    let h = harness(EffectsConfig::default());
    let mut scope = h.runtime.scope("send_glow", Metadata::new());

    for delta in [16.0, 16.0, 50.0, 60.0, 70.0] {
        h.clock.advance(delta);
        scope.record_frame();
    }
    assert_eq!(scope.monitor().dropped_frames(), 3);

    let session = scope.finish(Metadata::new()).unwrap();
    assert_eq!(session.dropped_frames, Some(3));
    assert_eq!(session.duration_ms, Some(212.0));
    let metrics = session.frame_metrics.unwrap();
    assert!(!metrics.within_budget);

    assert_eq!(
        h.sink.kinds(),
        vec!["effect_start", "effect_end", "effect_performance_issue"]
    );
    assert_eq!(h.runtime.telemetry().active_effects_count(), 0);
}

#[test]
fn abandoned_scope_is_reported_as_a_failure() {
    let h = harness(EffectsConfig::default());
    {
        let _scope = h.runtime.scope("reaction_burst", Metadata::new());
        h.clock.advance(30.0);
    }
    assert_eq!(h.sink.errors().len(), 1);
    assert_eq!(h.sink.errors()[0].kind(), "effect_error");
    assert_eq!(h.runtime.telemetry().active_effects_count(), 0);
}

#[test]
fn haptics_respect_cooldown_and_reduced_motion() {
    let mut config = EffectsConfig::default();
    config.haptics.cooldown_ms = 250.0;
    let h = harness(config);
    let haptics = h.runtime.haptics();

    assert!(haptics.trigger(HapticKind::Light, false));
    h.clock.advance(100.0);
    assert!(!haptics.trigger(HapticKind::Light, false));
    h.clock.advance(160.0);
    assert!(haptics.trigger(HapticKind::Light, false));
    assert_eq!(h.haptics.pulse_count(), 2);

    haptics.update_reduced_motion(Some(true));
    h.clock.advance(1_000.0);
    assert!(!haptics.trigger(HapticKind::Light, true));
    assert_eq!(h.haptics.pulse_count(), 2);
}

#[test]
fn runtime_follows_the_reduced_motion_preference() {
    let preference = Arc::new(ReducedMotionPreference::new(false));
    let runtime = EffectsRuntime::builder(HeadlessSurfaceAllocator::new())
        .clock(Arc::new(ManualClock::new(0.0)))
        .reduced_motion(preference.clone())
        .sweeper(false)
        .build()
        .unwrap();

    preference.set(true);
    assert!(runtime.haptics().is_reduced_motion());
    // Only the null provider is registered, but admission is still gated.
    assert!(!runtime.haptics().trigger(HapticKind::Success, false));
}

#[test]
fn surfaces_are_pooled_and_runtimes_are_independent() {
    let a = harness(EffectsConfig::default());
    let b = harness(EffectsConfig::default());

    let first = a.runtime.surfaces().get_surface("bubble", 320, 80).unwrap();
    let again = a.runtime.surfaces().get_surface("bubble", 320, 80).unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(first.pixels.len(), 320 * 80 * 4);

    assert!(!b.runtime.surfaces().contains("bubble"));
    assert!(matches!(
        a.runtime.surfaces().get_surface("bubble", 0, 80),
        Err(SurfaceError::InvalidDimensions { .. })
    ));

    a.runtime.shutdown();
    assert!(a.runtime.surfaces().is_empty());
}

#[test]
fn frame_budget_follows_the_refresh_rate() {
    let h = harness(EffectsConfig::default());
    assert_eq!(h.runtime.refresh_rate(), RefreshRate::Hz60);
    assert!((h.runtime.frame_budget_ms() - 16.666).abs() < 0.01);
    assert!(clamp_blur_radius(75.0) <= 50.0);
}

#[tokio::test]
async fn celebrate_plays_a_three_pulse_pattern() {
    let h = harness(EffectsConfig::default());
    assert!(
        h.runtime
            .haptics()
            .trigger_by_context(HapticContext::Celebrate)
            .await
    );
    assert_eq!(h.haptics.pulse_count(), 3);
}
