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

//! The explicitly owned effects runtime.

use crate::config::EffectsConfig;
use crate::scope::EffectScope;
use anyhow::{Context, Result};
use glint_control::{
    frame_budget_ms, FrameBudgetMonitor, FrameMonitorHandle, HapticCoordinator, HapticProviderRegistry,
};
use glint_core::platform::{FixedRefreshRate, RefreshRate, ReducedMotionSource, RefreshRateSource};
use glint_core::surface::SurfaceAllocator;
use glint_core::telemetry::{Metadata, TelemetrySink};
use glint_core::utils::TickerHandle;
use glint_core::{Clock, MonotonicClock};
use glint_data::SurfaceCache;
use glint_infra::{HeadlessSurfaceAllocator, NullHapticProvider};
use glint_telemetry::sinks::LogSink;
use glint_telemetry::EffectTelemetry;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;

/// Assembles an [`EffectsRuntime`].
pub struct EffectsRuntimeBuilder<A: SurfaceAllocator> {
    allocator: A,
    config: EffectsConfig,
    clock: Option<Arc<dyn Clock>>,
    providers: HapticProviderRegistry,
    reduced_motion: Option<Arc<dyn ReducedMotionSource>>,
    refresh_rate: Option<Arc<dyn RefreshRateSource>>,
    sink: Option<Arc<dyn TelemetrySink>>,
    runtime: Option<Handle>,
    sweeper: bool,
}

impl<A: SurfaceAllocator> EffectsRuntimeBuilder<A> {
    fn new(allocator: A) -> Self {
        Self {
            allocator,
            config: EffectsConfig::default(),
            clock: None,
            providers: HapticProviderRegistry::new(),
            reduced_motion: None,
            refresh_rate: None,
            sink: None,
            runtime: None,
            sweeper: true,
        }
    }

    /// Uses `config`, sanitized, instead of the defaults.
    pub fn config(mut self, config: EffectsConfig) -> Self {
        self.config = config.sanitized();
        self
    }

    /// Uses `clock` instead of a [`MonotonicClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Registers a haptic backend candidate.
    pub fn haptic_provider(mut self, provider: Arc<dyn glint_core::haptics::HapticProvider>, priority: f32) -> Self {
        self.providers.register(provider, priority);
        self
    }

    /// Follows the platform reduced-motion preference.
    pub fn reduced_motion(mut self, source: Arc<dyn ReducedMotionSource>) -> Self {
        self.reduced_motion = Some(source);
        self
    }

    /// Reads the display refresh rate from `source`.
    pub fn refresh_rate(mut self, source: Arc<dyn RefreshRateSource>) -> Self {
        self.refresh_rate = Some(source);
        self
    }

    /// Reports telemetry to `sink` instead of the log.
    pub fn telemetry_sink(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Spawns haptic dispatches on `handle`.
    pub fn tokio_handle(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Enables or disables the background cache sweeper. Enabled by default.
    pub fn sweeper(mut self, enabled: bool) -> Self {
        self.sweeper = enabled;
        self
    }

    /// Creates every component and starts the cache sweeper.
    pub fn build(self) -> Result<EffectsRuntime<A>> {
        let config = self.config;
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()) as Arc<dyn Clock>);
        let refresh_rate = self.refresh_rate.unwrap_or_else(|| {
            Arc::new(FixedRefreshRate(RefreshRate::from_hz(
                config.frame.default_refresh_hz,
            ))) as Arc<dyn RefreshRateSource>
        });

        let surfaces = Arc::new(SurfaceCache::new(self.allocator, Arc::clone(&clock), config.cache));
        let sweeper = if self.sweeper {
            Some(
                surfaces
                    .start_sweeper()
                    .context("Failed to start the surface cache sweeper")?,
            )
        } else {
            None
        };

        let provider = self.providers.select_or(Arc::new(NullHapticProvider));
        let mut haptics = HapticCoordinator::new(provider, Arc::clone(&clock), config.haptics);
        if let Some(source) = self.reduced_motion {
            haptics = haptics.with_reduced_motion_source(source);
        }
        if let Some(handle) = self.runtime {
            haptics = haptics.with_runtime(handle);
        }

        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(LogSink::new()) as Arc<dyn TelemetrySink>);
        let telemetry = EffectTelemetry::new(Arc::clone(&clock), sink, config.telemetry);

        log::info!(
            "Effects runtime ready: {} surfaces on '{}', haptics via '{}', {} Hz",
            config.cache.max_cache_size,
            surfaces.allocator().backend_name(),
            haptics.provider().name(),
            refresh_rate.refresh_rate().hz()
        );

        Ok(EffectsRuntime {
            config,
            clock,
            refresh_rate,
            surfaces,
            haptics: Arc::new(haptics),
            telemetry: Arc::new(telemetry),
            sweeper: Mutex::new(sweeper),
        })
    }
}

/// Owns one instance of every effects service.
///
/// Create one per chat surface at startup and hand the `Arc`s it exposes to
/// the animation hooks. Two runtimes never share state.
pub struct EffectsRuntime<A: SurfaceAllocator = HeadlessSurfaceAllocator> {
    config: EffectsConfig,
    clock: Arc<dyn Clock>,
    refresh_rate: Arc<dyn RefreshRateSource>,
    surfaces: Arc<SurfaceCache<A>>,
    haptics: Arc<HapticCoordinator>,
    telemetry: Arc<EffectTelemetry>,
    sweeper: Mutex<Option<TickerHandle>>,
}

impl EffectsRuntime<HeadlessSurfaceAllocator> {
    /// A runtime rendering into system memory, with default collaborators.
    pub fn headless(config: EffectsConfig) -> Result<Self> {
        Self::builder(HeadlessSurfaceAllocator::new())
            .config(config)
            .build()
    }
}

impl<A: SurfaceAllocator> EffectsRuntime<A> {
    /// Starts assembling a runtime allocating surfaces through `allocator`.
    pub fn builder(allocator: A) -> EffectsRuntimeBuilder<A> {
        EffectsRuntimeBuilder::new(allocator)
    }

    /// The sanitized configuration in use.
    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    /// The shared clock.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// The offscreen surface cache.
    pub fn surfaces(&self) -> &Arc<SurfaceCache<A>> {
        &self.surfaces
    }

    /// The haptic coordinator.
    pub fn haptics(&self) -> &Arc<HapticCoordinator> {
        &self.haptics
    }

    /// The effect telemetry correlator.
    pub fn telemetry(&self) -> &Arc<EffectTelemetry> {
        &self.telemetry
    }

    /// The current display refresh rate.
    pub fn refresh_rate(&self) -> RefreshRate {
        self.refresh_rate.refresh_rate()
    }

    /// The per-frame budget at the current refresh rate.
    pub fn frame_budget_ms(&self) -> f64 {
        frame_budget_ms(f64::from(self.refresh_rate().hz()))
    }

    /// A frame monitor starting now, for hosts that feed frames themselves.
    pub fn frame_monitor(&self) -> FrameBudgetMonitor {
        FrameBudgetMonitor::new(
            f64::from(self.refresh_rate().hz()),
            self.config.frame.monitor,
            self.clock.now_ms(),
        )
    }

    /// Starts a frame monitor on its own thread.
    pub fn start_frame_monitor(&self) -> Result<FrameMonitorHandle> {
        self.frame_monitor()
            .spawn(Arc::clone(&self.clock))
            .context("Failed to start the frame monitor")
    }

    /// Opens the telemetry session of one effect run.
    pub fn scope(&self, effect_name: &str, metadata: Metadata) -> EffectScope {
        EffectScope::begin(
            Arc::clone(&self.telemetry),
            Arc::clone(&self.clock),
            self.frame_monitor(),
            effect_name,
            metadata,
        )
    }

    /// Stops the sweeper, disposes every surface and drops open sessions.
    pub fn shutdown(&self) {
        if let Some(mut sweeper) = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            sweeper.stop();
        }
        self.surfaces.clear();
        self.telemetry.clear_active_effects();
        log::info!("Effects runtime shut down");
    }
}

impl<A: SurfaceAllocator> fmt::Debug for EffectsRuntime<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectsRuntime")
            .field("surfaces", &self.surfaces)
            .field("haptics", &self.haptics)
            .field("telemetry", &self.telemetry)
            .field("refresh_rate", &self.refresh_rate())
            .finish()
    }
}
