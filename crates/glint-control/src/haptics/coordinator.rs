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

//! The cooldown- and reduced-motion-aware haptic coordinator.

use super::pattern::{HapticContext, HapticPattern};
use glint_core::haptics::{HapticError, HapticKind, HapticProvider};
use glint_core::platform::ReducedMotionSource;
use glint_core::utils::CancellationToken;
use glint_core::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;

/// Coordinator tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticConfig {
    /// Minimum milliseconds between two admitted pulses.
    pub cooldown_ms: f64,
}

impl Default for HapticConfig {
    fn default() -> Self {
        Self { cooldown_ms: 50.0 }
    }
}

/// The mutable trigger state of one coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticTriggerState {
    /// When the last pulse was admitted. `None` until the first one.
    pub last_trigger_ms: Option<f64>,
    /// Minimum milliseconds between two admitted pulses.
    pub cooldown_ms: f64,
    /// Suppresses every pulse while set.
    pub reduced_motion: bool,
}

/// Proof that a pulse passed the cooldown and reduced-motion checks.
///
/// Obtained from [`HapticCoordinator::admit`] and consumed by
/// [`HapticCoordinator::dispatch`]. The cooldown is already spent once a
/// permit exists, whether or not the hardware call later succeeds.
#[must_use = "an admitted pulse does nothing until it is dispatched"]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticPermit {
    kind: HapticKind,
    admitted_at_ms: f64,
}

impl HapticPermit {
    /// The pulse this permit allows.
    pub fn kind(&self) -> HapticKind {
        self.kind
    }

    /// When the permit was granted.
    pub fn admitted_at_ms(&self) -> f64 {
        self.admitted_at_ms
    }
}

/// Translates feedback requests into rate-limited provider pulses.
pub struct HapticCoordinator {
    provider: Arc<dyn HapticProvider>,
    clock: Arc<dyn Clock>,
    reduced_motion_source: Option<Arc<dyn ReducedMotionSource>>,
    runtime: Option<Handle>,
    state: Arc<Mutex<HapticTriggerState>>,
}

impl HapticCoordinator {
    /// Creates a coordinator playing through `provider`.
    pub fn new(provider: Arc<dyn HapticProvider>, clock: Arc<dyn Clock>, config: HapticConfig) -> Self {
        let cooldown_ms = if config.cooldown_ms.is_finite() && config.cooldown_ms >= 0.0 {
            config.cooldown_ms
        } else {
            log::warn!(
                "Invalid haptic cooldown {}ms, using {}ms",
                config.cooldown_ms,
                HapticConfig::default().cooldown_ms
            );
            HapticConfig::default().cooldown_ms
        };
        log::debug!(
            "HapticCoordinator using provider '{}' with a {}ms cooldown",
            provider.name(),
            cooldown_ms
        );
        Self {
            provider,
            clock,
            reduced_motion_source: None,
            runtime: None,
            state: Arc::new(Mutex::new(HapticTriggerState {
                last_trigger_ms: None,
                cooldown_ms,
                reduced_motion: false,
            })),
        }
    }

    /// Follows `source`: reads its current value and subscribes to changes.
    pub fn with_reduced_motion_source(mut self, source: Arc<dyn ReducedMotionSource>) -> Self {
        self.lock_state().reduced_motion = source.is_reduced_motion();
        let state = Arc::downgrade(&self.state);
        source.subscribe(Box::new(move |enabled| {
            if let Some(state) = state.upgrade() {
                state.lock().unwrap_or_else(PoisonError::into_inner).reduced_motion = enabled;
            }
        }));
        self.reduced_motion_source = Some(source);
        self
    }

    /// Spawns fire-and-forget dispatches on `handle`.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    fn lock_state(&self) -> MutexGuard<'_, HapticTriggerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The provider pulses are played through.
    pub fn provider(&self) -> &Arc<dyn HapticProvider> {
        &self.provider
    }

    /// A copy of the current trigger state.
    pub fn state(&self) -> HapticTriggerState {
        *self.lock_state()
    }

    /// Runs the reduced-motion and cooldown checks and, on success, spends
    /// the cooldown.
    pub fn admit(&self, kind: HapticKind, bypass_cooldown: bool) -> Option<HapticPermit> {
        let now = self.clock.now_ms();
        let mut state = self.lock_state();

        if state.reduced_motion {
            log::trace!("Haptic '{kind}' suppressed by reduced motion");
            return None;
        }
        if !bypass_cooldown {
            if let Some(last) = state.last_trigger_ms {
                if now - last < state.cooldown_ms {
                    log::trace!("Haptic '{kind}' rejected by cooldown ({:.1}ms elapsed)", now - last);
                    return None;
                }
            }
        }

        state.last_trigger_ms = Some(now);
        Some(HapticPermit {
            kind,
            admitted_at_ms: now,
        })
    }

    /// Performs the hardware call for an admitted pulse.
    pub async fn dispatch(&self, permit: HapticPermit) -> Result<(), HapticError> {
        play(self.provider.as_ref(), permit.kind).await
    }

    /// Admits a pulse and dispatches it without waiting for the hardware.
    ///
    /// Returns whether the pulse was admitted. Dispatch failures are logged
    /// and otherwise ignored.
    pub fn trigger(&self, kind: HapticKind, bypass_cooldown: bool) -> bool {
        let Some(permit) = self.admit(kind, bypass_cooldown) else {
            return false;
        };

        let provider = Arc::clone(&self.provider);
        let task = async move {
            if let Err(err) = play(provider.as_ref(), permit.kind).await {
                log::debug!("Haptic '{}' dispatch failed: {}", permit.kind, err);
            }
        };
        match self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(handle) => {
                handle.spawn(task);
            }
            None => {
                log::debug!("No tokio runtime, dispatching haptic '{kind}' synchronously");
                pollster::block_on(task)
            }
        }
        true
    }

    /// Plays the predefined pattern for `context`.
    pub async fn trigger_by_context(&self, context: HapticContext) -> bool {
        log::trace!("Haptic context '{context}'");
        self.trigger_pattern(context.pattern(), false, &CancellationToken::new())
            .await
    }

    /// Plays every pulse of `pattern`, waiting its interval between pulses.
    ///
    /// Only the first pulse honours `bypass_cooldown`; the rest always
    /// bypass it, so a first pulse lost to the cooldown does not stop the
    /// pattern. Reduced motion ends it. Cancelling `cancel` aborts the
    /// remaining pulses. Returns whether the first pulse was admitted.
    pub async fn trigger_pattern(
        &self,
        pattern: HapticPattern,
        bypass_cooldown: bool,
        cancel: &CancellationToken,
    ) -> bool {
        let pulses = pattern.pulses();
        let interval = Duration::from_secs_f64(pattern.interval_ms() / 1000.0);
        let mut first_admitted = false;

        for index in 0..pulses {
            if cancel.is_cancelled() {
                log::debug!("Haptic pattern cancelled after {index}/{pulses} pulses");
                break;
            }

            let bypass = index > 0 || bypass_cooldown;
            match self.admit(pattern.kind, bypass) {
                Some(permit) => {
                    if index == 0 {
                        first_admitted = true;
                    }
                    if let Err(err) = self.dispatch(permit).await {
                        log::debug!("Haptic '{}' dispatch failed: {}", pattern.kind, err);
                    }
                }
                None if self.is_reduced_motion() => break,
                None => {}
            }

            if index + 1 < pulses {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = cancel.cancelled() => {
                        log::debug!("Haptic pattern cancelled after {}/{} pulses", index + 1, pulses);
                        break;
                    }
                }
            }
        }
        first_admitted
    }

    /// Forgets the last trigger so the next pulse is admitted immediately.
    pub fn reset_cooldown(&self) {
        self.lock_state().last_trigger_ms = None;
    }

    /// Returns `true` while a non-bypassing pulse would be rejected by the cooldown.
    pub fn is_cooldown_active(&self) -> bool {
        let now = self.clock.now_ms();
        let state = self.lock_state();
        state
            .last_trigger_ms
            .is_some_and(|last| now - last < state.cooldown_ms)
    }

    /// Milliseconds since the last admitted pulse, if any.
    pub fn time_since_last_trigger(&self) -> Option<f64> {
        let now = self.clock.now_ms();
        self.lock_state().last_trigger_ms.map(|last| now - last)
    }

    /// Sets the reduced-motion flag, or re-reads the configured source when `None`.
    pub fn update_reduced_motion(&self, enabled: Option<bool>) {
        let enabled = match (enabled, &self.reduced_motion_source) {
            (Some(flag), _) => flag,
            (None, Some(source)) => source.is_reduced_motion(),
            (None, None) => {
                log::debug!("No reduced motion source configured; keeping current value");
                return;
            }
        };
        let mut state = self.lock_state();
        if state.reduced_motion != enabled {
            log::info!("Haptics reduced motion: {enabled}");
            state.reduced_motion = enabled;
        }
    }

    /// Whether pulses are currently suppressed.
    pub fn is_reduced_motion(&self) -> bool {
        self.lock_state().reduced_motion
    }
}

async fn play(provider: &dyn HapticProvider, kind: HapticKind) -> Result<(), HapticError> {
    if !provider.is_available() {
        return Err(HapticError::Unavailable {
            provider: provider.name().to_string(),
        });
    }
    if !provider.capabilities().supports(kind) {
        return Err(HapticError::Unsupported {
            provider: provider.name().to_string(),
            kind,
        });
    }
    provider.pulse(kind).await
}

impl fmt::Debug for HapticCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HapticCoordinator")
            .field("provider", &self.provider.name())
            .field("state", &self.state())
            .field("has_runtime", &self.runtime.is_some())
            .finish()
    }
}
