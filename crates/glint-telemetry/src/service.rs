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

//! The effect lifecycle correlator.

use crate::config::TelemetryConfig;
use crate::regression::{PerformanceHistory, RegressionVerdict};
use crate::session::{EffectSession, SessionId};
use glint_control::performance_metrics;
use glint_core::telemetry::metadata::{get_f64, get_u64, merge};
use glint_core::telemetry::{EffectEvent, Metadata, TelemetrySink};
use glint_core::Clock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Metadata key carrying the dropped frames of a session.
pub const DROPPED_FRAMES_KEY: &str = "dropped_frames";
/// Metadata key carrying the frames rendered during a session.
pub const TOTAL_FRAMES_KEY: &str = "total_frames";
/// Metadata key carrying the display refresh rate of a session.
pub const DEVICE_HZ_KEY: &str = "device_hz";
/// Metadata key under which computed frame metrics are attached.
pub const FRAME_METRICS_KEY: &str = "frame_metrics";

/// Tracks every running effect and reports its lifecycle to a sink.
///
/// Sessions are opened by [`log_effect_start`](Self::log_effect_start) and
/// closed exactly once by [`log_effect_end`](Self::log_effect_end) or
/// [`log_effect_error`](Self::log_effect_error). Closing an unknown or
/// already closed session is a logged no-op. Sink failures never reach
/// the caller.
pub struct EffectTelemetry {
    clock: Arc<dyn Clock>,
    sink: Arc<dyn TelemetrySink>,
    config: TelemetryConfig,
    sessions: Mutex<HashMap<SessionId, EffectSession>>,
    history: Mutex<PerformanceHistory>,
}

impl EffectTelemetry {
    /// Creates a correlator reporting to `sink`.
    pub fn new(clock: Arc<dyn Clock>, sink: Arc<dyn TelemetrySink>, config: TelemetryConfig) -> Self {
        Self {
            clock,
            sink,
            config,
            sessions: Mutex::new(HashMap::new()),
            history: Mutex::new(PerformanceHistory::new(config)),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, EffectSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: EffectEvent) {
        if let Err(err) = self.sink.track_event(&event) {
            log::debug!("Telemetry sink dropped '{}' event: {}", event.kind(), err);
        }
    }

    fn emit_error(&self, event: EffectEvent) {
        if let Err(err) = self.sink.track_error(&event) {
            log::debug!("Telemetry sink dropped '{}' error: {}", event.kind(), err);
        }
    }

    /// The thresholds in use.
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Opens a session for `effect_name` and returns its id.
    pub fn log_effect_start(&self, effect_name: &str, metadata: Metadata) -> SessionId {
        let now = self.clock.now_ms();
        let session_id = SessionId::generate(effect_name, now);
        let session = EffectSession::open(session_id.clone(), effect_name, now, metadata.clone());

        self.sessions().insert(session_id.clone(), session);
        log::debug!("Effect '{effect_name}' started ({session_id})");

        self.emit(EffectEvent::Started {
            session_id: session_id.to_string(),
            name: effect_name.to_string(),
            started_at_ms: now,
            metadata,
        });
        session_id
    }

    /// Merges `metadata` into an open session without closing it.
    ///
    /// Returns `false` if the session is unknown.
    pub fn update_effect_metadata(&self, session_id: &SessionId, metadata: Metadata) -> bool {
        match self.sessions().get_mut(session_id) {
            Some(session) => {
                merge(&mut session.metadata, metadata);
                true
            }
            None => {
                log::warn!("update_effect_metadata: unknown effect session '{session_id}'");
                false
            }
        }
    }

    fn close(&self, session_id: &SessionId, metadata: Metadata, operation: &str) -> Option<EffectSession> {
        let Some(mut session) = self.sessions().remove(session_id) else {
            log::warn!("{operation}: unknown or already closed effect session '{session_id}'");
            return None;
        };

        let now = self.clock.now_ms();
        merge(&mut session.metadata, metadata);
        session.ended_at_ms = Some(now);
        session.duration_ms = Some((now - session.started_at_ms).max(0.0));
        session.dropped_frames = get_u64(&session.metadata, DROPPED_FRAMES_KEY);

        let total = get_u64(&session.metadata, TOTAL_FRAMES_KEY);
        let hz = get_f64(&session.metadata, DEVICE_HZ_KEY);
        if let (Some(total), Some(hz)) = (total, hz) {
            let metrics = performance_metrics(
                session.dropped_frames.unwrap_or(0),
                total,
                session.duration_ms.unwrap_or(0.0),
                hz,
            );
            if let Ok(value) = serde_json::to_value(metrics) {
                session.metadata.insert(FRAME_METRICS_KEY.to_string(), value);
            }
            session.frame_metrics = Some(metrics);
        }
        Some(session)
    }

    /// Closes a session normally.
    ///
    /// Emits the end event, a performance issue when the session dropped
    /// more frames than allowed, and a regression event when the run is
    /// abnormally slow compared to recent runs of the same effect. Returns
    /// `None` for unknown or already closed sessions.
    pub fn log_effect_end(&self, session_id: &SessionId, metadata: Metadata) -> Option<EffectSession> {
        let mut session = self.close(session_id, metadata, "log_effect_end")?;
        session.success = Some(true);

        let duration_ms = session.duration_ms.unwrap_or(0.0);
        log::debug!(
            "Effect '{}' ended after {:.1}ms ({})",
            session.effect_name,
            duration_ms,
            session.session_id
        );
        self.emit(EffectEvent::Ended {
            session_id: session.session_id.to_string(),
            name: session.effect_name.clone(),
            duration_ms,
            dropped_frames: session.dropped_frames,
            metadata: session.metadata.clone(),
        });

        self.account(&session, duration_ms);
        Some(session)
    }

    /// Closes a session as failed and routes it to the sink's error path.
    ///
    /// Dropped frames and regressions are accounted exactly as for
    /// [`log_effect_end`](Self::log_effect_end); only the closing event
    /// differs.
    pub fn log_effect_error(
        &self,
        session_id: &SessionId,
        error: &dyn fmt::Display,
        metadata: Metadata,
    ) -> Option<EffectSession> {
        let mut session = self.close(session_id, metadata, "log_effect_error")?;
        let error = error.to_string();
        session.success = Some(false);
        session.error = Some(error.clone());
        let duration_ms = session.duration_ms.unwrap_or(0.0);

        log::warn!(
            "Effect '{}' failed ({}): {}",
            session.effect_name,
            session.session_id,
            error
        );
        self.emit_error(EffectEvent::Failed {
            session_id: session.session_id.to_string(),
            name: session.effect_name.clone(),
            duration_ms,
            error,
            metadata: session.metadata.clone(),
        });
        self.account(&session, duration_ms);
        Some(session)
    }

    /// Emits the performance issue and regression events of a closed run.
    fn account(&self, session: &EffectSession, duration_ms: f64) {
        let dropped_frames = session.dropped_frames.unwrap_or(0);
        if dropped_frames > self.config.performance_issue_threshold {
            log::warn!(
                "Effect '{}' dropped {} frames in {:.1}ms",
                session.effect_name,
                dropped_frames,
                duration_ms
            );
            self.emit(EffectEvent::PerformanceIssue {
                session_id: session.session_id.to_string(),
                name: session.effect_name.clone(),
                dropped_frames,
                duration_ms,
            });
        }

        if let RegressionVerdict::Regressed {
            baseline_duration_ms,
            baseline_dropped_frames,
        } = self.check_performance_regression(&session.effect_name, duration_ms, dropped_frames)
        {
            log::warn!(
                "Effect '{}' regressed: {:.1}ms / {} dropped vs baseline {:.1}ms / {:.1}",
                session.effect_name,
                duration_ms,
                dropped_frames,
                baseline_duration_ms,
                baseline_dropped_frames
            );
            self.emit(EffectEvent::Regression {
                name: session.effect_name.clone(),
                duration_ms,
                dropped_frames,
                baseline_duration_ms,
                baseline_dropped_frames,
            });
        }
    }

    /// Compares a run against the recent history of `effect_name`, then
    /// records it.
    pub fn check_performance_regression(
        &self,
        effect_name: &str,
        duration_ms: f64,
        dropped_frames: u64,
    ) -> RegressionVerdict {
        let now = self.clock.now_ms();
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .check_and_record(effect_name, duration_ms, dropped_frames, now)
    }

    /// A copy of an open session.
    pub fn active_session(&self, session_id: &SessionId) -> Option<EffectSession> {
        self.sessions().get(session_id).cloned()
    }

    /// Number of open sessions.
    pub fn active_effects_count(&self) -> usize {
        self.sessions().len()
    }

    /// Drops every open session without emitting events.
    pub fn clear_active_effects(&self) {
        let mut sessions = self.sessions();
        if !sessions.is_empty() {
            log::debug!("Discarding {} active effect sessions", sessions.len());
        }
        sessions.clear();
    }
}

impl fmt::Debug for EffectTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectTelemetry")
            .field("sink", &self.sink)
            .field("config", &self.config)
            .field("active", &self.active_effects_count())
            .finish()
    }
}
