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

//! The lifecycle of one effect run.

use glint_control::frame::FrameSample;
use glint_control::FrameBudgetMonitor;
use glint_core::telemetry::metadata::merge;
use glint_core::telemetry::Metadata;
use glint_core::Clock;
use glint_telemetry::service::{DEVICE_HZ_KEY, DROPPED_FRAMES_KEY, TOTAL_FRAMES_KEY};
use glint_telemetry::{EffectSession, EffectTelemetry, SessionId};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// One animation hook's effect, from start to finish.
///
/// Opening a scope starts a telemetry session and a frame monitor. Frames
/// fed through [`record_frame`](Self::record_frame) are reported with the
/// session when it is finished. A scope dropped without being finished or
/// failed is reported as a failure.
pub struct EffectScope {
    telemetry: Arc<EffectTelemetry>,
    clock: Arc<dyn Clock>,
    monitor: FrameBudgetMonitor,
    session_id: Option<SessionId>,
}

impl EffectScope {
    pub(crate) fn begin(
        telemetry: Arc<EffectTelemetry>,
        clock: Arc<dyn Clock>,
        monitor: FrameBudgetMonitor,
        effect_name: &str,
        metadata: Metadata,
    ) -> Self {
        let session_id = telemetry.log_effect_start(effect_name, metadata);
        Self {
            telemetry,
            clock,
            monitor,
            session_id: Some(session_id),
        }
    }

    /// The telemetry session of this run.
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// The frame monitor of this run.
    pub fn monitor(&self) -> &FrameBudgetMonitor {
        &self.monitor
    }

    /// Records a frame presented now.
    pub fn record_frame(&mut self) -> FrameSample {
        let now = self.clock.now_ms();
        self.monitor.record_frame(now)
    }

    /// Merges `metadata` into the running session.
    pub fn update_metadata(&self, metadata: Metadata) -> bool {
        match &self.session_id {
            Some(id) => self.telemetry.update_effect_metadata(id, metadata),
            None => false,
        }
    }

    fn frame_metadata(&self, overlay: Metadata) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(DROPPED_FRAMES_KEY.into(), Value::from(self.monitor.dropped_frames()));
        if self.monitor.total_frames() > 0 {
            metadata.insert(TOTAL_FRAMES_KEY.into(), Value::from(self.monitor.total_frames()));
            metadata.insert(DEVICE_HZ_KEY.into(), Value::from(self.monitor.hz()));
        }
        merge(&mut metadata, overlay);
        metadata
    }

    /// Ends the run normally. Values in `metadata` override the measured
    /// frame counts.
    pub fn finish(mut self, metadata: Metadata) -> Option<EffectSession> {
        let id = self.session_id.take()?;
        let metadata = self.frame_metadata(metadata);
        self.telemetry.log_effect_end(&id, metadata)
    }

    /// Ends the run with an error.
    pub fn fail(mut self, error: &dyn fmt::Display, metadata: Metadata) -> Option<EffectSession> {
        let id = self.session_id.take()?;
        let metadata = self.frame_metadata(metadata);
        self.telemetry.log_effect_error(&id, error, metadata)
    }
}

impl Drop for EffectScope {
    fn drop(&mut self) {
        if let Some(id) = self.session_id.take() {
            let metadata = self.frame_metadata(Metadata::new());
            self.telemetry
                .log_effect_error(&id, &"effect dropped before finishing", metadata);
        }
    }
}

impl fmt::Debug for EffectScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectScope")
            .field("session_id", &self.session_id)
            .field("dropped_frames", &self.monitor.dropped_frames())
            .field("total_frames", &self.monitor.total_frames())
            .finish()
    }
}
