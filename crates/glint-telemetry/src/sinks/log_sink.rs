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

use glint_core::telemetry::{EffectEvent, SinkError, TelemetrySink};

/// Writes every event to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    /// Creates a log sink.
    pub fn new() -> Self {
        Self
    }
}

impl TelemetrySink for LogSink {
    fn track_event(&self, event: &EffectEvent) -> Result<(), SinkError> {
        match event {
            EffectEvent::PerformanceIssue { .. } | EffectEvent::Regression { .. } => {
                log::warn!(target: "glint::telemetry", "[{}] {:?}", event.kind(), event)
            }
            _ => log::info!(target: "glint::telemetry", "[{}] {}", event.kind(), event.name()),
        }
        Ok(())
    }

    fn track_error(&self, event: &EffectEvent) -> Result<(), SinkError> {
        log::error!(target: "glint::telemetry", "[{}] {:?}", event.kind(), event);
        Ok(())
    }
}
