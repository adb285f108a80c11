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
use std::sync::{Mutex, PoisonError};

/// Keeps every event in memory, for tests and debug overlays.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<EffectEvent>>,
    errors: Mutex<Vec<EffectEvent>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received through the regular path, oldest first.
    pub fn events(&self) -> Vec<EffectEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events received through the error path, oldest first.
    pub fn errors(&self) -> Vec<EffectEvent> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Kind labels of the regular events, oldest first.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(EffectEvent::kind)
            .collect()
    }

    /// Total number of events received on both paths.
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or_default()
            + self.errors.lock().map(|e| e.len()).unwrap_or_default()
    }

    /// Returns `true` if nothing was received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets everything received so far.
    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.errors.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl TelemetrySink for MemorySink {
    fn track_event(&self, event: &EffectEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }

    fn track_error(&self, event: &EffectEvent) -> Result<(), SinkError> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }
}
