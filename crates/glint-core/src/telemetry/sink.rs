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

//! The analytics transport contract.

use crate::telemetry::event::EffectEvent;
use std::fmt::Debug;

/// An error reported by a sink. The correlator logs and discards it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The receiving end of the transport is gone.
    #[error("Telemetry sink disconnected")]
    Disconnected,
    /// The transport's buffer is full and the event was dropped.
    #[error("Telemetry sink buffer full")]
    Full,
    /// Any other transport failure.
    #[error("Telemetry transport error: {0}")]
    Transport(String),
}

/// A fire-and-forget destination for effect events.
pub trait TelemetrySink: Send + Sync + Debug + 'static {
    /// Submits a lifecycle or performance event.
    fn track_event(&self, event: &EffectEvent) -> Result<(), SinkError>;

    /// Submits a failure event through the error-tracking path.
    ///
    /// Transports without a dedicated error channel treat it as a normal event.
    fn track_error(&self, event: &EffectEvent) -> Result<(), SinkError> {
        self.track_event(event)
    }
}
