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
use std::sync::Arc;

/// Broadcasts every event to several sinks.
///
/// A failing sink does not prevent delivery to the others; the first error
/// is reported after every sink was tried.
#[derive(Debug, Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn TelemetrySink>>,
}

impl FanoutSink {
    /// Creates a fan-out with no targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target.
    pub fn with(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Returns `true` without targets.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn broadcast<F>(&self, mut deliver: F) -> Result<(), SinkError>
    where
        F: FnMut(&dyn TelemetrySink) -> Result<(), SinkError>,
    {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = deliver(sink.as_ref()) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl TelemetrySink for FanoutSink {
    fn track_event(&self, event: &EffectEvent) -> Result<(), SinkError> {
        self.broadcast(|sink| sink.track_event(event))
    }

    fn track_error(&self, event: &EffectEvent) -> Result<(), SinkError> {
        self.broadcast(|sink| sink.track_error(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::{ChannelSink, MemorySink};

    #[test]
    fn failing_targets_do_not_block_the_others() {
        let (channel, rx) = ChannelSink::bounded(1);
        drop(rx);
        let memory = Arc::new(MemorySink::new());
        let fanout = FanoutSink::new()
            .with(Arc::new(channel))
            .with(memory.clone());

        let event = EffectEvent::Started {
            session_id: "s".into(),
            name: "glow".into(),
            started_at_ms: 0.0,
            metadata: Default::default(),
        };
        assert_eq!(fanout.track_event(&event), Err(SinkError::Disconnected));
        assert_eq!(fanout.track_error(&event), Err(SinkError::Disconnected));
        assert_eq!(memory.events().len(), 1);
        assert_eq!(memory.errors().len(), 1);
        assert_eq!(memory.len(), 2);
        assert_eq!(fanout.len(), 2);
    }
}
