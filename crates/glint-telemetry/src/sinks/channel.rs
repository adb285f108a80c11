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

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use glint_core::telemetry::{EffectEvent, SinkError, TelemetrySink};

/// Forwards events to a bounded channel drained by an analytics transport.
///
/// Never blocks: a full buffer drops the event and reports [`SinkError::Full`].
#[derive(Debug, Clone)]
pub struct ChannelSink {
    events: Sender<EffectEvent>,
}

impl ChannelSink {
    /// Wraps an existing sender.
    pub fn new(events: Sender<EffectEvent>) -> Self {
        Self { events }
    }

    /// Creates a sink and the receiving end of its buffer.
    pub fn bounded(capacity: usize) -> (Self, Receiver<EffectEvent>) {
        let (tx, rx) = bounded(capacity);
        (Self::new(tx), rx)
    }
}

impl TelemetrySink for ChannelSink {
    fn track_event(&self, event: &EffectEvent) -> Result<(), SinkError> {
        self.events.try_send(event.clone()).map_err(|err| match err {
            TrySendError::Full(_) => SinkError::Full,
            TrySendError::Disconnected(_) => SinkError::Disconnected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str) -> EffectEvent {
        EffectEvent::Regression {
            name: name.to_string(),
            duration_ms: 10.0,
            dropped_frames: 0,
            baseline_duration_ms: 5.0,
            baseline_dropped_frames: 0.0,
        }
    }

    #[test]
    fn delivers_until_full() {
        let (sink, rx) = ChannelSink::bounded(1);
        assert_eq!(sink.track_event(&event("a")), Ok(()));
        assert_eq!(sink.track_event(&event("b")), Err(SinkError::Full));
        assert_eq!(rx.try_recv().unwrap().name(), "a");
    }

    #[test]
    fn reports_a_dropped_receiver() {
        let (sink, rx) = ChannelSink::bounded(4);
        drop(rx);
        assert_eq!(sink.track_error(&event("a")), Err(SinkError::Disconnected));
    }
}
