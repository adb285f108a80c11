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

//! The trailing window of recent dropped frames.

use std::collections::VecDeque;

/// Timestamps of dropped frames inside a trailing time window.
#[derive(Debug, Clone)]
pub struct DroppedFrameWindow {
    timestamps: VecDeque<f64>,
    window_ms: f64,
}

impl DroppedFrameWindow {
    /// Creates an empty window spanning `window_ms` milliseconds.
    pub fn new(window_ms: f64) -> Self {
        Self {
            timestamps: VecDeque::new(),
            window_ms,
        }
    }

    /// Appends a drop observed at `now_ms`.
    pub fn record_drop(&mut self, now_ms: f64) {
        self.timestamps.push_back(now_ms);
    }

    /// Discards drops older than `now_ms - window_ms` and returns how many remain.
    pub fn prune(&mut self, now_ms: f64) -> usize {
        let cutoff = now_ms - self.window_ms;
        // Timestamps are appended in clock order, so the oldest sit at the front.
        while self.timestamps.front().is_some_and(|&t| t < cutoff) {
            self.timestamps.pop_front();
        }
        self.timestamps.len()
    }

    /// Number of drops currently inside the window.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns `true` if no drop is inside the window.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// The window span in milliseconds.
    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }
}
