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

//! Frame budget computation and dropped-frame detection.

pub mod budget;
pub mod monitor;
pub mod window;

pub use self::budget::{
    exceeds_frame_budget, frame_budget_ms, is_dropped_frame, performance_metrics,
    PerformanceMetrics, DROPPED_FRAME_SLACK,
};
pub use self::monitor::{FrameBudgetMonitor, FrameMonitorConfig, FrameMonitorHandle, FrameSample};
pub use self::window::DroppedFrameWindow;
