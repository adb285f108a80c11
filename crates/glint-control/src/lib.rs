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

//! # Glint Control
//!
//! Real-time control services of the effects runtime: the frame budget
//! monitor that classifies dropped frames against the device refresh rate,
//! and the haptic coordinator that gates tactile feedback behind a cooldown
//! and the reduced-motion preference.

#![warn(missing_docs)]

pub mod frame;
pub mod haptics;

pub use frame::{
    exceeds_frame_budget, frame_budget_ms, performance_metrics, FrameBudgetMonitor,
    FrameMonitorConfig, FrameMonitorHandle, PerformanceMetrics,
};
pub use haptics::{
    HapticConfig, HapticContext, HapticCoordinator, HapticPattern, HapticPermit,
    HapticProviderRegistry, HapticTriggerState,
};
