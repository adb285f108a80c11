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

//! Haptic feedback coordination.
//!
//! The coordinator turns semantic feedback requests from animation hooks into
//! at most one physical pulse per cooldown window, and suppresses them all
//! while reduced motion is active.

mod coordinator;
mod pattern;
mod registry;

pub use self::coordinator::{HapticConfig, HapticCoordinator, HapticPermit, HapticTriggerState};
pub use self::pattern::{HapticContext, HapticPattern, DEFAULT_PATTERN_INTERVAL_MS, MAX_PATTERN_INTERVAL_MS};
pub use self::registry::HapticProviderRegistry;
