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

//! # Glint Core
//!
//! Foundational crate containing the contracts, core types, and small
//! utilities shared by every layer of the effects runtime.
//!
//! Following the layering used across the workspace, this crate defines the
//! abstract "what" (clocks, surface and haptic primitives, platform sources,
//! telemetry events and sinks), while `glint-infra` provides the concrete
//! implementations and the other crates build the runtime services on top.

#![warn(missing_docs)]

pub mod clock;
pub mod haptics;
pub mod platform;
pub mod surface;
pub mod telemetry;
pub mod utils;

pub use clock::{Clock, ManualClock, MonotonicClock};
