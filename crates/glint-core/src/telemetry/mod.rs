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

//! The common language of effect telemetry.
//!
//! This module defines the events the effect correlator emits and the sink
//! contract analytics transports implement. `glint-telemetry` owns the
//! correlator and ships the concrete sinks.

pub mod event;
pub mod metadata;
pub mod sink;

pub use self::event::EffectEvent;
pub use self::metadata::Metadata;
pub use self::sink::{SinkError, TelemetrySink};
