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

//! # Glint Telemetry
//!
//! Correlates the start and end of every effect an animation hook runs,
//! flags sessions that drop too many frames, and detects runs that are
//! abnormally slow compared to the recent history of the same effect.
//!
//! Events leave the correlator through a [`TelemetrySink`](glint_core::telemetry::TelemetrySink);
//! the [`sinks`] module ships the log, channel, in-memory and fan-out
//! implementations.

#![warn(missing_docs)]

pub mod config;
pub mod regression;
pub mod service;
pub mod session;
pub mod sinks;

pub use config::TelemetryConfig;
pub use regression::{PerformanceHistory, PerformanceRecord, RegressionVerdict};
pub use service::EffectTelemetry;
pub use session::{EffectSession, SessionId};
