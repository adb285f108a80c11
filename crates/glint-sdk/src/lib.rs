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

//! # Glint SDK
//!
//! The public face of the effects runtime. Animation hooks talk to an
//! [`EffectsRuntime`] created once at application start: they pull offscreen
//! surfaces from its cache, request tactile feedback from its haptic
//! coordinator, and wrap every effect run in an [`EffectScope`] so its
//! duration and dropped frames reach telemetry.

#![warn(missing_docs)]

pub mod config;
pub mod runtime;
pub mod scope;

pub use config::{clamp_blur_radius, ConfigError, EffectsConfig, FrameConfig};
pub use runtime::{EffectsRuntime, EffectsRuntimeBuilder};
pub use scope::EffectScope;

/// Everything an animation hook usually needs.
pub mod prelude {
    pub use crate::{clamp_blur_radius, EffectScope, EffectsConfig, EffectsRuntime};
    pub use glint_control::{HapticContext, HapticPattern, PerformanceMetrics};
    pub use glint_core::haptics::HapticKind;
    pub use glint_core::platform::{RefreshRate, ReducedMotionPreference};
    pub use glint_core::surface::SurfaceError;
    pub use glint_core::telemetry::Metadata;
    pub use glint_core::utils::CancellationToken;
    pub use glint_telemetry::{EffectSession, SessionId};
}
