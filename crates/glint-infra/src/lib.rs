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

//! # Glint Infra
//!
//! Concrete implementations of the contracts defined in `glint-core`:
//! offscreen surface allocators (wgpu and headless), haptic providers,
//! the winit refresh-rate source, and logger initialisation.

#![warn(missing_docs)]

pub mod graphics;
pub mod haptics;
pub mod logging;
pub mod platform;

pub use graphics::{HeadlessSurface, HeadlessSurfaceAllocator};
#[cfg(feature = "graphics")]
pub use graphics::{WgpuSurface, WgpuSurfaceAllocator};
pub use haptics::{LoggingHapticProvider, NullHapticProvider};
#[cfg(feature = "platform")]
pub use platform::MonitorRefreshRate;
