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

use super::budget::SurfaceBudget;
use glint_core::surface::{rgba8_size_bytes, validate_dimensions, SurfaceAllocator, SurfaceError};

/// Largest edge accepted by the headless allocator.
pub const HEADLESS_MAX_DIMENSION: u32 = 8192;

/// A CPU-side RGBA8 pixel buffer standing in for a GPU texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessSurface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 pixels.
    pub pixels: Vec<u8>,
}

/// Allocates surfaces in system memory. Used by tests, tools and hosts
/// without a GPU.
#[derive(Debug)]
pub struct HeadlessSurfaceAllocator {
    max_dimension: u32,
    budget: SurfaceBudget,
}

impl HeadlessSurfaceAllocator {
    /// An allocator with no memory ceiling.
    pub fn new() -> Self {
        Self::with_budget(None)
    }

    /// An allocator refusing to hold more than `limit_bytes` at once.
    pub fn with_budget(limit_bytes: Option<u64>) -> Self {
        Self {
            max_dimension: HEADLESS_MAX_DIMENSION,
            budget: SurfaceBudget::new(limit_bytes),
        }
    }

    /// Bytes held by live surfaces.
    pub fn allocated_bytes(&self) -> u64 {
        self.budget.allocated_bytes()
    }
}

impl Default for HeadlessSurfaceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceAllocator for HeadlessSurfaceAllocator {
    type Surface = HeadlessSurface;

    fn create(&self, width: u32, height: u32) -> Result<HeadlessSurface, SurfaceError> {
        validate_dimensions(width, height, self.max_dimension)?;
        let bytes = rgba8_size_bytes(width, height);
        let len = usize::try_from(bytes).map_err(|_| SurfaceError::BudgetExhausted {
            requested: bytes,
            available: usize::MAX as u64,
        })?;
        self.budget.reserve(bytes)?;
        log::trace!("Headless surface {width}x{height} allocated ({bytes} bytes)");
        Ok(HeadlessSurface {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    fn dispose(&self, surface: &HeadlessSurface) {
        self.budget
            .release(rgba8_size_bytes(surface.width, surface.height));
    }

    fn backend_name(&self) -> &'static str {
        "headless"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_zeroed_rgba_buffers() {
        let allocator = HeadlessSurfaceAllocator::new();
        let surface = allocator.create(4, 2).unwrap();
        assert_eq!(surface.pixels.len(), 32);
        assert!(surface.pixels.iter().all(|&p| p == 0));
        assert_eq!(allocator.allocated_bytes(), 32);

        allocator.dispose(&surface);
        assert_eq!(allocator.allocated_bytes(), 0);
    }

    #[test]
    fn enforces_dimensions_and_budget() {
        let allocator = HeadlessSurfaceAllocator::with_budget(Some(1024));
        assert!(matches!(
            allocator.create(0, 1),
            Err(SurfaceError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            allocator.create(HEADLESS_MAX_DIMENSION + 1, 1),
            Err(SurfaceError::ExceedsDeviceLimit { .. })
        ));

        let _kept = allocator.create(16, 16).unwrap();
        assert!(matches!(
            allocator.create(1, 1),
            Err(SurfaceError::BudgetExhausted { .. })
        ));
        assert_eq!(allocator.backend_name(), "headless");
    }
}
