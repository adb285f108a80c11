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
use std::sync::Arc;

const OFFSCREEN_LABEL: &str = "glint-offscreen-surface";
const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Builds the descriptor of an offscreen effect target.
///
/// Surfaces are single-sampled RGBA8 textures that effects render into and
/// later sample from.
pub fn offscreen_texture_descriptor(width: u32, height: u32) -> wgpu::TextureDescriptor<'static> {
    wgpu::TextureDescriptor {
        label: Some(OFFSCREEN_LABEL),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OFFSCREEN_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    }
}

/// An offscreen wgpu texture with its default view.
#[derive(Debug)]
pub struct WgpuSurface {
    /// The render target.
    pub texture: wgpu::Texture,
    /// Default view over the whole texture.
    pub view: wgpu::TextureView,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Allocates offscreen surfaces on a wgpu device owned by the host.
#[derive(Debug)]
pub struct WgpuSurfaceAllocator {
    device: Arc<wgpu::Device>,
    max_dimension: u32,
    budget: SurfaceBudget,
}

impl WgpuSurfaceAllocator {
    /// Wraps `device`, capping surface edges at the device texture limit.
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self::with_budget(device, None)
    }

    /// Like [`new`](Self::new), also refusing to hold more than
    /// `vram_budget_bytes` of surfaces at once.
    pub fn with_budget(device: Arc<wgpu::Device>, vram_budget_bytes: Option<u64>) -> Self {
        let max_dimension = device.limits().max_texture_dimension_2d;
        log::info!(
            "WgpuSurfaceAllocator ready (max edge {}px, budget {:?})",
            max_dimension,
            vram_budget_bytes
        );
        Self {
            device,
            max_dimension,
            budget: SurfaceBudget::new(vram_budget_bytes),
        }
    }

    /// Estimated VRAM held by live surfaces.
    pub fn allocated_bytes(&self) -> u64 {
        self.budget.allocated_bytes()
    }
}

impl SurfaceAllocator for WgpuSurfaceAllocator {
    type Surface = WgpuSurface;

    fn create(&self, width: u32, height: u32) -> Result<WgpuSurface, SurfaceError> {
        validate_dimensions(width, height, self.max_dimension)?;
        self.budget.reserve(rgba8_size_bytes(width, height))?;

        let texture = self
            .device
            .create_texture(&offscreen_texture_descriptor(width, height));
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::trace!("Offscreen texture {width}x{height} created");
        Ok(WgpuSurface {
            texture,
            view,
            width,
            height,
        })
    }

    fn dispose(&self, surface: &WgpuSurface) {
        surface.texture.destroy();
        self.budget
            .release(rgba8_size_bytes(surface.width, surface.height));
    }

    fn backend_name(&self) -> &'static str {
        "wgpu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_describes_a_sampled_render_target() {
        let descriptor = offscreen_texture_descriptor(390, 844);
        assert_eq!(descriptor.size.width, 390);
        assert_eq!(descriptor.size.height, 844);
        assert_eq!(descriptor.size.depth_or_array_layers, 1);
        assert_eq!(descriptor.format, wgpu::TextureFormat::Rgba8Unorm);
        assert!(descriptor
            .usage
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING));
        assert_eq!(descriptor.sample_count, 1);
    }
}
