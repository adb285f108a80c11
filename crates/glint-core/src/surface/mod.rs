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

//! Contracts for offscreen render targets.
//!
//! Heavy effects (glow, blur, chromatic aberration, ribbon trails) render into
//! an offscreen surface that is reused across frames. The allocator trait is
//! the only thing the surface cache knows about the GPU; `glint-infra`
//! provides the wgpu and headless implementations.

use std::fmt::Debug;

/// An error raised when an offscreen surface cannot be created.
///
/// This is the only error kind that crosses the runtime boundary: the caller
/// is expected to skip the visual enhancement rather than fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// Zero-sized surfaces cannot be allocated.
    #[error("Invalid surface dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// One side exceeds what the device supports for a 2D texture.
    #[error("Surface {width}x{height} exceeds the device limit of {limit}px")]
    ExceedsDeviceLimit {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
        /// Maximum supported side length.
        limit: u32,
    },
    /// The allocator's memory budget cannot accommodate the surface.
    #[error("Surface memory budget exhausted: requested {requested} bytes, {available} available")]
    BudgetExhausted {
        /// Bytes needed for the new surface.
        requested: u64,
        /// Bytes still available in the budget.
        available: u64,
    },
    /// An error reported by the graphics backend itself.
    #[error("Backend-specific allocation error: {0}")]
    Backend(String),
}

/// A factory and destructor for offscreen render targets.
pub trait SurfaceAllocator: Send + Sync + Debug + 'static {
    /// The backend-specific surface handle.
    type Surface: Send + Sync + 'static;

    /// Allocates a new surface of the given size.
    fn create(&self, width: u32, height: u32) -> Result<Self::Surface, SurfaceError>;

    /// Releases the resources backing `surface`.
    fn dispose(&self, surface: &Self::Surface);

    /// A short name for logs.
    fn backend_name(&self) -> &'static str {
        "unknown"
    }
}

/// Bytes needed by an RGBA8 surface of the given size.
pub fn rgba8_size_bytes(width: u32, height: u32) -> u64 {
    u64::from(width) * u64::from(height) * 4
}

/// Rejects zero-sized surfaces and sides larger than `max_dimension`.
pub fn validate_dimensions(width: u32, height: u32, max_dimension: u32) -> Result<(), SurfaceError> {
    if width == 0 || height == 0 {
        return Err(SurfaceError::InvalidDimensions { width, height });
    }
    if width > max_dimension || height > max_dimension {
        return Err(SurfaceError::ExceedsDeviceLimit {
            width,
            height,
            limit: max_dimension,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_surfaces_are_rejected() {
        assert_eq!(
            validate_dimensions(0, 10, 4096),
            Err(SurfaceError::InvalidDimensions {
                width: 0,
                height: 10
            })
        );
        assert!(validate_dimensions(10, 0, 4096).is_err());
    }

    #[test]
    fn oversized_surfaces_report_the_limit() {
        let err = validate_dimensions(8192, 100, 4096).unwrap_err();
        assert_eq!(
            err,
            SurfaceError::ExceedsDeviceLimit {
                width: 8192,
                height: 100,
                limit: 4096
            }
        );
        assert!(err.to_string().contains("4096px"));
    }

    #[test]
    fn valid_dimensions_pass() {
        assert!(validate_dimensions(390, 844, 4096).is_ok());
        assert!(validate_dimensions(4096, 4096, 4096).is_ok());
    }

    #[test]
    fn rgba8_size_does_not_overflow() {
        assert_eq!(rgba8_size_bytes(2, 3), 24);
        assert_eq!(rgba8_size_bytes(u32::MAX, 2), u64::from(u32::MAX) * 8);
    }
}
