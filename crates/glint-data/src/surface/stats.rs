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

use serde::Serialize;

/// Diagnostic view of one cached surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceEntryStats {
    /// The cache key.
    pub key: String,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Number of times the surface was handed out.
    pub use_count: u64,
    /// Milliseconds since the surface was last used.
    pub age_ms: f64,
}

/// Diagnostic snapshot of a [`SurfaceCache`](super::SurfaceCache).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceCacheStats {
    /// Live entries.
    pub size: usize,
    /// Maximum live entries before capacity eviction.
    pub capacity: usize,
    /// Requests served from the cache.
    pub hits: u64,
    /// Requests that allocated a new surface.
    pub misses: u64,
    /// Entries removed by capacity or age eviction.
    pub evictions: u64,
    /// Per-entry details, sorted by key.
    pub entries: Vec<SurfaceEntryStats>,
}

impl SurfaceCacheStats {
    /// Fraction of requests served from the cache, 0 when nothing was requested.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
