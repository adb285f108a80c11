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

//! The LRU + age-evicting offscreen surface cache.

use super::stats::{SurfaceCacheStats, SurfaceEntryStats};
use glint_core::surface::{SurfaceAllocator, SurfaceError};
use glint_core::utils::{spawn_ticker, TickerHandle};
use glint_core::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Capacity and age limits of a [`SurfaceCache`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceCacheConfig {
    /// Live entries kept before the least recently used are evicted.
    pub max_cache_size: usize,
    /// Entries unused for longer than this are swept.
    pub max_age_ms: f64,
    /// Period of the background sweeper.
    pub sweep_interval_ms: u64,
}

impl Default for SurfaceCacheConfig {
    fn default() -> Self {
        Self {
            max_cache_size: 10,
            max_age_ms: 60_000.0,
            sweep_interval_ms: 10_000,
        }
    }
}

struct CachedSurface<S> {
    surface: Arc<S>,
    width: u32,
    height: u32,
    last_used_ms: f64,
    use_count: u64,
}

struct CacheState<S> {
    entries: HashMap<String, CachedSurface<S>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Keyed pool of offscreen surfaces.
///
/// Holds at most one surface per key. Handles are shared through `Arc`, but
/// the cache stays the owner: once an entry is evicted or removed the
/// allocator disposes the underlying resource, and outstanding handles must
/// not be rendered into anymore.
pub struct SurfaceCache<A: SurfaceAllocator> {
    allocator: A,
    clock: Arc<dyn Clock>,
    config: SurfaceCacheConfig,
    state: Mutex<CacheState<A::Surface>>,
}

impl<A: SurfaceAllocator> SurfaceCache<A> {
    /// Creates an empty cache allocating through `allocator`.
    pub fn new(allocator: A, clock: Arc<dyn Clock>, config: SurfaceCacheConfig) -> Self {
        let config = SurfaceCacheConfig {
            max_cache_size: config.max_cache_size.max(1),
            ..config
        };
        log::debug!(
            "SurfaceCache created on '{}' backend (capacity {}, max age {}ms)",
            allocator.backend_name(),
            config.max_cache_size,
            config.max_age_ms
        );
        Self {
            allocator,
            clock,
            config,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<A::Surface>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The allocator backing this cache.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// The limits this cache enforces.
    pub fn config(&self) -> &SurfaceCacheConfig {
        &self.config
    }

    /// Returns the surface cached under `key`, allocating one when the key is
    /// new or was cached with different dimensions.
    ///
    /// On allocation failure the key is left without an entry.
    pub fn get_surface(&self, key: &str, width: u32, height: u32) -> Result<Arc<A::Surface>, SurfaceError> {
        let now = self.clock.now_ms();
        let mut state = self.lock();

        if let Some(entry) = state.entries.get_mut(key) {
            if entry.width == width && entry.height == height {
                entry.last_used_ms = now;
                entry.use_count += 1;
                let surface = Arc::clone(&entry.surface);
                state.hits += 1;
                return Ok(surface);
            }
        }

        if let Some(stale) = state.entries.remove(key) {
            log::debug!(
                "Surface '{}' resized {}x{} -> {}x{}, recreating",
                key,
                stale.width,
                stale.height,
                width,
                height
            );
            self.allocator.dispose(&stale.surface);
        }

        state.misses += 1;
        let surface = match self.allocator.create(width, height) {
            Ok(surface) => Arc::new(surface),
            Err(err) => {
                log::warn!("Failed to allocate surface '{key}' ({width}x{height}): {err}");
                return Err(err);
            }
        };

        state.entries.insert(
            key.to_string(),
            CachedSurface {
                surface: Arc::clone(&surface),
                width,
                height,
                last_used_ms: now,
                use_count: 1,
            },
        );
        self.evict_over_capacity(&mut state, key);
        Ok(surface)
    }

    fn evict_over_capacity(&self, state: &mut CacheState<A::Surface>, keep: &str) {
        let excess = state.entries.len().saturating_sub(self.config.max_cache_size);
        if excess == 0 {
            return;
        }

        let mut candidates: Vec<(String, f64)> = state
            .entries
            .iter()
            .filter(|(key, _)| key.as_str() != keep)
            .map(|(key, entry)| (key.clone(), entry.last_used_ms))
            .collect();
        candidates.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        for (key, _) in candidates.into_iter().take(excess) {
            if let Some(entry) = state.entries.remove(&key) {
                self.allocator.dispose(&entry.surface);
                state.evictions += 1;
                log::trace!("Evicted surface '{key}' (capacity)");
            }
        }
    }

    /// Marks the surface under `key` as used without handing it out.
    ///
    /// Returns `false` for unknown keys.
    pub fn release_surface(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        match self.lock().entries.get_mut(key) {
            Some(entry) => {
                entry.last_used_ms = now;
                true
            }
            None => {
                log::debug!("release_surface: unknown key '{key}'");
                false
            }
        }
    }

    /// Disposes and forgets the surface under `key`.
    pub fn remove_surface(&self, key: &str) -> bool {
        let removed = self.lock().entries.remove(key);
        match removed {
            Some(entry) => {
                self.allocator.dispose(&entry.surface);
                true
            }
            None => false,
        }
    }

    /// Disposes every cached surface.
    pub fn clear(&self) {
        let mut state = self.lock();
        let count = state.entries.len();
        for (_, entry) in state.entries.drain() {
            self.allocator.dispose(&entry.surface);
        }
        if count > 0 {
            log::debug!("SurfaceCache cleared ({count} surfaces disposed)");
        }
    }

    /// Disposes entries unused for longer than the configured maximum age.
    ///
    /// Returns the number of surfaces removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let max_age = self.config.max_age_ms;
        let mut state = self.lock();

        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| now - entry.last_used_ms > max_age)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            if let Some(entry) = state.entries.remove(key) {
                self.allocator.dispose(&entry.surface);
            }
        }
        state.evictions += expired.len() as u64;
        if !expired.is_empty() {
            log::debug!("SurfaceCache swept {} expired surfaces", expired.len());
        }
        expired.len()
    }

    /// Runs [`sweep_expired`](Self::sweep_expired) periodically on a
    /// background thread until the returned handle is stopped or dropped.
    ///
    /// The thread only holds a weak reference, so dropping the last `Arc`
    /// of the cache also ends the sweeps.
    pub fn start_sweeper(self: &Arc<Self>) -> io::Result<TickerHandle> {
        let cache = Arc::downgrade(self);
        let interval = Duration::from_millis(self.config.sweep_interval_ms.max(1));
        spawn_ticker("glint-surface-sweeper", interval, move || {
            if let Some(cache) = cache.upgrade() {
                cache.sweep_expired();
            }
        })
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Returns `true` if a surface is cached under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// A diagnostic snapshot of the cache.
    pub fn stats(&self) -> SurfaceCacheStats {
        let now = self.clock.now_ms();
        let state = self.lock();
        let mut entries: Vec<SurfaceEntryStats> = state
            .entries
            .iter()
            .map(|(key, entry)| SurfaceEntryStats {
                key: key.clone(),
                width: entry.width,
                height: entry.height,
                use_count: entry.use_count,
                age_ms: (now - entry.last_used_ms).max(0.0),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        SurfaceCacheStats {
            size: state.entries.len(),
            capacity: self.config.max_cache_size,
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
            entries,
        }
    }
}

impl<A: SurfaceAllocator> Drop for SurfaceCache<A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<A: SurfaceAllocator> fmt::Debug for SurfaceCache<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceCache")
            .field("backend", &self.allocator.backend_name())
            .field("config", &self.config)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::ManualClock;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    #[derive(Debug, PartialEq)]
    struct FakeSurface {
        id: u64,
        width: u32,
        height: u32,
    }

    #[derive(Debug, Default)]
    struct FakeAllocator {
        next_id: AtomicU64,
        live: AtomicUsize,
        disposed: Mutex<Vec<u64>>,
    }

    impl SurfaceAllocator for FakeAllocator {
        type Surface = FakeSurface;

        fn create(&self, width: u32, height: u32) -> Result<FakeSurface, SurfaceError> {
            glint_core::surface::validate_dimensions(width, height, 4096)?;
            self.live.fetch_add(1, Ordering::SeqCst);
            Ok(FakeSurface {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                width,
                height,
            })
        }

        fn dispose(&self, surface: &FakeSurface) {
            self.live.fetch_sub(1, Ordering::SeqCst);
            self.disposed.lock().unwrap().push(surface.id);
        }

        fn backend_name(&self) -> &'static str {
            "fake"
        }
    }

    fn cache(capacity: usize) -> (SurfaceCache<FakeAllocator>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0.0));
        let config = SurfaceCacheConfig {
            max_cache_size: capacity,
            ..SurfaceCacheConfig::default()
        };
        (
            SurfaceCache::new(FakeAllocator::default(), clock.clone(), config),
            clock,
        )
    }

    #[test]
    fn same_key_and_size_reuses_the_surface() {
        let (cache, clock) = cache(10);
        let first = cache.get_surface("glow", 100, 50).unwrap();
        clock.advance(5.0);
        let second = cache.get_surface("glow", 100, 50).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        let stats = cache.stats();
        assert_eq!(stats.entries[0].use_count, 2);
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn dimension_change_disposes_before_replacing() {
        let (cache, _clock) = cache(10);
        let small = cache.get_surface("blur", 100, 100).unwrap();
        let large = cache.get_surface("blur", 200, 100).unwrap();

        assert_ne!(small.id, large.id);
        assert_eq!((large.width, large.height), (200, 100));
        assert_eq!(*cache.allocator().disposed.lock().unwrap(), vec![small.id]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().entries[0].use_count, 1);
    }

    #[test]
    fn capacity_eviction_keeps_the_most_recently_used() {
        let (cache, clock) = cache(10);
        for i in 0..12 {
            cache.get_surface(&format!("s{i}"), 10, 10).unwrap();
            clock.advance(1.0);
        }

        assert_eq!(cache.len(), 10);
        assert!(!cache.contains("s0"));
        assert!(!cache.contains("s1"));
        for i in 2..12 {
            assert!(cache.contains(&format!("s{i}")));
        }
        assert_eq!(cache.stats().evictions, 2);
        assert_eq!(cache.allocator().live.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn touching_an_entry_protects_it_from_eviction() {
        let (cache, clock) = cache(2);
        cache.get_surface("a", 10, 10).unwrap();
        clock.advance(1.0);
        cache.get_surface("b", 10, 10).unwrap();
        clock.advance(1.0);
        assert!(cache.release_surface("a"));
        clock.advance(1.0);
        cache.get_surface("c", 10, 10).unwrap();

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn newly_inserted_entry_is_never_the_victim() {
        let (cache, _clock) = cache(1);
        // Same timestamp for both: the older key must go, not the new one.
        cache.get_surface("old", 10, 10).unwrap();
        cache.get_surface("new", 10, 10).unwrap();
        assert!(cache.contains("new"));
        assert!(!cache.contains("old"));
    }

    #[test]
    fn allocation_failure_leaves_no_entry() {
        let (cache, _clock) = cache(10);
        cache.get_surface("ribbon", 64, 64).unwrap();

        let err = cache.get_surface("ribbon", 0, 64).unwrap_err();
        assert_eq!(err, SurfaceError::InvalidDimensions { width: 0, height: 64 });
        assert!(!cache.contains("ribbon"));
        assert_eq!(cache.allocator().live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let (cache, clock) = cache(10);
        cache.get_surface("stale", 10, 10).unwrap();
        clock.advance(30_000.0);
        cache.get_surface("fresh", 10, 10).unwrap();
        clock.advance(30_001.0);

        assert_eq!(cache.sweep_expired(), 1);
        assert!(!cache.contains("stale"));
        assert!(cache.contains("fresh"));
        assert_eq!(cache.sweep_expired(), 0);
    }

    #[test]
    fn remove_and_clear_dispose_everything() {
        let (cache, _clock) = cache(10);
        cache.get_surface("a", 10, 10).unwrap();
        cache.get_surface("b", 10, 10).unwrap();
        cache.get_surface("c", 10, 10).unwrap();

        assert!(cache.remove_surface("a"));
        assert!(!cache.remove_surface("a"));
        assert!(!cache.release_surface("a"));
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.allocator().live.load(Ordering::SeqCst), 0);
        assert_eq!(cache.allocator().disposed.lock().unwrap().len(), 3);
    }

    #[test]
    fn stats_report_age_and_serialize() {
        let (cache, clock) = cache(4);
        cache.get_surface("b", 20, 10).unwrap();
        cache.get_surface("a", 10, 20).unwrap();
        clock.advance(250.0);

        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.capacity, 4);
        assert_eq!(stats.entries[0].key, "a");
        assert_eq!(stats.entries[0].age_ms, 250.0);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["entries"][1]["width"], 20);
    }

    #[test]
    fn background_sweeper_runs_and_stops() {
        let clock = Arc::new(ManualClock::new(0.0));
        let config = SurfaceCacheConfig {
            max_age_ms: 100.0,
            sweep_interval_ms: 5,
            ..SurfaceCacheConfig::default()
        };
        let cache = Arc::new(SurfaceCache::new(FakeAllocator::default(), clock.clone(), config));
        cache.get_surface("trail", 10, 10).unwrap();

        let mut sweeper = cache.start_sweeper().unwrap();
        clock.advance(500.0);
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while cache.contains("trail") && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!cache.contains("trail"));

        sweeper.stop();
        sweeper.stop();
        assert!(!sweeper.is_running());
    }
}
