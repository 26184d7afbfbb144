//! Bounded memoisation of encode results.
//!
//! Map UIs re-encode on every click and search result, usually around the
//! same handful of cells. [`CachingGrid`] wraps a [`Grid`] with a small
//! least-recently-used memo keyed by the coordinate quantised to well below
//! any practical cell size. The cache is purely an optimisation: a lock
//! failure degrades to recomputation, never to a wrong or missing result.

use std::{collections::HashMap, sync::Mutex};

use crate::{
    error::{Error, Result},
    grid::{Decoded, Grid},
    point::Coordinate,
};

/// Cache key resolution: micro-degrees, ~0.11 m of latitude. Far below the
/// finest cell of any practical grid, so quantisation cannot move a
/// coordinate across more than the sub-meter fringe of a cell.
const KEY_SCALE: f64 = 1e6;

/// Default entry bound, sized to a map-browsing session's click volume.
pub const DEFAULT_CAPACITY: usize = 512;

/// A coordinate quantised to the cache lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Latitude in micro-degrees.
    lat_micro: i64,
    /// Longitude in micro-degrees.
    lon_micro: i64,
}

impl CacheKey {
    /// Quantise a coordinate to the cache lattice.
    fn quantize(coord: Coordinate) -> Self {
        Self {
            lat_micro: (coord.lat * KEY_SCALE).round() as i64,
            lon_micro: (coord.lon * KEY_SCALE).round() as i64,
        }
    }

    /// The exact coordinate this key stands for.
    fn coordinate(self) -> Coordinate {
        Coordinate::new(
            self.lat_micro as f64 / KEY_SCALE,
            self.lon_micro as f64 / KEY_SCALE,
        )
    }
}

/// One memoised code with its recency stamp.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The memoised code.
    code: String,
    /// Recency stamp; larger is more recent.
    last_used: u64,
}

/// Hit and miss counters for a cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that fell through to the codec.
    pub misses: u64,
}

/// Mutable cache state behind the lock.
#[derive(Debug, Default)]
struct CacheInner {
    /// Stored entries.
    entries: HashMap<CacheKey, CacheEntry>,
    /// Monotonic stamp source for recency ordering.
    tick: u64,
    /// Hit/miss counters.
    stats: CacheStats,
}

/// Bounded LRU memo from quantised coordinates to codes.
///
/// All access goes through an interior [`Mutex`], so shared references are
/// safe across threads. A poisoned lock is treated as a permanent miss.
#[derive(Debug)]
struct EncodeCache {
    /// Guarded entries, recency state, and counters.
    inner: Mutex<CacheInner>,
    /// Maximum number of entries retained.
    capacity: usize,
}

impl EncodeCache {
    /// Create a cache bounded to `capacity` entries.
    fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            capacity,
        }
    }

    /// Look up a code, refreshing its recency on a hit.
    fn get(&self, key: &CacheKey) -> Option<String> {
        // A poisoned lock degrades to a miss; the caller recomputes.
        let mut guard = self.inner.lock().ok()?;
        let inner = &mut *guard;
        inner.tick += 1;
        match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = inner.tick;
                inner.stats.hits += 1;
                Some(entry.code.clone())
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }

    /// Store a code, evicting the least-recently-used entry when full.
    fn insert(&self, key: CacheKey, code: String) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut guard) = self.inner.lock() else {
            return;
        };
        let inner = &mut *guard;
        if inner.entries.len() >= self.capacity && !inner.entries.contains_key(&key) {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(oldest_key, _)| *oldest_key);
            if let Some(oldest) = oldest {
                inner.entries.remove(&oldest);
            }
        }
        inner.tick += 1;
        let stamp = inner.tick;
        inner.entries.insert(
            key,
            CacheEntry {
                code,
                last_used: stamp,
            },
        );
    }

    /// Number of entries currently stored.
    fn len(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.entries.len())
            .unwrap_or(0)
    }

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the hit/miss counters.
    fn stats(&self) -> CacheStats {
        self.inner
            .lock()
            .map(|inner| inner.stats)
            .unwrap_or_default()
    }
}

/// A [`Grid`] with a bounded memo of recent encode results.
///
/// `encode` quantises the coordinate to the cache lattice before encoding,
/// so the cached and uncached paths return byte-identical codes for the
/// same input; presence or absence of a cached entry changes latency only.
/// Decoding is uncached pass-through.
#[derive(Debug)]
pub struct CachingGrid {
    /// The wrapped codec.
    grid: Grid,
    /// Memo of recent encodes.
    cache: EncodeCache,
}

impl CachingGrid {
    /// Wrap a grid with the default cache capacity.
    pub fn new(grid: Grid) -> Self {
        Self::with_capacity(grid, DEFAULT_CAPACITY)
    }

    /// Wrap a grid with an explicit cache capacity.
    pub fn with_capacity(grid: Grid, capacity: usize) -> Self {
        Self {
            grid,
            cache: EncodeCache::new(capacity),
        }
    }

    /// The wrapped grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Snapshot of the cache's hit/miss counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Encode a coordinate, memoising the result.
    pub fn encode(&self, coord: Coordinate) -> Result<String> {
        if !self.grid.is_valid_coordinate(coord) {
            return Err(Error::OutOfDomain {
                lat: coord.lat,
                lon: coord.lon,
            });
        }
        let key = CacheKey::quantize(coord);
        if let Some(code) = self.cache.get(&key) {
            return Ok(code);
        }
        let code = self.grid.encode(key.coordinate())?;
        self.cache.insert(key, code.clone());
        Ok(code)
    }

    /// Decode a code. Uncached; see [`Grid::decode`].
    pub fn decode(&self, code: &str) -> Result<Decoded> {
        self.grid.decode(code)
    }
}
