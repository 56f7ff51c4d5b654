//! Memoization of decoded geometry
//!
//! Every derived artifact is computed at most once per key and shared as an
//! `Arc`. The tables are bounded by a large soft capacity; eviction (LRU) only
//! protects against unbounded parameter sweeps and is never relied upon.

use crate::Result;
use crate::coords::{CrosswalkCoords, LaneCoords};
use crate::interpolation::{InterpolationMethod, LaneInterpolation};
use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cache key for interpolated lanes
///
/// The step is keyed by its bit pattern so that every distinct float value is
/// its own entry.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub(crate) struct InterpolationKey {
    id: String,
    step_bits: u64,
    method: InterpolationMethod,
}

impl InterpolationKey {
    pub(crate) fn new(id: &str, step: f64, method: InterpolationMethod) -> Self {
        Self {
            id: id.to_string(),
            step_bits: step.to_bits(),
            method,
        }
    }
}

/// Entry counts of the geometry cache
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheStats {
    pub lane_coords: usize,
    pub crosswalk_coords: usize,
    pub traffic_control_ids: usize,
    pub interpolations: usize,
}

/// One table per cached operation
pub(crate) struct CacheTables {
    pub(crate) lanes: LruCache<String, Arc<LaneCoords>>,
    pub(crate) crosswalks: LruCache<String, Arc<CrosswalkCoords>>,
    pub(crate) traffic_controls: LruCache<String, Arc<Vec<String>>>,
    pub(crate) interpolations: LruCache<InterpolationKey, Arc<LaneInterpolation>>,
}

/// Geometry cache shared by all queries of a map
///
/// A single lock covers lookup, computation and insertion so that concurrent
/// callers never compute the same key twice.
pub(crate) struct GeometryCache {
    tables: Mutex<CacheTables>,
}

impl GeometryCache {
    pub(crate) fn new(capacity: NonZeroUsize) -> Self {
        Self {
            tables: Mutex::new(CacheTables {
                lanes: LruCache::new(capacity),
                crosswalks: LruCache::new(capacity),
                traffic_controls: LruCache::new(capacity),
                interpolations: LruCache::new(capacity),
            }),
        }
    }

    /// Lock all tables for a read-check/compute/insert sequence
    pub(crate) fn lock(&self) -> MutexGuard<'_, CacheTables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Geometry cache mutex poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Number of entries currently held by each table
    pub(crate) fn stats(&self) -> CacheStats {
        let tables = self.lock();
        CacheStats {
            lane_coords: tables.lanes.len(),
            crosswalk_coords: tables.crosswalks.len(),
            traffic_control_ids: tables.traffic_controls.len(),
            interpolations: tables.interpolations.len(),
        }
    }
}

/// Return the cached value for `key`, computing and storing it on a miss
///
/// Errors from `compute` are returned as-is and nothing is stored.
pub(crate) fn get_or_try_insert<K, V>(
    table: &mut LruCache<K, Arc<V>>,
    key: K,
    compute: impl FnOnce() -> Result<V>,
) -> Result<Arc<V>>
where
    K: Hash + Eq,
{
    if let Some(hit) = table.get(&key) {
        return Ok(Arc::clone(hit));
    }
    let value = Arc::new(compute()?);
    table.put(key, Arc::clone(&value));
    Ok(value)
}
