//! MapApi - Top-level read-only accessor for a semantic map
//!
//! This module owns the decoded map document, the identifier index, the
//! geometry cache and the per-class bounds built at load time.

use crate::bounds::{self, BoundsRegistry};
use crate::cache::{self, CacheStats, GeometryCache, InterpolationKey};
use crate::coords::{CrosswalkCoords, LaneCoords, WorldTransform};
use crate::element::{self, ElementKey, FaceColor};
use crate::interpolation::{self, InterpolationMethod, LaneInterpolation};
use crate::proto::{GeoFrame, LaneBoundary, MapElement, MapFragment};
use crate::{MapError, Result, id};

use glam::{DMat4, DVec3};
use prost::Message;
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

/// Soft capacity of each geometry cache table
pub const DEFAULT_CACHE_CAPACITY: usize = 100_000;

/// Configuration for loading a map
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Maximum entries per cached operation before least-recently-used
    /// entries are dropped. Results never depend on this value.
    pub cache_capacity: NonZeroUsize,
    /// Decode lane and crosswalk geometry in parallel while building the
    /// bounds registry. The registry itself is always in document order.
    pub parallel_bounds: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            parallel_bounds: true,
        }
    }
}

/// Summary of a loaded map
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapInfo {
    /// Number of elements in the document
    pub element_count: usize,
    /// Number of elements classified as lanes
    pub lane_count: usize,
    /// Number of elements classified as crosswalks
    pub crosswalk_count: usize,
}

/// Read-only accessor for a semantic map document
///
/// - element access by position, text id or raw id bytes is O(1)
/// - decoded geometry is computed on first access and shared afterwards
/// - lane and crosswalk bounds are computed once at construction
pub struct MapApi {
    /// Elements in document order
    elements: Vec<MapElement>,
    /// Canonical id of each element, parallel to `elements`
    ids: Vec<String>,
    /// Canonical id -> position (last occurrence wins)
    ids_to_el: HashMap<String, usize>,
    /// ECEF -> world mapping
    transform: WorldTransform,
    /// Memoized geometry
    cache: GeometryCache,
    /// Per-class bounds of lanes and crosswalks
    bounds_info: BoundsRegistry,
    config: Config,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl MapApi {
    /// Build the accessor from an already decoded document
    ///
    /// # Arguments
    /// * `fragment` - The decoded map document
    /// * `world_to_ecef` - Dataset-specific world to ECEF transform; its
    ///   inverse maps decoded geometry into world coordinates
    /// * `config` - Cache and construction settings
    pub fn new(fragment: MapFragment, world_to_ecef: DMat4, config: Config) -> Result<Self> {
        profiling::scope!("map_api::new");

        let transform = WorldTransform::from_world_to_ecef(world_to_ecef)?;
        let elements = fragment.elements;

        let mut ids = Vec::with_capacity(elements.len());
        let mut ids_to_el = HashMap::with_capacity(elements.len());
        for (idx, element) in elements.iter().enumerate() {
            let element_id = id::canonicalize(element.id_bytes())?.to_string();
            if let Some(previous) = ids_to_el.insert(element_id.clone(), idx) {
                tracing::warn!(
                    "Duplicate element id {:?}: position {} shadows position {}",
                    element_id,
                    idx,
                    previous
                );
            }
            ids.push(element_id);
        }

        let mut map = MapApi {
            elements,
            ids,
            ids_to_el,
            transform,
            cache: GeometryCache::new(config.cache_capacity),
            bounds_info: BoundsRegistry::default(),
            config,
        };
        map.bounds_info = map.get_bounds()?;

        tracing::info!(
            "Loaded map with {} elements ({} lanes, {} crosswalks)",
            map.len(),
            map.bounds_info.lanes.len(),
            map.bounds_info.crosswalks.len()
        );
        Ok(map)
    }

    /// Decode a serialized document and build the accessor
    pub fn from_bytes(bytes: &[u8], world_to_ecef: DMat4, config: Config) -> Result<Self> {
        let fragment = MapFragment::decode(bytes)?;
        Self::new(fragment, world_to_ecef, config)
    }

    /// Read and decode a serialized document from disk
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        world_to_ecef: DMat4,
        config: Config,
    ) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Reading map from {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, world_to_ecef, config)
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look up an element by position, canonical id or raw id bytes
    pub fn get<'k>(&self, key: impl Into<ElementKey<'k>>) -> Result<&MapElement> {
        let position = match key.into() {
            ElementKey::Position(index) => index,
            ElementKey::Id(element_id) => self.position_of(element_id)?,
            ElementKey::Bytes(raw) => self.position_of(id::canonicalize(raw)?)?,
        };
        self.elements.get(position).ok_or(MapError::IndexOutOfRange {
            index: position,
            len: self.elements.len(),
        })
    }

    /// Canonical id of the element at `position`
    pub fn element_id(&self, position: usize) -> Result<&str> {
        self.ids
            .get(position)
            .map(String::as_str)
            .ok_or(MapError::IndexOutOfRange {
                index: position,
                len: self.ids.len(),
            })
    }

    /// Elements in document order, a fresh pass on every call
    pub fn iter(&self) -> std::slice::Iter<'_, MapElement> {
        self.elements.iter()
    }

    /// Whether the element with `element_id` is a traffic light face of `color`
    pub fn is_traffic_face_color(&self, element_id: &str, color: FaceColor) -> Result<bool> {
        let element = self.get(element_id)?;
        Ok(element
            .traffic_control_element()
            .is_some_and(|tce| element::has_face_color(tce, color)))
    }

    /// World coordinates of both boundaries of a lane
    pub fn get_lane_coords(&self, element_id: &str) -> Result<Arc<LaneCoords>> {
        let mut tables = self.cache.lock();
        cache::get_or_try_insert(&mut tables.lanes, element_id.to_string(), || {
            self.decode_lane(element_id)
        })
    }

    /// World coordinates of a crosswalk polygon
    pub fn get_crosswalk_coords(&self, element_id: &str) -> Result<Arc<CrosswalkCoords>> {
        let mut tables = self.cache.lock();
        cache::get_or_try_insert(&mut tables.crosswalks, element_id.to_string(), || {
            self.decode_crosswalk(element_id)
        })
    }

    /// Ids of the traffic control elements referenced by a lane, in order
    pub fn get_lane_traffic_control_ids(&self, element_id: &str) -> Result<Arc<Vec<String>>> {
        let mut tables = self.cache.lock();
        cache::get_or_try_insert(&mut tables.traffic_controls, element_id.to_string(), || {
            let lane = self
                .get(element_id)?
                .lane()
                .ok_or_else(|| MapError::Precondition {
                    id: element_id.to_string(),
                    expected: "lane",
                })?;
            lane.traffic_controls.iter().map(id::id_as_str).collect()
        })
    }

    /// Resampled lane boundaries and midline
    ///
    /// See [`interpolation::interpolate_lane`] for the resampling rules.
    /// Results are cached per `(id, step, method)`.
    pub fn get_lane_as_interpolation(
        &self,
        element_id: &str,
        step: f64,
        method: InterpolationMethod,
    ) -> Result<Arc<LaneInterpolation>> {
        let mut tables = self.cache.lock();
        let key = InterpolationKey::new(element_id, step, method);
        if let Some(hit) = tables.interpolations.get(&key) {
            return Ok(Arc::clone(hit));
        }

        tracing::trace!("Interpolating lane {} ({}, step {})", element_id, method, step);
        let lane = cache::get_or_try_insert(&mut tables.lanes, element_id.to_string(), || {
            self.decode_lane(element_id)
        })?;
        cache::get_or_try_insert(&mut tables.interpolations, key, || {
            interpolation::interpolate_lane(&lane, step, method)
        })
    }

    /// Bounds and ids of lanes and crosswalks, in document order
    #[inline]
    pub fn bounds(&self) -> &BoundsRegistry {
        &self.bounds_info
    }

    /// Counts of loaded elements by class
    pub fn get_info(&self) -> MapInfo {
        MapInfo {
            element_count: self.len(),
            lane_count: self.bounds_info.lanes.len(),
            crosswalk_count: self.bounds_info.crosswalks.len(),
        }
    }

    /// Current number of cached entries per operation
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn position_of(&self, element_id: &str) -> Result<usize> {
        self.ids_to_el
            .get(element_id)
            .copied()
            .ok_or_else(|| MapError::UnknownId(element_id.to_string()))
    }

    fn decode_lane(&self, element_id: &str) -> Result<LaneCoords> {
        tracing::trace!("Decoding lane {}", element_id);
        let lane = self
            .get(element_id)?
            .lane()
            .ok_or_else(|| MapError::Precondition {
                id: element_id.to_string(),
                expected: "lane",
            })?;

        let frame = lane.geo_frame.as_ref();
        Ok(LaneCoords {
            left: self.unpack_boundary(lane.left_boundary.as_ref(), frame)?,
            right: self.unpack_boundary(lane.right_boundary.as_ref(), frame)?,
        })
    }

    fn decode_crosswalk(&self, element_id: &str) -> Result<CrosswalkCoords> {
        tracing::trace!("Decoding crosswalk {}", element_id);
        let element = self.get(element_id)?;
        if !element::is_crosswalk(element) {
            return Err(MapError::Precondition {
                id: element_id.to_string(),
                expected: "crosswalk",
            });
        }
        let tce = element
            .traffic_control_element()
            .ok_or_else(|| MapError::Precondition {
                id: element_id.to_string(),
                expected: "crosswalk",
            })?;

        let polygon = self.transform.unpack_deltas_cm(
            &tce.points_x_deltas_cm,
            &tce.points_y_deltas_cm,
            &tce.points_z_deltas_cm,
            tce.geo_frame.as_ref(),
        )?;
        Ok(CrosswalkCoords { polygon })
    }

    fn unpack_boundary(
        &self,
        boundary: Option<&LaneBoundary>,
        frame: Option<&GeoFrame>,
    ) -> Result<Vec<DVec3>> {
        let boundary = boundary.ok_or(MapError::Shape { x: 0, y: 0, z: 0 })?;
        self.transform.unpack_deltas_cm(
            &boundary.vertex_deltas_x_cm,
            &boundary.vertex_deltas_y_cm,
            &boundary.vertex_deltas_z_cm,
            frame,
        )
    }

    /// Decode every lane and crosswalk in parallel and seed the cache
    ///
    /// Each distinct id is decoded once; the id is resolved through the index,
    /// so duplicated ids decode the element that won the lookup table.
    fn prefetch_geometry(&self) -> Result<()> {
        profiling::scope!("map_api::prefetch_geometry");

        let mut seen_lanes = HashSet::new();
        let mut seen_crosswalks = HashSet::new();
        let mut lane_ids = Vec::new();
        let mut crosswalk_ids = Vec::new();
        for (element, element_id) in self.elements.iter().zip(&self.ids) {
            if element::is_lane(element) && seen_lanes.insert(element_id.as_str()) {
                lane_ids.push(element_id.as_str());
            }
            if element::is_crosswalk(element) && seen_crosswalks.insert(element_id.as_str()) {
                crosswalk_ids.push(element_id.as_str());
            }
        }

        let lanes: Vec<(&str, LaneCoords)> = lane_ids
            .into_par_iter()
            .map(|element_id| self.decode_lane(element_id).map(|coords| (element_id, coords)))
            .collect::<Result<_>>()?;
        let crosswalks: Vec<(&str, CrosswalkCoords)> = crosswalk_ids
            .into_par_iter()
            .map(|element_id| {
                self.decode_crosswalk(element_id)
                    .map(|coords| (element_id, coords))
            })
            .collect::<Result<_>>()?;

        let mut tables = self.cache.lock();
        for (element_id, coords) in lanes {
            tables.lanes.put(element_id.to_string(), Arc::new(coords));
        }
        for (element_id, coords) in crosswalks {
            tables.crosswalks.put(element_id.to_string(), Arc::new(coords));
        }
        Ok(())
    }

    /// For each lane and crosswalk, compute `[min, max]` over x/y and keep its id
    ///
    /// Coordinates are fetched through the cache, so every lane and crosswalk
    /// is decoded while the map is loaded.
    fn get_bounds(&self) -> Result<BoundsRegistry> {
        profiling::scope!("map_api::get_bounds");

        if self.config.parallel_bounds {
            self.prefetch_geometry()?;
        }

        let mut registry = BoundsRegistry::default();
        for (element, element_id) in self.elements.iter().zip(&self.ids) {
            if element::is_lane(element) {
                let lane = self.get_lane_coords(element_id)?;
                let boundaries = [lane.left.as_slice(), lane.right.as_slice()];
                if let Some(rect) = bounds::xy_bounds(boundaries) {
                    registry.lanes.push(element_id.clone(), rect);
                }
            }

            if element::is_crosswalk(element) {
                let crosswalk = self.get_crosswalk_coords(element_id)?;
                if let Some(rect) = bounds::xy_bounds([crosswalk.polygon.as_slice()]) {
                    registry.crosswalks.push(element_id.clone(), rect);
                }
            }
        }

        tracing::debug!(
            "Computed bounds for {} lanes and {} crosswalks",
            registry.lanes.len(),
            registry.crosswalks.len()
        );
        Ok(registry)
    }
}
