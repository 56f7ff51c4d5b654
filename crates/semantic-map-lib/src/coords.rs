//! Delta-encoded coordinate decoding
//!
//! Geometry is stored as centimeter offsets from the previous vertex in a local
//! ENU frame. Decoding accumulates the offsets, lifts the points to ECEF and
//! finally maps them into the caller's world frame.

use crate::proto::GeoFrame;
use crate::{MapError, Result, utils};
use glam::{DMat4, DVec3};

/// Decoded boundaries of a lane, in world coordinates
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneCoords {
    pub left: Vec<DVec3>,
    pub right: Vec<DVec3>,
}

/// Decoded crosswalk polygon, in world coordinates
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrosswalkCoords {
    pub polygon: Vec<DVec3>,
}

/// Maps ECEF coordinates into the caller's world frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldTransform {
    ecef_to_world: DMat4,
}

impl WorldTransform {
    /// Build from the dataset's world-to-ECEF matrix, inverting it once
    pub fn from_world_to_ecef(world_to_ecef: DMat4) -> Result<Self> {
        Ok(Self {
            ecef_to_world: utils::invert_transform(world_to_ecef)?,
        })
    }

    /// Decode centimeter deltas expressed in `frame` into world coordinates
    ///
    /// # Arguments
    /// * `dx`, `dy`, `dz` - Per-vertex displacements in centimeters (local ENU)
    /// * `frame` - Geographic origin of the ENU frame; a missing frame is the
    ///   (0, 0) origin
    ///
    /// # Returns
    /// One world-frame point per delta, or `MapError::Shape` if the sequences
    /// are empty or differ in length
    pub fn unpack_deltas_cm(
        &self,
        dx: &[i32],
        dy: &[i32],
        dz: &[i32],
        frame: Option<&GeoFrame>,
    ) -> Result<Vec<DVec3>> {
        if dx.is_empty() || dx.len() != dy.len() || dx.len() != dz.len() {
            return Err(MapError::Shape {
                x: dx.len(),
                y: dy.len(),
                z: dz.len(),
            });
        }

        let origin = frame.and_then(|f| f.origin).unwrap_or_default();
        let lat = utils::undo_e7(origin.lat_e7);
        let lng = utils::undo_e7(origin.lng_e7);
        let frame_ecef = utils::geodetic_to_ecef(lat, lng, 0.0);

        let points = cumulative_local_m(dx, dy, dz)
            .into_iter()
            .map(|local| {
                let ecef = frame_ecef + utils::enu_to_uvw(local, lat, lng);
                utils::transform_point(&self.ecef_to_world, ecef)
            })
            .collect();

        Ok(points)
    }
}

/// Accumulate centimeter deltas into local ENU meters (no frame transform)
pub fn cumulative_local_m(dx: &[i32], dy: &[i32], dz: &[i32]) -> Vec<DVec3> {
    let mut local = DVec3::ZERO;
    dx.iter()
        .zip(dy)
        .zip(dz)
        .map(|((&x, &y), &z)| {
            local += DVec3::new(x as f64 / 100.0, y as f64 / 100.0, z as f64 / 100.0);
            local
        })
        .collect()
}
