//! Utility functions for coordinate conversions between map frames

use crate::{MapError, Result};
use glam::{DMat4, DVec3, DVec4};

/// WGS84 semi-major axis in meters
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// WGS84 first eccentricity squared
const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Fixed-point scale of stored latitudes and longitudes
pub const E7_SCALE: f64 = 1e7;

/// Convert a fixed-point degree value (degrees * 1e7) back to degrees
#[inline(always)]
pub fn undo_e7(value: i32) -> f64 {
    value as f64 / E7_SCALE
}

/// Geodetic (lat, lon, altitude) on the WGS84 ellipsoid to ECEF meters
#[inline]
pub fn geodetic_to_ecef(lat: f64, lon: f64, alt: f64) -> DVec3 {
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();

    // Prime vertical radius of curvature
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();

    DVec3::new(
        (n + alt) * cos_lat * cos_lon,
        (n + alt) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + alt) * sin_lat,
    )
}

/// Rotate a local east-north-up offset into ECEF axes (no translation)
///
/// Adding the result to the ECEF position of the frame origin gives the
/// ECEF position of the offset point.
#[inline]
pub fn enu_to_uvw(enu: DVec3, lat0: f64, lon0: f64) -> DVec3 {
    let (sin_lat, cos_lat) = lat0.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon0.to_radians().sin_cos();

    let t = cos_lat * enu.z - sin_lat * enu.y;
    let w = sin_lat * enu.z + cos_lat * enu.y;
    let u = cos_lon * t - sin_lon * enu.x;
    let v = sin_lon * t + cos_lon * enu.x;
    DVec3::new(u, v, w)
}

/// Build a matrix from row-major nested arrays (the usual on-disk layout)
pub fn mat4_from_rows(rows: [[f64; 4]; 4]) -> DMat4 {
    DMat4::from_cols_array_2d(&rows).transpose()
}

/// Invert a homogeneous transform, rejecting singular matrices
pub fn invert_transform(matrix: DMat4) -> Result<DMat4> {
    let det = matrix.determinant();
    if det == 0.0 || !det.is_finite() {
        return Err(MapError::SingularMatrix);
    }
    let inverse = matrix.inverse();
    if !inverse.is_finite() {
        return Err(MapError::SingularMatrix);
    }
    Ok(inverse)
}

/// Apply the affine part of a homogeneous transform to a point
///
/// The bottom row of the matrix is ignored (no perspective divide).
#[inline(always)]
pub fn transform_point(matrix: &DMat4, point: DVec3) -> DVec3 {
    (*matrix * DVec4::new(point.x, point.y, point.z, 1.0)).truncate()
}
