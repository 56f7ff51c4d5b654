//! Semantic Map Library - Read-only access to delta-encoded HD map documents
//!
//! This library loads a serialized map document (lanes, pedestrian crosswalks
//! and traffic signal faces), indexes its elements by identifier and decodes
//! their centimeter delta geometry into a caller-defined world frame. Derived
//! geometry is memoized, and lane/crosswalk bounds are built once at load time.
//!
//! # Architecture
//!
//! - **[`proto`]**: Wire schema of the map document
//! - **[`MapApi`]**: Element index, classifiers and cached geometry queries
//! - **[`WorldTransform`]**: Delta decoding from local ENU frames to world coordinates
//! - **[`interpolation`]**: Arc-length resampling of lane boundaries and midlines
//! - **[`BoundsRegistry`]**: Per-class x/y bounds in document order
//!
//! # Performance Characteristics
//!
//! - **Load Time**: O(N) to index, plus one geometry decode per lane and crosswalk
//!   (parallelizable)
//! - **Lookup**: O(1) by position, id or raw id bytes
//! - **Geometry Queries**: computed once per key, then shared through `Arc`

mod bounds;
mod cache;
mod coords;
mod element;
mod id;
pub mod interpolation;
mod map_api;
pub mod proto;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Public API exports
pub use bounds::{BoundsRegistry, ClassBounds, xy_bounds};
pub use cache::CacheStats;
pub use coords::{CrosswalkCoords, LaneCoords, WorldTransform, cumulative_local_m};
pub use element::{ElementKey, FaceColor, FaceDirection, has_face_color, is_crosswalk, is_lane};
pub use id::{canonicalize, id_as_str};
pub use interpolation::{InterpolationMethod, LaneInterpolation};
pub use map_api::{Config, DEFAULT_CACHE_CAPACITY, MapApi, MapInfo};

/// Error types for map access
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Map document parsing error: {0}")]
    DocumentParse(#[from] prost::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("World-to-ECEF transform is not invertible")]
    SingularMatrix,

    #[error("Element index {index} out of range for map with {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown element id: {0:?}")]
    UnknownId(String),

    #[error("Element id is not valid UTF-8: {0}")]
    InvalidId(#[from] std::str::Utf8Error),

    #[error("Element {id:?} is not a {expected}")]
    Precondition { id: String, expected: &'static str },

    #[error("Coordinate deltas must be non-empty and equal in length (x={x}, y={y}, z={z})")]
    Shape { x: usize, y: usize, z: usize },

    #[error("Unsupported interpolation method: {0}")]
    UnsupportedMethod(String),

    #[error("Invalid step {step} for {method} interpolation")]
    InvalidStep {
        step: f64,
        method: InterpolationMethod,
    },

    #[error("Unknown signal face color: {0:?}")]
    UnknownColor(String),
}

pub type Result<T> = std::result::Result<T, MapError>;
