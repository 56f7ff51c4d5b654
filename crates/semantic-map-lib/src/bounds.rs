//! Per-class bounding boxes of map elements
//!
//! Built once when the map is loaded. Each class keeps its rectangles and ids
//! in two parallel vectors, in document order.

use geo::{Coord, Rect};
use glam::DVec3;

/// Axis-aligned bounds (x/y only) and ids of one element class
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassBounds {
    /// `[min, max]` corners in world coordinates
    pub bounds: Vec<Rect<f64>>,
    /// Canonical ids, parallel to `bounds`
    pub ids: Vec<String>,
}

impl ClassBounds {
    pub(crate) fn push(&mut self, id: String, rect: Rect<f64>) {
        self.bounds.push(rect);
        self.ids.push(id);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// `(id, rect)` pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rect<f64>)> {
        self.ids.iter().map(String::as_str).zip(self.bounds.iter())
    }

    /// Union of all rectangles of this class, `None` if empty
    pub fn total_bounds(&self) -> Option<Rect<f64>> {
        self.bounds.iter().copied().reduce(union)
    }
}

/// Bounds of the element classes used for spatial lookups
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundsRegistry {
    pub lanes: ClassBounds,
    pub crosswalks: ClassBounds,
}

impl BoundsRegistry {
    /// Union of lane and crosswalk bounds, `None` if the map has neither
    pub fn total_bounds(&self) -> Option<Rect<f64>> {
        match (self.lanes.total_bounds(), self.crosswalks.total_bounds()) {
            (Some(a), Some(b)) => Some(union(a, b)),
            (a, b) => a.or(b),
        }
    }
}

/// Min/max over x and y of one or more polylines (z is ignored)
///
/// Returns `None` if no points are given.
pub fn xy_bounds<'a>(polylines: impl IntoIterator<Item = &'a [DVec3]>) -> Option<Rect<f64>> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut found_point = false;

    for point in polylines.into_iter().flatten() {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
        found_point = true;
    }

    found_point.then(|| Rect::new(Coord { x: min_x, y: min_y }, Coord { x: max_x, y: max_y }))
}

fn union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}
