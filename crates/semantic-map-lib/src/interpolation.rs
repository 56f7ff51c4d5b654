//! Polyline resampling along cumulative arc length
//!
//! Two strategies are supported:
//! - [`InterpolationMethod::FixedStepMeters`]: one sample every `step` meters,
//!   starting at the first point and stopping strictly before the last one
//!   (variable length result)
//! - [`InterpolationMethod::FixedCount`]: exactly `step` samples evenly spread
//!   between the first and last point, both included
//!
//! Samples are computed per axis by piecewise-linear interpolation. Sample
//! positions never leave the source distance range, so nothing is extrapolated.

use crate::coords::LaneCoords;
use crate::{MapError, Result};
use glam::DVec3;
use std::fmt;
use std::str::FromStr;

/// Resampling strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum InterpolationMethod {
    /// Fixed step in meters over the cumulative distance
    FixedStepMeters = 0,
    /// Fixed number of output points
    FixedCount = 1,
}

impl TryFrom<i32> for InterpolationMethod {
    type Error = MapError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(InterpolationMethod::FixedStepMeters),
            1 => Ok(InterpolationMethod::FixedCount),
            other => Err(MapError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl FromStr for InterpolationMethod {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fixed-step-meters" | "meters" => Ok(InterpolationMethod::FixedStepMeters),
            "fixed-count" | "count" => Ok(InterpolationMethod::FixedCount),
            other => Err(MapError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationMethod::FixedStepMeters => f.write_str("fixed-step-meters"),
            InterpolationMethod::FixedCount => f.write_str("fixed-count"),
        }
    }
}

/// Resampled lane boundaries and their midline
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneInterpolation {
    pub left: Vec<DVec3>,
    pub right: Vec<DVec3>,
    pub midlane: Vec<DVec3>,
}

/// Distance along the polyline from the first point, starting at 0
pub fn cumulative_distances(points: &[DVec3]) -> Vec<f64> {
    let mut total = 0.0;
    let mut distances = Vec::with_capacity(points.len());
    if !points.is_empty() {
        distances.push(0.0);
    }
    for pair in points.windows(2) {
        total += pair[0].distance(pair[1]);
        distances.push(total);
    }
    distances
}

/// Upper bound on the number of samples produced by one resampling
pub const MAX_SAMPLES: usize = 1 << 24;

/// Sample positions for the given method over `[start, end]`
///
/// Steps that would produce more than [`MAX_SAMPLES`] positions are rejected
/// with `MapError::InvalidStep`.
pub fn sample_positions(
    start: f64,
    end: f64,
    step: f64,
    method: InterpolationMethod,
) -> Result<Vec<f64>> {
    let invalid = || MapError::InvalidStep { step, method };
    match method {
        InterpolationMethod::FixedCount => {
            if !step.is_finite() {
                return Err(invalid());
            }
            let count = step as usize;
            if !(2..=MAX_SAMPLES).contains(&count) {
                return Err(invalid());
            }
            Ok(linspace(start, end, count))
        }
        InterpolationMethod::FixedStepMeters => {
            if !step.is_finite() || step <= 0.0 {
                return Err(invalid());
            }
            let count = ((end - start) / step).ceil();
            if count.is_nan() || count <= 0.0 {
                return Ok(Vec::new());
            }
            if count > MAX_SAMPLES as f64 {
                return Err(invalid());
            }
            Ok(arange(start, step, count as usize))
        }
    }
}

/// Resample `points` (with matching `cum_dist`) using `method`
///
/// # Arguments
/// * `points` - Source polyline
/// * `cum_dist` - Non-decreasing cumulative distance for each point
/// * `step` - Meters between samples, or the sample count for `FixedCount`
///   (fractional counts are truncated)
pub fn interpolate(
    points: &[DVec3],
    cum_dist: &[f64],
    step: f64,
    method: InterpolationMethod,
) -> Result<Vec<DVec3>> {
    debug_assert_eq!(points.len(), cum_dist.len());
    let (Some(&start), Some(&end)) = (cum_dist.first(), cum_dist.last()) else {
        return Ok(Vec::new());
    };

    let positions = sample_positions(start, end, step, method)?;
    Ok(sample_at(points, cum_dist, positions))
}

/// Evaluate the polyline at each arc-length position
fn sample_at(points: &[DVec3], cum_dist: &[f64], positions: Vec<f64>) -> Vec<DVec3> {
    positions
        .into_iter()
        .map(|x| {
            DVec3::new(
                interp(x, cum_dist, points, |p| p.x),
                interp(x, cum_dist, points, |p| p.y),
                interp(x, cum_dist, points, |p| p.z),
            )
        })
        .collect()
}

/// Resample both lane boundaries and synthesize the midline
///
/// With `FixedCount` both boundaries already have the same length and the
/// midline is their pointwise mean. With `FixedStepMeters` the boundaries may
/// differ in length, so the decoded boundaries are resampled again at
/// `max(left.len(), right.len())` evenly spaced positions (decoded point
/// counts, not resampled ones) before averaging. The returned `left`/`right`
/// keep the fixed-step result.
pub fn interpolate_lane(
    lane: &LaneCoords,
    step: f64,
    method: InterpolationMethod,
) -> Result<LaneInterpolation> {
    let distances_left = cumulative_distances(&lane.left);
    let distances_right = cumulative_distances(&lane.right);

    let left = interpolate(&lane.left, &distances_left, step, method)?;
    let right = interpolate(&lane.right, &distances_right, step, method)?;

    let midlane = match method {
        InterpolationMethod::FixedCount => midline(&left, &right),
        InterpolationMethod::FixedStepMeters => {
            let count = lane.left.len().max(lane.right.len());
            let left_fixed = resample_count(&lane.left, &distances_left, count);
            let right_fixed = resample_count(&lane.right, &distances_right, count);
            midline(&left_fixed, &right_fixed)
        }
    };

    Ok(LaneInterpolation {
        left,
        right,
        midlane,
    })
}

/// `count` evenly spaced samples over the whole polyline
///
/// Unlike `FixedCount` input, a count of 1 is allowed and yields the first point.
fn resample_count(points: &[DVec3], cum_dist: &[f64], count: usize) -> Vec<DVec3> {
    let (Some(&start), Some(&end)) = (cum_dist.first(), cum_dist.last()) else {
        return Vec::new();
    };
    sample_at(points, cum_dist, linspace(start, end, count))
}

/// Pointwise mean of two equal-length polylines
fn midline(left: &[DVec3], right: &[DVec3]) -> Vec<DVec3> {
    debug_assert_eq!(left.len(), right.len());
    left.iter()
        .zip(right)
        .map(|(l, r)| (*l + *r) / 2.0)
        .collect()
}

/// The first `count` values of `start + i * step`
fn arange(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// `count` evenly spaced values from `start` to `stop`, both included
///
/// A single value is just `start`.
fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count < 2 {
        return vec![start; count];
    }
    let delta = (stop - start) / (count - 1) as f64;
    let mut values: Vec<f64> = (0..count).map(|i| start + i as f64 * delta).collect();
    if let Some(last) = values.last_mut() {
        *last = stop;
    }
    values
}

/// Piecewise-linear interpolation of one axis at `x`
///
/// Outside the sampled range the end values are held. When several samples
/// share a distance, the right-most one is used as the left support.
fn interp(x: f64, xp: &[f64], points: &[DVec3], axis: impl Fn(&DVec3) -> f64) -> f64 {
    let last = xp.len() - 1;
    let idx = xp.partition_point(|&d| d <= x);
    if idx == 0 {
        return axis(&points[0]);
    }
    if idx > last {
        return axis(&points[last]);
    }

    let j = idx - 1;
    let (x0, x1) = (xp[j], xp[j + 1]);
    let (y0, y1) = (axis(&points[j]), axis(&points[j + 1]));
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
