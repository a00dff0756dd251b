//! Segment geometry
//!
//! Segment `i` of `n` covers the half-open range `[i·360/n, (i+1)·360/n)`,
//! measured in degrees clockwise from the pointer at 12 o'clock.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{normalize_degrees, polar_to_cartesian};

/// One angular slice of the wheel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Entry index this slice belongs to
    pub index: usize,
    /// Start angle (degrees, inclusive)
    pub start_deg: f64,
    /// End angle (degrees, exclusive)
    pub end_deg: f64,
}

impl Segment {
    /// Segment for entry `index` on a wheel of `count` entries
    pub fn new(index: usize, count: usize) -> Self {
        let span = 360.0 / count as f64;
        Self {
            index,
            start_deg: index as f64 * span,
            end_deg: (index + 1) as f64 * span,
        }
    }

    /// Angular width of the slice
    #[inline]
    pub fn span(&self) -> f64 {
        self.end_deg - self.start_deg
    }

    /// Angle of the line that halves the slice
    #[inline]
    pub fn bisector(&self) -> f64 {
        self.start_deg + self.span() / 2.0
    }

    /// Check if a wheel angle falls inside the slice
    pub fn contains_angle(&self, degrees: f64) -> bool {
        let a = normalize_degrees(degrees);
        a >= self.start_deg && a < self.end_deg
    }

    /// Point on the bisector at distance `r` from the center
    pub fn point_on_bisector(&self, r: f64) -> DVec2 {
        polar_to_cartesian(r, self.bisector())
    }

    /// All segments of a wheel with `count` entries
    pub fn all(count: usize) -> Vec<Segment> {
        (0..count).map(|i| Segment::new(i, count)).collect()
    }
}

/// Index of the segment sitting under the top pointer after a clockwise rotation
///
/// Rotating the wheel clockwise by `R` brings wheel angle `360 - R` under the
/// pointer.
pub fn segment_under_pointer(rotation_deg: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let under = normalize_degrees(360.0 - normalize_degrees(rotation_deg));
    let span = 360.0 / count as f64;
    let idx = (under / span).floor() as usize;
    Some(idx.min(count - 1))
}
