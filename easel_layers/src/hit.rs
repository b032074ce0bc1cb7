// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Precise hit helpers for stroked geometry.
//!
//! These are small building blocks rather than a full stroke model; the
//! layer hit tests in this crate are bounding-box based, and hosts compose
//! these helpers when they need per-segment precision (hovering a painted
//! mark, snapping to a stroke).

use kurbo::{Line, ParamCurveNearest, Point};

/// A stroked line segment (centerline plus half-width).
///
/// The hit test compares the query point's distance to the segment against
/// the half-width plus a tolerance. Joins, caps, and variable width are
/// not modeled; chains of segments are tested one by one.
#[derive(Clone, Copy, Debug)]
pub struct StrokedSegment {
    /// The centerline segment in local coordinates.
    pub line: Line,
    /// Half of the stroke width in local units.
    pub half_width: f64,
}

impl StrokedSegment {
    /// Whether `pt` lies within `tolerance` of the stroked outline.
    #[must_use]
    pub fn hit(&self, pt: Point, tolerance: f64) -> bool {
        let dist = self.line.nearest(pt, 1e-9).distance_sq.sqrt();
        dist <= self.half_width + tolerance
    }
}
