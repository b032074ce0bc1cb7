// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stroke command: bounded pre-image snapshot plus replayable stroke
//! data.

use easel_raster::{BlendMode, Color, PixelRect, Snapshot, Surface};
use kurbo::{Circle, Line, Point, Rect};

use crate::command::Command;

/// Padding added around a stroke's bounding box, in pixels.
///
/// Covers anti-aliased fringe pixels outside the exact disc union.
const BOUNDS_PADDING: f64 = 2.0;

/// Merge window for consecutive stroke commands, in milliseconds.
const MERGE_WINDOW_MS: f64 = 100.0;

/// Painting mode of a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StrokeMode {
    /// Paint with the stroke color (source-over).
    #[default]
    Brush,
    /// Erase to transparency (destination-out).
    Eraser,
}

/// One pressure-weighted point of a stroke, in layer-local pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokePoint {
    /// X coordinate in layer-local pixels.
    pub x: f64,
    /// Y coordinate in layer-local pixels.
    pub y: f64,
    /// Normalized pressure in `[0, 1]`.
    pub pressure: f64,
}

impl StrokePoint {
    /// Build a stroke point.
    #[must_use]
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }

    fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A complete stroke: an inclusive chain of pressure-weighted points plus
/// its style.
///
/// Segment `i` runs from point `i - 1` to point `i`; a one-point stroke is
/// a filled disk of radius `size * pressure / 2`.
#[derive(Clone, Debug)]
pub struct StrokeData {
    /// Ordered points in layer-local pixels.
    pub points: Vec<StrokePoint>,
    /// Stroke color (ignored by the eraser, which always cuts with full
    /// coverage).
    pub color: Color,
    /// Stroke diameter in pixels at pressure 1.
    pub size: f64,
    /// Brush or eraser.
    pub mode: StrokeMode,
}

impl StrokeData {
    /// The union of the per-point discs, padded by [`BOUNDS_PADDING`].
    ///
    /// Returns `None` for an empty point list.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let mut iter = self.points.iter();
        let first = iter.next()?;
        let mut rect = point_disc(first, self.size);
        for pt in iter {
            rect = rect.union(point_disc(pt, self.size));
        }
        Some(rect.inflate(BOUNDS_PADDING, BOUNDS_PADDING))
    }

    /// Replay the stroke onto `surface` in layer-local pixel space.
    ///
    /// Resets transform, clip, and alpha for the duration of the replay
    /// and leaves the surface state untouched afterwards.
    pub(crate) fn replay(&self, surface: &mut Surface) {
        if self.points.is_empty() {
            return;
        }
        surface.save();
        surface.reset_transform();
        surface.clear_clip();
        surface.set_alpha(1.0);
        let color = match self.mode {
            StrokeMode::Brush => {
                surface.set_composite(BlendMode::SourceOver);
                self.color
            }
            StrokeMode::Eraser => {
                surface.set_composite(BlendMode::DestinationOut);
                Color::from_rgba8(0, 0, 0, 255)
            }
        };
        if self.points.len() == 1 {
            let pt = self.points[0];
            surface.fill_disk(
                Circle::new(pt.point(), (self.size * pt.pressure).max(0.001) / 2.0),
                color,
            );
        } else {
            for pair in self.points.windows(2) {
                let width = (self.size * pair[1].pressure).max(0.001);
                surface.stroke_segment(Line::new(pair[0].point(), pair[1].point()), color, width);
            }
        }
        surface.restore();
    }

    fn same_style(&self, other: &Self) -> bool {
        self.mode == other.mode
            && self.size == other.size
            && self.color.to_rgba8() == other.color.to_rgba8()
    }
}

fn point_disc(pt: &StrokePoint, size: f64) -> Rect {
    let r = (size * pt.pressure).abs() / 2.0;
    Rect::new(pt.x - r, pt.y - r, pt.x + r, pt.y + r)
}

/// One stroke run inside a command, with its pre-image patch.
#[derive(Clone, Debug)]
struct StrokeRun {
    stroke: StrokeData,
    /// Pixel region the pre-image covers. `None` means degenerate: the
    /// patch falls back to the full raster.
    region: Option<PixelRect>,
    /// Whether `region` has been resolved against the target's extent.
    resolved: bool,
    /// Pre-stroke pixels of `region`. `None` after a failed capture;
    /// undo then clears the region instead of restoring it.
    snapshot: Option<Snapshot>,
}

impl StrokeRun {
    fn resolve(&mut self, surface: &Surface) {
        if self.resolved {
            return;
        }
        self.region = self
            .stroke
            .bounds()
            .and_then(|b| PixelRect::from_rect_clipped(b, surface.width(), surface.height()));
        self.resolved = true;
    }

    fn capture_if_missing(&mut self, surface: &Surface) {
        if self.snapshot.is_some() {
            return;
        }
        self.snapshot = match self.region {
            Some(region) => surface.snapshot_region(region),
            None => Some(surface.snapshot()),
        };
    }
}

/// A reversible paint stroke.
///
/// The command carries the stroke data (to replay on redo) and a pre-image
/// snapshot of the bounded region the stroke touches (to restore on undo).
/// Merged commands keep one run per original stroke; undo restores the
/// patches in reverse order, which is pixel-identical to undoing the
/// originals one by one.
#[derive(Clone, Debug)]
pub struct StrokeCommand {
    runs: Vec<StrokeRun>,
    executed: bool,
    timestamp_ms: f64,
}

impl StrokeCommand {
    /// Build a command whose effect has not been applied yet.
    ///
    /// The pre-image is captured on first [`Command::execute`].
    #[must_use]
    pub fn new(stroke: StrokeData, timestamp_ms: f64) -> Self {
        Self {
            runs: vec![StrokeRun {
                stroke,
                region: None,
                resolved: false,
                snapshot: None,
            }],
            executed: false,
            timestamp_ms,
        }
    }

    /// Build a command for a stroke already drawn live on its raster.
    ///
    /// `live_snapshot` is the full-raster pre-stroke capture taken when the
    /// stroke began; it is cropped to the stroke's bounding region here
    /// (or kept whole in the degenerate no-area case). Passing `None`
    /// records a failed capture, leaving undo with the clear-region
    /// fallback. `width`/`height` are the raster's pixel extent.
    #[must_use]
    pub fn already_applied(
        stroke: StrokeData,
        live_snapshot: Option<Snapshot>,
        width: u32,
        height: u32,
        timestamp_ms: f64,
    ) -> Self {
        let region = stroke
            .bounds()
            .and_then(|b| PixelRect::from_rect_clipped(b, width, height));
        let snapshot = match (live_snapshot, region) {
            (Some(full), Some(region)) => full.crop(region),
            (full, None) => full,
            (None, _) => None,
        };
        Self {
            runs: vec![StrokeRun {
                stroke,
                region,
                resolved: true,
                snapshot,
            }],
            executed: true,
            timestamp_ms,
        }
    }

    /// Timestamp used for the merge window.
    #[must_use]
    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp_ms
    }

    /// Whether the command's effect is currently applied.
    #[must_use]
    pub fn is_executed(&self) -> bool {
        self.executed
    }
}

impl Command for StrokeCommand {
    type Target = Surface;

    fn execute(&mut self, target: &mut Surface) {
        if self.executed {
            return;
        }
        for run in &mut self.runs {
            run.resolve(target);
            run.capture_if_missing(target);
            run.stroke.replay(target);
        }
        self.executed = true;
    }

    fn undo(&mut self, target: &mut Surface) {
        if !self.executed {
            return;
        }
        for run in self.runs.iter().rev() {
            match &run.snapshot {
                Some(snapshot) => target.put_snapshot(snapshot),
                None => target.clear_region(run.region),
            }
        }
        self.executed = false;
    }

    fn can_merge(&self, other: &Self) -> bool {
        let (Some(a), Some(b)) = (self.runs.first(), other.runs.first()) else {
            return false;
        };
        a.stroke.same_style(&b.stroke)
            && (other.timestamp_ms - self.timestamp_ms).abs() <= MERGE_WINDOW_MS
    }

    fn merge(&mut self, other: Self) {
        tracing::trace!(
            runs = other.runs.len(),
            "merging stroke command into history top"
        );
        self.runs.extend(other.runs);
        self.timestamp_ms = other.timestamp_ms;
    }
}
