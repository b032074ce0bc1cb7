// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::doc::{MarginUpdate, Margins};
use crate::modes::{FitMode, PanClampMode};

/// Floor used when a caller supplies a non-positive minimum zoom.
const MIN_ZOOM_FLOOR: f64 = 1e-8;

/// Motion constants driving [`View2D::advance`].
///
/// Approach rates are per millisecond; friction is expressed per 16 ms
/// frame and rescaled to the actual elapsed time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParams {
    /// Exponential approach rate for zoom easing (1/ms).
    pub approach_k_zoom: f64,
    /// Exponential approach rate for the reset pull (1/ms).
    pub approach_k_pan: f64,
    /// Inertia velocity decay per 16 ms.
    pub friction: f64,
    /// Speed (CSS px/ms) below which inertia snaps to rest.
    pub stop_speed: f64,
    /// Minimum visible document extent (CSS px) for
    /// [`PanClampMode::MinVisible`].
    pub min_visible_px: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            approach_k_zoom: 0.022,
            approach_k_pan: 0.022,
            friction: 0.92,
            stop_speed: 0.02,
            min_visible_px: 30.0,
        }
    }
}

/// 2D camera over a world plane, with animated zoom and pan.
///
/// `View2D` tracks a uniform zoom (stored logarithmically) and a CSS-pixel
/// translation mapping world coordinates into the view. State mutations
/// retarget the camera; [`View2D::advance`] moves the current state toward
/// its targets each frame and re-applies the document clamp.
///
/// Invariants, maintained after every mutation and every frame:
/// - both the current and target zoom stay inside the configured limits;
/// - when a document rectangle is installed, the translation satisfies the
///   active [`PanClampMode`].
#[derive(Clone, Debug)]
pub struct View2D {
    view_size: Size,
    current_log_z: f64,
    target_log_z: f64,
    tx: f64,
    ty: f64,
    anchor: Point,
    vx: f64,
    vy: f64,
    dragging: bool,
    resetting: bool,
    pan_enabled: bool,
    zoom_enabled: bool,
    min_log_z: f64,
    max_log_z: f64,
    document: Option<Rect>,
    margins: Margins,
    clamp_mode: PanClampMode,
    motion: MotionParams,
}

impl View2D {
    /// Create a camera at identity (zoom 1, no pan) over a view of
    /// `view_size` CSS pixels, with zoom limited to `[0.5, 10]`.
    #[must_use]
    pub fn new(view_size: Size) -> Self {
        Self {
            view_size,
            current_log_z: 0.0,
            target_log_z: 0.0,
            tx: 0.0,
            ty: 0.0,
            anchor: Point::ZERO,
            vx: 0.0,
            vy: 0.0,
            dragging: false,
            resetting: false,
            pan_enabled: true,
            zoom_enabled: true,
            min_log_z: 0.5_f64.ln(),
            max_log_z: 10.0_f64.ln(),
            document: None,
            margins: Margins::default(),
            clamp_mode: PanClampMode::default(),
            motion: MotionParams::default(),
        }
    }

    // --- Accessors ---

    /// The view extent in CSS pixels.
    #[must_use]
    pub fn view_size(&self) -> Size {
        self.view_size
    }

    /// Resize the view. The camera does not move, but the document clamp
    /// is re-applied against the new extent.
    pub fn set_view_size(&mut self, size: Size) {
        self.view_size = size;
        self.clamp_document();
    }

    /// Current zoom factor (always positive).
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.current_log_z.exp()
    }

    /// The zoom factor the easing is approaching.
    #[must_use]
    pub fn target_zoom(&self) -> f64 {
        self.target_log_z.exp()
    }

    /// Current translation in CSS pixels.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.tx, self.ty)
    }

    /// The screen anchor of the zoom in flight.
    #[must_use]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Current inertia velocity in CSS px/ms.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.vx, self.vy)
    }

    /// Returns `true` while a pan drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Returns `true` while a smooth reset is in progress.
    #[must_use]
    pub fn is_resetting(&self) -> bool {
        self.resetting
    }

    /// Returns `true` if pan input is accepted.
    #[must_use]
    pub fn pan_enabled(&self) -> bool {
        self.pan_enabled
    }

    /// Returns `true` if zoom input is accepted.
    #[must_use]
    pub fn zoom_enabled(&self) -> bool {
        self.zoom_enabled
    }

    /// The motion constants in use.
    #[must_use]
    pub fn motion(&self) -> MotionParams {
        self.motion
    }

    /// Replace the motion constants.
    pub fn set_motion(&mut self, motion: MotionParams) {
        self.motion = motion;
        self.clamp_document();
    }

    // --- Configuration ---

    /// Set the zoom limits.
    ///
    /// A non-positive or non-finite minimum is raised to `1e-8`; a
    /// reversed range is normalized. Both the current and target zoom are
    /// clamped into the new range.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        let min_zoom = if min_zoom.is_finite() && min_zoom > 0.0 {
            min_zoom
        } else {
            MIN_ZOOM_FLOOR
        };
        let max_zoom = if max_zoom.is_finite() && max_zoom > 0.0 {
            max_zoom
        } else {
            MIN_ZOOM_FLOOR
        };
        let (lo, hi) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        self.min_log_z = lo.ln();
        self.max_log_z = hi.ln();
        self.current_log_z = self.current_log_z.clamp(self.min_log_z, self.max_log_z);
        self.target_log_z = self.target_log_z.clamp(self.min_log_z, self.max_log_z);
        self.clamp_document();
    }

    /// Enable or disable panning. Disabling terminates any in-flight drag
    /// and zeroes inertia.
    pub fn set_pan_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.dragging = false;
            self.vx = 0.0;
            self.vy = 0.0;
        }
        self.pan_enabled = enabled;
    }

    /// Enable or disable zooming.
    pub fn set_zoom_enabled(&mut self, enabled: bool) {
        self.zoom_enabled = enabled;
    }

    /// Install a world-space document rectangle and start clamping pan
    /// against it.
    pub fn set_document_rect(&mut self, rect: Rect) {
        self.document = Some(rect.abs());
        self.clamp_document();
    }

    /// Remove the document rectangle; pan becomes unconstrained.
    pub fn clear_document_rect(&mut self) {
        self.document = None;
    }

    /// The installed document rectangle, if any.
    #[must_use]
    pub fn document_rect(&self) -> Option<Rect> {
        self.document
    }

    /// Update some or all document margins; unchanged sides are preserved.
    pub fn set_margins(&mut self, update: MarginUpdate) {
        self.margins.apply(update);
        self.clamp_document();
    }

    /// The current document margins.
    #[must_use]
    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Select the pan clamp policy.
    pub fn set_clamp_mode(&mut self, mode: PanClampMode) {
        self.clamp_mode = mode;
        self.clamp_document();
    }

    /// The active pan clamp policy.
    #[must_use]
    pub fn clamp_mode(&self) -> PanClampMode {
        self.clamp_mode
    }

    // --- Zoom operations ---

    /// Smoothly retarget to absolute zoom `zoom`, anchored at the view
    /// point `anchor`. Ignored while zooming is disabled or for
    /// non-finite / non-positive targets.
    pub fn zoom_to_at(&mut self, anchor: Point, zoom: f64) {
        if !self.zoom_enabled || !zoom.is_finite() || zoom <= 0.0 {
            return;
        }
        self.anchor = anchor;
        self.target_log_z = zoom.ln().clamp(self.min_log_z, self.max_log_z);
    }

    /// Snap immediately to absolute zoom `zoom`, anchored at `anchor`,
    /// and re-apply the document clamp instantly.
    pub fn zoom_to_at_raw(&mut self, anchor: Point, zoom: f64) {
        if !self.zoom_enabled || !zoom.is_finite() || zoom <= 0.0 {
            return;
        }
        let z_prev = self.zoom();
        let log_z = zoom.ln().clamp(self.min_log_z, self.max_log_z);
        self.current_log_z = log_z;
        self.target_log_z = log_z;
        self.anchor = anchor;
        let ratio = self.zoom() / z_prev;
        self.tx = anchor.x - (anchor.x - self.tx) * ratio;
        self.ty = anchor.y - (anchor.y - self.ty) * ratio;
        self.clamp_document();
    }

    /// Nudge the target zoom by `step` in log space, anchored at `anchor`.
    pub fn zoom_by_log_step_at(&mut self, anchor: Point, step: f64) {
        if !self.zoom_enabled || !step.is_finite() {
            return;
        }
        self.anchor = anchor;
        self.target_log_z = (self.target_log_z + step).clamp(self.min_log_z, self.max_log_z);
    }

    /// Multiply the target zoom by `factor`, anchored at the view point
    /// `anchor`.
    pub fn zoom_by_factor_at(&mut self, anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.zoom_to_at(anchor, self.target_zoom() * factor);
    }

    /// Multiply the target zoom by `factor`, anchored at the world point
    /// `world` (converted through the current camera).
    pub fn zoom_by_factor_at_world(&mut self, world: Point, factor: f64) {
        self.zoom_by_factor_at(self.to_view(world), factor);
    }

    /// Snap the zoom so the document fits the margin-reduced viewport per
    /// `mode`, and center the document. Both the current and target zoom
    /// are set; there is no animation. No-op without a document or with a
    /// degenerate viewport.
    pub fn zoom_document_to_fit(&mut self, mode: FitMode) {
        let Some(doc) = self.document else {
            return;
        };
        let avail_w = self.view_size.width - self.margins.left - self.margins.right;
        let avail_h = self.view_size.height - self.margins.top - self.margins.bottom;
        if doc.width() <= 0.0 || doc.height() <= 0.0 || avail_w <= 0.0 || avail_h <= 0.0 {
            return;
        }
        let zx = avail_w / doc.width();
        let zy = avail_h / doc.height();
        let zoom = match mode {
            FitMode::Contain => zx.min(zy),
            FitMode::Cover => zx.max(zy),
            FitMode::FitWidth => zx,
            FitMode::FitHeight => zy,
        };
        let log_z = zoom.ln().clamp(self.min_log_z, self.max_log_z);
        self.current_log_z = log_z;
        self.target_log_z = log_z;
        self.resetting = false;

        let z = self.zoom();
        self.tx = self.margins.left + (avail_w - z * doc.width()) / 2.0 - z * doc.x0;
        self.ty = self.margins.top + (avail_h - z * doc.height()) / 2.0 - z * doc.y0;
        self.clamp_document();
    }

    // --- Reset ---

    /// Begin easing back to identity (zoom 1, pan 0).
    pub fn reset_smooth(&mut self) {
        self.resetting = true;
        self.anchor = Point::ZERO;
        self.target_log_z = 0.0_f64.clamp(self.min_log_z, self.max_log_z);
    }

    /// Snap back to identity immediately.
    pub fn reset_instant(&mut self) {
        self.current_log_z = 0.0_f64.clamp(self.min_log_z, self.max_log_z);
        self.target_log_z = self.current_log_z;
        self.tx = 0.0;
        self.ty = 0.0;
        self.vx = 0.0;
        self.vy = 0.0;
        self.resetting = false;
        self.clamp_document();
    }

    // --- Pan drag ---

    /// Begin a pan drag: inertia is zeroed and pan input is applied
    /// directly. Returns `false` (and does nothing) while pan is
    /// disabled.
    pub fn begin_drag(&mut self) -> bool {
        if !self.pan_enabled {
            return false;
        }
        self.dragging = true;
        self.resetting = false;
        self.vx = 0.0;
        self.vy = 0.0;
        true
    }

    /// Apply a pointer movement delta (CSS pixels) to the translation.
    /// Only effective while dragging.
    pub fn drag_by(&mut self, delta: Vec2) {
        if self.dragging {
            self.tx += delta.x;
            self.ty += delta.y;
        }
    }

    /// End the drag, handing the camera a release velocity in CSS px/ms
    /// for inertia.
    pub fn end_drag(&mut self, velocity: Vec2) {
        if self.dragging {
            self.dragging = false;
            self.vx = velocity.x;
            self.vy = velocity.y;
        }
    }

    // --- Frame advancement ---

    /// Advance the camera by `dt_ms` elapsed milliseconds.
    ///
    /// Runs, in order: zoom easing with anchor compensation (applied even
    /// when the zoom did not change, to keep the numerics uniform), pan
    /// inertia, reset easing, and the document clamp.
    pub fn advance(&mut self, dt_ms: f64) {
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            self.clamp_document();
            return;
        }

        // Zoom easing toward the target, with the anchor's world point
        // held fixed.
        let ease = 1.0 - (-self.motion.approach_k_zoom * dt_ms).exp();
        let z_prev = self.zoom();
        self.current_log_z += (self.target_log_z - self.current_log_z) * ease;
        let ratio = self.zoom() / z_prev;
        self.tx = self.anchor.x - (self.anchor.x - self.tx) * ratio;
        self.ty = self.anchor.y - (self.anchor.y - self.ty) * ratio;

        // Pan inertia.
        if !self.pan_enabled {
            self.vx = 0.0;
            self.vy = 0.0;
        } else if !self.dragging {
            self.tx += self.vx * dt_ms;
            self.ty += self.vy * dt_ms;
            let decay = self.motion.friction.powf(dt_ms / 16.0);
            self.vx *= decay;
            self.vy *= decay;
            if self.vx.hypot(self.vy) < self.motion.stop_speed {
                self.vx = 0.0;
                self.vy = 0.0;
            }
        }

        // Reset pull toward identity, snapping once close enough.
        if self.resetting {
            let pull = 1.0 - (-self.motion.approach_k_pan * dt_ms).exp();
            self.tx -= self.tx * pull;
            self.ty -= self.ty * pull;
            if self.current_log_z.abs() < 1e-3 && self.tx.abs() < 0.5 && self.ty.abs() < 0.5 {
                self.current_log_z = 0.0;
                self.target_log_z = 0.0;
                self.tx = 0.0;
                self.ty = 0.0;
                self.resetting = false;
            }
        }

        self.clamp_document();
    }

    // --- Conversions ---

    /// Convert a view-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn to_world(&self, view_pt: Point) -> Point {
        let z = self.zoom();
        Point::new((view_pt.x - self.tx) / z, (view_pt.y - self.ty) / z)
    }

    /// Convert a world-space point to view coordinates (CSS pixels).
    #[must_use]
    pub fn to_view(&self, world_pt: Point) -> Point {
        let z = self.zoom();
        Point::new(world_pt.x * z + self.tx, world_pt.y * z + self.ty)
    }

    /// The world-to-view affine for the current camera state.
    #[must_use]
    pub fn world_to_view(&self) -> Affine {
        Affine::translate((self.tx, self.ty)) * Affine::scale(self.zoom())
    }

    /// The world-space rectangle currently visible through the view.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        let p0 = self.to_world(Point::ZERO);
        let p1 = self.to_world(Point::new(self.view_size.width, self.view_size.height));
        Rect::new(p0.x, p0.y, p1.x, p1.y)
    }

    // --- Clamping ---

    fn clamp_document(&mut self) {
        let Some(doc) = self.document else {
            return;
        };
        if doc.width() <= 0.0 || doc.height() <= 0.0 {
            return;
        }
        let z = self.zoom();
        match self.clamp_mode {
            PanClampMode::Margin => {
                self.tx = clamp_margin_axis(
                    self.tx,
                    z,
                    doc.x0,
                    doc.x1,
                    self.view_size.width,
                    self.margins.left,
                    self.margins.right,
                );
                self.ty = clamp_margin_axis(
                    self.ty,
                    z,
                    doc.y0,
                    doc.y1,
                    self.view_size.height,
                    self.margins.top,
                    self.margins.bottom,
                );
            }
            PanClampMode::MinVisible => {
                let mv = self.motion.min_visible_px;
                self.tx = clamp_min_visible_axis(self.tx, z, doc.x0, doc.x1, self.view_size.width, mv);
                self.ty =
                    clamp_min_visible_axis(self.ty, z, doc.y0, doc.y1, self.view_size.height, mv);
            }
        }
    }
}

/// Clamp one translation axis under [`PanClampMode::Margin`].
///
/// A document smaller than the available space is locked to the centered
/// position; a larger one pans freely between the margins.
fn clamp_margin_axis(
    t: f64,
    z: f64,
    doc_min: f64,
    doc_max: f64,
    extent: f64,
    margin_min: f64,
    margin_max: f64,
) -> f64 {
    let avail = extent - margin_min - margin_max;
    let doc_len = doc_max - doc_min;
    if z * doc_len <= avail {
        margin_min + (avail - z * doc_len) / 2.0 - z * doc_min
    } else {
        let lo = (extent - margin_max) - z * doc_max;
        let hi = margin_min - z * doc_min;
        t.clamp(lo, hi)
    }
}

/// Clamp one translation axis under [`PanClampMode::MinVisible`].
///
/// The requirement is reduced to the document's own projected extent and
/// sanitized against the viewport extent; a degenerate range pins the
/// translation to its midpoint.
fn clamp_min_visible_axis(
    t: f64,
    z: f64,
    doc_min: f64,
    doc_max: f64,
    extent: f64,
    min_visible: f64,
) -> f64 {
    let mv = min_visible
        .min((extent - 5.0).max(0.0))
        .min(z * (doc_max - doc_min));
    let lo = mv - z * doc_max;
    let hi = (extent - mv) - z * doc_min;
    if lo > hi { (lo + hi) / 2.0 } else { t.clamp(lo, hi) }
}
