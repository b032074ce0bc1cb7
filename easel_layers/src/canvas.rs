// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paintable raster layer.

use easel_history::{HistoryManager, StrokeCommand, StrokeData, StrokeMode, StrokePoint, now_ms};
use easel_raster::{BlendMode, Color, FilterQuality, Surface};
use kurbo::{Line, Point, Rect, Size};

use crate::error::LayerError;
use crate::layer::{Layer, LayerCommon, LayerKind, LayerSpace, RenderEnv};

/// Procedural redraw callback for a canvas layer.
pub type RedrawFn = Box<dyn FnMut(&mut Surface)>;

/// An in-flight stroke's accumulated state.
struct LiveStroke {
    points: Vec<StrokePoint>,
    /// Style latched from the first segment call: color, size, mode.
    style: Option<(Color, f64, StrokeMode)>,
    /// The first recorded point's pressure still needs backfilling.
    backfill_pressure: bool,
    /// Full-raster pre-stroke capture, present when a history is bound.
    pre_image: Option<easel_raster::Snapshot>,
}

/// A layer that owns an offscreen raster and supports interactive
/// painting.
///
/// The raster has a fixed pixel extent; the pose maps it into the layer's
/// space. Stroke input arrives in that space and is converted through the
/// inverse pose, so painting keeps working on translated, scaled, or
/// rotated layers.
///
/// A stroke is live-drawn as its segments arrive and committed to the
/// bound [`HistoryManager`] (if any) as one [`StrokeCommand`] on
/// [`CanvasLayer::end_stroke`]. A stroke abandoned without `end_stroke`
/// (pointer lost, window blur) is discarded without producing a command.
///
/// Bitmap layers are canvas layers with a [`LayerKind::Bitmap`] tag,
/// constructed from a decoded image; everything else behaves identically.
pub struct CanvasLayer {
    common: LayerCommon,
    surface: Surface,
    redraw: Option<RedrawFn>,
    history: Option<HistoryManager<StrokeCommand>>,
    live: Option<LiveStroke>,
}

impl CanvasLayer {
    /// Create a transparent canvas layer of `width` x `height` pixels.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Result<Self, LayerError> {
        Ok(Self {
            common: LayerCommon::new(name, LayerKind::Canvas, LayerSpace::World),
            surface: Surface::new(width, height)?,
            redraw: None,
            history: None,
            live: None,
        })
    }

    /// Create a canvas layer with a procedural redraw callback, invoking
    /// it once to prime the raster.
    pub fn with_redraw(
        name: impl Into<String>,
        width: u32,
        height: u32,
        redraw: impl FnMut(&mut Surface) + 'static,
    ) -> Result<Self, LayerError> {
        let mut layer = Self::new(name, width, height)?;
        layer.redraw = Some(Box::new(redraw));
        layer.request_redraw();
        Ok(layer)
    }

    /// Create a bitmap layer from a PNG stream.
    ///
    /// Fails without side effects when decoding fails; the raster takes
    /// the image's dimensions.
    pub fn bitmap_from_png(name: impl Into<String>, bytes: &[u8]) -> Result<Self, LayerError> {
        let surface = Surface::from_png_bytes(bytes)?;
        Ok(Self {
            common: LayerCommon::new(name, LayerKind::Bitmap, LayerSpace::World),
            surface,
            redraw: None,
            history: None,
            live: None,
        })
    }

    /// Create a bitmap layer from raw unpremultiplied RGBA8 pixels.
    pub fn bitmap_from_rgba8(
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self, LayerError> {
        let surface = Surface::from_rgba8(width, height, pixels)?;
        Ok(Self {
            common: LayerCommon::new(name, LayerKind::Bitmap, LayerSpace::World),
            surface,
            redraw: None,
            history: None,
            live: None,
        })
    }

    /// Raster width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Raster height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// The owned raster.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The owned raster, mutable. Direct edits bypass the history.
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Re-run the procedural redraw callback, if one was provided.
    pub fn request_redraw(&mut self) {
        if let Some(redraw) = &mut self.redraw {
            redraw(&mut self.surface);
        }
    }

    /// Blit an image into the raster at local pixel position `(x, y)`.
    pub fn draw_image(&mut self, image: &Surface, x: f64, y: f64) {
        self.draw_image_rect(
            image,
            Rect::new(
                x,
                y,
                x + f64::from(image.width()),
                y + f64::from(image.height()),
            ),
        );
    }

    /// Blit an image into the local pixel rectangle `dst`, scaling as
    /// needed.
    pub fn draw_image_rect(&mut self, image: &Surface, dst: Rect) {
        self.surface.blit_rect(image, dst);
    }

    /// Replace the raster's dimensions and content from a PNG stream.
    ///
    /// On decode failure the existing raster is left untouched.
    pub fn set_source_png(&mut self, bytes: &[u8]) -> Result<(), LayerError> {
        let surface = Surface::from_png_bytes(bytes)?;
        tracing::debug!(
            width = surface.width(),
            height = surface.height(),
            "replacing bitmap layer source"
        );
        self.surface = surface;
        self.live = None;
        Ok(())
    }

    /// Replace the raster's dimensions and content from raw RGBA8 pixels.
    pub fn set_source_rgba8(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), LayerError> {
        self.surface = Surface::from_rgba8(width, height, pixels)?;
        self.live = None;
        Ok(())
    }

    /// Resize the raster, cropping to (or padding out to) the new extent
    /// while keeping the top-left corner.
    pub fn crop_to(&mut self, width: u32, height: u32) -> Result<(), LayerError> {
        self.surface = self.surface.cropped(width, height)?;
        Ok(())
    }

    /// Resize the raster, rescaling the existing pixels bilinearly.
    pub fn resize_to(&mut self, width: u32, height: u32) -> Result<(), LayerError> {
        self.surface = self.surface.resized_bilinear(width, height)?;
        Ok(())
    }

    // --- Coordinates ---

    /// The raster extent as a [`Size`] (used by center-anchored poses).
    #[must_use]
    pub fn extent(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    /// Map a point from the layer's space into local raster pixels.
    #[must_use]
    pub fn to_local(&self, x: f64, y: f64) -> Point {
        self.common.pose.to_local(Point::new(x, y), self.extent())
    }

    // --- Painting ---

    /// Begin a stroke at `(x, y)` in the layer's space.
    ///
    /// Any unfinished stroke is discarded without producing a command.
    /// When a history is bound, the full raster is captured as the
    /// stroke's pre-image (cropped to the stroke's bounds on commit).
    pub fn begin_stroke(&mut self, x: f64, y: f64) {
        if self.live.is_some() {
            tracing::trace!("discarding unfinished stroke");
        }
        let local = self.to_local(x, y);
        let pre_image = self.history.is_some().then(|| self.surface.snapshot());
        self.live = Some(LiveStroke {
            points: vec![StrokePoint::new(local.x, local.y, 1.0)],
            style: None,
            backfill_pressure: true,
            pre_image,
        });
    }

    /// Extend the in-flight stroke to `(x, y)`, drawing the segment
    /// immediately.
    ///
    /// `pressure` is normalized to `[0, 1]` (pass 1 when the device has
    /// none). The first call also backfills the begin point's pressure and
    /// latches the stroke style recorded on commit. Without a preceding
    /// [`CanvasLayer::begin_stroke`] this is a no-op.
    pub fn stroke_to(
        &mut self,
        x: f64,
        y: f64,
        color: Color,
        size: f64,
        pressure: f64,
        mode: StrokeMode,
    ) {
        let local = self.to_local(x, y);
        let Some(live) = &mut self.live else {
            return;
        };
        let pressure = if pressure.is_finite() {
            pressure.clamp(0.0, 1.0)
        } else {
            1.0
        };
        if live.style.is_none() {
            live.style = Some((color, size, mode));
        }
        if live.backfill_pressure {
            live.points[0].pressure = pressure;
            live.backfill_pressure = false;
        }
        let last = live.points[live.points.len() - 1];
        live.points.push(StrokePoint::new(local.x, local.y, pressure));

        // Live application of the segment.
        self.surface.save();
        self.surface.reset_transform();
        self.surface.clear_clip();
        self.surface.set_alpha(1.0);
        let draw_color = match mode {
            StrokeMode::Brush => {
                self.surface.set_composite(BlendMode::SourceOver);
                color
            }
            StrokeMode::Eraser => {
                self.surface.set_composite(BlendMode::DestinationOut);
                Color::from_rgba8(0, 0, 0, 255)
            }
        };
        self.surface.stroke_segment(
            Line::new(Point::new(last.x, last.y), local),
            draw_color,
            (size * pressure).max(0.001),
        );
        self.surface.restore();
    }

    /// Finish the in-flight stroke, committing one [`StrokeCommand`] to
    /// the bound history.
    ///
    /// Without a bound history (or without any drawn segment) the buffers
    /// are simply dropped. Calling with no stroke in flight is a no-op.
    pub fn end_stroke(&mut self) {
        let Some(live) = self.live.take() else {
            return;
        };
        let Some((color, size, mode)) = live.style else {
            return;
        };
        if live.points.is_empty() {
            return;
        }
        if let Some(history) = &mut self.history {
            let stroke = StrokeData {
                points: live.points,
                color,
                size,
                mode,
            };
            let command = StrokeCommand::already_applied(
                stroke,
                live.pre_image,
                self.surface.width(),
                self.surface.height(),
                now_ms(),
            );
            history.add_command(command);
        }
    }

    /// Discard the in-flight stroke without producing a command.
    ///
    /// The pixels already drawn live stay on the raster; hosts call this
    /// on pointer loss and typically follow up with an explicit repaint or
    /// accept the orphaned ink.
    pub fn cancel_stroke(&mut self) {
        self.live = None;
    }

    /// Whether a stroke is currently in flight.
    #[must_use]
    pub fn is_stroking(&self) -> bool {
        self.live.is_some()
    }

    // --- History ---

    /// Bind a history manager. Strokes committed from now on produce
    /// commands.
    pub fn bind_history(&mut self, history: HistoryManager<StrokeCommand>) {
        self.history = Some(history);
    }

    /// Remove and return the bound history manager.
    pub fn unbind_history(&mut self) -> Option<HistoryManager<StrokeCommand>> {
        self.history.take()
    }

    /// The bound history manager, if any.
    #[must_use]
    pub fn history(&self) -> Option<&HistoryManager<StrokeCommand>> {
        self.history.as_ref()
    }

    /// Undo the most recent committed stroke. Returns `false` with no
    /// history or an empty undo stack.
    pub fn undo(&mut self) -> bool {
        match &mut self.history {
            Some(history) => history.undo(&mut self.surface),
            None => false,
        }
    }

    /// Redo the most recently undone stroke. Returns `false` with no
    /// history or an empty redo stack.
    pub fn redo(&mut self) -> bool {
        match &mut self.history {
            Some(history) => history.redo(&mut self.surface),
            None => false,
        }
    }

    /// Whether an undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.as_ref().is_some_and(HistoryManager::can_undo)
    }

    /// Whether a redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.as_ref().is_some_and(HistoryManager::can_redo)
    }
}

impl Layer for CanvasLayer {
    fn common(&self) -> &LayerCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut LayerCommon {
        &mut self.common
    }

    fn render(&mut self, target: &mut Surface, _env: &RenderEnv) {
        let pose = self.common.pose.to_affine(self.extent());
        target.draw_surface(
            &self.surface,
            pose,
            self.common.opacity as f32,
            self.common.blend,
            FilterQuality::Bilinear,
        );
    }

    fn hit_test(&self, pt: Point) -> bool {
        let local = self.common.pose.to_local(pt, self.extent());
        local.x >= 0.0
            && local.y >= 0.0
            && local.x <= f64::from(self.width())
            && local.y <= f64::from(self.height())
    }

    fn as_canvas(&self) -> Option<&Self> {
        Some(self)
    }

    fn as_canvas_mut(&mut self) -> Option<&mut Self> {
        Some(self)
    }
}

impl std::fmt::Debug for CanvasLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasLayer")
            .field("id", &self.common.id())
            .field("name", &self.common.name)
            .field("kind", &self.common.kind())
            .field("width", &self.width())
            .field("height", &self.height())
            .field("stroking", &self.live.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::AnchorMode;

    fn red() -> Color {
        Color::from_rgba8(255, 0, 0, 255)
    }

    fn blue() -> Color {
        Color::from_rgba8(0, 0, 255, 255)
    }

    #[test]
    fn brush_stroke_with_undo() {
        // Fresh transparent 100x100 layer with a bound history.
        let mut layer = CanvasLayer::new("paint", 100, 100).unwrap();
        layer.bind_history(HistoryManager::default());

        layer.begin_stroke(10.0, 10.0);
        layer.stroke_to(90.0, 90.0, red(), 4.0, 1.0, StrokeMode::Brush);
        layer.end_stroke();

        let px = layer.surface().pixel(50, 50);
        assert_eq!(px.r, 255);
        assert!((px.a - 1.0).abs() < 1e-9);

        assert!(layer.can_undo());
        assert!(layer.undo());
        assert!(layer.surface().pixel(50, 50).is_transparent());

        assert!(layer.redo());
        assert_eq!(layer.surface().pixel(50, 50).r, 255);
    }

    #[test]
    fn eraser_stroke_with_undo() {
        let mut layer = CanvasLayer::new("paint", 100, 100).unwrap();
        layer.surface_mut().fill_all(blue());
        layer.bind_history(HistoryManager::default());

        layer.begin_stroke(10.0, 50.0);
        layer.stroke_to(
            90.0,
            50.0,
            Color::from_rgba8(0, 0, 0, 255),
            10.0,
            1.0,
            StrokeMode::Eraser,
        );
        layer.end_stroke();
        assert!(layer.surface().pixel(50, 50).is_transparent());

        assert!(layer.undo());
        let px = layer.surface().pixel(50, 50);
        assert_eq!(px.b, 255);
        assert!((px.a - 1.0).abs() < 1e-9);
    }

    #[test]
    fn stroke_sequence_produces_exactly_one_command() {
        let mut layer = CanvasLayer::new("paint", 50, 50).unwrap();
        layer.bind_history(HistoryManager::new(10));

        layer.begin_stroke(5.0, 5.0);
        layer.stroke_to(10.0, 5.0, red(), 2.0, 1.0, StrokeMode::Brush);
        layer.stroke_to(15.0, 5.0, red(), 2.0, 1.0, StrokeMode::Brush);
        layer.stroke_to(20.0, 5.0, red(), 2.0, 1.0, StrokeMode::Brush);
        layer.end_stroke();

        let history = layer.history().unwrap();
        assert_eq!(history.undo_len() + history.redo_len(), 1);
    }

    #[test]
    fn stroke_without_begin_is_a_no_op() {
        let mut layer = CanvasLayer::new("paint", 50, 50).unwrap();
        layer.bind_history(HistoryManager::new(10));
        layer.stroke_to(25.0, 25.0, red(), 8.0, 1.0, StrokeMode::Brush);
        assert!(layer.surface().pixel(25, 25).is_transparent());
        assert!(!layer.can_undo());

        // end without begin is equally inert.
        layer.end_stroke();
        assert!(!layer.can_undo());
    }

    #[test]
    fn abandoned_stroke_produces_no_command() {
        let mut layer = CanvasLayer::new("paint", 50, 50).unwrap();
        layer.bind_history(HistoryManager::new(10));

        layer.begin_stroke(5.0, 5.0);
        layer.stroke_to(20.0, 5.0, red(), 2.0, 1.0, StrokeMode::Brush);
        // Pointer lost: a new stroke begins without end_stroke.
        layer.begin_stroke(30.0, 30.0);
        layer.stroke_to(40.0, 30.0, red(), 2.0, 1.0, StrokeMode::Brush);
        layer.end_stroke();

        assert_eq!(layer.history().unwrap().undo_len(), 1);

        layer.begin_stroke(5.0, 40.0);
        layer.cancel_stroke();
        layer.end_stroke();
        assert_eq!(layer.history().unwrap().undo_len(), 1);
    }

    #[test]
    fn begin_end_without_segments_commits_nothing() {
        let mut layer = CanvasLayer::new("paint", 50, 50).unwrap();
        layer.bind_history(HistoryManager::new(10));
        layer.begin_stroke(5.0, 5.0);
        layer.end_stroke();
        assert!(!layer.can_undo());
    }

    #[test]
    fn pressure_scales_width_and_backfills_first_point() {
        let mut layer = CanvasLayer::new("paint", 60, 60).unwrap();
        layer.begin_stroke(10.0, 30.0);
        // Half pressure on a 20 px brush: 10 px wide band.
        layer.stroke_to(50.0, 30.0, red(), 20.0, 0.5, StrokeMode::Brush);
        layer.end_stroke();

        assert_eq!(layer.surface().pixel(30, 30).r, 255);
        assert_eq!(layer.surface().pixel(30, 33).r, 255);
        assert!(layer.surface().pixel(30, 38).is_transparent());
    }

    #[test]
    fn stroking_respects_the_pose() {
        let mut layer = CanvasLayer::new("paint", 40, 40).unwrap();
        layer.common_mut().pose.x = 100.0;
        layer.common_mut().pose.y = 100.0;
        layer.bind_history(HistoryManager::new(10));

        // World (110, 120) lands at local (10, 20).
        layer.begin_stroke(110.0, 120.0);
        layer.stroke_to(130.0, 120.0, red(), 4.0, 1.0, StrokeMode::Brush);
        layer.end_stroke();
        assert_eq!(layer.surface().pixel(20, 20).r, 255);

        assert!(layer.undo());
        assert!(layer.surface().pixel(20, 20).is_transparent());
    }

    #[test]
    fn hit_test_uses_inverse_pose() {
        let mut layer = CanvasLayer::new("hit", 40, 20).unwrap();
        layer.common_mut().pose.x = 50.0;
        layer.common_mut().pose.y = 10.0;
        assert!(layer.hit_test(Point::new(60.0, 15.0)));
        assert!(layer.hit_test(Point::new(90.0, 30.0)));
        assert!(!layer.hit_test(Point::new(91.0, 15.0)));
        assert!(!layer.hit_test(Point::new(49.0, 15.0)));

        layer.common_mut().pose.anchor = AnchorMode::Center;
        assert!(layer.hit_test(Point::new(50.0, 10.0)));
        assert!(layer.hit_test(Point::new(31.0, 1.0)));
        assert!(!layer.hit_test(Point::new(29.0, 10.0)));
    }

    #[test]
    fn bitmap_roundtrip_and_set_source() {
        let mut art = Surface::new(8, 8).unwrap();
        art.fill_all(blue());
        let png = art.encode_png().unwrap();

        let mut layer = CanvasLayer::bitmap_from_png("photo", &png).unwrap();
        assert_eq!(layer.common().kind(), LayerKind::Bitmap);
        assert_eq!(layer.width(), 8);
        assert_eq!(layer.surface().pixel(4, 4).b, 255);

        // Replacing the source swaps both dimensions and content.
        let mut bigger = Surface::new(16, 4).unwrap();
        bigger.fill_all(red());
        layer.set_source_png(&bigger.encode_png().unwrap()).unwrap();
        assert_eq!(layer.width(), 16);
        assert_eq!(layer.height(), 4);
        assert_eq!(layer.surface().pixel(10, 2).r, 255);

        // Bad bytes leave everything untouched.
        assert!(layer.set_source_png(b"not a png").is_err());
        assert_eq!(layer.width(), 16);
    }

    #[test]
    fn bad_png_fails_construction() {
        assert!(CanvasLayer::bitmap_from_png("broken", b"garbage").is_err());
    }

    #[test]
    fn crop_and_resize() {
        let mut layer = CanvasLayer::new("sized", 20, 20).unwrap();
        layer.surface_mut().fill_all(blue());
        layer.crop_to(10, 10).unwrap();
        assert_eq!(layer.width(), 10);
        assert_eq!(layer.surface().pixel(5, 5).b, 255);

        layer.resize_to(40, 40).unwrap();
        assert_eq!(layer.width(), 40);
        assert_eq!(layer.surface().pixel(30, 30).b, 255);
    }

    #[test]
    fn redraw_callback_primes_and_reruns() {
        let mut layer = CanvasLayer::with_redraw("proc", 10, 10, |surface| {
            surface.fill_all(Color::from_rgba8(0, 255, 0, 255));
        })
        .unwrap();
        assert_eq!(layer.surface().pixel(5, 5).g, 255);

        layer.surface_mut().clear();
        assert!(layer.surface().pixel(5, 5).is_transparent());
        layer.request_redraw();
        assert_eq!(layer.surface().pixel(5, 5).g, 255);
    }

    #[test]
    fn draw_image_blits_at_position() {
        let mut stamp = Surface::new(4, 4).unwrap();
        stamp.fill_all(red());
        let mut layer = CanvasLayer::new("paint", 20, 20).unwrap();
        layer.draw_image(&stamp, 10.0, 10.0);
        assert_eq!(layer.surface().pixel(12, 12).r, 255);
        assert!(layer.surface().pixel(5, 5).is_transparent());
    }
}
