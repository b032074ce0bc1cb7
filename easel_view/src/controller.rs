// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use easel_layers::{LayerStack, RenderEnv};
use easel_raster::{BlendMode, Color, FilterQuality, PixelColor, Surface, SurfaceError};
use easel_view2d::drag::PanDrag;
use easel_view2d::wheel::{self, Modifiers, WheelDelta};
use easel_view2d::{FitMode, MarginUpdate, MotionParams, PanClampMode, View2D};
use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::config::ViewConfig;

/// Border color used when `draw_doc_border` is enabled.
const DOC_BORDER_COLOR: Color = Color::from_rgba8(136, 136, 136, 255);

/// Pointer button identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// The primary (usually left) button. Drives panning.
    Primary,
    /// The middle button / wheel press.
    Middle,
    /// The secondary (usually right) button.
    Secondary,
}

/// Host render hook, called once per frame on its plane.
pub type RenderHook = Box<dyn FnMut(&mut Surface, &RenderEnv)>;

/// The viewport controller.
///
/// Owns the camera, the three device-pixel render planes, and the two
/// layer stacks, and runs the per-frame pipeline. See the crate docs for
/// the frame order; see [`ViewConfig`] for tuning.
///
/// All coordinates crossing this API are CSS pixels; the device pixel
/// ratio is applied internally when painting and when reading pixels.
pub struct ViewController {
    view: View2D,
    config: ViewConfig,
    dpr: f64,
    css_size: Size,
    final_surface: Surface,
    content: Surface,
    overlay: Surface,
    content_layers: LayerStack,
    overlay_layers: LayerStack,
    world_hook: Option<RenderHook>,
    overlay_hook: Option<RenderHook>,
    drag: PanDrag,
    last_ts: Option<f64>,
}

impl ViewController {
    /// Create a controller over a `css_width` x `css_height` viewport at
    /// the given device pixel ratio.
    ///
    /// Fails when the device-pixel extent (`floor(css * dpr)`) cannot
    /// back a surface; nothing is partially constructed in that case.
    pub fn new(
        css_width: f64,
        css_height: f64,
        dpr: f64,
        config: ViewConfig,
    ) -> Result<Self, SurfaceError> {
        let dpr = sanitize_dpr(dpr);
        let (device_w, device_h) = device_extent(css_width, css_height, dpr);
        let final_surface = Surface::new(device_w, device_h)?;
        let content = Surface::new(device_w, device_h)?;
        let overlay = Surface::new(device_w, device_h)?;

        let css_size = Size::new(css_width, css_height);
        let mut view = View2D::new(css_size);
        view.set_zoom_limits(config.min_zoom, config.max_zoom);
        view.set_clamp_mode(config.pan_clamp_mode);
        view.set_motion(MotionParams {
            approach_k_zoom: config.approach_k_zoom,
            approach_k_pan: config.approach_k_pan,
            friction: config.friction,
            stop_speed: config.stop_speed,
            min_visible_px: config.min_visible_px,
        });

        let drag = PanDrag::with_params(
            config.ema_alpha,
            config.idle_no_inertia_ms,
            config.friction,
            config.stop_speed,
        );

        Ok(Self {
            view,
            config,
            dpr,
            css_size,
            final_surface,
            content,
            overlay,
            content_layers: LayerStack::new(),
            overlay_layers: LayerStack::new(),
            world_hook: None,
            overlay_hook: None,
            drag,
            last_ts: None,
        })
    }

    // --- Camera passthroughs ---

    /// The camera, read-only.
    #[must_use]
    pub fn view(&self) -> &View2D {
        &self.view
    }

    /// The camera, mutable, for host-level operations the controller does
    /// not wrap.
    pub fn view_mut(&mut self) -> &mut View2D {
        &mut self.view
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.view.zoom()
    }

    /// Current translation in CSS pixels.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.view.translation()
    }

    /// Install a world-space document rectangle.
    pub fn set_document_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.view
            .set_document_rect(Rect::new(x, y, x + width, y + height));
    }

    /// Remove the document rectangle.
    pub fn clear_document_rect(&mut self) {
        self.view.clear_document_rect();
    }

    /// Update document margins; unchanged sides are preserved.
    pub fn set_document_margins(&mut self, update: MarginUpdate) {
        self.view.set_margins(update);
    }

    /// Select the pan clamp policy.
    pub fn set_pan_clamp_mode(&mut self, mode: PanClampMode) {
        self.view.set_clamp_mode(mode);
    }

    /// Enable or disable panning. Disabling cancels an in-flight drag.
    pub fn set_pan_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.drag.cancel();
        }
        self.view.set_pan_enabled(enabled);
    }

    /// Enable or disable zooming.
    pub fn set_zoom_enabled(&mut self, enabled: bool) {
        self.view.set_zoom_enabled(enabled);
    }

    /// Smoothly retarget to absolute zoom `zoom` anchored at a CSS point.
    pub fn zoom_to_at_screen(&mut self, anchor_x: f64, anchor_y: f64, zoom: f64) {
        self.view.zoom_to_at(Point::new(anchor_x, anchor_y), zoom);
    }

    /// Snap immediately to absolute zoom `zoom` anchored at a CSS point,
    /// applying the document clamp instantly.
    pub fn zoom_to_at_screen_raw(&mut self, anchor_x: f64, anchor_y: f64, zoom: f64) {
        self.view.zoom_to_at_raw(Point::new(anchor_x, anchor_y), zoom);
    }

    /// Multiply the target zoom by `factor` around a CSS anchor.
    pub fn zoom_by_factor_at_screen(&mut self, anchor_x: f64, anchor_y: f64, factor: f64) {
        self.view.zoom_by_factor_at(Point::new(anchor_x, anchor_y), factor);
    }

    /// Multiply the target zoom by `factor` around a world anchor.
    pub fn zoom_by_factor_at_world(&mut self, world_x: f64, world_y: f64, factor: f64) {
        self.view
            .zoom_by_factor_at_world(Point::new(world_x, world_y), factor);
    }

    /// Snap the zoom so the document fits the viewport per `mode` and
    /// center it. No animation.
    pub fn zoom_document_to_fit(&mut self, mode: FitMode) {
        self.view.zoom_document_to_fit(mode);
    }

    /// Ease back to identity (zoom 1, pan 0).
    pub fn reset_smooth(&mut self) {
        self.view.reset_smooth();
    }

    /// Snap back to identity immediately.
    pub fn reset_instant(&mut self) {
        self.view.reset_instant();
    }

    /// Convert a CSS-pixel point to world coordinates.
    #[must_use]
    pub fn to_world(&self, x: f64, y: f64) -> Point {
        self.view.to_world(Point::new(x, y))
    }

    /// Convert a world point to CSS-pixel coordinates.
    #[must_use]
    pub fn to_screen(&self, world_x: f64, world_y: f64) -> Point {
        self.view.to_view(Point::new(world_x, world_y))
    }

    // --- Layers and hooks ---

    /// The content plane's layer stack.
    #[must_use]
    pub fn content_layers(&self) -> &LayerStack {
        &self.content_layers
    }

    /// The content plane's layer stack, mutable.
    pub fn content_layers_mut(&mut self) -> &mut LayerStack {
        &mut self.content_layers
    }

    /// The overlay plane's layer stack.
    #[must_use]
    pub fn overlay_layers(&self) -> &LayerStack {
        &self.overlay_layers
    }

    /// The overlay plane's layer stack, mutable.
    pub fn overlay_layers_mut(&mut self) -> &mut LayerStack {
        &mut self.overlay_layers
    }

    /// Install a host hook run each frame on the content plane, after the
    /// content layers, under the world transform (and document clip).
    pub fn set_world_hook(&mut self, hook: Option<RenderHook>) {
        self.world_hook = hook;
    }

    /// Install a host hook run each frame on the overlay plane, after the
    /// overlay layers, under the screen transform.
    pub fn set_overlay_hook(&mut self, hook: Option<RenderHook>) {
        self.overlay_hook = hook;
    }

    /// Replace the content plane background (`None` = transparent).
    pub fn set_background(&mut self, background: Option<Color>) {
        self.config.background = background;
    }

    /// Toggle the one-CSS-pixel document border.
    pub fn set_draw_doc_border(&mut self, draw: bool) {
        self.config.draw_doc_border = draw;
    }

    // --- Input ---

    /// Forward a pointer-down event. A primary press starts a pan drag
    /// (when panning is enabled).
    pub fn pointer_down(&mut self, _pos: Point, button: PointerButton, now_ms: f64) {
        if button != PointerButton::Primary {
            return;
        }
        if self.view.begin_drag() {
            self.drag.start(now_ms);
        }
    }

    /// Forward a pointer-move event with its movement delta (CSS pixels).
    pub fn pointer_move(&mut self, movement: Vec2, now_ms: f64) {
        if self.drag.is_active() && self.view.is_dragging() {
            let applied = self.drag.update(movement, now_ms);
            self.view.drag_by(applied);
        }
    }

    /// Forward a pointer-up event, releasing the drag into inertia.
    pub fn pointer_up(&mut self, now_ms: f64) {
        if self.drag.is_active() {
            let velocity = self.drag.finish(now_ms);
            self.view.end_drag(velocity);
        }
    }

    /// Forward a wheel event at a CSS position, using the viewport height
    /// for page-mode deltas and the default line height for line-mode.
    pub fn wheel(&mut self, pos: Point, delta: WheelDelta, modifiers: Modifiers) {
        self.wheel_with_metrics(pos, delta, modifiers, None, Some(self.css_size.height));
    }

    /// Forward a wheel event with explicit line/page metrics from the
    /// host.
    pub fn wheel_with_metrics(
        &mut self,
        pos: Point,
        delta: WheelDelta,
        modifiers: Modifiers,
        line_height_px: Option<f64>,
        page_height_px: Option<f64>,
    ) {
        let step = wheel::zoom_step_log(
            delta,
            modifiers,
            self.config.wheel_sensitivity,
            line_height_px,
            page_height_px,
        );
        self.view.zoom_by_log_step_at(pos, step);
    }

    // --- Frame pipeline ---

    /// Advance the camera and repaint all planes.
    ///
    /// `now_ms` is the host's frame timestamp; elapsed time is clamped to
    /// at least 1 ms. The first tick assumes one 16 ms frame.
    pub fn tick(&mut self, now_ms: f64) {
        let dt = self
            .last_ts
            .map_or(16.0, |last| (now_ms - last).max(1.0));
        self.last_ts = Some(now_ms);
        self.view.advance(dt);
        self.render_frame();
    }

    fn render_frame(&mut self) {
        let zoom = self.view.zoom();
        let t = self.view.translation();
        let env = RenderEnv {
            zoom,
            dpr: self.dpr,
            view_size: self.css_size,
        };
        let world = Affine::new([
            self.dpr * zoom,
            0.0,
            0.0,
            self.dpr * zoom,
            self.dpr * t.x,
            self.dpr * t.y,
        ]);
        let screen = Affine::scale(self.dpr);

        // Content plane: background, then world content, optionally
        // clipped to the document.
        self.content.reset_transform();
        self.content.clear_clip();
        self.content.set_alpha(1.0);
        self.content.set_composite(BlendMode::SourceOver);
        match self.config.background {
            Some(background) => self.content.fill_all(background),
            None => self.content.clear(),
        }

        if let Some(doc) = self.view.document_rect() {
            self.content.save();
            self.content.set_transform(world);
            self.content.set_clip_rect(doc);
            self.content_layers
                .render_all(&mut self.content, &env, world, screen);
            if let Some(hook) = &mut self.world_hook {
                self.content.set_transform(world);
                hook(&mut self.content, &env);
            }
            self.content.restore();

            if self.config.draw_doc_border {
                self.content.save();
                self.content.set_transform(world);
                self.content.stroke_rect(doc, DOC_BORDER_COLOR, 1.0 / zoom);
                self.content.restore();
            }
        } else {
            self.content_layers
                .render_all(&mut self.content, &env, world, screen);
            if let Some(hook) = &mut self.world_hook {
                self.content.set_transform(world);
                hook(&mut self.content, &env);
                self.content.reset_transform();
            }
        }

        // Overlay plane.
        self.overlay.reset_transform();
        self.overlay.clear_clip();
        self.overlay.set_alpha(1.0);
        self.overlay.set_composite(BlendMode::SourceOver);
        self.overlay.clear();
        self.overlay_layers
            .render_all(&mut self.overlay, &env, world, screen);
        if let Some(hook) = &mut self.overlay_hook {
            self.overlay.set_transform(screen);
            hook(&mut self.overlay, &env);
            self.overlay.reset_transform();
        }

        // Final plane: content under overlay.
        self.final_surface.clear();
        self.final_surface.reset_transform();
        self.final_surface.draw_surface(
            &self.content,
            Affine::IDENTITY,
            1.0,
            BlendMode::SourceOver,
            FilterQuality::Nearest,
        );
        self.final_surface.draw_surface(
            &self.overlay,
            Affine::IDENTITY,
            1.0,
            BlendMode::SourceOver,
            FilterQuality::Nearest,
        );
    }

    // --- Surfaces and pixels ---

    /// The composited final plane, ready to present.
    #[must_use]
    pub fn final_surface(&self) -> &Surface {
        &self.final_surface
    }

    /// The content plane (world content only, no overlay).
    #[must_use]
    pub fn content_surface(&self) -> &Surface {
        &self.content
    }

    /// The viewport extent in CSS pixels.
    #[must_use]
    pub fn css_size(&self) -> Size {
        self.css_size
    }

    /// The device pixel ratio in effect.
    #[must_use]
    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    /// Read the content plane's pixel under a CSS coordinate.
    ///
    /// Out-of-surface reads return fully transparent black.
    #[must_use]
    pub fn pixel_color_at_screen(&self, x: f64, y: f64) -> PixelColor {
        let dx = (x * self.dpr).floor();
        let dy = (y * self.dpr).floor();
        if !dx.is_finite() || !dy.is_finite() {
            return PixelColor::transparent();
        }
        self.content.pixel(dx as i64, dy as i64)
    }

    /// Read the content plane's pixel under a world coordinate.
    #[must_use]
    pub fn pixel_color_at_world(&self, world_x: f64, world_y: f64) -> PixelColor {
        let screen = self.to_screen(world_x, world_y);
        self.pixel_color_at_screen(screen.x, screen.y)
    }

    /// Resize the viewport, rebuilding all three planes at
    /// `floor(css * dpr)` device pixels.
    pub fn resize(
        &mut self,
        css_width: f64,
        css_height: f64,
        dpr: f64,
    ) -> Result<(), SurfaceError> {
        let dpr = sanitize_dpr(dpr);
        let (device_w, device_h) = device_extent(css_width, css_height, dpr);
        let final_surface = Surface::new(device_w, device_h)?;
        let content = Surface::new(device_w, device_h)?;
        let overlay = Surface::new(device_w, device_h)?;
        tracing::debug!(device_w, device_h, dpr, "resized view surfaces");

        self.final_surface = final_surface;
        self.content = content;
        self.overlay = overlay;
        self.dpr = dpr;
        self.css_size = Size::new(css_width, css_height);
        self.view.set_view_size(self.css_size);
        Ok(())
    }
}

impl std::fmt::Debug for ViewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewController")
            .field("css_size", &self.css_size)
            .field("dpr", &self.dpr)
            .field("zoom", &self.view.zoom())
            .field("content_layers", &self.content_layers.len())
            .field("overlay_layers", &self.overlay_layers.len())
            .finish()
    }
}

fn sanitize_dpr(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr >= 1.0 { dpr } else { 1.0 }
}

fn device_extent(css_width: f64, css_height: f64, dpr: f64) -> (u32, u32) {
    let w = (css_width * dpr).floor().max(0.0);
    let h = (css_height * dpr).floor().max(0.0);
    (w as u32, h as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_extent_fails_construction() {
        assert!(ViewController::new(0.0, 100.0, 1.0, ViewConfig::default()).is_err());
        assert!(ViewController::new(100.0, 100.0, 1.0, ViewConfig::default()).is_ok());
    }

    #[test]
    fn dpr_is_sanitized() {
        let vc = ViewController::new(100.0, 100.0, 0.25, ViewConfig::default()).unwrap();
        assert_eq!(vc.dpr(), 1.0);
        let vc = ViewController::new(100.0, 100.0, f64::NAN, ViewConfig::default()).unwrap();
        assert_eq!(vc.dpr(), 1.0);
    }

    #[test]
    fn device_extent_floors() {
        assert_eq!(device_extent(100.5, 200.9, 2.0), (201, 401));
    }

    #[test]
    fn coordinate_roundtrip_through_controller() {
        let mut vc = ViewController::new(800.0, 600.0, 2.0, ViewConfig::default()).unwrap();
        vc.zoom_to_at_screen_raw(200.0, 200.0, 3.0);
        let world = vc.to_world(123.0, 45.0);
        let back = vc.to_screen(world.x, world.y);
        assert!((back.x - 123.0).abs() < 1e-6);
        assert!((back.y - 45.0).abs() < 1e-6);
    }
}
