// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sample overlay layers.
//!
//! These are the overlay-plane layers a painting host typically wants: a
//! brush-radius ring following the pointer and a color swatch. They are
//! examples of the [`Layer`] contract on the screen plane, not part of
//! the engine's core; hosts are free to replace them wholesale.

use easel_raster::{Color, Surface};
use kurbo::{Circle, Point, Rect};

use crate::layer::{Layer, LayerCommon, LayerKind, LayerSpace, RenderEnv};

/// A brush-size preview ring following the pointer.
///
/// The ring's center is given in screen coordinates and its radius in
/// world units (half the brush size), so the preview scales with the
/// camera while the ring itself stays one CSS pixel wide at any zoom.
pub struct BrushRingLayer {
    common: LayerCommon,
    center: Point,
    world_radius: f64,
    color: Color,
}

impl BrushRingLayer {
    /// Create a ring of `world_radius` world units.
    #[must_use]
    pub fn new(name: impl Into<String>, world_radius: f64) -> Self {
        let mut common = LayerCommon::new(name, LayerKind::Overlay, LayerSpace::Screen);
        common.visible = false;
        Self {
            common,
            center: Point::ZERO,
            world_radius,
            color: Color::from_rgba8(0, 0, 0, 160),
        }
    }

    /// Move the ring to a screen position and show it.
    pub fn set_position(&mut self, center: Point) {
        self.center = center;
        self.common.visible = true;
    }

    /// Hide the ring (pointer left the canvas).
    pub fn hide(&mut self) {
        self.common.visible = false;
    }

    /// Set the preview radius in world units.
    pub fn set_world_radius(&mut self, world_radius: f64) {
        self.world_radius = world_radius.max(0.0);
    }

    /// Set the ring color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Layer for BrushRingLayer {
    fn common(&self) -> &LayerCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut LayerCommon {
        &mut self.common
    }

    fn render(&mut self, target: &mut Surface, env: &RenderEnv) {
        let radius = self.world_radius * env.zoom;
        if radius <= 0.0 {
            return;
        }
        target.save();
        target.set_composite(easel_raster::BlendMode::SourceOver);
        target.set_alpha(self.common.opacity as f32);
        // One CSS pixel of ring regardless of zoom.
        target.stroke_circle(Circle::new(self.center, radius), self.color, 1.0);
        target.restore();
    }

    fn hit_test(&self, _pt: Point) -> bool {
        // Cursor previews never capture input.
        false
    }
}

/// A fixed-size color swatch square on the overlay plane.
pub struct SwatchLayer {
    common: LayerCommon,
    rect: Rect,
    color: Color,
}

impl SwatchLayer {
    /// Create a swatch filling `rect` (screen coordinates).
    #[must_use]
    pub fn new(name: impl Into<String>, rect: Rect, color: Color) -> Self {
        Self {
            common: LayerCommon::new(name, LayerKind::Overlay, LayerSpace::Screen),
            rect,
            color,
        }
    }

    /// Change the displayed color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// The displayed color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
}

impl Layer for SwatchLayer {
    fn common(&self) -> &LayerCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut LayerCommon {
        &mut self.common
    }

    fn render(&mut self, target: &mut Surface, _env: &RenderEnv) {
        target.save();
        target.set_alpha(self.common.opacity as f32);
        target.fill_rect(self.rect, self.color);
        target.restore();
    }

    fn hit_test(&self, pt: Point) -> bool {
        self.rect.contains(pt)
    }
}
