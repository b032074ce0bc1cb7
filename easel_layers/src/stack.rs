// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ordered, owning layer container for one plane.

use easel_raster::Surface;
use kurbo::{Affine, Point};

use crate::canvas::CanvasLayer;
use crate::layer::{Layer, LayerId, LayerSpace, RenderEnv};

/// Ordered container of layers for a single plane (content or overlay).
///
/// Draw order is insertion order: the last layer is frontmost. The stack
/// exclusively owns its layers; removal drops them, releasing their
/// rasters.
#[derive(Default)]
pub struct LayerStack {
    layers: Vec<Box<dyn Layer>>,
}

impl LayerStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a layer, appending or placing it at `insert_at` when the
    /// index is valid. Returns the layer's id.
    pub fn add_layer(&mut self, layer: Box<dyn Layer>, insert_at: Option<usize>) -> LayerId {
        let id = layer.common().id();
        match insert_at {
            Some(index) if index <= self.layers.len() => self.layers.insert(index, layer),
            _ => self.layers.push(layer),
        }
        id
    }

    /// Remove (and drop) the layer with `id`. No-op returning `false`
    /// when absent.
    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        let Some(index) = self.layers.iter().position(|l| l.common().id() == id) else {
            return false;
        };
        self.layers.remove(index);
        true
    }

    /// Look up a layer by id.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&dyn Layer> {
        self.layers
            .iter()
            .find(|l| l.common().id() == id)
            .map(AsRef::as_ref)
    }

    /// Look up a layer by id, mutable.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut (dyn Layer + '_)> {
        match self.layers.iter_mut().find(|l| l.common().id() == id) {
            Some(l) => Some(l.as_mut()),
            None => None,
        }
    }

    /// Look up a paintable canvas layer by id.
    pub fn canvas_mut(&mut self, id: LayerId) -> Option<&mut CanvasLayer> {
        self.layers
            .iter_mut()
            .find(|l| l.common().id() == id)
            .and_then(|l| l.as_canvas_mut())
    }

    /// Number of layers in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Iterate layers in draw order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &dyn Layer> {
        self.layers.iter().map(AsRef::as_ref)
    }

    /// Render every visible layer in draw order.
    ///
    /// `world` is the full world transform of the destination (camera and
    /// device scale); `screen` is the transform for screen-space layers
    /// (device scale only). The right one is installed per layer before
    /// its `render` runs; the destination transform is reset afterwards.
    pub fn render_all(
        &mut self,
        target: &mut Surface,
        env: &RenderEnv,
        world: Affine,
        screen: Affine,
    ) {
        for layer in &mut self.layers {
            if layer.common().is_skipped() {
                continue;
            }
            target.set_transform(match layer.common().space {
                LayerSpace::World => world,
                LayerSpace::Screen => screen,
            });
            layer.render(target, env);
        }
        target.reset_transform();
    }

    /// Return the frontmost layer in `space` whose hit test accepts `pt`.
    #[must_use]
    pub fn hit_test(&self, pt: Point, space: LayerSpace) -> Option<LayerId> {
        self.layers
            .iter()
            .rev()
            .find(|l| l.common().space == space && l.hit_test(pt))
            .map(|l| l.common().id())
    }

    /// Drop every layer.
    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

impl std::fmt::Debug for LayerStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerStack")
            .field("len", &self.layers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_raster::Color;
    use kurbo::Size;

    fn canvas(name: &str, w: u32, h: u32) -> Box<CanvasLayer> {
        Box::new(CanvasLayer::new(name, w, h).unwrap())
    }

    fn env() -> RenderEnv {
        RenderEnv {
            zoom: 1.0,
            dpr: 1.0,
            view_size: Size::new(100.0, 100.0),
        }
    }

    #[test]
    fn insertion_order_is_draw_order() {
        let mut stack = LayerStack::new();
        let a = stack.add_layer(canvas("a", 10, 10), None);
        let b = stack.add_layer(canvas("b", 10, 10), None);
        let c = stack.add_layer(canvas("c", 10, 10), Some(1));

        let names: Vec<_> = stack.iter().map(|l| l.common().name.clone()).collect();
        assert_eq!(names, ["a", "c", "b"]);

        // An out-of-range index appends.
        let d = stack.add_layer(canvas("d", 10, 10), Some(99));
        assert_eq!(stack.len(), 4);
        assert!(stack.layer(d).is_some());
        assert_ne!(a, b);
        assert!(stack.layer(c).is_some());
    }

    #[test]
    fn remove_is_noop_for_unknown_id() {
        let mut stack = LayerStack::new();
        let id = stack.add_layer(canvas("a", 10, 10), None);
        assert!(stack.remove_layer(id));
        assert!(!stack.remove_layer(id));
        assert!(stack.is_empty());
    }

    #[test]
    fn hit_test_is_top_first() {
        let mut stack = LayerStack::new();

        let mut back = CanvasLayer::new("back", 50, 50).unwrap();
        back.common_mut().pose.x = 0.0;
        let back_id = stack.add_layer(Box::new(back), None);

        // Front layer overlaps the region around (30, 30).
        let mut front = CanvasLayer::new("front", 20, 20).unwrap();
        front.common_mut().pose.x = 20.0;
        front.common_mut().pose.y = 20.0;
        let front_id = stack.add_layer(Box::new(front), None);

        assert_eq!(stack.hit_test(Point::new(30.0, 30.0), LayerSpace::World), Some(front_id));
        assert_eq!(stack.hit_test(Point::new(5.0, 5.0), LayerSpace::World), Some(back_id));
        assert_eq!(stack.hit_test(Point::new(90.0, 90.0), LayerSpace::World), None);
        // Space mismatch finds nothing.
        assert_eq!(stack.hit_test(Point::new(30.0, 30.0), LayerSpace::Screen), None);
    }

    #[test]
    fn render_skips_invisible_and_transparent_layers() {
        let mut stack = LayerStack::new();

        let mut visible = CanvasLayer::new("visible", 10, 10).unwrap();
        visible.surface_mut().fill_all(Color::from_rgba8(255, 0, 0, 255));
        stack.add_layer(Box::new(visible), None);

        let mut hidden = CanvasLayer::new("hidden", 10, 10).unwrap();
        hidden.surface_mut().fill_all(Color::from_rgba8(0, 255, 0, 255));
        hidden.common_mut().visible = false;
        stack.add_layer(Box::new(hidden), None);

        let mut faded = CanvasLayer::new("faded", 10, 10).unwrap();
        faded.surface_mut().fill_all(Color::from_rgba8(0, 0, 255, 255));
        faded.common_mut().opacity = 0.0;
        stack.add_layer(Box::new(faded), None);

        let mut target = Surface::new(10, 10).unwrap();
        stack.render_all(&mut target, &env(), Affine::IDENTITY, Affine::IDENTITY);

        let px = target.pixel(5, 5);
        assert_eq!((px.r, px.g, px.b), (255, 0, 0));
    }

    #[test]
    fn world_and_screen_layers_get_their_transforms() {
        let mut stack = LayerStack::new();

        let mut world = CanvasLayer::new("world", 4, 4).unwrap();
        world.surface_mut().fill_all(Color::from_rgba8(255, 0, 0, 255));
        stack.add_layer(Box::new(world), None);

        let mut screen = CanvasLayer::new("screen", 4, 4).unwrap();
        screen.surface_mut().fill_all(Color::from_rgba8(0, 255, 0, 255));
        screen.common_mut().space = LayerSpace::Screen;
        screen.common_mut().pose.x = 20.0;
        stack.add_layer(Box::new(screen), None);

        let mut target = Surface::new(40, 40).unwrap();
        // World content is shifted by the camera; screen content is not.
        stack.render_all(
            &mut target,
            &env(),
            Affine::translate((10.0, 0.0)),
            Affine::IDENTITY,
        );

        assert_eq!(target.pixel(12, 2).r, 255);
        assert!(target.pixel(2, 2).is_transparent());
        assert_eq!(target.pixel(22, 2).g, 255);
    }

    #[test]
    fn canvas_probe_finds_paintable_layers() {
        let mut stack = LayerStack::new();
        let id = stack.add_layer(canvas("paint", 10, 10), None);
        assert!(stack.canvas_mut(id).is_some());
    }
}
