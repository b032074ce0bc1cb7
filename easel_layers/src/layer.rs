// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer trait and its shared plain-data pieces.

use std::sync::atomic::{AtomicU64, Ordering};

use easel_raster::{BlendMode, Surface};
use kurbo::{Affine, Point, Size, Vec2};

use crate::canvas::CanvasLayer;

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Stable layer identifier, unique within the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(u64);

impl LayerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw identifier value.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// What kind of content a layer carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// A paintable raster layer.
    Canvas,
    /// A raster layer pre-filled from an image source.
    Bitmap,
    /// A non-document layer (cursors, rings, HUD pieces).
    Overlay,
}

/// Which coordinate space a layer's pose lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LayerSpace {
    /// The camera's world plane; the layer moves with pan/zoom.
    #[default]
    World,
    /// The CSS-pixel screen plane; the layer ignores the camera.
    Screen,
}

/// Where a layer's pose origin sits relative to its content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AnchorMode {
    /// The pose translation positions the content's top-left corner.
    #[default]
    TopLeft,
    /// The pose translation positions the content's center.
    Center,
}

/// A layer's placement: translation, rotation, uniform scale, and anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Translation X in the layer's space.
    pub x: f64,
    /// Translation Y in the layer's space.
    pub y: f64,
    /// Uniform scale factor. Must be positive.
    pub scale: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Anchor mode for the translation.
    pub anchor: AnchorMode,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            anchor: AnchorMode::TopLeft,
        }
    }
}

impl Pose {
    /// The local-to-space affine for content of `extent` local pixels.
    ///
    /// Order: anchor offset, scale, rotate, translate.
    #[must_use]
    pub fn to_affine(&self, extent: Size) -> Affine {
        let anchor = self.anchor_offset(extent);
        Affine::translate((self.x, self.y))
            * Affine::rotate(self.rotation)
            * Affine::scale(self.scale)
            * Affine::translate(-anchor)
    }

    /// Map a point from the layer's space into local content pixels.
    ///
    /// This is the formal inverse pose: translate by `-(x, y)`, rotate by
    /// `-rotation`, scale by `1 / scale`, then add the anchor offset.
    #[must_use]
    pub fn to_local(&self, pt: Point, extent: Size) -> Point {
        let anchor = self.anchor_offset(extent);
        let p = pt - Vec2::new(self.x, self.y);
        let (s, c) = (-self.rotation).sin_cos();
        let rx = p.x * c - p.y * s;
        let ry = p.x * s + p.y * c;
        let inv = 1.0 / self.scale;
        Point::new(rx * inv + anchor.x, ry * inv + anchor.y)
    }

    fn anchor_offset(&self, extent: Size) -> Vec2 {
        match self.anchor {
            AnchorMode::TopLeft => Vec2::ZERO,
            AnchorMode::Center => Vec2::new(extent.width / 2.0, extent.height / 2.0),
        }
    }
}

/// State shared by every layer variant.
#[derive(Debug)]
pub struct LayerCommon {
    id: LayerId,
    /// Human-readable layer name.
    pub name: String,
    kind: LayerKind,
    /// Coordinate space of the pose.
    pub space: LayerSpace,
    /// Whether the layer is drawn at all.
    pub visible: bool,
    /// Layer opacity in `[0, 1]`; `0` skips rendering entirely.
    pub opacity: f64,
    /// Composite mode used when drawing the layer into its plane.
    pub blend: BlendMode,
    /// Placement of the layer's content.
    pub pose: Pose,
}

impl LayerCommon {
    /// Allocate shared state with a fresh id and default pose.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: LayerKind, space: LayerSpace) -> Self {
        Self {
            id: LayerId::next(),
            name: name.into(),
            kind,
            space,
            visible: true,
            opacity: 1.0,
            blend: BlendMode::SourceOver,
            pose: Pose::default(),
        }
    }

    /// The layer's stable id.
    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// The layer's kind tag.
    #[must_use]
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Whether rendering should be skipped for this layer.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        !self.visible || self.opacity <= 0.0
    }
}

/// Per-frame context handed to layer rendering.
#[derive(Clone, Copy, Debug)]
pub struct RenderEnv {
    /// Current camera zoom factor.
    pub zoom: f64,
    /// Device pixel ratio of the destination plane.
    pub dpr: f64,
    /// View extent in CSS pixels.
    pub view_size: Size,
}

/// A drawable entity in a layer stack.
///
/// `render` is called with the destination transform already set for the
/// layer's space (world transform for world layers, DPR-scaled identity
/// for screen layers); implementations apply their own pose, opacity, and
/// composite mode on top and must leave the surface state as they found
/// it. Layers with `visible == false` or `opacity <= 0` are skipped
/// upstream and `render` is not called.
pub trait Layer {
    /// Shared layer state.
    fn common(&self) -> &LayerCommon;

    /// Shared layer state, mutable.
    fn common_mut(&mut self) -> &mut LayerCommon;

    /// Draw the layer into `target`.
    fn render(&mut self, target: &mut Surface, env: &RenderEnv);

    /// Whether `pt` (in the layer's space) hits the layer's content.
    fn hit_test(&self, pt: Point) -> bool;

    /// Probe for the paintable canvas variant.
    fn as_canvas(&self) -> Option<&CanvasLayer> {
        None
    }

    /// Mutable probe for the paintable canvas variant.
    fn as_canvas_mut(&mut self) -> Option<&mut CanvasLayer> {
        None
    }
}
