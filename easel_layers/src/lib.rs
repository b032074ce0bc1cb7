// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Layers: the layer model and ordered layer stacks.
//!
//! A layer is a drawable entity with a pose (translation, rotation,
//! uniform scale, anchor mode), visibility, opacity, and a composite mode,
//! living in one of two coordinate spaces:
//!
//! - **World** layers are drawn under the camera's world transform and
//!   move with pan/zoom (document content).
//! - **Screen** layers are drawn at identity (scaled only by the device
//!   pixel ratio) and stay put (cursors, HUD elements).
//!
//! Concrete layers:
//!
//! - [`CanvasLayer`]: owns an offscreen raster and the live stroke
//!   machinery (brush and eraser, pressure-weighted segments, history
//!   binding). Bitmap layers are canvas layers pre-filled from a decoded
//!   image; they share the same type with a `Bitmap` kind tag.
//! - [`overlay`]: sample screen-plane layers (brush ring, color swatch)
//!   in the shape hosts typically need. They are examples, not contract.
//!
//! [`LayerStack`] is the per-plane ordered container: draw order is
//! insertion order (front is last), hit testing walks top-first, and the
//! stack exclusively owns its layers.

pub mod overlay;

mod canvas;
mod error;
mod hit;
mod layer;
mod stack;

pub use canvas::CanvasLayer;
pub use error::LayerError;
pub use hit::StrokedSegment;
pub use layer::{AnchorMode, Layer, LayerCommon, LayerId, LayerKind, LayerSpace, Pose, RenderEnv};
pub use stack::LayerStack;
