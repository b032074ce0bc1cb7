// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel View: the viewport controller tying the engine together.
//!
//! [`ViewController`] owns everything a frame needs:
//!
//! - the animated camera ([`easel_view2d::View2D`]),
//! - the three render planes (content, overlay, final) as
//!   [`easel_raster::Surface`]s sized in device pixels,
//! - one [`easel_layers::LayerStack`] per plane,
//! - the pan-drag tracker and wheel translation.
//!
//! The host drives it: forward pointer and wheel events, call
//! [`ViewController::tick`] from the frame clock, then present
//! [`ViewController::final_surface`] however the platform likes. Painting
//! goes directly to a [`easel_layers::CanvasLayer`] fetched from the
//! content stack; the controller's job is only to composite the result
//! under the camera every frame.
//!
//! Each tick runs the frame pipeline in a fixed order: advance the camera
//! (zoom easing with anchor compensation, inertia, reset pull, document
//! clamp), paint the content plane (background, world transform, optional
//! document clip and border, content layers, host hook), paint the
//! overlay plane (overlay layers, host hook), then blit content and
//! overlay onto the final plane.

mod config;
mod controller;

pub use config::ViewConfig;
pub use controller::{PointerButton, RenderHook, ViewController};

pub use easel_layers::{
    AnchorMode, CanvasLayer, Layer, LayerId, LayerKind, LayerSpace, LayerStack, Pose, RenderEnv,
};
pub use easel_raster::{BlendMode, Color, PixelColor, Surface, SurfaceError};
pub use easel_view2d::wheel::{Modifiers, WheelDelta, WheelDeltaMode};
pub use easel_view2d::{FitMode, MarginUpdate, Margins, PanClampMode, View2D};
