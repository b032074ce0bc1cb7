// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel View 2D: an animated pan/zoom camera over a world plane.
//!
//! This crate provides a small, headless model of a 2D camera whose view
//! extents are expressed in CSS pixels. It focuses on:
//!
//! - Camera state with zoom held in **log space** ([`View2D`]), so
//!   exponential easing behaves uniformly across the zoom range.
//! - Frame advancement ([`View2D::advance`]): zoom easing with anchored
//!   compensation, pan inertia with friction, and reset easing.
//! - Coordinate conversion between world and view space.
//! - An optional world-space document rectangle with screen margins and
//!   two pan-clamp policies ([`PanClampMode`]).
//! - Document fitting ([`FitMode`]) and centering.
//! - Wheel-delta normalization ([`wheel`]) and pan-drag velocity tracking
//!   ([`drag`]).
//!
//! It does **not** own any raster surface or scene. Callers are expected
//! to:
//! - Drive [`View2D::advance`] from their own frame clock with elapsed
//!   milliseconds.
//! - Derive render transforms from [`View2D::world_to_view`] (scaling by
//!   a device-pixel ratio where needed).
//! - Feed pointer and wheel input through [`drag::PanDrag`] and
//!   [`wheel::zoom_step_log`] at a higher layer.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use easel_view2d::View2D;
//!
//! let mut view = View2D::new(Size::new(800.0, 600.0));
//!
//! // Retarget a 2x zoom anchored at the view center, then run the loop.
//! view.zoom_to_at(Point::new(400.0, 300.0), 2.0);
//! for _ in 0..600 {
//!     view.advance(16.0);
//! }
//! assert!((view.zoom() - 2.0).abs() < 1e-3);
//!
//! // The world point under the anchor stayed put.
//! let under = view.to_world(Point::new(400.0, 300.0));
//! assert!((view.to_view(under).x - 400.0).abs() < 0.5);
//! ```
//!
//! ## Design notes
//!
//! - The camera is axis-aligned with a uniform zoom factor; rotation is
//!   intentionally left out.
//! - Interior zoom state is logarithmic; [`View2D::zoom`] exposes the
//!   exponential factor and is always positive.
//! - Clamping re-projects pan after every mutation and every frame, so
//!   the document policy holds as an invariant rather than a one-shot
//!   correction.

pub mod drag;
pub mod wheel;

mod doc;
mod modes;
mod view2d;

pub use doc::{MarginUpdate, Margins};
pub use modes::{FitMode, PanClampMode};
pub use view2d::{MotionParams, View2D};
