// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Raster: CPU raster surfaces with canvas-style drawing state.
//!
//! This crate is the pixel layer of the Easel engine. It wraps a CPU
//! rasterizer behind a small, stateful drawing surface so that the rest of
//! the engine never touches raw pixel buffers directly. It focuses on:
//!
//! - [`Surface`]: an owned RGBA raster plus a save/restore stack of
//!   transform, clip, global alpha, and composite operation.
//! - Stroke primitives: round-capped segments and stamp disks, the two
//!   shapes a pressure-weighted paint stroke is built from.
//! - [`Snapshot`]: rectangular pixel pre-images that can be taken from and
//!   written back to a surface verbatim, for history/undo support.
//! - Pixel reads as [`PixelColor`] (channel values plus the CSS-style
//!   `hex` / `rgba(...)` renderings hosts display in pickers).
//! - PNG decode/encode as the interchange format for bitmap content.
//!
//! # Position in the stack
//!
//! Higher layers (`easel_layers`, `easel_view`) own surfaces for layer
//! rasters and the three view planes; `easel_history` captures and restores
//! [`Snapshot`]s of them. Nothing in this crate knows about cameras,
//! layers, or commands.
//!
//! Coordinates handed to drawing calls are in the surface's current user
//! space: the active transform maps them to device pixels, and the active
//! clip (if any) is fixed in device space, so it survives later transform
//! changes within the same saved scope.

mod color;
mod error;
mod snapshot;
mod surface;

pub use color::{PixelColor, format_hex, format_rgba, parse_css_color};
pub use error::{ImageError, SurfaceError};
pub use snapshot::{PixelRect, Snapshot};
pub use surface::Surface;

/// Composite/blend operation applied by drawing calls.
///
/// Re-exported from the rasterizer so callers and the layer model speak the
/// same vocabulary. `SourceOver` is painting, `DestinationOut` is erasing.
pub use tiny_skia::BlendMode;

/// Resampling quality for surface-to-surface blits.
pub use tiny_skia::FilterQuality;

/// Color type used throughout the engine (sRGB with alpha).
pub use peniko::Color;
