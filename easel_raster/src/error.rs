// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors from surface construction and sizing.
///
/// Construction is the only fatal point in the raster layer: once a surface
/// exists, drawing and reading degrade instead of failing.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The requested surface dimensions cannot back a pixel buffer.
    #[error("surface dimensions must be non-zero, got {width}x{height}")]
    ZeroSized {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

/// Errors from decoding or encoding bitmap content.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The PNG stream could not be decoded.
    #[error("png decode failed: {0}")]
    Decode(#[from] png::DecodingError),

    /// The PNG stream could not be encoded.
    #[error("png encode failed: {0}")]
    Encode(#[from] png::EncodingError),

    /// The decoded output is not 8-bit RGBA after expansion.
    #[error("unsupported png output format (expected 8-bit RGBA)")]
    Format,

    /// A raw pixel buffer does not match the declared dimensions.
    #[error("pixel buffer length {len} does not match {width}x{height} RGBA")]
    BufferSize {
        /// Declared width in pixels.
        width: u32,
        /// Declared height in pixels.
        height: u32,
        /// Actual buffer length in bytes.
        len: usize,
    },

    /// The decoded image has dimensions no surface can be built from.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
