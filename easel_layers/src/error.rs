// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use easel_raster::{ImageError, SurfaceError};
use thiserror::Error;

/// Errors from layer construction and raster replacement.
///
/// Both variants are construction-time failures: no layer (and no stack
/// entry) exists when they are returned.
#[derive(Debug, Error)]
pub enum LayerError {
    /// The layer's raster could not be allocated.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// The layer's image source could not be decoded.
    #[error(transparent)]
    Image(#[from] ImageError),
}
