// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use easel_raster::{Color, parse_css_color};
use easel_view2d::PanClampMode;

/// Construction-time configuration for a
/// [`ViewController`](crate::ViewController).
///
/// Every field has a sensible default; hosts usually override a handful
/// with struct-update syntax:
///
/// ```
/// use easel_view::ViewConfig;
///
/// let config = ViewConfig {
///     max_zoom: 32.0,
///     draw_doc_border: true,
///     ..ViewConfig::default()
/// };
/// assert_eq!(config.min_zoom, 0.5);
/// ```
#[derive(Clone, Debug)]
pub struct ViewConfig {
    /// Smallest zoom factor. Non-positive values are floored to `1e-8`.
    pub min_zoom: f64,
    /// Largest zoom factor.
    pub max_zoom: f64,
    /// Wheel pixels to log-zoom step conversion factor.
    pub wheel_sensitivity: f64,
    /// Zoom easing approach rate (1/ms).
    pub approach_k_zoom: f64,
    /// Reset easing approach rate (1/ms).
    pub approach_k_pan: f64,
    /// Inertia velocity decay per 16 ms.
    pub friction: f64,
    /// Speed (CSS px/ms) below which inertia snaps to rest.
    pub stop_speed: f64,
    /// Blend factor for drag velocity samples.
    pub ema_alpha: f64,
    /// Pointer hold time (ms) after which release carries no inertia.
    pub idle_no_inertia_ms: f64,
    /// Content plane background; `None` leaves it transparent.
    pub background: Option<Color>,
    /// Draw a one-CSS-pixel border at the document edges.
    pub draw_doc_border: bool,
    /// Minimum visible document extent (CSS px) for
    /// [`PanClampMode::MinVisible`].
    pub min_visible_px: f64,
    /// Pan clamp policy when a document rectangle is installed.
    pub pan_clamp_mode: PanClampMode,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 10.0,
            wheel_sensitivity: 0.0015,
            approach_k_zoom: 0.022,
            approach_k_pan: 0.022,
            friction: 0.92,
            stop_speed: 0.02,
            ema_alpha: 0.25,
            idle_no_inertia_ms: 120.0,
            background: Some(Color::from_rgba8(255, 255, 255, 255)),
            draw_doc_border: false,
            min_visible_px: 30.0,
            pan_clamp_mode: PanClampMode::MinVisible,
        }
    }
}

impl ViewConfig {
    /// Set the background from a CSS color string.
    ///
    /// Empty strings, `"transparent"`, and unparsable values all yield a
    /// transparent background.
    #[must_use]
    pub fn with_background_css(mut self, css: &str) -> Self {
        self.background = parse_css_color(css);
        self
    }
}
