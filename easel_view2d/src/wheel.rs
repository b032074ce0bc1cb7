// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wheel-delta normalization for zoom input.
//!
//! Scroll hardware reports deltas in one of three units; zooming wants a
//! single log-space step. [`normalized_dy`] converts a delta to pixels and
//! [`zoom_step_log`] turns it into the signed log-zoom step, with the
//! conventional modifier scaling (Ctrl/Cmd speeds up, Shift slows down).

/// Unit of a wheel event's delta values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WheelDeltaMode {
    /// Deltas are raw pixels.
    #[default]
    Pixel,
    /// Deltas are text lines.
    Line,
    /// Deltas are whole pages.
    Page,
}

/// A wheel/trackpad scroll delta.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelDelta {
    /// Horizontal delta in `mode` units.
    pub dx: f64,
    /// Vertical delta in `mode` units.
    pub dy: f64,
    /// Unit of `dx`/`dy`.
    pub mode: WheelDeltaMode,
}

/// Modifier keys held during an input event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift key.
    pub shift: bool,
    /// Control key.
    pub ctrl: bool,
    /// Alt/Option key.
    pub alt: bool,
    /// Meta/Command key.
    pub meta: bool,
}

/// Fallback line height when the host cannot supply one.
pub const DEFAULT_LINE_HEIGHT_PX: f64 = 16.0;

/// Fallback page height when the host cannot supply one.
pub const DEFAULT_PAGE_HEIGHT_PX: f64 = 800.0;

/// Convert a wheel delta's vertical component to pixels.
///
/// `line_height_px` and `page_height_px` come from the host (the target
/// element's computed line height and client height); `None` falls back to
/// [`DEFAULT_LINE_HEIGHT_PX`] / [`DEFAULT_PAGE_HEIGHT_PX`].
#[must_use]
pub fn normalized_dy(
    delta: WheelDelta,
    line_height_px: Option<f64>,
    page_height_px: Option<f64>,
) -> f64 {
    match delta.mode {
        WheelDeltaMode::Pixel => delta.dy,
        WheelDeltaMode::Line => delta.dy * line_height_px.unwrap_or(DEFAULT_LINE_HEIGHT_PX),
        WheelDeltaMode::Page => delta.dy * page_height_px.unwrap_or(DEFAULT_PAGE_HEIGHT_PX),
    }
}

/// Compute the log-zoom step for a wheel event.
///
/// Scrolling up (negative `dy`) zooms in. Ctrl/Cmd multiplies the step by
/// 1.6, Shift by 0.6; both can apply at once.
#[must_use]
pub fn zoom_step_log(
    delta: WheelDelta,
    modifiers: Modifiers,
    sensitivity: f64,
    line_height_px: Option<f64>,
    page_height_px: Option<f64>,
) -> f64 {
    let mut step = -normalized_dy(delta, line_height_px, page_height_px) * sensitivity;
    if modifiers.ctrl || modifiers.meta {
        step *= 1.6;
    }
    if modifiers.shift {
        step *= 0.6;
    }
    step
}
