// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Pan clamp policy applied when a document rectangle is installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PanClampMode {
    /// Keep the document inside the margin-reduced viewport.
    ///
    /// When the document is smaller than the available space in an axis it
    /// is locked to the centered position; when larger, panning stops at
    /// the margins.
    Margin,
    /// Keep at least a sliver of the document visible.
    ///
    /// Panning may push the document almost entirely off screen, but a
    /// configurable number of CSS pixels of its extent must remain inside
    /// the viewport in each axis.
    #[default]
    MinVisible,
}

/// How [`crate::View2D::zoom_document_to_fit`] sizes the document within
/// the margin-reduced viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FitMode {
    /// The whole document is visible; letterboxed in the looser axis.
    #[default]
    Contain,
    /// The document covers the available space; cropped in the tighter
    /// axis.
    Cover,
    /// The document's width matches the available width exactly.
    FitWidth,
    /// The document's height matches the available height exactly.
    FitHeight,
}
