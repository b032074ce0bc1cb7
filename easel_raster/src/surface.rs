// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stateful drawing surface.

use kurbo::{Affine, Circle, Line, Rect};
use peniko::Color;
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap,
    PixmapPaint, Stroke, Transform,
};

use crate::color::PixelColor;
use crate::error::{ImageError, SurfaceError};
use crate::snapshot::{PixelRect, Snapshot};

/// Drawing state affected by [`Surface::save`] / [`Surface::restore`].
#[derive(Clone)]
struct DrawState {
    /// Maps user-space coordinates to device pixels.
    transform: Affine,
    /// Device-space coverage mask; fixed at the transform active when the
    /// clip was set.
    clip: Option<Mask>,
    /// Global alpha multiplied into every drawing call.
    alpha: f32,
    /// Composite operation for geometry drawing calls.
    composite: BlendMode,
}

impl DrawState {
    fn identity() -> Self {
        Self {
            transform: Affine::IDENTITY,
            clip: None,
            alpha: 1.0,
            composite: BlendMode::SourceOver,
        }
    }
}

/// An owned RGBA raster plus canvas-style drawing state.
///
/// All drawing calls take coordinates in the current user space and honor
/// the active transform, clip, global alpha, and composite operation.
/// Snapshot and pixel-read calls bypass the state and address device
/// pixels directly.
pub struct Surface {
    pixmap: Pixmap,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl Surface {
    /// Create a transparent surface of `width` x `height` device pixels.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::ZeroSized { width, height })?;
        Ok(Self {
            pixmap,
            state: DrawState::identity(),
            saved: Vec::new(),
        })
    }

    /// Width in device pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in device pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The full surface extent as a [`PixelRect`].
    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        PixelRect {
            x: 0,
            y: 0,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Access the underlying pixmap (premultiplied RGBA8).
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    // --- Drawing state ---

    /// Push the current drawing state.
    pub fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    /// Pop the most recently saved drawing state. No-op on an empty stack.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    /// The current user-space-to-device transform.
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.state.transform
    }

    /// Replace the current transform.
    pub fn set_transform(&mut self, transform: Affine) {
        self.state.transform = transform;
    }

    /// Reset the transform to identity.
    pub fn reset_transform(&mut self) {
        self.state.transform = Affine::IDENTITY;
    }

    /// The current global alpha.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.state.alpha
    }

    /// Set the global alpha, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    /// The current composite operation.
    #[must_use]
    pub fn composite(&self) -> BlendMode {
        self.state.composite
    }

    /// Set the composite operation for subsequent geometry drawing.
    pub fn set_composite(&mut self, composite: BlendMode) {
        self.state.composite = composite;
    }

    /// Clip subsequent drawing to `rect`, given in the current user space.
    ///
    /// The clip is resolved against the current transform immediately and
    /// then stays fixed in device space, so later transform changes inside
    /// the same saved scope do not move it.
    pub fn set_clip_rect(&mut self, rect: Rect) {
        let Some(mut mask) = Mask::new(self.width(), self.height()) else {
            return;
        };
        if let Some(r) = tiny_skia::Rect::from_ltrb(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        ) {
            let path = PathBuilder::from_rect(r);
            mask.fill_path(
                &path,
                FillRule::Winding,
                true,
                ts_transform(self.state.transform),
            );
        }
        // An invalid rect leaves the mask empty, clipping everything.
        self.state.clip = Some(mask);
    }

    /// Remove the active clip.
    pub fn clear_clip(&mut self) {
        self.state.clip = None;
    }

    // --- Whole-surface operations ---

    /// Clear every pixel to transparent. Ignores the drawing state.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Fill every pixel with `color`. Ignores the drawing state.
    pub fn fill_all(&mut self, color: Color) {
        self.pixmap.fill(ts_color(color, 1.0));
    }

    // --- Geometry drawing ---

    /// Fill an axis-aligned rectangle in user space.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(r) = tiny_skia::Rect::from_ltrb(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        ) else {
            return;
        };
        self.pixmap.fill_rect(
            r,
            &self.paint(color),
            ts_transform(self.state.transform),
            self.state.clip.as_ref(),
        );
    }

    /// Stroke the outline of an axis-aligned rectangle in user space.
    pub fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        let Some(r) = tiny_skia::Rect::from_ltrb(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        ) else {
            return;
        };
        let path = PathBuilder::from_rect(r);
        let stroke = Stroke {
            width: width.max(0.001) as f32,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &self.paint(color),
            &stroke,
            ts_transform(self.state.transform),
            self.state.clip.as_ref(),
        );
    }

    /// Stroke one round-capped segment of a paint stroke.
    ///
    /// A degenerate segment (both endpoints equal) is drawn as the round
    /// cap it would leave behind: a filled disk of radius `width / 2`.
    pub fn stroke_segment(&mut self, segment: Line, color: Color, width: f64) {
        let delta = segment.p1 - segment.p0;
        if delta.hypot() < 1e-12 {
            self.fill_disk(Circle::new(segment.p0, width.max(0.001) / 2.0), color);
            return;
        }
        let mut pb = PathBuilder::new();
        {
            pb.move_to(segment.p0.x as f32, segment.p0.y as f32);
            pb.line_to(segment.p1.x as f32, segment.p1.y as f32);
        }
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width: width.max(0.001) as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &self.paint(color),
            &stroke,
            ts_transform(self.state.transform),
            self.state.clip.as_ref(),
        );
    }

    /// Stroke the outline of a circle in user space.
    pub fn stroke_circle(&mut self, circle: Circle, color: Color, width: f64) {
        let mut pb = PathBuilder::new();
        pb.push_circle(
            circle.center.x as f32,
            circle.center.y as f32,
            circle.radius.max(0.0005) as f32,
        );
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width: width.max(0.001) as f32,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &self.paint(color),
            &stroke,
            ts_transform(self.state.transform),
            self.state.clip.as_ref(),
        );
    }

    /// Fill a disk in user space.
    pub fn fill_disk(&mut self, circle: Circle, color: Color) {
        let mut pb = PathBuilder::new();
        pb.push_circle(
            circle.center.x as f32,
            circle.center.y as f32,
            circle.radius.max(0.0005) as f32,
        );
        let Some(path) = pb.finish() else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &self.paint(color),
            FillRule::Winding,
            ts_transform(self.state.transform),
            self.state.clip.as_ref(),
        );
    }

    /// Composite another surface into this one.
    ///
    /// `local` maps the source surface's pixel space into the current user
    /// space; the active transform is applied on top. `opacity` multiplies
    /// the global alpha.
    pub fn draw_surface(
        &mut self,
        src: &Self,
        local: Affine,
        opacity: f32,
        blend: BlendMode,
        quality: FilterQuality,
    ) {
        let paint = PixmapPaint {
            opacity: (opacity * self.state.alpha).clamp(0.0, 1.0),
            blend_mode: blend,
            quality,
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            src.pixmap.as_ref(),
            &paint,
            ts_transform(self.state.transform * local),
            self.state.clip.as_ref(),
        );
    }

    /// Blit another surface into the user-space rectangle `dst`, scaling
    /// as needed.
    pub fn blit_rect(&mut self, src: &Self, dst: Rect) {
        if dst.width() <= 0.0 || dst.height() <= 0.0 {
            return;
        }
        let sx = dst.width() / f64::from(src.width());
        let sy = dst.height() / f64::from(src.height());
        let local = Affine::translate((dst.x0, dst.y0)) * Affine::scale_non_uniform(sx, sy);
        self.draw_surface(
            src,
            local,
            1.0,
            self.state.composite,
            FilterQuality::Bilinear,
        );
    }

    // --- Pixel access ---

    /// Read one device pixel, demultiplied. Out-of-range reads return
    /// fully transparent black.
    #[must_use]
    pub fn pixel(&self, x: i64, y: i64) -> PixelColor {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return PixelColor::transparent();
        }
        match self.pixmap.pixel(x as u32, y as u32) {
            Some(px) => {
                let c = px.demultiply();
                PixelColor::from_rgba8(c.red(), c.green(), c.blue(), c.alpha())
            }
            None => PixelColor::transparent(),
        }
    }

    /// Copy the whole surface into a [`Snapshot`].
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.read_region(self.bounds())
    }

    /// Copy `region` (clipped to the surface) into a [`Snapshot`].
    ///
    /// Returns `None` when the clipped region is empty.
    #[must_use]
    pub fn snapshot_region(&self, region: PixelRect) -> Option<Snapshot> {
        let clipped = region.intersect(&self.bounds())?;
        Some(self.read_region(clipped))
    }

    fn read_region(&self, region: PixelRect) -> Snapshot {
        let w = self.width() as usize;
        let data = self.pixmap.pixels();
        let mut pixels =
            Vec::with_capacity(region.width as usize * region.height as usize * 4);
        for y in region.y..region.max_y() {
            let row = y as usize * w;
            for x in region.x..region.max_x() {
                let c = data[row + x as usize].demultiply();
                pixels.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
            }
        }
        Snapshot::from_pixels_unchecked(region, pixels)
    }

    /// Write a snapshot's pixels back at its source position, verbatim.
    ///
    /// No blending is performed; destination pixels inside the (clipped)
    /// region are replaced. Ignores the drawing state.
    pub fn put_snapshot(&mut self, snapshot: &Snapshot) {
        let Some(target) = snapshot.region().intersect(&self.bounds()) else {
            return;
        };
        let region = snapshot.region();
        let src = snapshot.pixels();
        let src_row_bytes = region.width as usize * 4;
        let w = self.width() as usize;
        let data = self.pixmap.pixels_mut();
        for y in target.y..target.max_y() {
            let src_row = (y - region.y) as usize * src_row_bytes;
            let dst_row = y as usize * w;
            for x in target.x..target.max_x() {
                let s = src_row + (x - region.x) as usize * 4;
                let px = tiny_skia::ColorU8::from_rgba(src[s], src[s + 1], src[s + 2], src[s + 3]);
                data[dst_row + x as usize] = px.premultiply();
            }
        }
    }

    /// Clear `region` (or the whole surface for `None`) to transparent.
    ///
    /// This is the undo fallback when no pre-image snapshot exists.
    /// Ignores the drawing state.
    pub fn clear_region(&mut self, region: Option<PixelRect>) {
        let Some(region) = region else {
            self.clear();
            return;
        };
        let Some(target) = region.intersect(&self.bounds()) else {
            return;
        };
        let transparent = tiny_skia::ColorU8::from_rgba(0, 0, 0, 0).premultiply();
        let w = self.width() as usize;
        let data = self.pixmap.pixels_mut();
        for y in target.y..target.max_y() {
            let row = y as usize * w;
            for x in target.x..target.max_x() {
                data[row + x as usize] = transparent;
            }
        }
    }

    // --- Resizing ---

    /// A copy of this surface rescaled to `width` x `height` with bilinear
    /// filtering.
    pub fn resized_bilinear(&self, width: u32, height: u32) -> Result<Self, SurfaceError> {
        let mut dst = Self::new(width, height)?;
        let transform = Transform::from_scale(
            width as f32 / self.width() as f32,
            height as f32 / self.height() as f32,
        );
        dst.pixmap.draw_pixmap(
            0,
            0,
            self.pixmap.as_ref(),
            &PixmapPaint {
                opacity: 1.0,
                blend_mode: BlendMode::Source,
                quality: FilterQuality::Bilinear,
            },
            transform,
            None,
        );
        Ok(dst)
    }

    /// A copy of this surface cropped (or padded with transparency) to
    /// `width` x `height`, keeping the top-left corner.
    pub fn cropped(&self, width: u32, height: u32) -> Result<Self, SurfaceError> {
        let mut dst = Self::new(width, height)?;
        dst.pixmap.draw_pixmap(
            0,
            0,
            self.pixmap.as_ref(),
            &PixmapPaint {
                opacity: 1.0,
                blend_mode: BlendMode::Source,
                quality: FilterQuality::Nearest,
            },
            Transform::identity(),
            None,
        );
        Ok(dst)
    }

    // --- Interchange ---

    /// Build a surface from unpremultiplied row-major RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, pixels: &[u8]) -> Result<Self, ImageError> {
        if pixels.len() != width as usize * height as usize * 4 {
            return Err(ImageError::BufferSize {
                width,
                height,
                len: pixels.len(),
            });
        }
        let mut surface = Self::new(width, height)?;
        let data = surface.pixmap.pixels_mut();
        for (dst, src) in data.iter_mut().zip(pixels.chunks_exact(4)) {
            *dst = tiny_skia::ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(surface)
    }

    /// Decode a PNG stream into a surface.
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let mut decoder = png::Decoder::new(bytes);
        decoder.set_transformations(
            png::Transformations::ALPHA | png::Transformations::STRIP_16,
        );
        let mut reader = decoder.read_info()?;
        if reader.output_color_type() != (png::ColorType::Rgba, png::BitDepth::Eight) {
            return Err(ImageError::Format);
        }
        let mut buf = vec![0_u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());
        tracing::debug!(width = info.width, height = info.height, "decoded png source");
        Self::from_rgba8(info.width, info.height, &buf)
    }

    /// Encode the surface as a PNG stream (unpremultiplied RGBA8).
    pub fn encode_png(&self) -> Result<Vec<u8>, ImageError> {
        let snapshot = self.snapshot();
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(snapshot.pixels())?;
        }
        Ok(out)
    }

    fn paint(&self, color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(ts_color(color, self.state.alpha));
        paint.anti_alias = true;
        paint.blend_mode = self.state.composite;
        paint
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("saved_states", &self.saved.len())
            .finish()
    }
}

fn ts_transform(affine: Affine) -> Transform {
    let c = affine.as_coeffs();
    Transform::from_row(
        c[0] as f32,
        c[1] as f32,
        c[2] as f32,
        c[3] as f32,
        c[4] as f32,
        c[5] as f32,
    )
}

fn ts_color(color: Color, alpha: f32) -> tiny_skia::Color {
    let c = color.to_rgba8();
    let a = (f32::from(c.a) * alpha.clamp(0.0, 1.0)).round().clamp(0.0, 255.0);
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, a as u8)
}
