//! The rasterizer seam.
//!
//! Shapes never touch pixels directly: they describe what to draw through the
//! [`Rasterizer`] trait, passing an explicit [`Paint`] with every call. The
//! [`Raster`] type implements the trait on top of a `tiny-skia` pixmap and is
//! used for the render cache, exported images and the host's screen buffer.

use egui::{Pos2, Rect, Vec2};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Mask, Path, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use crate::color::Argb;
use crate::error::RasterError;
use crate::shape::PathOp;

/// How a primitive is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintStyle {
    Fill,
    Stroke { width: f32 },
}

/// Color and style for a single draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Argb,
    pub style: PaintStyle,
}

impl Paint {
    pub fn fill(color: Argb) -> Self {
        Self {
            color,
            style: PaintStyle::Fill,
        }
    }

    pub fn stroke(color: Argb, width: f32) -> Self {
        Self {
            color,
            style: PaintStyle::Stroke { width },
        }
    }
}

/// Drawing primitives provided by a rendering backend.
///
/// Coordinates are in canvas space; the current translation maps them onto
/// the target and the current clip limits what is touched.
pub trait Rasterizer {
    fn set_translation(&mut self, offset: Vec2);

    fn set_clip(&mut self, clip: Option<Rect>);

    fn draw_rect(&mut self, rect: Rect, paint: Paint);

    fn draw_oval(&mut self, rect: Rect, paint: Paint);

    fn draw_line(&mut self, from: Pos2, to: Pos2, paint: Paint);

    fn draw_path(&mut self, ops: &[PathOp], paint: Paint);

    /// Composites `raster` with its top-left corner at `origin`.
    fn draw_raster(&mut self, raster: &Raster, origin: Pos2);
}

/// An owned RGBA pixel buffer that can be drawn into.
#[derive(Clone)]
pub struct Raster {
    pixmap: Pixmap,
    translation: Vec2,
    clip: Option<Mask>,
    anti_alias: bool,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("translation", &self.translation)
            .field("clipped", &self.clip.is_some())
            .finish()
    }
}

impl Raster {
    /// Allocates a fully transparent raster.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(RasterError::InvalidDimensions { width, height })?;
        Ok(Self {
            pixmap,
            translation: Vec2::ZERO,
            clip: None,
            anti_alias: true,
        })
    }

    /// Allocates a raster filled with `color`.
    pub fn filled(width: u32, height: u32, color: Argb) -> Result<Self, RasterError> {
        let mut raster = Self::new(width, height)?;
        raster.erase(color);
        Ok(raster)
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    pub fn set_anti_alias(&mut self, anti_alias: bool) {
        self.anti_alias = anti_alias;
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width() as usize, self.height() as usize]
    }

    /// Overwrites every pixel with `color`, ignoring translation and clip.
    pub fn erase(&mut self, color: Argb) {
        self.pixmap.fill(color.to_skia());
    }

    /// Premultiplied RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Unpremultiplied color at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Argb> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some(Argb::from_argb(
            color.alpha(),
            color.red(),
            color.green(),
            color.blue(),
        ))
    }

    /// Builds a raster from straight (unpremultiplied) RGBA bytes.
    pub fn from_rgba_unmultiplied(width: u32, height: u32, rgba: &[u8]) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        let mut raster = Self::new(width, height)?;
        for (dst, src) in raster.pixmap.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
            *dst = tiny_skia::ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(raster)
    }

    pub fn from_rgba_image(image: &image::RgbaImage) -> Result<Self, RasterError> {
        let (width, height) = image.dimensions();
        Self::from_rgba_unmultiplied(width, height, image.as_raw())
    }

    /// Converts to an `image` buffer with straight alpha, ready for encoding.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut bytes = Vec::with_capacity(self.data().len());
        for pixel in self.pixmap.pixels() {
            let color = pixel.demultiply();
            bytes.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        image::RgbaImage::from_raw(self.width(), self.height(), bytes)
            .unwrap_or_else(|| image::RgbaImage::new(self.width(), self.height()))
    }

    /// Converts to an egui image for uploading as a texture.
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_premultiplied(self.size(), self.data())
    }

    fn transform(&self) -> Transform {
        Transform::from_translate(self.translation.x, self.translation.y)
    }

    fn skia_paint(&self, color: Argb) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = self.anti_alias;
        paint
    }

    fn paint_path(&mut self, path: &Path, paint: Paint) {
        let transform = self.transform();
        let skia_paint = self.skia_paint(paint.color);
        match paint.style {
            PaintStyle::Fill => {
                self.pixmap
                    .fill_path(path, &skia_paint, FillRule::Winding, transform, self.clip.as_ref());
            }
            PaintStyle::Stroke { width } => {
                let stroke = Stroke {
                    width,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..Stroke::default()
                };
                self.pixmap
                    .stroke_path(path, &skia_paint, &stroke, transform, self.clip.as_ref());
            }
        }
    }
}

fn skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(rect.min.x, rect.min.y, rect.max.x, rect.max.y)
}

fn build_path(ops: &[PathOp]) -> Option<Path> {
    let mut builder = PathBuilder::new();
    for op in ops {
        match *op {
            PathOp::MoveTo(p) => builder.move_to(p.x, p.y),
            PathOp::LineTo(p) => builder.line_to(p.x, p.y),
            PathOp::QuadTo { control, end } => builder.quad_to(control.x, control.y, end.x, end.y),
            PathOp::CubicTo {
                control1,
                control2,
                end,
            } => builder.cubic_to(
                control1.x, control1.y, control2.x, control2.y, end.x, end.y,
            ),
            PathOp::Close => builder.close(),
        }
    }
    builder.finish()
}

impl Rasterizer for Raster {
    fn set_translation(&mut self, offset: Vec2) {
        self.translation = offset;
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = None;
        let Some(rect) = clip else {
            return;
        };
        // A clip covering the whole raster needs no mask.
        let full = Rect::from_min_size(Pos2::ZERO, egui::vec2(self.width() as f32, self.height() as f32));
        if rect.translate(self.translation).contains_rect(full) {
            return;
        }
        let Some(path) = skia_rect(rect).map(PathBuilder::from_rect) else {
            return;
        };
        if let Some(mut mask) = Mask::new(self.width(), self.height()) {
            mask.fill_path(&path, FillRule::Winding, false, self.transform());
            self.clip = Some(mask);
        }
    }

    fn draw_rect(&mut self, rect: Rect, paint: Paint) {
        if let Some(path) = skia_rect(rect).map(PathBuilder::from_rect) {
            self.paint_path(&path, paint);
        }
    }

    fn draw_oval(&mut self, rect: Rect, paint: Paint) {
        if let Some(path) = skia_rect(rect).and_then(PathBuilder::from_oval) {
            self.paint_path(&path, paint);
        }
    }

    fn draw_line(&mut self, from: Pos2, to: Pos2, paint: Paint) {
        let ops = [PathOp::MoveTo(from), PathOp::LineTo(to)];
        self.draw_path(&ops, paint);
    }

    fn draw_path(&mut self, ops: &[PathOp], paint: Paint) {
        if let Some(path) = build_path(ops) {
            self.paint_path(&path, paint);
        }
    }

    fn draw_raster(&mut self, raster: &Raster, origin: Pos2) {
        self.pixmap.draw_pixmap(
            origin.x.round() as i32,
            origin.y.round() as i32,
            raster.pixmap.as_ref(),
            &PixmapPaint::default(),
            self.transform(),
            self.clip.as_ref(),
        );
    }
}
