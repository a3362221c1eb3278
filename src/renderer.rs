//! Frame composition and the incremental render cache.
//!
//! Committed shapes are baked into a cache raster sized to the drawable
//! area. `baked` counts how many shapes of the history are already in the
//! cache; a stale cache is advanced by drawing only the shapes past that
//! count. A full rebuild replays everything and only happens on structural
//! changes (undo, clear, restore, explicit request).

use egui::{Pos2, Rect, Vec2};

use crate::canvas::CanvasTransform;
use crate::color::Argb;
use crate::error::RasterError;
use crate::raster::{Paint, Raster, Rasterizer};
use crate::shape::Shape;

/// Raster holding the committed shapes that have already been drawn.
#[derive(Debug, Clone)]
pub struct RenderCache {
    raster: Raster,
    baked: usize,
    needs_rebuild: bool,
}

impl RenderCache {
    pub fn new(width: u32, height: u32, anti_alias: bool) -> Result<Self, RasterError> {
        Ok(Self {
            raster: Raster::new(width, height)?.with_anti_alias(anti_alias),
            baked: 0,
            needs_rebuild: false,
        })
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Number of committed shapes already drawn into the cache
    pub fn baked(&self) -> usize {
        self.baked
    }

    /// Force a full replay at the next `sync`
    pub fn invalidate(&mut self) {
        self.needs_rebuild = true;
    }

    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild
    }

    pub fn is_stale(&self, shapes: &[Shape]) -> bool {
        self.needs_rebuild || self.baked != shapes.len()
    }

    /// Bring the cache up to date with `shapes`, drawing only what is new.
    pub fn sync(&mut self, shapes: &[Shape]) {
        if self.needs_rebuild || self.baked > shapes.len() {
            self.rebuild(shapes);
            return;
        }
        if self.baked == shapes.len() {
            return;
        }
        log::debug!("Baking shapes {}..{} into cache", self.baked, shapes.len());
        for shape in &shapes[self.baked..] {
            shape.draw(&mut self.raster);
        }
        self.baked = shapes.len();
    }

    /// Clear the cache and replay every shape.
    pub fn rebuild(&mut self, shapes: &[Shape]) {
        log::debug!("Rebuilding render cache with {} shapes", shapes.len());
        self.raster.erase(Argb::TRANSPARENT);
        for shape in shapes {
            shape.draw(&mut self.raster);
        }
        self.baked = shapes.len();
        self.needs_rebuild = false;
    }
}

/// Owns the background and the render cache and composes frames from them.
#[derive(Debug)]
pub struct Renderer {
    cache: Option<RenderCache>,
    background: Option<Raster>,
    background_color: Argb,
    anti_alias: bool,
}

impl Renderer {
    pub fn new(background_color: Argb, anti_alias: bool) -> Self {
        Self {
            cache: None,
            background: None,
            background_color,
            anti_alias,
        }
    }

    /// Allocate a cache for a drawable area of the given size. The new cache
    /// is rebuilt from the history on the next frame.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RasterError> {
        let mut cache = RenderCache::new(width, height, self.anti_alias)?;
        cache.invalidate();
        self.cache = Some(cache);
        Ok(())
    }

    pub fn cache(&self) -> Option<&RenderCache> {
        self.cache.as_ref()
    }

    pub fn background(&self) -> Option<&Raster> {
        self.background.as_ref()
    }

    pub fn background_color(&self) -> Argb {
        self.background_color
    }

    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }

    pub fn set_background(&mut self, background: Raster) {
        self.background = Some(background);
        self.invalidate();
    }

    /// Blank the background raster, if there is one, to the background color.
    pub fn reset_background(&mut self) {
        if let Some(background) = self.background.as_mut() {
            background.erase(self.background_color);
        }
    }

    pub fn invalidate(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.invalidate();
        }
    }

    pub fn sync(&mut self, shapes: &[Shape]) {
        if let Some(cache) = self.cache.as_mut() {
            cache.sync(shapes);
        }
    }

    pub fn rebuild(&mut self, shapes: &[Shape]) {
        if let Some(cache) = self.cache.as_mut() {
            cache.rebuild(shapes);
        }
    }

    /// Draws one frame onto `target`: background, cached shapes, then the
    /// in-progress shape on top. Does nothing before a drawable size is set.
    pub fn render_frame(
        &mut self,
        target: &mut dyn Rasterizer,
        canvas: &CanvasTransform,
        shapes: &[Shape],
        in_progress: Option<&Shape>,
    ) {
        let Some(cache) = self.cache.as_mut() else {
            return;
        };
        target.set_translation(canvas.position());
        target.set_clip(Some(canvas.bounds()));

        draw_background(target, self.background.as_ref(), self.background_color, canvas.bounds());
        cache.sync(shapes);
        target.draw_raster(cache.raster(), Pos2::ZERO);
        if let Some(shape) = in_progress {
            shape.draw(target);
        }

        target.set_clip(None);
        target.set_translation(Vec2::ZERO);
    }

    /// A fresh raster of the background with every shape drawn in order.
    /// The cache is neither read nor touched.
    pub fn export(&self, bounds: Rect, shapes: &[Shape]) -> Result<Raster, RasterError> {
        let mut raster = Raster::new(bounds.width() as u32, bounds.height() as u32)?
            .with_anti_alias(self.anti_alias);
        match self.background.as_ref() {
            Some(background) => raster.draw_raster(background, Pos2::ZERO),
            None => raster.erase(self.background_color),
        }
        for shape in shapes {
            shape.draw(&mut raster);
        }
        Ok(raster)
    }
}

fn draw_background(target: &mut dyn Rasterizer, background: Option<&Raster>, color: Argb, bounds: Rect) {
    match background {
        Some(raster) => target.draw_raster(raster, Pos2::ZERO),
        None => target.draw_rect(bounds, Paint::fill(color)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;
    use crate::tool::ToolProperties;
    use egui::pos2;

    fn rect_shape(from: Pos2, to: Pos2, fill: Argb) -> Shape {
        let mut props = ToolProperties::new(ShapeKind::Rectangle);
        props.fill_color = fill;
        props.stroke_color = Argb::TRANSPARENT;
        let mut shape = Shape::begin(&props, from, Argb::WHITE);
        shape.extend(from, to);
        shape
    }

    #[test]
    fn test_sync_advances_baked_count() {
        let mut cache = RenderCache::new(20, 20, false).unwrap();
        let mut shapes = vec![rect_shape(pos2(0.0, 0.0), pos2(5.0, 5.0), Argb::RED)];
        assert!(cache.is_stale(&shapes));
        cache.sync(&shapes);
        assert_eq!(cache.baked(), 1);

        shapes.push(rect_shape(pos2(10.0, 10.0), pos2(15.0, 15.0), Argb::BLUE));
        cache.sync(&shapes);
        assert_eq!(cache.baked(), 2);
        assert_eq!(cache.raster().pixel(2, 2), Some(Argb::RED));
        assert_eq!(cache.raster().pixel(12, 12), Some(Argb::BLUE));
    }

    #[test]
    fn test_shrunk_history_forces_rebuild() {
        let mut cache = RenderCache::new(20, 20, false).unwrap();
        let shapes = vec![
            rect_shape(pos2(0.0, 0.0), pos2(5.0, 5.0), Argb::RED),
            rect_shape(pos2(10.0, 10.0), pos2(15.0, 15.0), Argb::BLUE),
        ];
        cache.sync(&shapes);
        cache.sync(&shapes[..1]);
        assert_eq!(cache.baked(), 1);
        assert_eq!(cache.raster().pixel(12, 12), Some(Argb::TRANSPARENT));
    }

    #[test]
    fn test_render_before_resize_draws_nothing() {
        let mut renderer = Renderer::new(Argb::WHITE, false);
        let mut target = Raster::new(10, 10).unwrap();
        renderer.render_frame(&mut target, &CanvasTransform::new(40.0), &[], None);
        assert_eq!(target.pixel(5, 5), Some(Argb::TRANSPARENT));
    }

    #[test]
    fn test_frame_matches_export() {
        let mut renderer = Renderer::new(Argb::WHITE, false);
        renderer.resize(30, 20).unwrap();
        let mut canvas = CanvasTransform::new(40.0);
        canvas.set_drawable_size(30, 20, 20.0);
        let shapes = vec![
            rect_shape(pos2(2.0, 2.0), pos2(12.0, 12.0), Argb::RED),
            rect_shape(pos2(8.0, 8.0), pos2(25.0, 18.0), Argb::GREEN),
        ];

        let mut frame = Raster::new(30, 20).unwrap().with_anti_alias(false);
        renderer.render_frame(&mut frame, &canvas, &shapes, None);
        let export = renderer.export(canvas.bounds(), &shapes).unwrap();
        assert_eq!(frame.data(), export.data());
    }

    #[test]
    fn test_frame_is_translated_and_clipped() {
        let mut renderer = Renderer::new(Argb::WHITE, false);
        renderer.resize(10, 10).unwrap();
        let mut canvas = CanvasTransform::new(40.0);
        canvas.set_drawable_size(10, 10, 10.0);
        canvas.pan_by(Vec2::new(5.0, 0.0));
        let in_progress = rect_shape(pos2(0.0, 0.0), pos2(30.0, 10.0), Argb::BLACK);

        let mut frame = Raster::new(30, 10).unwrap().with_anti_alias(false);
        renderer.render_frame(&mut frame, &canvas, &[], Some(&in_progress));
        assert_eq!(frame.pixel(2, 5), Some(Argb::TRANSPARENT));
        assert_eq!(frame.pixel(7, 5), Some(Argb::BLACK));
        assert_eq!(frame.pixel(20, 5), Some(Argb::TRANSPARENT));
    }

    #[test]
    fn test_reset_background_blanks_to_color() {
        let mut renderer = Renderer::new(Argb::WHITE, false);
        renderer.set_background(Raster::filled(4, 4, Argb::BLUE).unwrap());
        renderer.reset_background();
        assert_eq!(renderer.background().and_then(|b| b.pixel(1, 1)), Some(Argb::WHITE));
    }
}
