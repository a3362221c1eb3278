use egui::{Pos2, Rect, Vec2, pos2};

use crate::geometry;

/// Maps between screen space (pointer input) and canvas space (shape
/// geometry) and tracks the drawable area.
///
/// `screen = canvas + position`. Only translation is modelled.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasTransform {
    position: Vec2,
    bounds: Rect,
    admissible: Rect,
    margin: f32,
}

impl CanvasTransform {
    /// `margin` is in pixels, already scaled for the display density.
    pub fn new(margin: f32) -> Self {
        let bounds = Rect::from_min_max(Pos2::ZERO, Pos2::ZERO);
        Self {
            position: Vec2::ZERO,
            bounds,
            admissible: geometry::expand(bounds, margin),
            margin,
        }
    }

    /// Fixes the drawable rectangle at the canvas origin, recomputes the
    /// admissible rectangle and vertically centers the drawable area in a
    /// viewport of `viewport_height`.
    pub fn set_drawable_size(&mut self, width: u32, height: u32, viewport_height: f32) {
        self.bounds = Rect::from_min_max(Pos2::ZERO, pos2(width as f32, height as f32));
        self.admissible = geometry::expand(self.bounds, self.margin);
        let top = viewport_height / 2.0 - (height / 2) as f32;
        self.position = Vec2::new(0.0, top);
    }

    pub fn screen_to_canvas(&self, screen: Pos2) -> Pos2 {
        screen - self.position
    }

    pub fn canvas_to_screen(&self, canvas: Pos2) -> Pos2 {
        canvas + self.position
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Whether a shape may start at this screen-space point.
    pub fn is_admissible(&self, screen: Pos2) -> bool {
        geometry::strictly_contains(self.admissible, self.screen_to_canvas(screen))
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn admissible_rect(&self) -> Rect {
        self.admissible
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }
}
