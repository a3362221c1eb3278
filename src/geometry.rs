use egui::{Pos2, Rect, Vec2};

/// Point halfway between `a` and `b`.
pub fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Normalized rectangle spanned by two opposite corners given in any order.
pub fn box_from_corners(start: Pos2, end: Pos2) -> Rect {
    Rect::from_two_pos(start, end)
}

/// Expands `rect` by `margin` on every side.
pub fn expand(rect: Rect, margin: f32) -> Rect {
    rect.expand2(Vec2::splat(margin))
}

/// Strict containment: points on any edge are outside.
pub fn strictly_contains(rect: Rect, point: Pos2) -> bool {
    point.x > rect.min.x && point.x < rect.max.x && point.y > rect.min.y && point.y < rect.max.y
}
