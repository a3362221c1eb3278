use egui::{Pos2, pos2};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::Argb;
use crate::geometry;
use crate::raster::{Paint, Rasterizer};
use crate::tool::ToolProperties;

mod path;

pub use path::{FreehandPath, PathOp, QuadSegment};

/// The drawable shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Oval,
    Line,
    Brush,
    Eraser,
    Triangle,
    Heart,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Rectangle,
        ShapeKind::Oval,
        ShapeKind::Line,
        ShapeKind::Brush,
        ShapeKind::Eraser,
        ShapeKind::Triangle,
        ShapeKind::Heart,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Oval => "Oval",
            ShapeKind::Line => "Line",
            ShapeKind::Brush => "Brush",
            ShapeKind::Eraser => "Eraser",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Heart => "Heart",
        }
    }

    /// Freehand kinds accumulate a curve instead of tracking a bounding box.
    pub fn is_freehand(self) -> bool {
        matches!(self, ShapeKind::Brush | ShapeKind::Eraser)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Colors and width a shape was created with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub fill_color: Argb,
    pub stroke_color: Argb,
    pub stroke_width: f32,
}

impl From<&ToolProperties> for ShapeStyle {
    fn from(props: &ToolProperties) -> Self {
        Self {
            fill_color: props.fill_color,
            stroke_color: props.stroke_color,
            stroke_width: props.stroke_width,
        }
    }
}

/// Geometry spanned by two corners of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    pub start: Pos2,
    pub end: Pos2,
    pub style: ShapeStyle,
}

impl BoxShape {
    pub fn new(start: Pos2, end: Pos2, style: ShapeStyle) -> Self {
        Self { start, end, style }
    }

    fn fill_then_stroke(&self, target: &mut dyn Rasterizer, mut draw: impl FnMut(&mut dyn Rasterizer, Paint)) {
        if !self.style.fill_color.is_transparent() {
            draw(target, Paint::fill(self.style.fill_color));
        }
        if !self.style.stroke_color.is_transparent() {
            draw(target, Paint::stroke(self.style.stroke_color, self.style.stroke_width));
        }
    }
}

/// A freehand stroke. Never filled.
#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    pub path: FreehandPath,
    pub stroke_color: Argb,
    pub stroke_width: f32,
}

impl PathShape {
    pub fn new(path: FreehandPath, stroke_color: Argb, stroke_width: f32) -> Self {
        Self {
            path,
            stroke_color,
            stroke_width,
        }
    }

    pub fn path_string(&self) -> String {
        self.path.to_path_string()
    }
}

/// A committed or in-progress shape. The variant is the shape's kind and is
/// fixed for its lifetime.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle(BoxShape),
    Oval(BoxShape),
    Line(BoxShape),
    Triangle(BoxShape),
    Heart(BoxShape),
    Brush(PathShape),
    /// Paints the background color over existing pixels.
    Eraser(PathShape),
}

impl Shape {
    /// Creates the shape for `props.shape_type` seeded at canvas-space point
    /// `at`. Erasers paint with `background`, whatever the tool's stroke color.
    pub fn begin(props: &ToolProperties, at: Pos2, background: Argb) -> Self {
        let style = ShapeStyle::from(props);
        let boxed = BoxShape::new(at, at, style);
        match props.shape_type {
            ShapeKind::Rectangle => Shape::Rectangle(boxed),
            ShapeKind::Oval => Shape::Oval(boxed),
            ShapeKind::Line => Shape::Line(boxed),
            ShapeKind::Triangle => Shape::Triangle(boxed),
            ShapeKind::Heart => Shape::Heart(boxed),
            ShapeKind::Brush => Shape::Brush(PathShape::new(
                FreehandPath::new(at),
                props.stroke_color,
                props.stroke_width,
            )),
            ShapeKind::Eraser => {
                Shape::Eraser(PathShape::new(FreehandPath::new(at), background, props.stroke_width))
            }
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Oval(_) => ShapeKind::Oval,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Triangle(_) => ShapeKind::Triangle,
            Shape::Heart(_) => ShapeKind::Heart,
            Shape::Brush(_) => ShapeKind::Brush,
            Shape::Eraser(_) => ShapeKind::Eraser,
        }
    }

    pub fn fill_color(&self) -> Argb {
        match self {
            Shape::Rectangle(b) | Shape::Oval(b) | Shape::Line(b) | Shape::Triangle(b) | Shape::Heart(b) => {
                b.style.fill_color
            }
            Shape::Brush(_) | Shape::Eraser(_) => Argb::TRANSPARENT,
        }
    }

    pub fn stroke_color(&self) -> Argb {
        match self {
            Shape::Rectangle(b) | Shape::Oval(b) | Shape::Line(b) | Shape::Triangle(b) | Shape::Heart(b) => {
                b.style.stroke_color
            }
            Shape::Brush(p) | Shape::Eraser(p) => p.stroke_color,
        }
    }

    pub fn stroke_width(&self) -> f32 {
        match self {
            Shape::Rectangle(b) | Shape::Oval(b) | Shape::Line(b) | Shape::Triangle(b) | Shape::Heart(b) => {
                b.style.stroke_width
            }
            Shape::Brush(p) | Shape::Eraser(p) => p.stroke_width,
        }
    }

    /// Updates in-progress geometry for a pointer that moved from `previous`
    /// to `current` (both canvas space). Box shapes track `current` as their
    /// end corner; freehand shapes append a smoothing segment.
    pub fn extend(&mut self, previous: Pos2, current: Pos2) {
        match self {
            Shape::Rectangle(b) | Shape::Oval(b) | Shape::Line(b) | Shape::Triangle(b) | Shape::Heart(b) => {
                b.end = current;
            }
            Shape::Brush(p) | Shape::Eraser(p) => p.path.smooth_to(previous, current),
        }
    }

    /// Issues the draw calls for this shape. Fill comes before stroke, and a
    /// transparent fill or stroke produces no call at all.
    pub fn draw(&self, target: &mut dyn Rasterizer) {
        match self {
            Shape::Rectangle(b) => {
                let rect = geometry::box_from_corners(b.start, b.end);
                b.fill_then_stroke(target, |t, paint| t.draw_rect(rect, paint));
            }
            Shape::Oval(b) => {
                let rect = geometry::box_from_corners(b.start, b.end);
                b.fill_then_stroke(target, |t, paint| t.draw_oval(rect, paint));
            }
            Shape::Line(b) => {
                if !b.style.stroke_color.is_transparent() {
                    target.draw_line(
                        b.start,
                        b.end,
                        Paint::stroke(b.style.stroke_color, b.style.stroke_width),
                    );
                }
            }
            Shape::Triangle(b) => {
                let ops = triangle_ops(b.start, b.end);
                b.fill_then_stroke(target, |t, paint| t.draw_path(&ops, paint));
            }
            Shape::Heart(b) => {
                let ops = heart_ops(b.start, b.end);
                b.fill_then_stroke(target, |t, paint| t.draw_path(&ops, paint));
            }
            Shape::Brush(p) => {
                if !p.stroke_color.is_transparent() {
                    target.draw_path(&p.path.ops(), Paint::stroke(p.stroke_color, p.stroke_width));
                }
            }
            Shape::Eraser(p) => {
                target.draw_path(&p.path.ops(), Paint::stroke(p.stroke_color, p.stroke_width));
            }
        }
    }
}

/// Closed triangle inscribed in the box: apex at the middle of the top edge,
/// base along the bottom edge.
pub fn triangle_ops(start: Pos2, end: Pos2) -> [PathOp; 4] {
    let apex = pos2((end.x - start.x) / 2.0 + start.x, start.y);
    [
        PathOp::MoveTo(apex),
        PathOp::LineTo(pos2(end.x, end.y)),
        PathOp::LineTo(pos2(start.x, end.y)),
        PathOp::Close,
    ]
}

/// Two mirrored cubic lobes meeting at the top center and the bottom center
/// of the box. The subpaths are left open; filling closes them.
pub fn heart_ops(start: Pos2, end: Pos2) -> [PathOp; 4] {
    let d = end - start;
    let top = pos2(start.x + d.x / 2.0, start.y + d.y * 0.3);
    [
        PathOp::MoveTo(top),
        PathOp::CubicTo {
            control1: pos2(start.x + d.x * 0.3, start.y),
            control2: pos2(start.x, start.y + d.y * 0.5),
            end: pos2(start.x + d.x * 0.5, end.y),
        },
        PathOp::MoveTo(top),
        PathOp::CubicTo {
            control1: pos2(end.x - d.x * 0.3, start.y),
            control2: pos2(end.x, start.y + d.y * 0.5),
            end: pos2(end.x - d.x * 0.5, end.y),
        },
    ]
}
