use egui::Pos2;
use std::fmt::Write as _;

use crate::error::PathParseError;
use crate::geometry;

/// A single drawing operation understood by the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Pos2),
    LineTo(Pos2),
    QuadTo { control: Pos2, end: Pos2 },
    CubicTo { control1: Pos2, control2: Pos2, end: Pos2 },
    Close,
}

/// One smoothed quadratic piece of a freehand path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadSegment {
    pub control: Pos2,
    pub end: Pos2,
}

/// A freehand curve: a start point followed by quadratic segments.
///
/// This op-list is the only stored form of a brush or eraser stroke. The
/// renderable ops and the persisted string are both derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct FreehandPath {
    start: Pos2,
    segments: Vec<QuadSegment>,
}

impl FreehandPath {
    pub fn new(start: Pos2) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    pub fn quad_to(&mut self, control: Pos2, end: Pos2) {
        self.segments.push(QuadSegment { control, end });
    }

    /// Appends the smoothing segment for a pointer moving from `previous` to
    /// `current`: the previous sample becomes the control point and the curve
    /// ends halfway between the two samples.
    pub fn smooth_to(&mut self, previous: Pos2, current: Pos2) {
        self.quad_to(previous, geometry::midpoint(previous, current));
    }

    pub fn start(&self) -> Pos2 {
        self.start
    }

    pub fn segments(&self) -> &[QuadSegment] {
        &self.segments
    }

    /// Renderable ops. The zero-length line after the move makes a single tap
    /// leave a round dot.
    pub fn ops(&self) -> Vec<PathOp> {
        let mut ops = Vec::with_capacity(self.segments.len() + 2);
        ops.push(PathOp::MoveTo(self.start));
        ops.push(PathOp::LineTo(self.start));
        ops.extend(self.segments.iter().map(|segment| PathOp::QuadTo {
            control: segment.control,
            end: segment.end,
        }));
        ops
    }

    /// Encodes as `M x,y` followed by ` Qcx,cy ex,ey` per segment.
    pub fn to_path_string(&self) -> String {
        let mut out = String::with_capacity(16 + self.segments.len() * 24);
        let _ = write!(out, "M{},{}", self.start.x, self.start.y);
        for segment in &self.segments {
            let _ = write!(
                out,
                " Q{},{} {},{}",
                segment.control.x, segment.control.y, segment.end.x, segment.end.y
            );
        }
        out
    }

    /// Decodes a string produced by [`FreehandPath::to_path_string`].
    ///
    /// Corrupt input is an error; nothing is partially recovered.
    pub fn parse(input: &str) -> Result<Self, PathParseError> {
        let mut parser = Parser { input, offset: 0 };

        parser.skip_whitespace();
        if !parser.eat('M') {
            return Err(PathParseError::MissingMoveTo);
        }
        parser.skip_whitespace();
        if parser.at_end() {
            return Err(PathParseError::MissingStartPoint);
        }
        let mut path = FreehandPath::new(parser.point()?);

        loop {
            parser.skip_whitespace();
            let Some(next) = parser.peek() else {
                break;
            };
            if next != 'Q' {
                return Err(PathParseError::UnexpectedToken {
                    offset: parser.offset,
                    found: next,
                });
            }
            parser.offset += 1;
            parser.skip_whitespace();
            let control = parser.point()?;
            parser.skip_whitespace();
            let end = parser.point()?;
            path.quad_to(control, end);
        }

        Ok(path)
    }
}

struct Parser<'a> {
    input: &'a str,
    offset: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.input[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.offset >= self.input.len()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.offset += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.offset += rest.len() - rest.trim_start().len();
    }

    fn number(&mut self) -> Result<f32, PathParseError> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(PathParseError::ExpectedPoint(self.offset));
        }
        let token = &rest[..len];
        let value = token
            .parse::<f32>()
            .map_err(|_| PathParseError::InvalidNumber(token.to_string()))?;
        if !value.is_finite() {
            return Err(PathParseError::InvalidNumber(token.to_string()));
        }
        self.offset += len;
        Ok(value)
    }

    fn point(&mut self) -> Result<Pos2, PathParseError> {
        let x = self.number()?;
        if !self.eat(',') {
            return Err(PathParseError::ExpectedPoint(self.offset));
        }
        let y = self.number()?;
        Ok(Pos2::new(x, y))
    }
}
