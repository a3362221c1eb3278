use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::color::Argb;
use crate::error::{PathParseError, PersistenceError, PersistenceResult};
use crate::shape::{BoxShape, FreehandPath, PathShape, Shape, ShapeKind};
use crate::tool::ToolProperties;

/// A freehand shape stored as its path string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPath {
    pub path: String,
    pub stroke_color: Argb,
    pub stroke_width: f32,
}

impl RawPath {
    pub fn from_path_shape(shape: &PathShape) -> Self {
        Self {
            path: shape.path_string(),
            stroke_color: shape.stroke_color,
            stroke_width: shape.stroke_width,
        }
    }

    pub fn to_path_shape(&self) -> Result<PathShape, PathParseError> {
        let path = FreehandPath::parse(&self.path)?;
        Ok(PathShape::new(path, self.stroke_color, self.stroke_width))
    }
}

/// Serialized form of a committed shape. Freehand shapes are kept in their
/// raw string form and decoded when the project is restored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ShapeRecord {
    Rectangle(BoxShape),
    Oval(BoxShape),
    Line(BoxShape),
    Triangle(BoxShape),
    Heart(BoxShape),
    BrushRaw(RawPath),
    EraserRaw(RawPath),
}

impl ShapeRecord {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeRecord::Rectangle(_) => ShapeKind::Rectangle,
            ShapeRecord::Oval(_) => ShapeKind::Oval,
            ShapeRecord::Line(_) => ShapeKind::Line,
            ShapeRecord::Triangle(_) => ShapeKind::Triangle,
            ShapeRecord::Heart(_) => ShapeKind::Heart,
            ShapeRecord::BrushRaw(_) => ShapeKind::Brush,
            ShapeRecord::EraserRaw(_) => ShapeKind::Eraser,
        }
    }
}

impl From<&Shape> for ShapeRecord {
    fn from(shape: &Shape) -> Self {
        match shape {
            Shape::Rectangle(b) => ShapeRecord::Rectangle(*b),
            Shape::Oval(b) => ShapeRecord::Oval(*b),
            Shape::Line(b) => ShapeRecord::Line(*b),
            Shape::Triangle(b) => ShapeRecord::Triangle(*b),
            Shape::Heart(b) => ShapeRecord::Heart(*b),
            Shape::Brush(p) => ShapeRecord::BrushRaw(RawPath::from_path_shape(p)),
            Shape::Eraser(p) => ShapeRecord::EraserRaw(RawPath::from_path_shape(p)),
        }
    }
}

impl TryFrom<&ShapeRecord> for Shape {
    type Error = PathParseError;

    fn try_from(record: &ShapeRecord) -> Result<Self, Self::Error> {
        Ok(match record {
            ShapeRecord::Rectangle(b) => Shape::Rectangle(*b),
            ShapeRecord::Oval(b) => Shape::Oval(*b),
            ShapeRecord::Line(b) => Shape::Line(*b),
            ShapeRecord::Triangle(b) => Shape::Triangle(*b),
            ShapeRecord::Heart(b) => Shape::Heart(*b),
            ShapeRecord::BrushRaw(raw) => Shape::Brush(raw.to_path_shape()?),
            ShapeRecord::EraserRaw(raw) => Shape::Eraser(raw.to_path_shape()?),
        })
    }
}

/// A saved drawing: the committed shapes and the tool configuration.
/// Pixels are not stored; they are re-rendered from the shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Version of the crate that wrote the snapshot
    pub version: String,
    pub shapes: Vec<ShapeRecord>,
    pub tools: Vec<ToolProperties>,
    pub selected_tool: ShapeKind,
}

impl ProjectSnapshot {
    pub fn new(shapes: &[Shape], tools: &[ToolProperties], selected_tool: ShapeKind) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            shapes: shapes.iter().map(ShapeRecord::from).collect(),
            tools: tools.to_vec(),
            selected_tool,
        }
    }

    /// Decode every record. Fails on the first corrupt path without
    /// returning a partial list.
    pub fn decode_shapes(&self) -> PersistenceResult<Vec<Shape>> {
        if self.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Snapshot version {} differs from current version {}",
                self.version,
                env!("CARGO_PKG_VERSION")
            );
        }
        self.shapes
            .iter()
            .enumerate()
            .map(|(index, record)| {
                Shape::try_from(record).map_err(|source| PersistenceError::CorruptPath { index, source })
            })
            .collect()
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> PersistenceResult<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_json()?)?;
        log::info!("Saved {} shapes to {}", self.shapes.len(), path.display());
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        let json = fs::read_to_string(path.as_ref()).map_err(|e| PersistenceError::ReadError(e.to_string()))?;
        Self::from_json(&json)
    }
}
