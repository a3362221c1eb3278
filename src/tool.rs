use serde::{Deserialize, Serialize};

use crate::color::Argb;
use crate::shape::ShapeKind;

/// The configured style for one shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolProperties {
    pub shape_type: ShapeKind,
    pub fill_color: Argb,
    pub stroke_color: Argb,
    pub stroke_width: f32,
}

impl ToolProperties {
    pub fn new(shape_type: ShapeKind) -> Self {
        let stroke_color = match shape_type {
            ShapeKind::Eraser => Argb::WHITE,
            _ => Argb::BLACK,
        };
        Self {
            shape_type,
            fill_color: Argb::RED,
            stroke_color,
            stroke_width: 4.0,
        }
    }
}

/// Tool styles keyed by shape kind, at most one entry per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolRegistry {
    tools: Vec<ToolProperties>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// One default entry for every shape kind.
    pub fn with_defaults() -> Self {
        Self {
            tools: ShapeKind::ALL.into_iter().map(ToolProperties::new).collect(),
        }
    }

    /// Replaces the whole collection. Later duplicates of a kind are dropped.
    pub fn set_all(&mut self, tools: impl IntoIterator<Item = ToolProperties>) {
        self.tools.clear();
        for props in tools {
            if self.get(props.shape_type).is_some() {
                log::warn!("Ignoring duplicate tool entry for {}", props.shape_type);
                continue;
            }
            self.tools.push(props);
        }
    }

    pub fn all(&self) -> &[ToolProperties] {
        &self.tools
    }

    pub fn get(&self, kind: ShapeKind) -> Option<&ToolProperties> {
        self.tools.iter().find(|props| props.shape_type == kind)
    }

    /// Replaces the entry with the same kind. Returns false, changing nothing,
    /// when no entry for that kind exists.
    pub fn update(&mut self, props: ToolProperties) -> bool {
        match self.tools.iter_mut().find(|t| t.shape_type == props.shape_type) {
            Some(slot) => {
                *slot = props;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
