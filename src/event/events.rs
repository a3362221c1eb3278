use egui::Vec2;

use crate::shape::ShapeKind;

/// Notifications emitted by the drawing engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Undo/redo availability, sent after every history change and once on
    /// the first frame after a (full) redraw.
    HistoryChanged { can_undo: bool, can_redo: bool },
    ShapeCommitted { kind: ShapeKind },
    /// An in-progress shape was thrown away by a pan or a cancel
    ShapeDiscarded { kind: ShapeKind },
    Cleared,
    Restored { shapes: usize },
    ToolChanged { old: ShapeKind, new: ShapeKind },
    BackgroundChanged,
    ViewChanged { position: Vec2 },
    DrawableResized { width: u32, height: u32 },
}
