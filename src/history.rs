use crate::shape::Shape;

/// Whether undo and redo currently have anything to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Availability {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Manages committed shapes for undo/redo functionality
#[derive(Debug, Clone, Default)]
pub struct ShapeHistory {
    /// Committed shapes in commit order
    undo_stack: Vec<Shape>,
    /// Undone shapes, most recently undone last
    redo_stack: Vec<Shape>,
}

impl ShapeHistory {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Commit a finished shape. A new commit discards the redo branch.
    pub fn commit(&mut self, shape: Shape) {
        self.undo_stack.push(shape);
        self.redo_stack.clear();
    }

    /// Move the last committed shape onto the redo stack
    pub fn undo(&mut self) -> Option<&Shape> {
        let shape = self.undo_stack.pop()?;
        self.redo_stack.push(shape);
        self.redo_stack.last()
    }

    /// Move the last undone shape back onto the undo stack
    pub fn redo(&mut self) -> Option<&Shape> {
        let shape = self.redo_stack.pop()?;
        self.undo_stack.push(shape);
        self.undo_stack.last()
    }

    /// Replace the committed shapes, e.g. when restoring a saved project
    pub fn replace(&mut self, shapes: Vec<Shape>) {
        self.undo_stack = shapes;
        self.redo_stack.clear();
    }

    /// Returns true if there are shapes that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are shapes that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn availability(&self) -> Availability {
        Availability {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Committed shapes in commit order
    pub fn shapes(&self) -> &[Shape] {
        &self.undo_stack
    }

    /// Undone shapes, most recently undone last
    pub fn undone(&self) -> &[Shape] {
        &self.redo_stack
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Clear both stacks
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
