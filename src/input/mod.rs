use egui::Pos2;

mod tracker;
pub use tracker::PointerTracker;

/// What happened to the set of active pointers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// The first pointer touched down
    Down,
    /// Another pointer touched down while at least one was active
    SecondaryDown,
    /// One or more active pointers moved
    Move,
    /// A pointer lifted while others remain active
    SecondaryUp,
    /// The last pointer lifted
    Up,
    /// The platform aborted the gesture
    Cancel,
    /// Pointer moved without touching
    Hover,
}

/// A pointer event in screen coordinates.
///
/// `pointers` holds the positions of all active pointers, in the order they
/// went down. For `Up`/`SecondaryUp` it still includes the lifting pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub pointers: Vec<Pos2>,
}

impl PointerEvent {
    pub fn new(action: PointerAction, pointers: Vec<Pos2>) -> Self {
        Self { action, pointers }
    }

    pub fn down(pos: Pos2) -> Self {
        Self::new(PointerAction::Down, vec![pos])
    }

    pub fn moved(pos: Pos2) -> Self {
        Self::new(PointerAction::Move, vec![pos])
    }

    pub fn up(pos: Pos2) -> Self {
        Self::new(PointerAction::Up, vec![pos])
    }

    pub fn secondary_down(first: Pos2, second: Pos2) -> Self {
        Self::new(PointerAction::SecondaryDown, vec![first, second])
    }

    pub fn moved_pair(first: Pos2, second: Pos2) -> Self {
        Self::new(PointerAction::Move, vec![first, second])
    }

    /// Position of the first active pointer
    pub fn primary(&self) -> Option<Pos2> {
        self.pointers.first().copied()
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }
}

/// How the engine dealt with a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// The event was consumed, possibly without any visible effect
    Handled,
    /// A gesture start was refused (outside the admissible area or no tool)
    Ignored,
    /// The event is not a gesture the engine understands
    Unhandled,
}

impl EventResponse {
    pub fn is_handled(self) -> bool {
        matches!(self, EventResponse::Handled)
    }
}
