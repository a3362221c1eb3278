//! Interprets pointer events as shape construction or panning.
//!
//! ```text
//!            Down (admissible, tool set)          Up
//!   ┌──────┐ ──────────────────────────► ┌──────────────┐ ──► commit, Idle
//!   │ Idle │                             │ DrawingShape │
//!   └──────┘ ◄── Up ─── ┌─────────┐ ◄────┴──────────────┘
//!       │               │ Panning │   SecondaryDown / two-pointer Move
//!       └─────────────► └─────────┘   (in-progress shape is discarded)
//!        SecondaryDown
//! ```

use egui::Pos2;

use crate::canvas::CanvasTransform;
use crate::color::Argb;
use crate::geometry;
use crate::input::{EventResponse, PointerAction, PointerEvent};
use crate::shape::{Shape, ShapeKind};
use crate::tool::ToolRegistry;

/// The possible states of the gesture interpreter.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    /// No pointer interaction in progress
    #[default]
    Idle,
    /// A single pointer is shaping `shape`
    DrawingShape {
        shape: Shape,
        /// Last raw pointer position, screen space
        last_touch: Pos2,
    },
    /// Two pointers are translating the canvas
    Panning {
        /// Midpoint of the first two pointers at the previous event
        reference: Pos2,
    },
}

impl GestureState {
    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "Idle",
            GestureState::DrawingShape { .. } => "DrawingShape",
            GestureState::Panning { .. } => "Panning",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, GestureState::DrawingShape { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, GestureState::Panning { .. })
    }

    /// The shape under construction, if any
    pub fn in_progress(&self) -> Option<&Shape> {
        match self {
            GestureState::DrawingShape { shape, .. } => Some(shape),
            _ => None,
        }
    }
}

/// What the engine must do after a pointer event
#[derive(Debug, Clone, PartialEq)]
pub struct GestureOutcome {
    pub response: EventResponse,
    /// A finished shape to push onto the history
    pub committed: Option<Shape>,
    /// Whether the screen needs repainting
    pub redraw: bool,
    /// A shape was thrown away without being committed
    pub discarded: bool,
}

impl GestureOutcome {
    fn handled(redraw: bool) -> Self {
        Self {
            response: EventResponse::Handled,
            committed: None,
            redraw,
            discarded: false,
        }
    }

    fn with_response(response: EventResponse) -> Self {
        Self {
            response,
            committed: None,
            redraw: false,
            discarded: false,
        }
    }
}

/// Everything the gesture interpreter reads or changes besides its own state
pub struct GestureContext<'a> {
    pub canvas: &'a mut CanvasTransform,
    pub tools: &'a ToolRegistry,
    pub selected_tool: ShapeKind,
    /// Color erasers paint with
    pub background: Argb,
}

/// Drives the gesture state machine
#[derive(Debug, Default)]
pub struct GestureMachine {
    state: GestureState,
}

impl GestureMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn in_progress(&self) -> Option<&Shape> {
        self.state.in_progress()
    }

    /// Drops any in-progress shape and returns to idle. Returns true if a
    /// shape was discarded.
    pub fn reset(&mut self) -> bool {
        let discarded = self.state.is_drawing();
        self.state = GestureState::Idle;
        discarded
    }

    pub fn handle(&mut self, event: &PointerEvent, ctx: GestureContext<'_>) -> GestureOutcome {
        let before = self.state.name();
        let outcome = match event.action {
            PointerAction::Down => self.on_down(event, ctx),
            PointerAction::SecondaryDown => self.on_secondary_down(event),
            PointerAction::Move => self.on_move(event, ctx),
            PointerAction::Up => self.on_up(),
            PointerAction::SecondaryUp => GestureOutcome::handled(false),
            PointerAction::Cancel => {
                let discarded = self.reset();
                GestureOutcome {
                    discarded,
                    ..GestureOutcome::handled(discarded)
                }
            }
            PointerAction::Hover => GestureOutcome::with_response(EventResponse::Unhandled),
        };
        if before != self.state.name() {
            log::debug!("Gesture {} -> {} on {:?}", before, self.state.name(), event.action);
        }
        outcome
    }

    fn on_down(&mut self, event: &PointerEvent, ctx: GestureContext<'_>) -> GestureOutcome {
        let Some(touch) = event.primary() else {
            return GestureOutcome::with_response(EventResponse::Ignored);
        };
        if !self.state.is_idle() {
            return GestureOutcome::handled(false);
        }
        if !ctx.canvas.is_admissible(touch) {
            log::debug!("Rejecting touch at {:?}: outside drawing area", touch);
            return GestureOutcome::with_response(EventResponse::Ignored);
        }
        let Some(props) = ctx.tools.get(ctx.selected_tool) else {
            log::warn!("No tool properties configured for {}", ctx.selected_tool);
            return GestureOutcome::with_response(EventResponse::Ignored);
        };

        let shape = Shape::begin(props, ctx.canvas.screen_to_canvas(touch), ctx.background);
        self.state = GestureState::DrawingShape {
            shape,
            last_touch: touch,
        };
        GestureOutcome::handled(true)
    }

    fn on_secondary_down(&mut self, event: &PointerEvent) -> GestureOutcome {
        let Some(reference) = pair_midpoint(event) else {
            return GestureOutcome::handled(false);
        };
        let discarded = self.state.is_drawing();
        self.state = GestureState::Panning { reference };
        GestureOutcome {
            discarded,
            ..GestureOutcome::handled(true)
        }
    }

    fn on_move(&mut self, event: &PointerEvent, ctx: GestureContext<'_>) -> GestureOutcome {
        if let Some(current) = pair_midpoint(event) {
            if let GestureState::Panning { reference } = &mut self.state {
                ctx.canvas.pan_by(current - *reference);
                *reference = current;
                return GestureOutcome::handled(true);
            }
            // A second pointer showed up without its own down event.
            let discarded = self.state.is_drawing();
            self.state = GestureState::Panning { reference: current };
            return GestureOutcome {
                discarded,
                ..GestureOutcome::handled(true)
            };
        }

        let (Some(touch), GestureState::DrawingShape { shape, last_touch }) = (event.primary(), &mut self.state) else {
            return GestureOutcome::handled(false);
        };
        let previous = ctx.canvas.screen_to_canvas(*last_touch);
        let current = ctx.canvas.screen_to_canvas(touch);
        shape.extend(previous, current);
        *last_touch = touch;
        GestureOutcome::handled(true)
    }

    fn on_up(&mut self) -> GestureOutcome {
        match std::mem::take(&mut self.state) {
            GestureState::DrawingShape { shape, .. } => GestureOutcome {
                committed: Some(shape),
                ..GestureOutcome::handled(true)
            },
            _ => GestureOutcome::handled(false),
        }
    }
}

fn pair_midpoint(event: &PointerEvent) -> Option<Pos2> {
    match event.pointers.as_slice() {
        [first, second, ..] => Some(geometry::midpoint(*first, *second)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolProperties;
    use egui::{Vec2, pos2};

    struct Fixture {
        machine: GestureMachine,
        canvas: CanvasTransform,
        tools: ToolRegistry,
        selected: ShapeKind,
    }

    impl Fixture {
        fn new(selected: ShapeKind) -> Self {
            let mut canvas = CanvasTransform::new(40.0);
            canvas.set_drawable_size(400, 300, 300.0);
            Self {
                machine: GestureMachine::new(),
                canvas,
                tools: ToolRegistry::with_defaults(),
                selected,
            }
        }

        fn send(&mut self, event: PointerEvent) -> GestureOutcome {
            self.machine.handle(
                &event,
                GestureContext {
                    canvas: &mut self.canvas,
                    tools: &self.tools,
                    selected_tool: self.selected,
                    background: Argb::WHITE,
                },
            )
        }
    }

    #[test]
    fn test_draw_and_commit_rectangle() {
        let mut fx = Fixture::new(ShapeKind::Rectangle);
        assert!(fx.send(PointerEvent::down(pos2(10.0, 10.0))).response.is_handled());
        assert!(fx.machine.state().is_drawing());
        fx.send(PointerEvent::moved(pos2(60.0, 40.0)));

        let outcome = fx.send(PointerEvent::up(pos2(60.0, 40.0)));
        let Some(Shape::Rectangle(b)) = outcome.committed else {
            panic!("expected a committed rectangle");
        };
        assert_eq!(b.start, pos2(10.0, 10.0));
        assert_eq!(b.end, pos2(60.0, 40.0));
        assert!(fx.machine.state().is_idle());
    }

    #[test]
    fn test_down_outside_bounds_is_ignored() {
        let mut fx = Fixture::new(ShapeKind::Oval);
        let outcome = fx.send(PointerEvent::down(pos2(450.0, 100.0)));
        assert_eq!(outcome.response, EventResponse::Ignored);
        assert!(fx.machine.state().is_idle());

        let outcome = fx.send(PointerEvent::down(pos2(430.0, 100.0)));
        assert_eq!(outcome.response, EventResponse::Handled);
        assert!(fx.machine.state().is_drawing());
    }

    #[test]
    fn test_down_without_tool_is_ignored() {
        let mut fx = Fixture::new(ShapeKind::Heart);
        fx.tools.set_all([ToolProperties::new(ShapeKind::Line)]);
        let outcome = fx.send(PointerEvent::down(pos2(10.0, 10.0)));
        assert_eq!(outcome.response, EventResponse::Ignored);
        assert!(fx.machine.state().is_idle());
    }

    #[test]
    fn test_second_pointer_discards_shape() {
        let mut fx = Fixture::new(ShapeKind::Brush);
        fx.send(PointerEvent::down(pos2(10.0, 10.0)));
        let outcome = fx.send(PointerEvent::secondary_down(pos2(10.0, 10.0), pos2(30.0, 10.0)));
        assert!(outcome.discarded);
        assert!(fx.machine.state().is_panning());

        fx.send(PointerEvent::new(
            PointerAction::SecondaryUp,
            vec![pos2(10.0, 10.0), pos2(30.0, 10.0)],
        ));
        let outcome = fx.send(PointerEvent::up(pos2(10.0, 10.0)));
        assert!(outcome.committed.is_none());
        assert!(fx.machine.state().is_idle());
    }

    #[test]
    fn test_pan_translates_by_midpoint_delta() {
        let mut fx = Fixture::new(ShapeKind::Rectangle);
        let start = fx.canvas.position();
        fx.send(PointerEvent::secondary_down(pos2(0.0, 0.0), pos2(20.0, 20.0)));
        let outcome = fx.send(PointerEvent::moved_pair(pos2(10.0, 4.0), pos2(30.0, 24.0)));
        assert!(outcome.response.is_handled());
        assert!(outcome.redraw);
        assert_eq!(fx.canvas.position(), start + Vec2::new(10.0, 4.0));

        fx.send(PointerEvent::moved_pair(pos2(10.0, 10.0), pos2(30.0, 30.0)));
        assert_eq!(fx.canvas.position(), start + Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_brush_smooths_in_canvas_space() {
        let mut fx = Fixture::new(ShapeKind::Brush);
        fx.canvas.set_position(Vec2::new(100.0, 0.0));
        fx.send(PointerEvent::down(pos2(110.0, 10.0)));
        fx.send(PointerEvent::moved(pos2(130.0, 30.0)));
        let outcome = fx.send(PointerEvent::up(pos2(130.0, 30.0)));

        let Some(Shape::Brush(p)) = outcome.committed else {
            panic!("expected a committed brush");
        };
        assert_eq!(p.path.start(), pos2(10.0, 10.0));
        assert_eq!(p.path.segments()[0].control, pos2(10.0, 10.0));
        assert_eq!(p.path.segments()[0].end, pos2(20.0, 20.0));
    }

    #[test]
    fn test_inapplicable_events_are_absorbed() {
        let mut fx = Fixture::new(ShapeKind::Line);
        assert_eq!(fx.send(PointerEvent::up(pos2(1.0, 1.0))).response, EventResponse::Handled);
        assert_eq!(fx.send(PointerEvent::moved(pos2(1.0, 1.0))).response, EventResponse::Handled);
        assert_eq!(
            fx.send(PointerEvent::new(PointerAction::Hover, vec![pos2(1.0, 1.0)])).response,
            EventResponse::Unhandled
        );
        assert!(fx.machine.state().is_idle());
    }

    #[test]
    fn test_cancel_discards_in_progress_shape() {
        let mut fx = Fixture::new(ShapeKind::Triangle);
        fx.send(PointerEvent::down(pos2(10.0, 10.0)));
        let outcome = fx.send(PointerEvent::new(PointerAction::Cancel, vec![pos2(10.0, 10.0)]));
        assert!(outcome.discarded);
        assert!(outcome.committed.is_none());
        assert!(fx.machine.state().is_idle());
    }
}
