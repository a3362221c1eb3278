use egui::{Context, Event, PointerButton, Pos2, Rect, TouchId, TouchPhase};

use super::{PointerAction, PointerEvent};

/// Handles converting raw egui input into engine `PointerEvent`s.
///
/// Touches are tracked by id so several fingers can be active; the primary
/// mouse button acts as a single pointer. Once a touch device has been seen,
/// the mouse events egui synthesizes from touches are ignored.
/// Positions are reported relative to the top-left corner of `area`.
#[derive(Debug, Default)]
pub struct PointerTracker {
    touches: Vec<(TouchId, Pos2)>,
    mouse: Option<Pos2>,
    touch_device: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process this frame's raw egui input
    pub fn process_input(&mut self, ctx: &Context, area: Rect) -> Vec<PointerEvent> {
        let events = ctx.input(|input| input.raw.events.clone());
        self.process_events(&events, area)
    }

    pub fn process_events(&mut self, events: &[Event], area: Rect) -> Vec<PointerEvent> {
        let mut out = Vec::new();
        for event in events {
            match event {
                Event::Touch { id, phase, pos, .. } => {
                    self.touch_device = true;
                    self.mouse = None;
                    self.handle_touch(*id, *phase, *pos - area.min.to_vec2(), area, &mut out);
                }
                _ if self.touch_device => {}
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    let local = *pos - area.min.to_vec2();
                    if *pressed {
                        if self.mouse.is_none() && area.contains(*pos) {
                            self.mouse = Some(local);
                            out.push(PointerEvent::down(local));
                        }
                    } else if self.mouse.take().is_some() {
                        out.push(PointerEvent::up(local));
                    }
                }
                Event::PointerMoved(pos) => {
                    let local = *pos - area.min.to_vec2();
                    if let Some(mouse) = self.mouse.as_mut() {
                        *mouse = local;
                        out.push(PointerEvent::moved(local));
                    } else if area.contains(*pos) {
                        out.push(PointerEvent::new(PointerAction::Hover, vec![local]));
                    }
                }
                Event::PointerGone => {
                    if let Some(last) = self.mouse.take() {
                        out.push(PointerEvent::new(PointerAction::Cancel, vec![last]));
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn handle_touch(&mut self, id: TouchId, phase: TouchPhase, local: Pos2, area: Rect, out: &mut Vec<PointerEvent>) {
        let index = self.touches.iter().position(|(touch, _)| *touch == id);
        match (phase, index) {
            (TouchPhase::Start, None) => {
                // Only the first finger has to land on the canvas.
                if self.touches.is_empty() && !area.contains(local + area.min.to_vec2()) {
                    return;
                }
                self.touches.push((id, local));
                let action = if self.touches.len() == 1 {
                    PointerAction::Down
                } else {
                    PointerAction::SecondaryDown
                };
                out.push(PointerEvent::new(action, self.positions()));
            }
            (TouchPhase::Move, Some(i)) => {
                self.touches[i].1 = local;
                out.push(PointerEvent::new(PointerAction::Move, self.positions()));
            }
            (TouchPhase::End, Some(i)) => {
                self.touches[i].1 = local;
                let action = if self.touches.len() == 1 {
                    PointerAction::Up
                } else {
                    PointerAction::SecondaryUp
                };
                out.push(PointerEvent::new(action, self.positions()));
                self.touches.remove(i);
            }
            (TouchPhase::Cancel, Some(_)) => {
                out.push(PointerEvent::new(PointerAction::Cancel, self.positions()));
                self.touches.clear();
            }
            _ => {}
        }
    }

    fn positions(&self) -> Vec<Pos2> {
        self.touches.iter().map(|(_, pos)| *pos).collect()
    }

    /// Number of pointers currently held down
    pub fn active_pointers(&self) -> usize {
        if self.touch_device {
            self.touches.len()
        } else {
            usize::from(self.mouse.is_some())
        }
    }
}
