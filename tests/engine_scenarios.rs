mod common;

use common::{Call, RecordingRasterizer, create_test_engine, drag};
use eframe_drawing::{
    Argb, DrawingEngine, EngineEvent, EventResponse, Paint, PointerAction, PointerEvent, ShapeKind,
    ToolProperties,
};
use egui::{Rect, Vec2, pos2};
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn test_admissible_region_for_400_by_300() {
    let mut engine = DrawingEngine::default();
    engine.set_drawable_size(400, 300, 300.0).unwrap();
    assert_eq!(
        engine.canvas().admissible_rect(),
        Rect::from_min_max(pos2(-40.0, -40.0), pos2(440.0, 340.0))
    );

    engine.set_selected_tool(ShapeKind::Rectangle);
    let response = engine.handle_event(&PointerEvent::down(pos2(450.0, 100.0)));
    assert_eq!(response, EventResponse::Ignored);
    assert!(engine.in_progress_shape().is_none());

    let response = engine.handle_event(&PointerEvent::down(pos2(430.0, 100.0)));
    assert_eq!(response, EventResponse::Handled);
    assert!(engine.in_progress_shape().is_some());
}

#[test]
fn test_admissible_boundary_is_exclusive() {
    let mut engine = DrawingEngine::default();
    engine.set_drawable_size(400, 300, 300.0).unwrap();
    assert_eq!(
        engine.handle_event(&PointerEvent::down(pos2(440.0, 100.0))),
        EventResponse::Ignored
    );
    assert_eq!(
        engine.handle_event(&PointerEvent::down(pos2(100.0, -40.0))),
        EventResponse::Ignored
    );
}

#[test]
fn test_drawable_area_is_centered_vertically() {
    let mut engine = DrawingEngine::default();
    engine.set_drawable_size(400, 301, 500.0).unwrap();
    // 500 / 2 - 301 / 2 with integer halving of the height
    assert_eq!(engine.canvas_position(), Vec2::new(0.0, 100.0));
    assert_eq!(engine.drawable_size(), Some((400, 301)));
}

#[test]
fn test_transparent_fill_draws_only_stroke() {
    let mut engine = create_test_engine();
    let mut props = ToolProperties::new(ShapeKind::Rectangle);
    props.fill_color = Argb::TRANSPARENT;
    props.stroke_color = Argb::BLACK;
    engine.set_tool_data(vec![props]);
    engine.set_selected_tool(ShapeKind::Rectangle);

    engine.handle_event(&PointerEvent::down(pos2(10.0, 10.0)));
    engine.handle_event(&PointerEvent::moved(pos2(40.0, 30.0)));

    let mut recorder = RecordingRasterizer::new();
    engine.render_frame(&mut recorder);
    let primitives = recorder.primitives();
    // Background, then the in-progress rectangle's stroke only
    assert_eq!(primitives.len(), 2);
    assert_eq!(
        primitives[1],
        &Call::Rect(
            Rect::from_min_max(pos2(10.0, 10.0), pos2(40.0, 30.0)),
            Paint::stroke(Argb::BLACK, 4.0)
        )
    );
}

#[test]
fn test_frame_draws_background_cache_then_in_progress() {
    let mut engine = create_test_engine();
    drag(&mut engine, ShapeKind::Oval, &[pos2(5.0, 5.0), pos2(30.0, 30.0)]);
    engine.set_selected_tool(ShapeKind::Line);
    engine.handle_event(&PointerEvent::down(pos2(50.0, 50.0)));

    let mut recorder = RecordingRasterizer::new();
    engine.render_frame(&mut recorder);
    assert!(matches!(recorder.calls[0], Call::Rect(_, paint) if paint == Paint::fill(Argb::WHITE)));
    assert!(matches!(recorder.calls[1], Call::Raster { size: [120, 90], .. }));
    assert!(matches!(recorder.calls[2], Call::Line(..)));
    assert_eq!(recorder.calls.len(), 3);
    assert_eq!(recorder.clip, None);
}

#[test]
fn test_undo_then_commit_drops_redo_branch() {
    let mut engine = create_test_engine();
    drag(&mut engine, ShapeKind::Rectangle, &[pos2(1.0, 1.0), pos2(10.0, 10.0)]);
    drag(&mut engine, ShapeKind::Oval, &[pos2(20.0, 20.0), pos2(30.0, 30.0)]);
    let a = engine.shapes()[0].clone();
    let b = engine.shapes()[1].clone();

    engine.undo();
    assert_eq!(engine.shapes(), &[a.clone()]);
    assert_eq!(engine.history().undone(), &[b]);

    drag(&mut engine, ShapeKind::Heart, &[pos2(40.0, 40.0), pos2(60.0, 60.0)]);
    let c = engine.shapes()[1].clone();
    assert_eq!(c.kind(), ShapeKind::Heart);
    assert_eq!(engine.shapes(), &[a, c]);
    assert!(engine.history().undone().is_empty());
}

#[test]
fn test_n_undos_then_n_redos() {
    let mut engine = create_test_engine();
    for i in 0..5 {
        let x = 5.0 + i as f32 * 10.0;
        drag(&mut engine, ShapeKind::Brush, &[pos2(x, 5.0), pos2(x + 3.0, 40.0)]);
    }
    let committed = engine.shapes().to_vec();

    for _ in 0..committed.len() {
        engine.undo();
    }
    assert!(engine.shapes().is_empty());
    let reversed: Vec<_> = committed.iter().rev().cloned().collect();
    assert_eq!(engine.history().undone(), reversed.as_slice());

    for _ in 0..committed.len() {
        engine.redo();
    }
    assert_eq!(engine.shapes(), committed.as_slice());
    assert!(!engine.availability().can_redo);
}

#[test]
fn test_second_pointer_discards_drawing() {
    let mut engine = create_test_engine();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    engine.subscribe(move |event: &EngineEvent| sink.lock().push(event.clone()));

    engine.set_selected_tool(ShapeKind::Brush);
    engine.handle_event(&PointerEvent::down(pos2(10.0, 10.0)));
    engine.handle_event(&PointerEvent::moved(pos2(15.0, 12.0)));
    engine.handle_event(&PointerEvent::secondary_down(pos2(15.0, 12.0), pos2(40.0, 12.0)));
    engine.handle_event(&PointerEvent::new(
        PointerAction::SecondaryUp,
        vec![pos2(15.0, 12.0), pos2(40.0, 12.0)],
    ));
    let response = engine.handle_event(&PointerEvent::up(pos2(15.0, 12.0)));

    assert_eq!(response, EventResponse::Handled);
    assert!(engine.shapes().is_empty());
    assert!(!engine.is_dirty());
    assert!(events
        .lock()
        .contains(&EngineEvent::ShapeDiscarded { kind: ShapeKind::Brush }));
}

#[test]
fn test_pan_offsets_new_shapes() {
    let mut engine = create_test_engine();
    engine.handle_event(&PointerEvent::secondary_down(pos2(0.0, 0.0), pos2(20.0, 0.0)));
    engine.handle_event(&PointerEvent::moved_pair(pos2(10.0, 5.0), pos2(30.0, 5.0)));
    engine.handle_event(&PointerEvent::up(pos2(10.0, 5.0)));
    assert_eq!(engine.canvas_position(), Vec2::new(10.0, 5.0));

    drag(&mut engine, ShapeKind::Line, &[pos2(20.0, 25.0), pos2(50.0, 45.0)]);
    let shape = &engine.shapes()[0];
    let eframe_drawing::Shape::Line(line) = shape else {
        panic!("expected a line");
    };
    assert_eq!(line.start, pos2(10.0, 20.0));
    assert_eq!(line.end, pos2(40.0, 40.0));
}

#[test]
fn test_hover_is_unhandled() {
    let mut engine = create_test_engine();
    let response = engine.handle_event(&PointerEvent::new(PointerAction::Hover, vec![pos2(5.0, 5.0)]));
    assert_eq!(response, EventResponse::Unhandled);
}

#[test]
fn test_eraser_uses_configured_background_color() {
    let mut engine = create_test_engine();
    drag(&mut engine, ShapeKind::Eraser, &[pos2(5.0, 5.0), pos2(25.0, 25.0)]);
    assert_eq!(engine.shapes()[0].stroke_color(), Argb::WHITE);
    assert_eq!(engine.shapes()[0].fill_color(), Argb::TRANSPARENT);
}
