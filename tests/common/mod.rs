#![allow(dead_code)]

use eframe_drawing::{
    Argb, DrawingEngine, EngineConfig, Paint, PathOp, PointerEvent, Raster, Rasterizer, ShapeKind,
};
use egui::{Pos2, Rect, Vec2};

/// A draw call as seen by the rasterizer, with the translation in effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Rect(Rect, Paint),
    Oval(Rect, Paint),
    Line(Pos2, Pos2, Paint),
    Path(Vec<PathOp>, Paint),
    Raster { size: [usize; 2], origin: Pos2 },
}

/// Rasterizer that only records what it is asked to draw.
#[derive(Debug, Default)]
pub struct RecordingRasterizer {
    pub calls: Vec<Call>,
    pub translation: Vec2,
    pub clip: Option<Rect>,
}

impl RecordingRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls other than composited rasters
    pub fn primitives(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| !matches!(call, Call::Raster { .. }))
            .collect()
    }
}

impl Rasterizer for RecordingRasterizer {
    fn set_translation(&mut self, offset: Vec2) {
        self.translation = offset;
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    fn draw_rect(&mut self, rect: Rect, paint: Paint) {
        self.calls.push(Call::Rect(rect, paint));
    }

    fn draw_oval(&mut self, rect: Rect, paint: Paint) {
        self.calls.push(Call::Oval(rect, paint));
    }

    fn draw_line(&mut self, from: Pos2, to: Pos2, paint: Paint) {
        self.calls.push(Call::Line(from, to, paint));
    }

    fn draw_path(&mut self, ops: &[PathOp], paint: Paint) {
        self.calls.push(Call::Path(ops.to_vec(), paint));
    }

    fn draw_raster(&mut self, raster: &Raster, origin: Pos2) {
        self.calls.push(Call::Raster {
            size: raster.size(),
            origin,
        });
    }
}

pub const WIDTH: u32 = 120;
pub const HEIGHT: u32 = 90;

/// Engine without anti-aliasing, sized so the drawable area sits at the
/// screen origin.
pub fn create_test_engine() -> DrawingEngine {
    let config = EngineConfig {
        anti_alias: false,
        ..EngineConfig::default()
    };
    let mut engine = DrawingEngine::new(config);
    engine
        .set_drawable_size(WIDTH, HEIGHT, HEIGHT as f32)
        .expect("valid drawable size");
    engine
}

pub fn screen_raster() -> Raster {
    Raster::new(WIDTH, HEIGHT)
        .expect("valid raster size")
        .with_anti_alias(false)
}

/// Render one frame into a fresh screen-sized raster.
pub fn render(engine: &mut DrawingEngine) -> Raster {
    let mut screen = screen_raster();
    engine.render_frame(&mut screen);
    screen
}

/// Press, drag through `path` and release with the given tool.
pub fn drag(engine: &mut DrawingEngine, kind: ShapeKind, path: &[Pos2]) {
    engine.set_selected_tool(kind);
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    engine.handle_event(&PointerEvent::down(*first));
    for point in rest {
        engine.handle_event(&PointerEvent::moved(*point));
    }
    engine.handle_event(&PointerEvent::up(*path.last().unwrap_or(first)));
}

/// Give every tool opaque, distinct colors.
pub fn opaque_tools(engine: &mut DrawingEngine) {
    let colors = [
        Argb::RED,
        Argb::GREEN,
        Argb::BLUE,
        Argb::BLACK,
        Argb::from_argb(255, 200, 120, 0),
        Argb::from_argb(255, 0, 120, 200),
        Argb::from_argb(255, 90, 0, 90),
    ];
    let tools = engine
        .tool_data()
        .iter()
        .zip(colors.iter().cycle())
        .map(|(props, color)| {
            let mut props = *props;
            props.fill_color = *color;
            props.stroke_width = 3.0;
            props
        })
        .collect();
    engine.set_tool_data(tools);
}
