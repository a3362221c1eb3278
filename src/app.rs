use parking_lot::Mutex;
use std::sync::Arc;

use crate::color::Argb;
use crate::config::EngineConfig;
use crate::engine::DrawingEngine;
use crate::history::Availability;
use crate::input::PointerTracker;
use crate::panels::{central_panel, tools_panel};
use crate::persistence::ProjectSnapshot;
use crate::raster::Raster;

/// Where the demo host writes projects and exports.
const PROJECT_FILE: &str = "drawing.json";
const EXPORT_FILE: &str = "drawing.png";

/// We derive Deserialize/Serialize so we can persist the drawing on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct DrawingApp {
    /// Last saved drawing, restored on startup
    project: Option<ProjectSnapshot>,

    #[serde(skip)]
    engine: DrawingEngine,
    #[serde(skip)]
    tracker: PointerTracker,
    /// Kept current by the engine's undo/redo listener
    #[serde(skip)]
    availability: Arc<Mutex<Availability>>,
    /// Screen buffer the engine composites into
    #[serde(skip)]
    viewport: Option<Raster>,
    #[serde(skip)]
    texture: Option<egui::TextureHandle>,
    #[serde(skip)]
    status: Option<String>,
}

impl Default for DrawingApp {
    fn default() -> Self {
        Self::with_engine(DrawingEngine::default(), None)
    }
}

impl DrawingApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let project = cc
            .storage
            .and_then(|storage| eframe::get_value::<DrawingApp>(storage, eframe::APP_KEY))
            .and_then(|app| app.project);

        let config = EngineConfig {
            pixels_per_point: cc.egui_ctx.pixels_per_point(),
            ..EngineConfig::default()
        };
        Self::with_engine(DrawingEngine::new(config), project)
    }

    fn with_engine(mut engine: DrawingEngine, project: Option<ProjectSnapshot>) -> Self {
        let availability = Arc::new(Mutex::new(Availability::default()));
        let listener = availability.clone();
        engine.set_undo_redo_listener(move |can_undo, can_redo| {
            *listener.lock() = Availability { can_undo, can_redo };
        });

        if let Some(snapshot) = project.clone() {
            if let Err(err) = engine.restore(snapshot) {
                log::warn!("Could not restore saved drawing: {}", err);
            }
        }

        Self {
            project,
            engine,
            tracker: PointerTracker::new(),
            availability,
            viewport: None,
            texture: None,
            status: None,
        }
    }

    pub fn engine(&self) -> &DrawingEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DrawingEngine {
        &mut self.engine
    }

    pub fn availability(&self) -> Availability {
        *self.availability.lock()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn undo(&mut self) {
        self.engine.undo();
    }

    pub fn redo(&mut self) {
        self.engine.redo();
    }

    pub fn clear(&mut self) {
        self.engine.clear();
    }

    pub fn save_project(&mut self) {
        let snapshot = self.engine.snapshot();
        match snapshot.write_to(PROJECT_FILE) {
            Ok(()) => {
                self.engine.mark_saved();
                self.status = Some(format!("Saved {}", PROJECT_FILE));
            }
            Err(err) => {
                log::warn!("Save failed: {}", err);
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn load_project(&mut self) {
        let result = ProjectSnapshot::read_from(PROJECT_FILE).and_then(|snapshot| self.engine.restore(snapshot));
        self.status = Some(match result {
            Ok(()) => format!("Loaded {}", PROJECT_FILE),
            Err(err) => {
                log::warn!("Load failed: {}", err);
                err.to_string()
            }
        });
    }

    pub fn export_png(&mut self) {
        let result = self
            .engine
            .export_raster()
            .map_err(|err| err.to_string())
            .and_then(|raster| raster.to_rgba_image().save(EXPORT_FILE).map_err(|err| err.to_string()));
        self.status = Some(match result {
            Ok(()) => format!("Exported {}", EXPORT_FILE),
            Err(err) => {
                log::warn!("Export failed: {}", err);
                err
            }
        });
    }

    /// Feed this frame's pointer input for `area` to the engine and return
    /// whether anything reached it.
    pub(crate) fn handle_input(&mut self, ctx: &egui::Context, area: egui::Rect) -> bool {
        if self.engine.drawable_size().is_none() {
            let width = area.width().max(1.0) as u32;
            let height = area.height().max(1.0) as u32;
            if let Err(err) = self.engine.set_drawable_size(width, height, area.height()) {
                log::warn!("Could not set drawable size: {}", err);
            }
        }

        let events = self.tracker.process_input(ctx, area);
        for event in &events {
            self.engine.handle_event(event);
        }
        !events.is_empty()
    }

    /// Composite the engine's frame into the viewport texture, reallocating
    /// it when the panel changed size.
    pub(crate) fn viewport_texture(&mut self, ctx: &egui::Context, area: egui::Rect) -> Option<egui::TextureId> {
        let width = area.width().max(1.0) as u32;
        let height = area.height().max(1.0) as u32;
        let resized = self
            .viewport
            .as_ref()
            .is_none_or(|raster| raster.width() != width || raster.height() != height);
        if resized {
            match Raster::new(width, height) {
                Ok(raster) => self.viewport = Some(raster),
                Err(err) => {
                    log::warn!("Could not allocate viewport: {}", err);
                    return None;
                }
            }
        }

        let viewport = self.viewport.as_mut()?;
        if resized || self.engine.needs_redraw() || self.texture.is_none() {
            viewport.erase(Argb::from_color32(ctx.style().visuals.extreme_bg_color));
            self.engine.render_frame(viewport);
            let image = viewport.to_color_image();
            match self.texture.as_mut() {
                Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
                None => {
                    self.texture = Some(ctx.load_texture("drawing_viewport", image, egui::TextureOptions::NEAREST));
                }
            }
        }
        self.texture.as_ref().map(|texture| texture.id())
    }
}

impl eframe::App for DrawingApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.project = Some(self.engine.snapshot());
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
