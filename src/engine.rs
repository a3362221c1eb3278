use egui::Vec2;

use crate::canvas::CanvasTransform;
use crate::config::EngineConfig;
use crate::error::{EngineError, PersistenceResult};
use crate::event::{EngineEvent, EventBus, EventHandler};
use crate::gesture::{GestureContext, GestureMachine, GestureState};
use crate::history::{Availability, ShapeHistory};
use crate::input::{EventResponse, PointerEvent};
use crate::persistence::ProjectSnapshot;
use crate::raster::{Raster, Rasterizer};
use crate::renderer::{RenderCache, Renderer};
use crate::shape::{Shape, ShapeKind};
use crate::task::{EngineTask, RedrawHandle, TaskQueue};
use crate::tool::{ToolProperties, ToolRegistry};

/// The drawing surface: turns pointer events into shapes, keeps their
/// history and renders them through a cache.
#[derive(Debug)]
pub struct DrawingEngine {
    config: EngineConfig,
    canvas: CanvasTransform,
    tools: ToolRegistry,
    selected_tool: ShapeKind,
    gestures: GestureMachine,
    history: ShapeHistory,
    renderer: Renderer,
    events: EventBus,
    tasks: TaskQueue,
    /// Unsaved changes since the last save or restore
    dirty: bool,
    needs_redraw: bool,
    /// Send the history availability on the next frame
    announce_history: bool,
}

impl Default for DrawingEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DrawingEngine {
    pub fn new(config: EngineConfig) -> Self {
        let mut tools = ToolRegistry::new();
        tools.set_all(config.tools.iter().copied());
        Self {
            canvas: CanvasTransform::new(config.margin_px()),
            tools,
            selected_tool: ShapeKind::Brush,
            gestures: GestureMachine::new(),
            history: ShapeHistory::new(),
            renderer: Renderer::new(config.background_color, config.anti_alias),
            events: EventBus::new(),
            tasks: TaskQueue::new(),
            dirty: false,
            needs_redraw: true,
            announce_history: true,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Feed one pointer event through the gesture state machine.
    pub fn handle_event(&mut self, event: &PointerEvent) -> EventResponse {
        let in_progress_kind = self.gestures.in_progress().map(Shape::kind);
        let position = self.canvas.position();

        let outcome = self.gestures.handle(
            event,
            GestureContext {
                canvas: &mut self.canvas,
                tools: &self.tools,
                selected_tool: self.selected_tool,
                background: self.renderer.background_color(),
            },
        );

        if outcome.discarded {
            if let Some(kind) = in_progress_kind {
                log::debug!("Discarded in-progress {}", kind);
                self.events.emit(EngineEvent::ShapeDiscarded { kind });
            }
        }
        if self.canvas.position() != position {
            self.events.emit(EngineEvent::ViewChanged {
                position: self.canvas.position(),
            });
        }
        if let Some(shape) = outcome.committed {
            self.commit(shape);
        }
        if outcome.redraw {
            self.needs_redraw = true;
        }
        outcome.response
    }

    fn commit(&mut self, shape: Shape) {
        let kind = shape.kind();
        self.history.commit(shape);
        self.dirty = true;
        self.needs_redraw = true;
        log::debug!("Committed {} ({} shapes)", kind, self.history.len());
        self.events.emit(EngineEvent::ShapeCommitted { kind });
        self.emit_history();
    }

    pub fn gesture_state(&self) -> &GestureState {
        self.gestures.state()
    }

    pub fn in_progress_shape(&self) -> Option<&Shape> {
        self.gestures.in_progress()
    }

    /// Replace the tool collection. Later duplicates of a kind are dropped.
    pub fn set_tool_data(&mut self, tools: Vec<ToolProperties>) {
        self.tools.set_all(tools);
    }

    pub fn tool_data(&self) -> &[ToolProperties] {
        self.tools.all()
    }

    /// Replace the entry of the same kind. Returns false when there is none.
    pub fn update_tool_data(&mut self, props: ToolProperties) -> bool {
        let updated = self.tools.update(props);
        if !updated {
            log::warn!("No {} tool to update", props.shape_type);
        }
        updated
    }

    pub fn set_selected_tool(&mut self, kind: ShapeKind) {
        let old = std::mem::replace(&mut self.selected_tool, kind);
        if old != kind {
            self.events.emit(EngineEvent::ToolChanged { old, new: kind });
        }
    }

    pub fn selected_tool(&self) -> ShapeKind {
        self.selected_tool
    }

    /// Set the drawable area and center it vertically in the viewport.
    /// Allocates a new render cache, rebuilt on the next frame.
    pub fn set_drawable_size(&mut self, width: u32, height: u32, viewport_height: f32) -> Result<(), EngineError> {
        self.renderer.resize(width, height)?;
        self.canvas.set_drawable_size(width, height, viewport_height);
        self.needs_redraw = true;
        self.announce_history = true;
        log::info!("Drawable area set to {}x{}", width, height);
        self.events.emit(EngineEvent::DrawableResized { width, height });
        Ok(())
    }

    pub fn drawable_size(&self) -> Option<(u32, u32)> {
        self.renderer
            .cache()
            .map(|cache| (cache.raster().width(), cache.raster().height()))
    }

    pub fn canvas(&self) -> &CanvasTransform {
        &self.canvas
    }

    pub fn canvas_position(&self) -> Vec2 {
        self.canvas.position()
    }

    /// Use a copy of `background` under the shapes. `None` changes nothing.
    pub fn set_background(&mut self, background: Option<&Raster>) {
        let Some(background) = background else {
            return;
        };
        let mut copy = background.clone();
        copy.set_anti_alias(self.config.anti_alias);
        self.renderer.set_background(copy);
        self.needs_redraw = true;
        self.events.emit(EngineEvent::BackgroundChanged);
    }

    pub fn set_background_image(&mut self, image: &image::RgbaImage) -> Result<(), EngineError> {
        let raster = Raster::from_rgba_image(image)?;
        self.set_background(Some(&raster));
        Ok(())
    }

    pub fn background(&self) -> Option<&Raster> {
        self.renderer.background()
    }

    pub fn history(&self) -> &ShapeHistory {
        &self.history
    }

    pub fn shapes(&self) -> &[Shape] {
        self.history.shapes()
    }

    pub fn availability(&self) -> Availability {
        self.history.availability()
    }

    /// Undo the last shape and rebuild the cache. No-op on an empty history.
    pub fn undo(&mut self) -> Availability {
        if self.history.undo().is_none() {
            return self.availability();
        }
        self.renderer.rebuild(self.history.shapes());
        self.needs_redraw = true;
        self.emit_history()
    }

    /// Redo the last undone shape, drawing only that shape into the cache.
    pub fn redo(&mut self) -> Availability {
        if self.history.redo().is_none() {
            return self.availability();
        }
        self.renderer.sync(self.history.shapes());
        self.needs_redraw = true;
        self.emit_history()
    }

    /// Drop every shape and blank the background.
    pub fn clear(&mut self) {
        self.history.clear();
        self.renderer.reset_background();
        self.renderer.rebuild(&[]);
        self.dirty = true;
        self.needs_redraw = true;
        log::info!("Canvas cleared");
        self.events.emit(EngineEvent::Cleared);
        self.emit_history();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        self.events.subscribe(Box::new(handler));
    }

    /// Call `listener(can_undo, can_redo)` whenever availability is announced.
    pub fn set_undo_redo_listener(&self, mut listener: impl FnMut(bool, bool) + Send + 'static) {
        self.subscribe(move |event: &EngineEvent| {
            if let EngineEvent::HistoryChanged { can_undo, can_redo } = *event {
                listener(can_undo, can_redo);
            }
        });
    }

    fn emit_history(&self) -> Availability {
        let availability = self.availability();
        self.events.emit(EngineEvent::HistoryChanged {
            can_undo: availability.can_undo,
            can_redo: availability.can_redo,
        });
        availability
    }

    /// Whether the next frame would differ from the last one, including
    /// redraws queued through a [`RedrawHandle`].
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw || self.tasks.has_pending()
    }

    pub fn render_cache(&self) -> Option<&RenderCache> {
        self.renderer.cache()
    }

    /// Composite the current frame onto `target`, whose origin is the
    /// screen origin. Runs pending tasks first.
    pub fn render_frame(&mut self, target: &mut dyn Rasterizer) {
        self.run_pending_tasks();
        self.renderer.render_frame(
            target,
            &self.canvas,
            self.history.shapes(),
            self.gestures.in_progress(),
        );
        self.needs_redraw = false;
        if self.announce_history && self.renderer.cache().is_some() {
            self.announce_history = false;
            self.emit_history();
        }
    }

    /// Background plus every committed shape, drawn fresh at the drawable
    /// size. Leaves the engine untouched.
    pub fn export_raster(&self) -> Result<Raster, EngineError> {
        if self.renderer.cache().is_none() {
            return Err(EngineError::NoDrawableArea);
        }
        Ok(self.renderer.export(self.canvas.bounds(), self.history.shapes())?)
    }

    /// Queue a full cache rebuild, run on the next frame.
    pub fn request_full_redraw(&self) {
        self.tasks.post(EngineTask::FullRedraw);
    }

    pub fn redraw_handle(&self) -> RedrawHandle {
        self.tasks.handle()
    }

    /// Run everything queued so far. Returns the number of tasks run.
    pub fn run_pending_tasks(&mut self) -> usize {
        let tasks = self.tasks.drain();
        for task in &tasks {
            match task {
                EngineTask::FullRedraw => self.rebuild_cache(),
            }
        }
        tasks.len()
    }

    /// Replay the current history into the render cache.
    pub fn rebuild_cache(&mut self) {
        self.renderer.rebuild(self.history.shapes());
        self.needs_redraw = true;
        self.announce_history = true;
    }

    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot::new(self.history.shapes(), self.tools.all(), self.selected_tool)
    }

    /// Replace the history and tools with a saved project. On error nothing
    /// changes.
    pub fn restore(&mut self, snapshot: ProjectSnapshot) -> PersistenceResult<()> {
        let shapes = snapshot.decode_shapes()?;
        let count = shapes.len();

        self.gestures.reset();
        self.history.replace(shapes);
        self.tools.set_all(snapshot.tools);
        self.set_selected_tool(snapshot.selected_tool);
        self.renderer.rebuild(self.history.shapes());
        self.dirty = false;
        self.needs_redraw = true;

        log::info!("Restored project with {} shapes", count);
        self.events.emit(EngineEvent::Restored { shapes: count });
        self.emit_history();
        Ok(())
    }
}
