#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod input;
pub mod panels;
pub mod persistence;
pub mod raster;
pub mod renderer;
pub mod shape;
pub mod task;
pub mod tool;

pub use app::DrawingApp;
pub use canvas::CanvasTransform;
pub use color::Argb;
pub use config::EngineConfig;
pub use engine::DrawingEngine;
pub use error::{ConfigError, EngineError, PathParseError, PersistenceError, RasterError};
pub use event::{EngineEvent, EventBus, EventHandler};
pub use gesture::GestureState;
pub use history::{Availability, ShapeHistory};
pub use input::{EventResponse, PointerAction, PointerEvent, PointerTracker};
pub use persistence::{ProjectSnapshot, ShapeRecord};
pub use raster::{Paint, PaintStyle, Raster, Rasterizer};
pub use renderer::{RenderCache, Renderer};
pub use shape::{FreehandPath, PathOp, Shape, ShapeKind};
pub use task::{EngineTask, RedrawHandle, SharedEngine};
pub use tool::{ToolProperties, ToolRegistry};
