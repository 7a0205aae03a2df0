pub mod canvas;
pub mod color;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod id;
pub mod model;
pub mod scene;

pub use canvas::{Canvas, CanvasEvent, TextEdit, Viewport};
pub use color::Color;
pub use error::{Error, Result};
pub use graph::{FlowEdge, FlowNode, GraphModel, GraphViewport, NodeKind, NodePayload};
pub use id::ObjectId;
pub use model::*;
pub use scene::{Scene, Snapshot};

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Point, Rect, Vec2};
