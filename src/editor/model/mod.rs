mod camera;
mod connection;
mod error;
pub mod geometry;
mod ids;
mod node;
mod port;
mod state;
mod template;

pub use camera::{Camera, MAX_ZOOM, MIN_ZOOM};
pub use connection::Connection;
pub use error::EditorError;
pub use ids::IdAllocator;
pub use node::{DataKind, NodeData, WhiteboardNode};
pub use port::{Port, PortKind};
pub use state::{
    DEFAULT_BOARD_SIZE, DEFAULT_NODE_POSITION, NodeDrag, PendingPort, WhiteboardState,
};
pub use template::{NODE_TEMPLATES, NodeTemplate, NodeVisualKind, PortSpec, find_template};
