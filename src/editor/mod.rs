pub mod convert;
pub mod model;
pub mod view;

pub use convert::{graph_to_payload, payload_to_graph};
pub use model::WhiteboardState;
pub use view::WhiteboardUi;
