use crate::editor::model::{NODE_TEMPLATES, PortKind, WhiteboardState, find_template, geometry};
use crate::theme::{BoardColors, Theme};
use eframe::egui::{self, RichText};
use eframe::epaint::CubicBezierShape;

mod canvas;
mod connection;
mod layout;
mod node;
mod palette;

pub use layout::WhiteboardUi;
