#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod backend;
mod config;
mod editor;
mod pipeline;
mod project;
mod theme;

use app::WhiteboardApp;
use eframe::egui;
use std::path::Path;

/// egui 애플리케이션을 초기화하고 실행하는 진입점입니다.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let config = config::load_or_default(Path::new("whiteboard.yaml"));
    let title = config
        .window_title
        .clone()
        .unwrap_or_else(|| "Node Pipeline Whiteboard".to_string());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_app_id("Node Whiteboard")
            .with_inner_size([1280.0, 800.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| Box::new(WhiteboardApp::new(cc, config))),
    )
}
