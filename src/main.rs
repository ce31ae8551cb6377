mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::MoverscopeApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Data directory: first CLI argument, falling back to ./data when it
    // exists. Without either, the app starts empty and the user opens a
    // folder from the File menu.
    let data_dir: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from).or_else(|| {
        let default = PathBuf::from("data");
        default.is_dir().then_some(default)
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Moverscope – Interstate Movers Dashboard",
        options,
        Box::new(move |_cc| {
            let mut app = MoverscopeApp::default();
            if let Some(dir) = &data_dir {
                app.state.load_from_dir(dir);
            }
            Ok(Box::new(app))
        }),
    )
}
