//! duskwrite - a dark-themed text editor with per-range formatting
//!
//! Bold, italic, underline and colours can be laid over any selection.
//! Files are read and written as plain text; formatting lives only in the
//! open window.

mod app;
mod clipboard;
mod dialogs;
mod document;
mod render;
mod session;
mod settings;
mod style;

use app::DuskWriteApp;
use eframe::NativeOptions;
use settings::EditorSettings;

fn main() -> eframe::Result<()> {
    duskcore::logging::init();

    let settings_path = EditorSettings::config_path();
    let settings = EditorSettings::load(&settings_path);

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 600.0])
            .with_min_inner_size([480.0, 320.0])
            .with_title("Text Editor - untitled")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "duskwrite",
        options,
        Box::new(move |cc| Box::new(DuskWriteApp::new(cc, settings, settings_path))),
    )
}
