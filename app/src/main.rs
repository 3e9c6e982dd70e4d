mod adapter;
mod app;
mod persistence;
mod undo;

use app::WorkflowApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Workflow Canvas"),
        ..Default::default()
    };
    eframe::run_native(
        "Workflow Canvas",
        options,
        Box::new(|_cc| Ok(Box::new(WorkflowApp::new()))),
    )
}
