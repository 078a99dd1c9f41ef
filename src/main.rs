use eframe::egui;
use sliitscope::app::SliitScopeApp;
use sliitscope::config::Settings;

fn main() -> eframe::Result {
    let loaded = Settings::load();
    let filter = loaded
        .as_ref()
        .map(|s| s.log_filter.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Failed to load settings: {e}. Using defaults");
            Settings::default()
        }
    }
    .with_args(std::env::args().skip(1));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([320.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SliitScope – Module Visibility",
        options,
        Box::new(|_cc| {
            let app = SliitScopeApp::new(settings)?;
            Ok(Box::new(app))
        }),
    )
}
