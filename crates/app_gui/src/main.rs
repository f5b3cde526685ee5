mod app;

use anyhow::Result;
use app::UiApp;
use eframe::{NativeOptions, egui};
use landcover_core::{ClientConfig, HttpClassifier, session::TITLE};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let classifier = HttpClassifier::new(ClientConfig::default())?;
    tracing::info!(
        "LandCover {} using {}",
        env!("LANDCOVER_VERSION"),
        classifier.config().endpoint
    );

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([640.0, 760.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    if let Err(e) = eframe::run_native(
        TITLE,
        options,
        Box::new(move |_cc| {
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(UiApp::new(classifier)))
        }),
    ) {
        tracing::error!("Application stopped with error: {e}");
        anyhow::bail!("eframe: {e}");
    }
    Ok(())
}
