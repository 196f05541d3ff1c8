use tracing_subscriber::EnvFilter;
use well_report::app::ReportApp;
use well_report::{ClientConfig, PageClient};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::load()?;
    let client = PageClient::new(&config)?;
    tracing::info!(base_url = %client.base_url(), "starting well report client");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([720.0, 760.0])
            .with_min_inner_size([480.0, 520.0]),
        ..Default::default()
    };

    let title = config.window_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Box::new(ReportApp::new(cc, config, client))),
    )
    .map_err(|e| format!("failed to open window: {}", e))?;

    Ok(())
}
