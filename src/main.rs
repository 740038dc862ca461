use std::sync::Arc;

use anyhow::{anyhow, Context};
use eframe::egui;

use spacex_dash::app::SpaceXDashApp;
use spacex_dash::config::DashConfig;
use spacex_dash::data::loader::load_file;
use spacex_dash::dashboard_callbacks;
use spacex_dash::server::{BridgeState, HttpBridge};
use spacex_dash::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Arc::new(DashConfig::from_env());

    // A dataset that cannot be loaded is fatal; nothing to show without it.
    let dataset = Arc::new(load_file(&config.data_path)?);
    let registry = Arc::new(dashboard_callbacks().context("wiring dashboard callbacks")?);

    let bridge = HttpBridge::start(
        BridgeState {
            dataset: dataset.clone(),
            registry: registry.clone(),
            config: config.clone(),
        },
        config.bind_address(),
    )?;

    let mut state = AppState::new(dataset, registry, config);
    state.http_address = Some(bridge.local_addr());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SpaceX Launch Records Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SpaceXDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))?;

    log::info!("Window closed, stopping HTTP bridge on {}", bridge.local_addr());
    Ok(())
}
