use anyhow::Result;

use orb_engine::logging::init_logging;
use orb_engine::window::Runtime;
use orb_viewer::{PlanetApp, ViewerConfig};

fn main() -> Result<()> {
    let (config, load_error) = match ViewerConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (ViewerConfig::default(), Some(e)),
    };

    init_logging(config.logging_config());

    if let Some(e) = load_error {
        log::warn!("{e}; falling back to defaults");
    }

    log::info!(
        "starting {} ({}x{}{})",
        config.window.title,
        config.window.width,
        config.window.height,
        if config.window.fullscreen { ", fullscreen" } else { "" }
    );

    let app = PlanetApp::new(&config.render);
    Runtime::run(config.runtime_config(), config.gpu_init(), app)
}
