use anyhow::Context;
use quill::{error, logging, EditorConfig, TuiApplication};

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();

    let (config, config_error) = EditorConfig::load();
    let log_path = config.log_path();
    logging::init(config.log_level_filter(), log_path.as_deref());
    log::info!("quill {} starting", env!("CARGO_PKG_VERSION"));

    let mut app = TuiApplication::new(config);
    if let Some(err) = config_error {
        log::warn!("{}", err);
        app.controller_mut().show_error(&err);
    }

    app.run().context("terminal session failed")?;
    log::info!("quill exited");
    Ok(())
}
