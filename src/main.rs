use std::sync::Arc;
use tokio::runtime::Runtime;
use anyhow::{anyhow, Result};

mod app;
mod config;
mod counter;
mod gui;
mod logger;
mod report;
mod store;
mod tasks;

use crate::app::AppState;
use crate::config::Config;
use crate::tasks::capture;

fn main() -> Result<()> {
    logger::init()?;
    log::info!("Starting keystroke counter...");

    let config = Config::load()?;
    let rt = Runtime::new()?;

    // Refuse to start when global key capture is unusable.
    capture::probe()?;

    let state = AppState::initialize(&config)?;

    if !config.has_report_config() {
        log::warn!("no report URL configured, the Post button will be a no-op");
    }

    capture::spawn(Arc::clone(&state));

    gui::run(Arc::clone(&state), rt.handle().clone())
        .map_err(|e| anyhow!("window error: {}", e))?;

    log::info!("Keystroke counter exiting");
    Ok(())
}
