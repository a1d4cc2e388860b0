use folio_bridge::app::FolioApp;
use folio_bridge::config::FolioConfig;
use folio_bridge::{radar, shell};

use folio_core::FolioEngine;

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    let config = FolioConfig::load()?;
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;

    // The screen belongs to the UI, so logs go to a file.
    let log_file = File::create(config.log_path())
        .with_context(|| format!("Failed to open {}", config.log_path().display()))?;
    tracing_subscriber::fmt()
        .with_max_level(if config.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    info!("=== Folio Starting ===");

    let engine = FolioEngine::open(config.content_path.as_deref(), &config.db_path())?;
    let mut app = FolioApp::with_engine(engine);

    let (radar_tx, radar_rx) = mpsc::channel(1);
    let radar_task = radar::spawn(
        &config,
        app.engine.radar_config().cloned(),
        app.engine.vault().clone(),
        radar_tx,
    );

    let outcome = shell::run(&mut app, radar_rx).await;

    if let Some(task) = radar_task {
        task.abort();
    }
    app.engine.shutdown();
    info!("=== Folio Stopped ===");

    outcome
}
