use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::Result;
use log::{error, info};
use signal_hook::consts::{SIGINT, SIGTERM};

use rentscout::{
    audit::AuditLog,
    config::{self, Config},
    db::{self, PgRepository},
    logger::setup_logger,
    scrapingbee::ScrapingBeeClient,
    web::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    setup_logger()?;

    let config: Arc<Config> = Arc::new(config::read_config());

    // Flipped by SIGINT / SIGTERM
    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGINT, Arc::clone(&shutdown))?;
    signal_hook::flag::register(SIGTERM, Arc::clone(&shutdown))?;
    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel::<()>(1);

    let state = AppState {
        config: config.clone(),
        extractor: Arc::new(ScrapingBeeClient::new(&config)?),
        repository: Arc::new(PgRepository::new(db::create_pool(&config))),
        audit: Arc::new(AuditLog::new(&config.audit_log_path)),
    };

    let watcher_handle = tokio::task::spawn(async move {
        while !shutdown.load(Ordering::Acquire) {
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        info!("Shutdown requested, draining in-flight requests");
        let _ = shutdown_tx.send(());
    });

    let server_result = web::start_http_server(state, shutdown_rx).await;
    watcher_handle.abort();

    if let Err(err) = &server_result {
        error!("Error: {:?}", err)
    }

    server_result
}
