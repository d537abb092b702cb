use anyhow::Result;
use starcharge::api::{HttpTransport, ReqwestTransport};
use starcharge::config::Config;
use starcharge::logging::{get_logger, init_logging};
use starcharge::setup::{ConfigValidator, SetupFlow};
use starcharge::station::Station;
use starcharge::web::{AppState, serve};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;
    init_logging(&config.logging)?;
    config.validate()?;

    let logger = get_logger("main");
    logger.info(&format!(
        "StarCharge bridge {} starting up",
        env!("APP_VERSION")
    ));

    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(Duration::from_secs(
        config.request_timeout_secs,
    ))?);
    let validator = ConfigValidator::new(transport.clone());

    let raw = config.read_api_config_text()?;
    let api_config = match validator.validate(&raw).await {
        Ok(api_config) => api_config,
        Err(e) => {
            logger.error(&format!("API configuration rejected: {} ({})", e, e.form_code()));
            return Err(anyhow::anyhow!("Setup failed: {}", e.form_code()));
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = shutdown_tx.send(true);
    });

    let interval = Duration::from_secs(config.scan_interval_secs);
    let mut shutdown = shutdown_rx.clone();
    let station = loop {
        let attempt = tokio::select! {
            _ = shutdown.wait_for(|stop| *stop) => None,
            res = Station::setup(api_config.clone(), transport.clone(), interval) => Some(res),
        };
        match attempt {
            Some(Ok(station)) => break station,
            Some(Err(e)) => {
                logger.warn(&format!("{}; retrying in {}s", e, interval.as_secs()));
                tokio::select! {
                    _ = shutdown.wait_for(|stop| *stop) => return Ok(()),
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            None => {
                logger.info("Shutdown before the station became ready");
                return Ok(());
            }
        }
    };

    let coordinator = station.coordinator();
    let web_task = if config.web.enabled {
        let state = AppState {
            station_id: station.station_id().to_string(),
            state_rx: coordinator.subscribe(),
            sensors: station.sensors(),
            setup: SetupFlow::new(validator),
        };
        let web_logger = logger.clone();
        let (host, port) = (config.web.host.clone(), config.web.port);
        Some(tokio::spawn(async move {
            if let Err(e) = serve(state, &host, port).await {
                web_logger.error(&format!("Web server error: {}", e));
            }
        }))
    } else {
        None
    };

    coordinator.run(shutdown_rx).await;

    if let Some(task) = web_task {
        task.abort();
    }
    logger.info("StarCharge bridge shutdown complete");
    Ok(())
}
