//! Axum-based HTTP surface exposing sensor states and the setup form

use crate::coordinator::CoordinatorState;
use crate::logging::{LogContext, get_logger_with_context};
use crate::sensor::StationSensor;
use crate::setup::SetupFlow;
use crate::station::sensor_states;
use crate::status::StationStatus;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub station_id: String,
    pub state_rx: watch::Receiver<Arc<CoordinatorState>>,
    pub sensors: Arc<Vec<StationSensor>>,
    pub setup: SetupFlow,
}

#[derive(Debug, Deserialize)]
pub struct SetupBody {
    pub config_json: String,
}

pub(crate) async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(crate) async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let current = state.state_rx.borrow().clone();
    let station_status = current
        .snapshot
        .as_ref()
        .and_then(|s| s.stub_status())
        .map_or(StationStatus::Unknown, StationStatus::from_code);
    Json(serde_json::json!({
        "version": env!("APP_VERSION"),
        "station_id": state.station_id,
        "station_status": station_status.as_str(),
        "last_update_success": current.last_update_success,
        "last_error": current.last_error,
        "last_update": current.last_update,
        "last_success": current.last_success,
        "total_polls": current.total_polls,
        "failed_polls": current.failed_polls,
        "data": current.snapshot,
    }))
}

pub(crate) async fn sensors(State(state): State<AppState>) -> impl IntoResponse {
    let current = state.state_rx.borrow().clone();
    Json(sensor_states(&state.sensors, &current))
}

pub(crate) async fn sensor(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
) -> impl IntoResponse {
    let current = state.state_rx.borrow().clone();
    match state.sensors.iter().find(|s| s.unique_id() == unique_id) {
        Some(s) => (StatusCode::OK, Json(serde_json::json!(s.state(&current)))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": format!("unknown sensor {}", unique_id)})),
        ),
    }
}

pub(crate) async fn submit_setup(
    State(state): State<AppState>,
    Json(body): Json<SetupBody>,
) -> impl IntoResponse {
    Json(state.setup.submit(&body.config_json).await)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/status", get(status))
        .route("/api/sensors", get(sensors))
        .route("/api/sensors/{unique_id}", get(sensor))
        .route("/api/setup", post(submit_setup))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let state_station_id = state.station_id.clone();
    let router = build_router(state);

    let logger = get_logger_with_context(
        LogContext::new("web")
            .with_station_id(&state_station_id)
            .with_field("port", port.to_string()),
    );
    logger.info(&format!("Starting web server; requested host={}", host));

    let addr = match host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port),
        Err(_) => {
            logger.warn(&format!("Invalid host '{}'; falling back to 127.0.0.1", host));
            ([127, 0, 0, 1], port).into()
        }
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    logger.info(&format!(
        "Web server listening at http://{}:{} (API /api)",
        local_addr.ip(),
        local_addr.port()
    ));

    axum::serve(listener, router).await?;
    Ok(())
}
