//! HTTP front end: `POST /analyze` and a `GET /` health check.

use crate::analyzer::{AnalysisError, ScamAnalyzer};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

const MESSAGE_REQUIRED: &str = "Message is required";
const SERVICE_VERSION: &str = "1.0.0";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub message: Option<Value>,
}

pub fn build_router(analyzer: ScamAnalyzer) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/analyze", post(analyze))
        .layer(cors)
        .with_state(analyzer)
}

pub async fn serve(analyzer: ScamAnalyzer, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, build_router(analyzer))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "ScamShield Backend Running",
        "version": SERVICE_VERSION,
    }))
}

async fn analyze(
    State(analyzer): State<ScamAnalyzer>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let message = match payload {
        Ok(Json(request)) => request
            .message
            .and_then(|value| value.as_str().map(str::to_owned)),
        Err(rejection) => {
            log::debug!("Rejected analyze body: {rejection}");
            None
        }
    };

    let Some(message) = message.filter(|m| !m.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED);
    };

    match analyzer.analyze(&message).await {
        Ok(verdict) => Json(verdict).into_response(),
        Err(AnalysisError::InvalidInput(reason)) => {
            error_response(StatusCode::BAD_REQUEST, &reason)
        }
        Err(e @ AnalysisError::Internal(_)) => {
            log::error!("Server error: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Analysis failed")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
