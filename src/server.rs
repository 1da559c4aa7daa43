//! JSON HTTP front end: `POST /improve` and `GET /health`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

use crate::error::ImproveError;
use crate::service::ImprovementService;

#[derive(Clone)]
struct AppState {
    service: Arc<ImprovementService>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImproveBody {
    #[serde(default)]
    input_text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImprovedBody {
    improved_text: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Builds the application router around a shared service.
pub fn router(service: Arc<ImprovementService>) -> Router {
    Router::new()
        .route("/improve", post(improve_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { service })
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(addr: SocketAddr, service: Arc<ImprovementService>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn status_for(error: &ImproveError) -> StatusCode {
    match error {
        ImproveError::Validation { .. } => StatusCode::BAD_REQUEST,
        ImproveError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        ImproveError::Provider { .. } | ImproveError::Transport { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

async fn improve_handler(
    State(state): State<AppState>,
    payload: Result<Json<ImproveBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected request body");
            return error_response(
                StatusCode::BAD_REQUEST,
                "Request body must be JSON with an inputText string",
            );
        }
    };

    let input = body.input_text.unwrap_or_default();
    match state.service.improve(&input).await {
        Ok(improved_text) => (StatusCode::OK, Json(ImprovedBody { improved_text })).into_response(),
        Err(err) => {
            if err.is_provider_failure() {
                tracing::warn!(error = %err, "provider call failed");
            }
            error_response(status_for(&err), err.to_string())
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "provider": state.service.config().provider,
    }))
}
