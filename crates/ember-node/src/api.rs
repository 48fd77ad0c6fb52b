use std::fmt::Write;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use tokio::net::TcpListener;

use crate::state::SharedState;

async fn healthz(State(state): State<SharedState>) -> impl IntoResponse {
    let st = state.read().await;
    if st.is_ready() {
        (StatusCode::OK, "ok".to_string())
    } else if let Some(failure) = st.failure.as_ref() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("failed at {}: {}", failure.stage, failure.message),
        )
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, format!("starting: {}", st.stage))
    }
}

async fn status(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.read().await.clone())
}

async fn metrics(State(state): State<SharedState>) -> impl IntoResponse {
    let st = state.read().await.clone();
    let mut out = String::new();

    let gauges = [
        ("ember_bootstrap_inference_server_up", "Inference server launched and running.", st.inference_server_up),
        ("ember_bootstrap_model_fetched", "Configured model pulled into the model store.", st.model_fetched),
        ("ember_bootstrap_ui_server_up", "UI server launched and running.", st.ui_server_up),
        ("ember_bootstrap_ready", "Bootstrap reached the ready stage without failure.", st.is_ready()),
    ];
    for (name, help, value) in gauges {
        let _ = writeln!(out, "# HELP {name} {help}");
        let _ = writeln!(out, "# TYPE {name} gauge");
        let _ = writeln!(out, "{name}{{model=\"{}\"}} {}", st.model, u8::from(value));
    }

    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        out,
    )
}

/// Status API served next to the two managed services.
pub fn status_router(state: SharedState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/status", get(status))
        .route("/metrics", get(metrics))
        .with_state(state)
}

pub async fn serve_status(listener: TcpListener, state: SharedState) -> std::io::Result<()> {
    axum::serve(listener, status_router(state)).await
}
