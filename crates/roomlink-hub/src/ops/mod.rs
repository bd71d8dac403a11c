//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness plus per-endpoint session counts

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::app_state::AppState;
use crate::realtime::Endpoint;

pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    let core = state.realtime();
    let body = format!(
        "ok lobby={} lights={}",
        core.sessions(Endpoint::Lobby).len(),
        core.sessions(Endpoint::Lights).len()
    );
    (StatusCode::OK, body)
}
