//! Public status page for front-end identification.

use std::env::var;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;

/// Structured status.
#[derive(Serialize)]
pub struct Status {
    version: String,
    name: String,
    message: String,
}

/// Public server status.
pub async fn status() -> Json<Status> {
    Json(Status {
        version: env!("CARGO_PKG_VERSION").into(),
        name: if let Ok(name) = var("SERVER_NAME") {
            name
        } else {
            env!("CARGO_CRATE_NAME").into()
        },
        message: "blood donation server is running".into(),
    })
}

/// Prometheus exposition endpoint.
pub async fn metrics(State(state): State<AppState>) -> String {
    state.prometheus.render()
}
