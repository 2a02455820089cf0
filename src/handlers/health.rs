use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{repository::Query, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub store: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Liveness plus a cheap round trip to the document store.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let reachable = match state.stores.users.count(&Query::new()).await {
        Ok(_) => true,
        Err(e) => {
            tracing::error!("Health check could not reach the store: {}", e);
            false
        }
    };

    let status = if reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if reachable { "UP" } else { "DOWN" },
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            store: if reachable { "reachable" } else { "unreachable" },
            timestamp: Utc::now(),
        }),
    )
}
