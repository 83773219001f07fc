//! HTTP Boundary (C8): `POST /optimize` and `GET /health`.

use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::{get, post}, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::config::ServerConfig;
use crate::dto::{OptimizeRequestDto, OptimizeResponseDto};
use crate::error::SchedulerError;
use crate::optimize::optimize;

#[derive(Clone)]
pub struct AppState {
    pub solve_budget: Duration,
}

impl From<&ServerConfig> for AppState {
    fn from(config: &ServerConfig) -> Self {
        Self {
            solve_budget: config.solve_budget,
        }
    }
}

/// Request logging goes through `tower_http`'s `TraceLayer` rather than a
/// bespoke middleware, the same ambient-observability layer the teacher's
/// sibling quickstarts carry; this crate has no CORS or static-asset
/// surface to wire up (out of scope per spec §1), so it's the layer's only
/// use here.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/optimize", post(optimize_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "UP" }))
}

async fn optimize_handler(
    State(state): State<AppState>,
    Json(dto): Json<OptimizeRequestDto>,
) -> Result<Json<OptimizeResponseDto>, ApiError> {
    let request = dto.into_domain()?;
    let budget = state.solve_budget;

    let response = tokio::task::spawn_blocking(move || optimize(request, budget))
        .await
        .map_err(|e| {
            error!(%e, "solve task panicked");
            SchedulerError::InternalFault("solver task panicked".to_string())
        })??;

    Ok(Json(response.into()))
}

struct ApiError(SchedulerError);

impl From<SchedulerError> for ApiError {
    fn from(e: SchedulerError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self.0 {
            SchedulerError::BadInput(reason) => (StatusCode::BAD_REQUEST, json!({ "error": reason })),
            SchedulerError::InternalFault(id) => {
                error!(fault_id = %id, "internal fault");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal fault", "id": id }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_input_maps_to_400() {
        let err = ApiError(SchedulerError::BadInput("no tasks provided".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_fault_maps_to_500() {
        let err = ApiError(SchedulerError::InternalFault("abc-123".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
