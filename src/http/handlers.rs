use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::request::{ExecuteRequest, PlanRequest};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::tx::types::PlanId;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub signer: &'static str,
}

fn respond<T: Serialize>(route: &'static str, result: Result<T, ApiError>) -> Response {
    match result {
        Ok(body) => {
            metrics::record_request(route, StatusCode::OK.as_u16());
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                tracing::error!(route = route, status = %status, error = ?e, "Request failed");
            } else {
                tracing::debug!(route = route, status = %status, error = ?e, "Request rejected");
            }
            metrics::record_request(route, status.as_u16());
            e.into_response()
        }
    }
}

pub async fn plan_transfer(
    State(state): State<AppState>,
    body: Result<Json<PlanRequest>, JsonRejection>,
) -> Response {
    let result = async {
        let Json(request) = body?;
        let intent = request.into_intent()?;
        let plan = state.planner.plan_transfer(intent, state.signer.as_ref()).await?;
        Ok::<_, ApiError>(plan)
    }
    .await;
    respond("plan", result)
}

pub async fn execute_transfer(
    State(state): State<AppState>,
    body: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Response {
    let result = async {
        let Json(request) = body?;
        let plan_id = request
            .plan_id()
            .ok_or_else(|| ApiError::BadRequest(format!("malformed planId {:?}", request.plan_id)))?;
        let receipt = state
            .executor
            .execute_transfer(&plan_id, state.signer.clone())
            .await?;
        Ok::<_, ApiError>(receipt)
    }
    .await;
    respond("execute", result)
}

pub async fn get_status(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = id
        .parse::<PlanId>()
        .map_err(|_| ApiError::BadRequest(format!("malformed plan id {:?}", id)))
        .and_then(|plan_id| state.executor.get_tx_status(&plan_id).map_err(ApiError::from));
    respond("status", result)
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        signer: state.signer.kind().as_str(),
    })
}
