// src/routes/mod.rs

use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Router;

use crate::store::StoreError;
use crate::AppState;

pub mod availability;
pub mod engine;
pub mod health;
pub mod policy;
pub mod shifts;
pub mod workers;

// Common error mapper
pub fn store_error(e: StoreError) -> (StatusCode, String) {
    let status = match &e {
        StoreError::UnknownWorker(_) | StoreError::UnknownShift(_) => StatusCode::NOT_FOUND,
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, e.to_string())
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // health
        .route("/health", get(health::health))
        // engine operations
        .route("/api/v1/engine/validate-move", post(engine::validate_move))
        .route("/api/v1/engine/resolve-gap", post(engine::resolve_gap))
        .route(
            "/api/v1/facilities/:facility_id/coverage-status",
            get(engine::coverage_status),
        )
        // workers & contracts
        .route(
            "/api/v1/facilities/:facility_id/workers",
            post(workers::create_worker).get(workers::list_workers),
        )
        .route("/api/v1/contracts", post(workers::create_contract))
        .route(
            "/api/v1/workers/:id/contract",
            get(workers::get_active_contract),
        )
        // shifts
        .route(
            "/api/v1/facilities/:facility_id/shifts",
            post(shifts::create_shift).get(shifts::list_shifts),
        )
        .route("/api/v1/shifts/:id/cancel", post(shifts::cancel_shift))
        // availability & leave
        .route("/api/v1/availability/bulk", post(availability::bulk_upsert_marks))
        .route("/api/v1/leave", post(availability::create_leave_request))
        .route(
            "/api/v1/workers/:id/vacation-balance",
            get(availability::vacation_balance),
        )
        // facility policy & coverage requirements
        .route(
            "/api/v1/facilities/:facility_id/policy",
            get(policy::get_policy).put(policy::put_policy),
        )
        .route(
            "/api/v1/facilities/:facility_id/coverage/bulk",
            put(policy::bulk_upsert_coverage),
        )
        .with_state(state)
}
