// src/routes/availability.rs

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{AvailabilityMark, LeaveRequest, LeaveStatus};
use crate::store::AvailabilityRepository;
use crate::AppState;

use super::store_error;

#[derive(Debug, Deserialize)]
pub struct MarkUpsertItem {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub mark: AvailabilityMark,
}

pub async fn bulk_upsert_marks(
    State(state): State<AppState>,
    Json(items): Json<Vec<MarkUpsertItem>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    for it in &items {
        state
            .store
            .set_mark(it.user_id, it.date, it.mark)
            .map_err(store_error)?;
    }
    Ok(Json(serde_json::json!({"upserted": true, "count": items.len()})))
}

#[derive(Debug, Deserialize)]
pub struct CreateLeaveBody {
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub days: f64,
    #[serde(default = "default_leave_status")]
    pub status: LeaveStatus,
}

fn default_leave_status() -> LeaveStatus {
    LeaveStatus::Pending
}

pub async fn create_leave_request(
    State(state): State<AppState>,
    Json(b): Json<CreateLeaveBody>,
) -> Result<Json<LeaveRequest>, (StatusCode, String)> {
    let request = state
        .store
        .add_leave_request(b.user_id, b.facility_id, b.days, b.status)
        .map_err(store_error)?;
    Ok(Json(request))
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub facility_id: Uuid,
}

pub async fn vacation_balance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<BalanceQuery>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let balance = state
        .store
        .vacation_balance(id, q.facility_id)
        .map_err(store_error)?;
    Ok(Json(serde_json::json!({
        "user_id": id,
        "facility_id": q.facility_id,
        "balance": balance,
    })))
}
