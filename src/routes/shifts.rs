// src/routes/shifts.rs

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::ConstraintValidator;
use crate::models::{ExistingShift, ShiftPlacement, ShiftStatus, ValidationResult};
use crate::AppState;

use super::store_error;

#[derive(Debug, Deserialize)]
pub struct CreateShiftBody {
    pub user_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub role: String,
    #[serde(default = "default_status")]
    pub status: ShiftStatus,
    /// Manager override: accept the placement despite blocking violations.
    #[serde(default)]
    pub force: bool,
}

fn default_status() -> ShiftStatus {
    ShiftStatus::Published
}

#[derive(Debug, Serialize)]
pub struct CreateShiftResp {
    pub shift: ExistingShift,
    /// Present only when the shift was assigned and therefore validated.
    pub validation: Option<ValidationResult>,
}

pub async fn create_shift(
    State(state): State<AppState>,
    Path(facility_id): Path<Uuid>,
    Json(b): Json<CreateShiftBody>,
) -> Result<Json<CreateShiftResp>, (StatusCode, String)> {
    let placement = ShiftPlacement {
        date: b.date,
        start_time: b.start_time,
        end_time: b.end_time,
        role: b.role.clone(),
    };

    // Only assignment to a worker triggers the rule checks; an open shift
    // is bookkeeping, not a placement.
    let validation = match b.user_id {
        Some(user_id) => {
            let policy = state.store.policy(facility_id).map_err(store_error)?;
            let validator = ConstraintValidator::new(
                &policy.labor_rules,
                state.store.as_ref(),
                state.store.as_ref(),
            );
            let result = validator
                .validate_move(user_id, facility_id, &placement, None, b.force)
                .map_err(store_error)?;
            if !result.valid {
                let messages: Vec<&str> =
                    result.violations.iter().map(|v| v.message.as_str()).collect();
                return Err((StatusCode::CONFLICT, messages.join("; ")));
            }
            Some(result)
        }
        None => None,
    };

    let shift = state
        .store
        .create_shift(facility_id, b.user_id, &placement, b.status)
        .map_err(store_error)?;
    Ok(Json(CreateShiftResp { shift, validation }))
}

#[derive(Debug, Deserialize)]
pub struct ShiftWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

pub async fn list_shifts(
    State(state): State<AppState>,
    Path(facility_id): Path<Uuid>,
    Query(window): Query<ShiftWindow>,
) -> Result<Json<Vec<ExistingShift>>, (StatusCode, String)> {
    let shifts = state
        .store
        .list_shifts(facility_id, window.from, window.to)
        .map_err(store_error)?;
    Ok(Json(shifts))
}

pub async fn cancel_shift(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExistingShift>, (StatusCode, String)> {
    let shift = state.store.cancel_shift(id).map_err(store_error)?;
    Ok(Json(shift))
}
