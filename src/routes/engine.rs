// src/routes/engine.rs

use std::time::{Duration, Instant};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{coverage, ConstraintValidator, GapResolver};
use crate::models::{CoverageGap, GapRequest, GapResolution, ShiftPlacement, ValidationResult};
use crate::AppState;

use super::store_error;

#[derive(Debug, Deserialize)]
pub struct ValidateMoveBody {
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub placement: ShiftPlacement,
    #[serde(default)]
    pub exclude_shift_id: Option<Uuid>,
    #[serde(default)]
    pub force: bool,
}

pub async fn validate_move(
    State(state): State<AppState>,
    Json(b): Json<ValidateMoveBody>,
) -> Result<Json<ValidationResult>, (StatusCode, String)> {
    let policy = state.store.policy(b.facility_id).map_err(store_error)?;
    let validator =
        ConstraintValidator::new(&policy.labor_rules, state.store.as_ref(), state.store.as_ref());
    let result = validator
        .validate_move(b.user_id, b.facility_id, &b.placement, b.exclude_shift_id, b.force)
        .map_err(store_error)?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct ResolveGapBody {
    pub facility_id: Uuid,
    #[serde(flatten)]
    pub gap: GapRequest,
    /// Budget for the candidate scan; omitted means unbounded.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

pub async fn resolve_gap(
    State(state): State<AppState>,
    Json(b): Json<ResolveGapBody>,
) -> Result<Json<GapResolution>, (StatusCode, String)> {
    let policy = state.store.policy(b.facility_id).map_err(store_error)?;
    let resolver = GapResolver::new(
        &policy.labor_rules,
        &policy.scoring,
        state.store.as_ref(),
        state.store.as_ref(),
        state.store.as_ref(),
        state.store.as_ref(),
    );
    let deadline = b.timeout_ms.map(|ms| Instant::now() + Duration::from_millis(ms));
    let resolution = resolver
        .resolve_gap(b.facility_id, &b.gap, deadline)
        .map_err(store_error)?;
    Ok(Json(resolution))
}

#[derive(Debug, Deserialize)]
pub struct CoverageWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct CoverageStatusResp {
    pub facility_id: Uuid,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub gaps: Vec<CoverageGap>,
}

pub async fn coverage_status(
    State(state): State<AppState>,
    Path(facility_id): Path<Uuid>,
    Query(window): Query<CoverageWindow>,
) -> Result<Json<CoverageStatusResp>, (StatusCode, String)> {
    let requirements = state
        .store
        .list_requirements(facility_id, window.from, window.to)
        .map_err(store_error)?;
    let shifts = state
        .store
        .list_shifts(facility_id, window.from, window.to)
        .map_err(store_error)?;
    let gaps = coverage::find_gaps(&requirements, &shifts);
    Ok(Json(CoverageStatusResp {
        facility_id,
        from: window.from,
        to: window.to,
        gaps,
    }))
}
