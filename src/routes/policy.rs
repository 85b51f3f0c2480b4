// src/routes/policy.rs

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::CoverageRequirement;
use crate::rules::FacilityPolicy;
use crate::AppState;

use super::store_error;

pub async fn get_policy(
    State(state): State<AppState>,
    Path(facility_id): Path<Uuid>,
) -> Result<Json<FacilityPolicy>, (StatusCode, String)> {
    let policy = state.store.policy(facility_id).map_err(store_error)?;
    Ok(Json(policy))
}

pub async fn put_policy(
    State(state): State<AppState>,
    Path(facility_id): Path<Uuid>,
    Json(policy): Json<FacilityPolicy>,
) -> Result<Json<FacilityPolicy>, (StatusCode, String)> {
    state
        .store
        .set_policy(facility_id, policy)
        .map_err(store_error)?;
    Ok(Json(policy))
}

#[derive(Debug, Deserialize)]
pub struct CoverageItem {
    pub date: NaiveDate,
    pub role: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub required_count: u32,
}

pub async fn bulk_upsert_coverage(
    State(state): State<AppState>,
    Path(facility_id): Path<Uuid>,
    Json(items): Json<Vec<CoverageItem>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let requirements: Vec<CoverageRequirement> = items
        .into_iter()
        .map(|it| CoverageRequirement {
            facility_id,
            date: it.date,
            role: it.role,
            start_time: it.start_time,
            end_time: it.end_time,
            required_count: it.required_count,
        })
        .collect();
    let count = state
        .store
        .upsert_requirements(requirements)
        .map_err(store_error)?;
    Ok(Json(serde_json::json!({"upserted": count})))
}
