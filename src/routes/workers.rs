// src/routes/workers.rs

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Contract, ContractStatus, EmploymentType, Worker};
use crate::store::ContractRepository;
use crate::AppState;

use super::store_error;

#[derive(Debug, Deserialize)]
pub struct CreateWorkerBody {
    pub full_name: String,
    pub role: String,
    #[serde(default = "default_employment")]
    pub employment_type: EmploymentType,
}

fn default_employment() -> EmploymentType {
    EmploymentType::Regular
}

pub async fn create_worker(
    State(state): State<AppState>,
    Path(facility_id): Path<Uuid>,
    Json(b): Json<CreateWorkerBody>,
) -> Result<Json<Worker>, (StatusCode, String)> {
    let worker = state
        .store
        .add_worker(facility_id, &b.full_name, &b.role, b.employment_type)
        .map_err(store_error)?;
    Ok(Json(worker))
}

pub async fn list_workers(
    State(state): State<AppState>,
    Path(facility_id): Path<Uuid>,
) -> Result<Json<Vec<Worker>>, (StatusCode, String)> {
    let workers = state.store.list_workers(facility_id).map_err(store_error)?;
    Ok(Json(workers))
}

#[derive(Debug, Deserialize)]
pub struct CreateContractBody {
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub max_weekly_hours: f64,
    pub annual_vacation_days: f64,
    #[serde(default = "default_contract_status")]
    pub status: ContractStatus,
}

fn default_contract_status() -> ContractStatus {
    ContractStatus::Active
}

pub async fn create_contract(
    State(state): State<AppState>,
    Json(b): Json<CreateContractBody>,
) -> Result<Json<Contract>, (StatusCode, String)> {
    let contract = state
        .store
        .add_contract(
            b.user_id,
            b.facility_id,
            b.max_weekly_hours,
            b.annual_vacation_days,
            b.status,
        )
        .map_err(store_error)?;
    Ok(Json(contract))
}

pub async fn get_active_contract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<Contract>>, (StatusCode, String)> {
    let contract = state.store.get_active_contract(id).map_err(store_error)?;
    Ok(Json(contract))
}
