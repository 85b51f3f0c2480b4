// src/store/mod.rs
//
// Read-only collaborator interfaces the engine depends on. The engine never
// sees the backing technology; a document store, SQL, or the in-memory
// implementation below all look the same through these traits.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AvailabilityMark, Contract, ExistingShift, Worker};

pub mod memory;

pub use memory::MemoryStore;

/// Operational failure of a collaborator read. Rule violations are never
/// reported this way; they travel inside `ValidationResult`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown worker {0}")]
    UnknownWorker(Uuid),
    #[error("unknown shift {0}")]
    UnknownShift(Uuid),
    #[error("backing store unavailable: {0}")]
    Unavailable(String),
}

pub trait ShiftRepository: Send + Sync {
    /// Every non-cancelled shift of the worker at the facility
    /// (`DRAFT`, `PUBLISHED` and `COMPLETED`; never `CANCELLED`).
    fn list_active_shifts(
        &self,
        user_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Vec<ExistingShift>, StoreError>;
}

pub trait ContractRepository: Send + Sync {
    fn get_active_contract(&self, user_id: Uuid) -> Result<Option<Contract>, StoreError>;
}

pub trait AvailabilityRepository: Send + Sync {
    fn get_mark(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AvailabilityMark>, StoreError>;

    /// Annual entitlement of the active contract minus leave days already
    /// used or pending approval. Negative when the worker overdrew.
    fn vacation_balance(&self, user_id: Uuid, facility_id: Uuid) -> Result<f64, StoreError>;
}

pub trait WorkerDirectory: Send + Sync {
    fn list_active_by_role(
        &self,
        facility_id: Uuid,
        role: &str,
    ) -> Result<Vec<Worker>, StoreError>;
}
