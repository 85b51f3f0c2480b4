// src/store/memory.rs
//
// In-memory implementation of the collaborator interfaces plus the write
// operations the service surface needs. Persistence technology is out of
// scope for the engine; this store is the bundled test/demo collaborator.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{
    AvailabilityMark, Contract, ContractStatus, CoverageRequirement, EmploymentType,
    ExistingShift, LeaveRequest, LeaveStatus, ShiftPlacement, ShiftStatus, Worker,
};
use crate::rules::FacilityPolicy;

use super::{
    AvailabilityRepository, ContractRepository, ShiftRepository, StoreError, WorkerDirectory,
};

#[derive(Default)]
struct Inner {
    // Vecs keep insertion order; roster order is the tie-breaker the
    // ranker's stable sort preserves.
    workers: Vec<Worker>,
    shifts: Vec<ExistingShift>,
    contracts: Vec<Contract>,
    leave: Vec<LeaveRequest>,
    marks: HashMap<(Uuid, NaiveDate), AvailabilityMark>,
    policies: HashMap<Uuid, FacilityPolicy>,
    requirements: Vec<CoverageRequirement>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("state lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("state lock poisoned".into()))
    }

    // ---------- workers ----------

    pub fn add_worker(
        &self,
        facility_id: Uuid,
        full_name: &str,
        role: &str,
        employment_type: EmploymentType,
    ) -> Result<Worker, StoreError> {
        let worker = Worker {
            id: Uuid::new_v4(),
            facility_id,
            full_name: full_name.to_owned(),
            role: role.to_owned(),
            employment_type,
            is_active: true,
        };
        self.write()?.workers.push(worker.clone());
        Ok(worker)
    }

    pub fn list_workers(&self, facility_id: Uuid) -> Result<Vec<Worker>, StoreError> {
        Ok(self
            .read()?
            .workers
            .iter()
            .filter(|w| w.facility_id == facility_id)
            .cloned()
            .collect())
    }

    // ---------- shifts ----------

    pub fn create_shift(
        &self,
        facility_id: Uuid,
        user_id: Option<Uuid>,
        placement: &ShiftPlacement,
        status: ShiftStatus,
    ) -> Result<ExistingShift, StoreError> {
        let shift = ExistingShift {
            id: Uuid::new_v4(),
            user_id,
            facility_id,
            date: placement.date,
            start_time: placement.start_time,
            end_time: placement.end_time,
            role: placement.role.clone(),
            status,
        };
        self.write()?.shifts.push(shift.clone());
        Ok(shift)
    }

    pub fn cancel_shift(&self, shift_id: Uuid) -> Result<ExistingShift, StoreError> {
        let mut inner = self.write()?;
        let shift = inner
            .shifts
            .iter_mut()
            .find(|s| s.id == shift_id)
            .ok_or(StoreError::UnknownShift(shift_id))?;
        shift.status = ShiftStatus::Cancelled;
        Ok(shift.clone())
    }

    /// All shifts of the facility inside the date range, cancelled included.
    pub fn list_shifts(
        &self,
        facility_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ExistingShift>, StoreError> {
        Ok(self
            .read()?
            .shifts
            .iter()
            .filter(|s| s.facility_id == facility_id && s.date >= from && s.date <= to)
            .cloned()
            .collect())
    }

    // ---------- contracts & leave ----------

    pub fn add_contract(
        &self,
        user_id: Uuid,
        facility_id: Uuid,
        max_weekly_hours: f64,
        annual_vacation_days: f64,
        status: ContractStatus,
    ) -> Result<Contract, StoreError> {
        let contract = Contract {
            id: Uuid::new_v4(),
            user_id,
            facility_id,
            max_weekly_hours,
            annual_vacation_days,
            status,
        };
        self.write()?.contracts.push(contract.clone());
        Ok(contract)
    }

    pub fn add_leave_request(
        &self,
        user_id: Uuid,
        facility_id: Uuid,
        days: f64,
        status: LeaveStatus,
    ) -> Result<LeaveRequest, StoreError> {
        let request = LeaveRequest {
            id: Uuid::new_v4(),
            user_id,
            facility_id,
            days,
            status,
        };
        self.write()?.leave.push(request.clone());
        Ok(request)
    }

    // ---------- availability ----------

    pub fn set_mark(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        mark: AvailabilityMark,
    ) -> Result<(), StoreError> {
        self.write()?.marks.insert((user_id, date), mark);
        Ok(())
    }

    // ---------- policy & coverage requirements ----------

    /// The facility's rule/weight bundle; statutory defaults when none set.
    pub fn policy(&self, facility_id: Uuid) -> Result<FacilityPolicy, StoreError> {
        Ok(self
            .read()?
            .policies
            .get(&facility_id)
            .copied()
            .unwrap_or_default())
    }

    pub fn set_policy(&self, facility_id: Uuid, policy: FacilityPolicy) -> Result<(), StoreError> {
        self.write()?.policies.insert(facility_id, policy);
        Ok(())
    }

    pub fn upsert_requirements(
        &self,
        items: Vec<CoverageRequirement>,
    ) -> Result<usize, StoreError> {
        let mut inner = self.write()?;
        let count = items.len();
        for item in items {
            inner.requirements.retain(|r| {
                !(r.facility_id == item.facility_id
                    && r.date == item.date
                    && r.role == item.role
                    && r.start_time == item.start_time
                    && r.end_time == item.end_time)
            });
            inner.requirements.push(item);
        }
        Ok(count)
    }

    pub fn list_requirements(
        &self,
        facility_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CoverageRequirement>, StoreError> {
        Ok(self
            .read()?
            .requirements
            .iter()
            .filter(|r| r.facility_id == facility_id && r.date >= from && r.date <= to)
            .cloned()
            .collect())
    }
}

impl ShiftRepository for MemoryStore {
    fn list_active_shifts(
        &self,
        user_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Vec<ExistingShift>, StoreError> {
        Ok(self
            .read()?
            .shifts
            .iter()
            .filter(|s| {
                s.user_id == Some(user_id)
                    && s.facility_id == facility_id
                    && s.status != ShiftStatus::Cancelled
            })
            .cloned()
            .collect())
    }
}

impl ContractRepository for MemoryStore {
    fn get_active_contract(&self, user_id: Uuid) -> Result<Option<Contract>, StoreError> {
        Ok(self
            .read()?
            .contracts
            .iter()
            .find(|c| c.user_id == user_id && c.status == ContractStatus::Active)
            .cloned())
    }
}

impl AvailabilityRepository for MemoryStore {
    fn get_mark(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AvailabilityMark>, StoreError> {
        Ok(self.read()?.marks.get(&(user_id, date)).copied())
    }

    fn vacation_balance(&self, user_id: Uuid, facility_id: Uuid) -> Result<f64, StoreError> {
        let inner = self.read()?;
        if !inner.workers.iter().any(|w| w.id == user_id) {
            return Err(StoreError::UnknownWorker(user_id));
        }
        let entitlement = inner
            .contracts
            .iter()
            .find(|c| {
                c.user_id == user_id
                    && c.facility_id == facility_id
                    && c.status == ContractStatus::Active
            })
            .map(|c| c.annual_vacation_days)
            .unwrap_or(0.0);
        let booked: f64 = inner
            .leave
            .iter()
            .filter(|l| {
                l.user_id == user_id
                    && l.facility_id == facility_id
                    && l.status != LeaveStatus::Rejected
            })
            .map(|l| l.days)
            .sum();
        Ok(entitlement - booked)
    }
}

impl WorkerDirectory for MemoryStore {
    fn list_active_by_role(
        &self,
        facility_id: Uuid,
        role: &str,
    ) -> Result<Vec<Worker>, StoreError> {
        Ok(self
            .read()?
            .workers
            .iter()
            .filter(|w| w.facility_id == facility_id && w.role == role && w.is_active)
            .cloned()
            .collect())
    }
}
