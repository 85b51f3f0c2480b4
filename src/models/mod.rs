// src/models/mod.rs

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ───────────────────────────────────────
// Shifts
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftStatus {
    Draft,
    Published,
    Completed,
    Cancelled,
}

/// A proposed placement: where a shift would go if the caller commits it.
/// Not persisted by the engine; purely a computation input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftPlacement {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub role: String,
}

impl ShiftPlacement {
    pub fn duration_hours(&self) -> f64 {
        span_hours(self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingShift {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub facility_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub role: String,
    pub status: ShiftStatus,
}

impl ExistingShift {
    pub fn duration_hours(&self) -> f64 {
        span_hours(self.start_time, self.end_time)
    }
}

/// Span between two wall-clock times in fractional hours. An end before the
/// start means the shift crosses midnight.
pub fn span_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    let s = clock_hours(start);
    let e = clock_hours(end);
    if e < s {
        (24.0 - s) + e
    } else {
        e - s
    }
}

pub(crate) fn clock_hours(t: NaiveTime) -> f64 {
    f64::from(t.hour()) + f64::from(t.minute()) / 60.0
}

// ───────────────────────────────────────
// Validation output
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    MaxDailyHours,
    DailyRestViolation,
    ConsecutiveDaysViolation,
    WeeklyHoursViolation,
    ContractHoursViolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintViolation {
    pub code: ViolationCode,
    pub severity: Severity,
    pub message: String,
    /// Ids of the shifts that caused the conflict.
    pub affected_shifts: Vec<Uuid>,
}

/// Outcome of validating one placement. Violations are data, not errors:
/// the caller decides whether to block, warn, or force-override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ConstraintViolation>,
    /// Weekly hours the worker would carry if the placement is accepted.
    pub burden_score: f64,
    pub warnings: Vec<String>,
}

// ───────────────────────────────────────
// Contracts & leave
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Active,
    Suspended,
    Terminated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: Uuid,
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub max_weekly_hours: f64,
    pub annual_vacation_days: f64,
    pub status: ContractStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub days: f64,
    pub status: LeaveStatus,
}

// ───────────────────────────────────────
// Availability & workers
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityMark {
    Preferred,
    Available,
    Impossible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    Regular,
    Floater,
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub full_name: String,
    pub role: String,
    pub employment_type: EmploymentType,
    pub is_active: bool,
}

// ───────────────────────────────────────
// Gap resolution
// ───────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateCategory {
    InternalLowBalance,
    Internal,
    Floater,
    Overtime,
    External,
}

impl CandidateCategory {
    /// Sort precedence: lower sorts first, ahead of any raw score.
    pub fn precedence(self) -> u8 {
        match self {
            CandidateCategory::InternalLowBalance => 1,
            CandidateCategory::Internal => 2,
            CandidateCategory::Floater => 3,
            CandidateCategory::Overtime => 4,
            CandidateCategory::External => 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateScore {
    pub user_id: Uuid,
    pub score: i32,
    /// Human explanation of the dominant signal; last adjustment wins.
    pub reason: String,
    pub category: CandidateCategory,
    pub violations: Vec<ConstraintViolation>,
    pub vacation_balance: f64,
    pub weekly_hours: f64,
}

/// An unmet staffing need: the slot `resolve_gap` ranks candidates for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapRequest {
    pub date: NaiveDate,
    pub role: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapResolution {
    pub candidates: Vec<CandidateScore>,
    pub recommendation: Option<CandidateScore>,
    /// Set when a caller deadline cut the scan short.
    pub truncated: bool,
}

// ───────────────────────────────────────
// Coverage
// ───────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageRequirement {
    pub facility_id: Uuid,
    pub date: NaiveDate,
    pub role: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub required_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageGap {
    pub date: NaiveDate,
    pub role: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub required: u32,
    pub assigned: u32,
    pub missing: u32,
}
