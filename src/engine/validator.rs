//! Shift constraint validation.
//!
//! Evaluates one proposed placement against the facility's labor rule set,
//! the worker's other shifts, and the worker's contract. Every check runs;
//! the result accumulates all applicable violations instead of stopping at
//! the first. Rule violations are data in the returned result; only
//! collaborator failures surface as errors.

use chrono::{NaiveDate, Weekday};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{
    clock_hours, ConstraintViolation, ExistingShift, Severity, ShiftPlacement, ValidationResult,
    ViolationCode,
};
use crate::rules::LaborRuleSet;
use crate::store::{ContractRepository, ShiftRepository, StoreError};

pub struct ConstraintValidator<'a> {
    rules: &'a LaborRuleSet,
    shifts: &'a dyn ShiftRepository,
    contracts: &'a dyn ContractRepository,
}

impl<'a> ConstraintValidator<'a> {
    pub fn new(
        rules: &'a LaborRuleSet,
        shifts: &'a dyn ShiftRepository,
        contracts: &'a dyn ContractRepository,
    ) -> Self {
        Self {
            rules,
            shifts,
            contracts,
        }
    }

    /// Validates placing `placement` for the given worker at the facility.
    ///
    /// `exclude_shift_id` removes one shift from consideration (the
    /// shift-move case, where the old occurrence must not conflict with its
    /// own new position). With `force`, blocking violations are kept but
    /// downgraded to warnings and the result reports `valid`.
    pub fn validate_move(
        &self,
        user_id: Uuid,
        facility_id: Uuid,
        placement: &ShiftPlacement,
        exclude_shift_id: Option<Uuid>,
        force: bool,
    ) -> Result<ValidationResult, StoreError> {
        tracing::debug!(%user_id, %facility_id, date = %placement.date, "validating placement");

        let mut shifts = self.shifts.list_active_shifts(user_id, facility_id)?;
        shifts.retain(|s| Some(s.id) != exclude_shift_id);
        // Deterministic order regardless of how the collaborator returns rows.
        shifts.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));

        let mut violations: Vec<ConstraintViolation> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        let duration = placement.duration_hours();
        if duration > self.rules.max_daily_hours {
            violations.push(ConstraintViolation {
                code: ViolationCode::MaxDailyHours,
                severity: Severity::Error,
                message: format!(
                    "Shift duration ({}h) exceeds maximum daily hours ({}h)",
                    fmt_hours(duration),
                    fmt_hours(self.rules.max_daily_hours)
                ),
                affected_shifts: Vec::new(),
            });
        }

        self.check_daily_rest(placement, &shifts, &mut violations);
        self.check_consecutive_days(placement.date, &shifts, &mut violations);
        let weekly_hours =
            self.check_weekly_hours(placement.date, duration, &shifts, &mut violations);

        if let Some(contract) = self.contracts.get_active_contract(user_id)? {
            if weekly_hours > contract.max_weekly_hours {
                violations.push(ConstraintViolation {
                    code: ViolationCode::ContractHoursViolation,
                    severity: Severity::Error,
                    message: format!(
                        "Weekly hours ({}h) exceed contract limit ({}h)",
                        fmt_hours(weekly_hours),
                        fmt_hours(contract.max_weekly_hours)
                    ),
                    affected_shifts: Vec::new(),
                });
            } else if weekly_hours > contract.max_weekly_hours * 0.9 {
                warnings.push(format!(
                    "Approaching contract limit ({}h / {}h)",
                    fmt_hours(weekly_hours),
                    fmt_hours(contract.max_weekly_hours)
                ));
            }
        }

        if force && !violations.is_empty() {
            warnings.insert(
                0,
                format!(
                    "Force override: {} violation(s) bypassed by manager",
                    violations.len()
                ),
            );
            let violations = violations
                .into_iter()
                .map(|mut v| {
                    v.severity = Severity::Warning;
                    v
                })
                .collect();
            return Ok(ValidationResult {
                valid: true,
                violations,
                burden_score: weekly_hours,
                warnings,
            });
        }

        let valid = !violations.iter().any(|v| v.severity == Severity::Error);
        Ok(ValidationResult {
            valid,
            violations,
            burden_score: weekly_hours,
            warnings,
        })
    }

    /// Rest before and after the placement, each direction checked against
    /// the adjacent calendar day. Both directions can fail independently.
    fn check_daily_rest(
        &self,
        placement: &ShiftPlacement,
        shifts: &[ExistingShift],
        violations: &mut Vec<ConstraintViolation>,
    ) {
        let min_rest = self.rules.min_daily_rest_hours;

        if let Some(prev_day) = placement.date.pred_opt() {
            if let Some(prev) = shifts.iter().find(|s| s.date == prev_day) {
                let rest = (24.0 - clock_hours(prev.end_time)) + clock_hours(placement.start_time);
                if rest < min_rest {
                    violations.push(ConstraintViolation {
                        code: ViolationCode::DailyRestViolation,
                        severity: Severity::Error,
                        message: format!(
                            "Insufficient rest between shifts ({}h < {}h required)",
                            fmt_hours(rest),
                            fmt_hours(min_rest)
                        ),
                        affected_shifts: vec![prev.id],
                    });
                }
            }
        }

        if let Some(next_day) = placement.date.succ_opt() {
            if let Some(next) = shifts.iter().find(|s| s.date == next_day) {
                let rest = (24.0 - clock_hours(placement.end_time)) + clock_hours(next.start_time);
                if rest < min_rest {
                    violations.push(ConstraintViolation {
                        code: ViolationCode::DailyRestViolation,
                        severity: Severity::Error,
                        message: format!(
                            "Insufficient rest before next shift ({}h < {}h required)",
                            fmt_hours(rest),
                            fmt_hours(min_rest)
                        ),
                        affected_shifts: vec![next.id],
                    });
                }
            }
        }
    }

    /// Walks backward and forward from the proposed date while days are
    /// occupied; the run includes the proposed day itself.
    fn check_consecutive_days(
        &self,
        date: NaiveDate,
        shifts: &[ExistingShift],
        violations: &mut Vec<ConstraintViolation>,
    ) {
        let mut by_date: HashMap<NaiveDate, Vec<&ExistingShift>> = HashMap::new();
        for shift in shifts {
            by_date.entry(shift.date).or_default().push(shift);
        }

        let mut consecutive: u32 = 1;
        let mut affected: Vec<Uuid> = Vec::new();

        let mut cursor = date.pred_opt();
        while let Some(day) = cursor {
            let Some(day_shifts) = by_date.get(&day) else {
                break;
            };
            consecutive += 1;
            affected.extend(day_shifts.iter().map(|s| s.id));
            cursor = day.pred_opt();
        }

        cursor = date.succ_opt();
        while let Some(day) = cursor {
            let Some(day_shifts) = by_date.get(&day) else {
                break;
            };
            consecutive += 1;
            affected.extend(day_shifts.iter().map(|s| s.id));
            cursor = day.succ_opt();
        }

        if consecutive > self.rules.max_consecutive_days {
            violations.push(ConstraintViolation {
                code: ViolationCode::ConsecutiveDaysViolation,
                severity: Severity::Error,
                message: format!(
                    "Would result in {} consecutive days (max {} allowed)",
                    consecutive, self.rules.max_consecutive_days
                ),
                affected_shifts: affected,
            });
        }
    }

    /// Sums the ISO week (Monday–Sunday) around the proposed date. The
    /// total always becomes the burden score, violation or not.
    fn check_weekly_hours(
        &self,
        date: NaiveDate,
        duration: f64,
        shifts: &[ExistingShift],
        violations: &mut Vec<ConstraintViolation>,
    ) -> f64 {
        let week = date.week(Weekday::Mon);
        let (first, last) = (week.first_day(), week.last_day());

        let week_shifts: Vec<&ExistingShift> = shifts
            .iter()
            .filter(|s| s.date >= first && s.date <= last)
            .collect();
        let total = duration
            + week_shifts
                .iter()
                .map(|s| s.duration_hours())
                .sum::<f64>();

        if total > self.rules.max_weekly_hours {
            violations.push(ConstraintViolation {
                code: ViolationCode::WeeklyHoursViolation,
                severity: Severity::Error,
                message: format!(
                    "Total weekly hours ({}h) exceeds maximum ({}h)",
                    fmt_hours(total),
                    fmt_hours(self.rules.max_weekly_hours)
                ),
                affected_shifts: week_shifts.iter().map(|s| s.id).collect(),
            });
        }

        total
    }
}

/// Hours for messages: whole numbers without a trailing ".0", fractions to
/// at most two places.
fn fmt_hours(h: f64) -> String {
    let s = format!("{h:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
