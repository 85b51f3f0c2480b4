//! Gap-resolution candidate ranking.
//!
//! For an unmet staffing need, every active worker with the matching role
//! is validated against the slot, scored from availability, vacation and
//! workload signals, categorized, and sorted. The scan fans out over
//! rayon's worker pool; results are collected in roster order, so the
//! final ordering never depends on which candidate finished first.

use std::time::Instant;

use rayon::prelude::*;
use uuid::Uuid;

use crate::models::{
    AvailabilityMark, CandidateCategory, CandidateScore, EmploymentType, GapRequest,
    GapResolution, ShiftPlacement, Worker,
};
use crate::rules::{LaborRuleSet, ScoringWeights};
use crate::store::{
    AvailabilityRepository, ContractRepository, ShiftRepository, StoreError, WorkerDirectory,
};

use super::validator::ConstraintValidator;

pub struct GapResolver<'a> {
    rules: &'a LaborRuleSet,
    weights: &'a ScoringWeights,
    shifts: &'a dyn ShiftRepository,
    contracts: &'a dyn ContractRepository,
    availability: &'a dyn AvailabilityRepository,
    directory: &'a dyn WorkerDirectory,
}

impl<'a> GapResolver<'a> {
    pub fn new(
        rules: &'a LaborRuleSet,
        weights: &'a ScoringWeights,
        shifts: &'a dyn ShiftRepository,
        contracts: &'a dyn ContractRepository,
        availability: &'a dyn AvailabilityRepository,
        directory: &'a dyn WorkerDirectory,
    ) -> Self {
        Self {
            rules,
            weights,
            shifts,
            contracts,
            availability,
            directory,
        }
    }

    /// Ranks every eligible worker for the gap and proposes at most one
    /// recommendation.
    ///
    /// A failure to read the roster aborts the call; a failure to read one
    /// candidate's data only sidelines that candidate. When `deadline` has
    /// passed before a candidate's scan starts, the candidate is skipped
    /// and the result is flagged truncated.
    pub fn resolve_gap(
        &self,
        facility_id: Uuid,
        gap: &GapRequest,
        deadline: Option<Instant>,
    ) -> Result<GapResolution, StoreError> {
        let roster = self.directory.list_active_by_role(facility_id, &gap.role)?;
        let placement = ShiftPlacement {
            date: gap.date,
            start_time: gap.start_time,
            end_time: gap.end_time,
            role: gap.role.clone(),
        };

        let scanned: Vec<Option<CandidateScore>> = roster
            .par_iter()
            .map(|worker| {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    return None;
                }
                Some(self.score_candidate(worker, facility_id, &placement))
            })
            .collect();

        let truncated = scanned.iter().any(Option::is_none);
        let mut candidates: Vec<CandidateScore> = scanned.into_iter().flatten().collect();
        candidates.sort_by(|a, b| {
            a.category
                .precedence()
                .cmp(&b.category.precedence())
                .then_with(|| b.score.cmp(&a.score))
        });

        let recommendation = candidates.iter().find(|c| c.score > 0).cloned();
        tracing::info!(
            %facility_id,
            role = %gap.role,
            date = %gap.date,
            candidates = candidates.len(),
            recommended = recommendation.is_some(),
            truncated,
            "gap scan complete"
        );

        Ok(GapResolution {
            candidates,
            recommendation,
            truncated,
        })
    }

    /// One candidate, never fatal: an operational failure becomes a
    /// zero-score entry with a diagnostic reason.
    fn score_candidate(
        &self,
        worker: &Worker,
        facility_id: Uuid,
        placement: &ShiftPlacement,
    ) -> CandidateScore {
        match self.try_score(worker, facility_id, placement) {
            Ok(candidate) => candidate,
            Err(e) => {
                tracing::warn!(user_id = %worker.id, error = %e, "candidate data fetch failed");
                CandidateScore {
                    user_id: worker.id,
                    score: 0,
                    reason: format!("Candidate data unavailable: {e}"),
                    category: CandidateCategory::Internal,
                    violations: Vec::new(),
                    vacation_balance: 0.0,
                    weekly_hours: 0.0,
                }
            }
        }
    }

    fn try_score(
        &self,
        worker: &Worker,
        facility_id: Uuid,
        placement: &ShiftPlacement,
    ) -> Result<CandidateScore, StoreError> {
        let validator = ConstraintValidator::new(self.rules, self.shifts, self.contracts);
        let validation = validator.validate_move(worker.id, facility_id, placement, None, false)?;

        if !validation.valid {
            return Ok(CandidateScore {
                user_id: worker.id,
                score: 0,
                reason: "Constraint violations".into(),
                category: CandidateCategory::Internal,
                violations: validation.violations,
                vacation_balance: 0.0,
                weekly_hours: validation.burden_score,
            });
        }

        let w = self.weights;
        let mut score = w.base;
        let mut reason = String::from("Eligible");
        let mut category = CandidateCategory::Internal;

        match self.availability.get_mark(worker.id, placement.date)? {
            Some(AvailabilityMark::Impossible) => {
                score += w.impossible_mark;
                reason = "Marked unavailable for this day".into();
            }
            Some(AvailabilityMark::Preferred) => {
                score += w.preferred_mark;
                reason = "Prefers this day".into();
            }
            Some(AvailabilityMark::Available) | None => {}
        }

        let balance = self.availability.vacation_balance(worker.id, facility_id)?;
        if balance < 0.0 {
            score += w.negative_balance;
            category = CandidateCategory::InternalLowBalance;
            reason = "Vacation balance in deficit".into();
        }
        if balance > w.high_balance_threshold {
            score += w.high_balance;
            reason = "High vacation balance".into();
        }

        let weekly = validation.burden_score;
        if weekly > w.heavy_week_threshold {
            score += w.heavy_week;
            reason = "Heavy weekly load".into();
            if weekly > w.overtime_threshold {
                category = CandidateCategory::Overtime;
            }
        }
        if weekly < w.light_week_threshold {
            score += w.light_week;
            reason = "Light weekly load".into();
        }

        match worker.employment_type {
            EmploymentType::Floater => {
                score += w.floater;
                category = CandidateCategory::Floater;
                reason = "Floater pool".into();
            }
            EmploymentType::External => {
                score += w.external;
                category = CandidateCategory::External;
                reason = "External worker".into();
            }
            EmploymentType::Regular => {}
        }

        Ok(CandidateScore {
            user_id: worker.id,
            score,
            reason,
            category,
            violations: validation.violations,
            vacation_balance: balance,
            weekly_hours: weekly,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContractStatus, LeaveStatus, ShiftStatus};
    use crate::rules::SWISS_LAW_DEFAULTS;
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, NaiveTime};
    use std::time::Duration;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn gap(date: &str) -> GapRequest {
        GapRequest {
            date: d(date),
            role: "NURSE".into(),
            start_time: t(7, 0),
            end_time: t(15, 0),
        }
    }

    fn resolve(store: &MemoryStore, facility: Uuid, gap: &GapRequest) -> GapResolution {
        resolve_with_deadline(store, facility, gap, None)
    }

    fn resolve_with_deadline(
        store: &MemoryStore,
        facility: Uuid,
        gap: &GapRequest,
        deadline: Option<Instant>,
    ) -> GapResolution {
        let weights = ScoringWeights::default();
        let resolver = GapResolver::new(&SWISS_LAW_DEFAULTS, &weights, store, store, store, store);
        resolver.resolve_gap(facility, gap, deadline).unwrap()
    }

    fn add_nurse(store: &MemoryStore, facility: Uuid, name: &str, kind: EmploymentType) -> Uuid {
        store.add_worker(facility, name, "NURSE", kind).unwrap().id
    }

    /// Books `hours` across Mon–Thu of the gap week so the weekly-load
    /// adjustments fire without tripping any other constraint.
    fn book_week_hours(store: &MemoryStore, facility: Uuid, user: Uuid, hours: [f64; 4]) {
        let days = ["2026-03-02", "2026-03-03", "2026-03-04", "2026-03-05"];
        for (day, h) in days.iter().zip(hours) {
            if h == 0.0 {
                continue;
            }
            let end = 7 + h as u32;
            store
                .create_shift(
                    facility,
                    Some(user),
                    &ShiftPlacement {
                        date: d(day),
                        start_time: t(7, 0),
                        end_time: t(end, 0),
                        role: "NURSE".into(),
                    },
                    ShiftStatus::Published,
                )
                .unwrap();
        }
    }

    #[test]
    fn empty_roster_resolves_to_nothing() {
        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        let resolution = resolve(&store, facility, &gap("2026-03-07"));
        assert!(resolution.candidates.is_empty());
        assert!(resolution.recommendation.is_none());
        assert!(!resolution.truncated);
    }

    #[test]
    fn unburdened_regular_scores_base_plus_light_week() {
        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        let user = add_nurse(&store, facility, "A", EmploymentType::Regular);

        let resolution = resolve(&store, facility, &gap("2026-03-07"));
        let candidate = &resolution.candidates[0];
        assert_eq!(candidate.user_id, user);
        // 100 base + 15 light week (8h of burden)
        assert_eq!(candidate.score, 115);
        assert_eq!(candidate.category, CandidateCategory::Internal);
        assert_eq!(candidate.reason, "Light weekly load");
        assert_eq!(resolution.recommendation.as_ref().unwrap().user_id, user);
    }

    #[test]
    fn blocked_candidate_scores_zero_and_is_never_recommended() {
        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        let blocked = add_nurse(&store, facility, "A", EmploymentType::Regular);
        let clear = add_nurse(&store, facility, "B", EmploymentType::Regular);
        // rest conflict: previous evening shift ends 23:00
        store
            .create_shift(
                facility,
                Some(blocked),
                &ShiftPlacement {
                    date: d("2026-03-06"),
                    start_time: t(15, 0),
                    end_time: t(23, 0),
                    role: "NURSE".into(),
                },
                ShiftStatus::Published,
            )
            .unwrap();

        let resolution = resolve(&store, facility, &gap("2026-03-07"));
        let zeroed = resolution
            .candidates
            .iter()
            .find(|c| c.user_id == blocked)
            .unwrap();
        assert_eq!(zeroed.score, 0);
        assert_eq!(zeroed.reason, "Constraint violations");
        assert!(!zeroed.violations.is_empty());
        assert_eq!(resolution.recommendation.as_ref().unwrap().user_id, clear);
    }

    #[test]
    fn availability_marks_shift_the_score() {
        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        let keen = add_nurse(&store, facility, "A", EmploymentType::Regular);
        let reluctant = add_nurse(&store, facility, "B", EmploymentType::Regular);
        store.set_mark(keen, d("2026-03-07"), AvailabilityMark::Preferred).unwrap();
        store.set_mark(reluctant, d("2026-03-07"), AvailabilityMark::Impossible).unwrap();

        let resolution = resolve(&store, facility, &gap("2026-03-07"));
        let by_id = |id: Uuid| {
            resolution
                .candidates
                .iter()
                .find(|c| c.user_id == id)
                .unwrap()
                .clone()
        };
        // 100 + 20 + 15 vs 100 − 50 + 15
        assert_eq!(by_id(keen).score, 135);
        assert_eq!(by_id(reluctant).score, 65);
        assert_eq!(resolution.recommendation.as_ref().unwrap().user_id, keen);
    }

    #[test]
    fn vacation_deficit_boosts_and_recategorizes() {
        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        let overdrawn = add_nurse(&store, facility, "A", EmploymentType::Regular);
        store
            .add_contract(overdrawn, facility, 42.0, 20.0, ContractStatus::Active)
            .unwrap();
        store
            .add_leave_request(overdrawn, facility, 23.0, LeaveStatus::Approved)
            .unwrap();

        let resolution = resolve(&store, facility, &gap("2026-03-07"));
        let candidate = &resolution.candidates[0];
        // 100 + 30 deficit + 15 light week
        assert_eq!(candidate.score, 145);
        assert_eq!(candidate.category, CandidateCategory::InternalLowBalance);
        assert_eq!(candidate.vacation_balance, -3.0);
    }

    #[test]
    fn high_vacation_balance_is_penalized() {
        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        let rested = add_nurse(&store, facility, "A", EmploymentType::Regular);
        store
            .add_contract(rested, facility, 42.0, 25.0, ContractStatus::Active)
            .unwrap();

        let resolution = resolve(&store, facility, &gap("2026-03-07"));
        let candidate = &resolution.candidates[0];
        // 100 − 10 high balance + 15 light week; balance 25 > 10
        assert_eq!(candidate.score, 105);
        assert_eq!(candidate.vacation_balance, 25.0);
    }

    #[test]
    fn heavy_week_penalizes_and_overtime_recategorizes() {
        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        let heavy = add_nurse(&store, facility, "A", EmploymentType::Regular);
        let overtime = add_nurse(&store, facility, "B", EmploymentType::Regular);
        // 34h booked → 42h with the gap: heavy, not overtime
        book_week_hours(&store, facility, heavy, [9.0, 9.0, 8.0, 8.0]);
        // 39h booked → 47h with the gap: overtime
        book_week_hours(&store, facility, overtime, [10.0, 10.0, 10.0, 9.0]);

        let resolution = resolve(&store, facility, &gap("2026-03-07"));
        let by_id = |id: Uuid| {
            resolution
                .candidates
                .iter()
                .find(|c| c.user_id == id)
                .unwrap()
                .clone()
        };
        assert_eq!(by_id(heavy).score, 80);
        assert_eq!(by_id(heavy).category, CandidateCategory::Internal);
        assert_eq!(by_id(overtime).score, 80);
        assert_eq!(by_id(overtime).category, CandidateCategory::Overtime);
        // category precedence puts the plain internal first
        assert_eq!(resolution.candidates[0].user_id, heavy);
    }

    #[test]
    fn employment_type_owns_the_final_category() {
        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        let floater = add_nurse(&store, facility, "A", EmploymentType::Floater);
        store
            .add_contract(floater, facility, 42.0, 20.0, ContractStatus::Active)
            .unwrap();
        store
            .add_leave_request(floater, facility, 25.0, LeaveStatus::Approved)
            .unwrap();

        let resolution = resolve(&store, facility, &gap("2026-03-07"));
        let candidate = &resolution.candidates[0];
        // deficit fired (+30) but the floater adjustment wrote category last
        assert_eq!(candidate.category, CandidateCategory::Floater);
        assert_eq!(candidate.score, 100 + 30 + 15 + 10);
        assert_eq!(candidate.reason, "Floater pool");
    }

    #[test]
    fn category_precedence_outranks_raw_score() {
        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        let external = add_nurse(&store, facility, "A", EmploymentType::External);
        let internal = add_nurse(&store, facility, "B", EmploymentType::Regular);
        // 24h booked → 32h with the gap: no weekly adjustment either way
        book_week_hours(&store, facility, external, [8.0, 8.0, 8.0, 0.0]);
        // 33h booked → 41h with the gap (heavy-week penalty), plus a full
        // untouched vacation entitlement (high-balance penalty)
        book_week_hours(&store, facility, internal, [9.0, 8.0, 8.0, 8.0]);
        store
            .add_contract(internal, facility, 50.0, 25.0, ContractStatus::Active)
            .unwrap();

        let resolution = resolve(&store, facility, &gap("2026-03-07"));
        let by_id = |id: Uuid| {
            resolution
                .candidates
                .iter()
                .find(|c| c.user_id == id)
                .unwrap()
                .clone()
        };
        // the external outscores the internal 75 to 70 and still loses the
        // top slot: category precedence outranks raw score
        assert_eq!(by_id(external).score, 75);
        assert_eq!(by_id(external).category, CandidateCategory::External);
        assert_eq!(by_id(internal).score, 70);
        assert_eq!(resolution.candidates[0].user_id, internal);
        assert_eq!(resolution.recommendation.as_ref().unwrap().user_id, internal);
    }

    #[test]
    fn ties_keep_roster_order() {
        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        let first = add_nurse(&store, facility, "A", EmploymentType::Regular);
        let second = add_nurse(&store, facility, "B", EmploymentType::Regular);

        let resolution = resolve(&store, facility, &gap("2026-03-07"));
        assert_eq!(resolution.candidates[0].user_id, first);
        assert_eq!(resolution.candidates[1].user_id, second);
        assert_eq!(resolution.candidates[0].score, resolution.candidates[1].score);
    }

    #[test]
    fn one_failing_candidate_does_not_abort_the_scan() {
        struct FlakyAvailability<'s> {
            inner: &'s MemoryStore,
            poisoned: Uuid,
        }

        impl AvailabilityRepository for FlakyAvailability<'_> {
            fn get_mark(
                &self,
                user_id: Uuid,
                date: NaiveDate,
            ) -> Result<Option<AvailabilityMark>, StoreError> {
                if user_id == self.poisoned {
                    return Err(StoreError::Unavailable("availability shard down".into()));
                }
                self.inner.get_mark(user_id, date)
            }

            fn vacation_balance(&self, user_id: Uuid, facility_id: Uuid) -> Result<f64, StoreError> {
                self.inner.vacation_balance(user_id, facility_id)
            }
        }

        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        let poisoned = add_nurse(&store, facility, "A", EmploymentType::Regular);
        let healthy = add_nurse(&store, facility, "B", EmploymentType::Regular);

        let availability = FlakyAvailability {
            inner: &store,
            poisoned,
        };
        let weights = ScoringWeights::default();
        let resolver =
            GapResolver::new(&SWISS_LAW_DEFAULTS, &weights, &store, &store, &availability, &store);
        let resolution = resolver.resolve_gap(facility, &gap("2026-03-07"), None).unwrap();

        assert_eq!(resolution.candidates.len(), 2);
        let broken = resolution
            .candidates
            .iter()
            .find(|c| c.user_id == poisoned)
            .unwrap();
        assert_eq!(broken.score, 0);
        assert!(broken.reason.contains("availability shard down"));
        assert_eq!(resolution.recommendation.as_ref().unwrap().user_id, healthy);
    }

    #[test]
    fn expired_deadline_truncates_the_scan() {
        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        add_nurse(&store, facility, "A", EmploymentType::Regular);
        add_nurse(&store, facility, "B", EmploymentType::Regular);

        let past = Instant::now() - Duration::from_millis(1);
        let resolution = resolve_with_deadline(&store, facility, &gap("2026-03-07"), Some(past));
        assert!(resolution.truncated);
        assert!(resolution.candidates.is_empty());
        assert!(resolution.recommendation.is_none());
    }

    #[test]
    fn all_zero_scores_mean_no_recommendation() {
        let store = MemoryStore::new();
        let facility = Uuid::new_v4();
        let only = add_nurse(&store, facility, "A", EmploymentType::Regular);
        store
            .create_shift(
                facility,
                Some(only),
                &ShiftPlacement {
                    date: d("2026-03-06"),
                    start_time: t(15, 0),
                    end_time: t(23, 0),
                    role: "NURSE".into(),
                },
                ShiftStatus::Published,
            )
            .unwrap();

        let resolution = resolve(&store, facility, &gap("2026-03-07"));
        assert_eq!(resolution.candidates.len(), 1);
        assert!(resolution.recommendation.is_none());
    }
}
