//! Coverage scanning: staffing requirements vs. scheduled shifts.
//!
//! A pure comparison; the caller fetches both sides for the window it
//! cares about. Each reported gap is directly usable as a gap-resolution
//! request.

use crate::models::{CoverageGap, CoverageRequirement, ExistingShift, ShiftStatus};

/// A shift fills a requirement when it is assigned, not cancelled, and
/// occupies the same date, role and time window.
pub fn find_gaps(
    requirements: &[CoverageRequirement],
    shifts: &[ExistingShift],
) -> Vec<CoverageGap> {
    let mut gaps: Vec<CoverageGap> = requirements
        .iter()
        .filter_map(|req| {
            let assigned = shifts
                .iter()
                .filter(|s| {
                    s.status != ShiftStatus::Cancelled
                        && s.user_id.is_some()
                        && s.date == req.date
                        && s.role == req.role
                        && s.start_time == req.start_time
                        && s.end_time == req.end_time
                })
                .count() as u32;
            if assigned < req.required_count {
                Some(CoverageGap {
                    date: req.date,
                    role: req.role.clone(),
                    start_time: req.start_time,
                    end_time: req.end_time,
                    required: req.required_count,
                    assigned,
                    missing: req.required_count - assigned,
                })
            } else {
                None
            }
        })
        .collect();

    gaps.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
    gaps
}
