//! Labor-time limits and ranking calibration.
//!
//! Both bundles are plain configuration values handed to the engine per
//! call. Nothing in here is read from the environment and nothing is a
//! process-wide singleton: a facility with stricter house rules gets its
//! own [`LaborRuleSet`] through its [`FacilityPolicy`].

use serde::{Deserialize, Serialize};

/// The jurisdiction's labor-time limits for a single facility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborRuleSet {
    pub max_consecutive_days: u32,
    pub min_daily_rest_hours: f64,
    pub max_weekly_hours: f64,
    pub max_daily_hours: f64,
    /// Part of the statutory bundle; no check consumes it yet.
    pub min_weekly_rest_hours: f64,
}

/// Swiss statutory baseline for healthcare staff (ArG).
pub const SWISS_LAW_DEFAULTS: LaborRuleSet = LaborRuleSet {
    max_consecutive_days: 6,
    min_daily_rest_hours: 11.0,
    max_weekly_hours: 50.0,
    max_daily_hours: 12.0,
    min_weekly_rest_hours: 35.0,
};

impl Default for LaborRuleSet {
    fn default() -> Self {
        SWISS_LAW_DEFAULTS
    }
}

/// Adjustment values and thresholds for the candidate ranker.
///
/// The defaults preserve the production calibration as observed; none of
/// the values carries a documented business rationale, so they are kept
/// configurable rather than recalibrated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Starting score for a candidate with no blocking violations.
    pub base: i32,
    pub impossible_mark: i32,
    pub preferred_mark: i32,
    pub negative_balance: i32,
    pub high_balance: i32,
    pub high_balance_threshold: f64,
    pub heavy_week: i32,
    pub heavy_week_threshold: f64,
    /// Above this weekly load a candidate is categorized as overtime.
    pub overtime_threshold: f64,
    pub light_week: i32,
    pub light_week_threshold: f64,
    pub floater: i32,
    pub external: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 100,
            impossible_mark: -50,
            preferred_mark: 20,
            negative_balance: 30,
            high_balance: -10,
            high_balance_threshold: 10.0,
            heavy_week: -20,
            heavy_week_threshold: 40.0,
            overtime_threshold: 45.0,
            light_week: 15,
            light_week_threshold: 30.0,
            floater: 10,
            external: -25,
        }
    }
}

/// Per-facility engine configuration: labor limits plus ranker calibration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityPolicy {
    pub labor_rules: LaborRuleSet,
    pub scoring: ScoringWeights,
}
