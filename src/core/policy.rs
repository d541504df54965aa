//! Tunable policy constants consumed by the engine and the API layer.
//!
//! Every shock percentage, survivability threshold, score weight and
//! slider bound lives here so the formulas that consume them stay free
//! of magic numbers.

/// Monthly amounts are converted to daily burn at a flat 30 days/month.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Sentinel returned when expenses are zero; keeps downstream
/// arithmetic and display finite instead of propagating infinity.
pub const RUNWAY_CAP_DAYS: u32 = 9999;

// Health score composition. Weights must sum to 1.
pub const SURPLUS_WEIGHT: f64 = 0.40;
pub const RUNWAY_WEIGHT: f64 = 0.35;
pub const EXPENSE_RATIO_WEIGHT: f64 = 0.25;

/// Monthly surplus ratio at which the surplus sub-score saturates at 100.
pub const SURPLUS_RATIO_CEILING: f64 = 0.30;

/// Runway at which the runway sub-score saturates at 100.
pub const RUNWAY_SCORE_CEILING_DAYS: f64 = 180.0;

// Score bands, shared with the display layer.
pub const STABLE_SCORE_MIN: u32 = 70;
pub const VULNERABLE_SCORE_MIN: u32 = 40;

// Stress-test battery.
pub const INCOME_SHOCK_PCT: f64 = 0.20;
pub const EXPENSE_SHOCK_PCT: f64 = 0.15;
/// Emergency lump sum drawn from savings, in months of expenses.
pub const EMERGENCY_COST_MONTHS: f64 = 1.0;

/// Minimum survivable runway for the income and expense shocks, and
/// the buffer diagnosis threshold.
pub const MIN_RUNWAY_DAYS: u32 = 30;
/// Smaller floor applied after the emergency draw-down.
pub const EMERGENCY_MIN_RUNWAY_DAYS: u32 = 14;

/// Share of income above which fixed expenses trigger a diagnosis.
pub const FIXED_SHARE_THRESHOLD: f64 = 0.50;

// Repair solver.
pub const PLANNING_HORIZON_MONTHS: f64 = 6.0;
pub const MAX_EXPENSE_REDUCTION_PCT: u32 = 50;
pub const SAVINGS_INCREASE_INCOME_MULTIPLE: f64 = 3.0;
pub const TARGET_RUNWAY_MIN_DAYS: u32 = 7;
pub const TARGET_RUNWAY_MAX_DAYS: u32 = 365;
pub const TARGET_RUNWAY_DEFAULT_DAYS: u32 = 90;

// Equalizer slider bounds derived from the baseline.
pub const INCOME_SLIDER_FLOOR: f64 = 500.0;
pub const EXPENSE_SLIDER_FLOOR: f64 = 200.0;
pub const SAVINGS_SLIDER_CEILING_FLOOR: f64 = 5000.0;
pub const SLIDER_LOWER_SCALE: f64 = 0.5;
pub const INCOME_SLIDER_UPPER_SCALE: f64 = 2.0;
pub const EXPENSE_SLIDER_UPPER_SCALE: f64 = 1.5;
pub const SAVINGS_SLIDER_UPPER_SCALE: f64 = 3.0;
