use super::policy::{
    DAYS_PER_MONTH, EMERGENCY_COST_MONTHS, EMERGENCY_MIN_RUNWAY_DAYS, EXPENSE_RATIO_WEIGHT,
    EXPENSE_SHOCK_PCT, FIXED_SHARE_THRESHOLD, INCOME_SHOCK_PCT, MIN_RUNWAY_DAYS, RUNWAY_CAP_DAYS,
    RUNWAY_SCORE_CEILING_DAYS, RUNWAY_WEIGHT, SURPLUS_RATIO_CEILING, SURPLUS_WEIGHT,
};
use super::types::{BaselineProfile, Diagnosis, Severity, StressTestResult};

/// Days the savings balance covers the monthly burn rate, floored so a
/// partial day never rounds up into a false sense of safety. Zero
/// expenses map to the sentinel cap rather than infinity.
pub fn runway_days(expenses: f64, savings: f64) -> u32 {
    if expenses <= 0.0 {
        return RUNWAY_CAP_DAYS;
    }
    let savings = savings.max(0.0);
    let days = (savings * DAYS_PER_MONTH / expenses).floor();
    if days >= RUNWAY_CAP_DAYS as f64 {
        RUNWAY_CAP_DAYS
    } else {
        days as u32
    }
}

/// Composite 0-100 resilience score: weighted blend of the monthly
/// surplus ratio, the savings runway and the expense ratio. Each
/// sub-score is clamped to [0, 100] before weighting so no single
/// dimension can dominate via an extreme outlier.
pub fn health_score(income: f64, expenses: f64, savings: f64) -> u32 {
    let surplus_score = if income <= 0.0 {
        0.0
    } else {
        let ratio = (income - expenses) / income;
        (ratio / SURPLUS_RATIO_CEILING * 100.0).clamp(0.0, 100.0)
    };

    let runway_score =
        (runway_days(expenses, savings) as f64 / RUNWAY_SCORE_CEILING_DAYS * 100.0).clamp(0.0, 100.0);

    let expense_score = if income <= 0.0 {
        0.0
    } else {
        ((1.0 - expenses / income) * 100.0).clamp(0.0, 100.0)
    };

    let combined = SURPLUS_WEIGHT * surplus_score
        + RUNWAY_WEIGHT * runway_score
        + EXPENSE_RATIO_WEIGHT * expense_score;
    combined.round().clamp(0.0, 100.0) as u32
}

/// Fixed battery of three deterministic shocks, always in the same
/// order: income drop, expense spike, emergency cost.
pub fn run_stress_tests(income: f64, expenses: f64, savings: f64) -> [StressTestResult; 3] {
    [
        income_shock(income, expenses, savings),
        expense_shock(expenses, savings),
        emergency_shock(expenses, savings),
    ]
}

fn income_shock(income: f64, expenses: f64, savings: f64) -> StressTestResult {
    let shocked_income = income - income * INCOME_SHOCK_PCT;
    let surplus = shocked_income - expenses;

    let (passed, consequence) = if surplus >= 0.0 {
        (
            true,
            format!("Reduced income still covers expenses with ${surplus:.0}/mo to spare."),
        )
    } else {
        let deficit = -surplus;
        let deficit_days = runway_days(deficit, savings);
        if deficit_days >= MIN_RUNWAY_DAYS {
            (
                true,
                format!("Savings absorb the ${deficit:.0}/mo shortfall for {deficit_days} days."),
            )
        } else {
            (
                false,
                format!(
                    "Savings absorb the ${deficit:.0}/mo shortfall for only {deficit_days} days."
                ),
            )
        }
    };

    StressTestResult {
        id: "income-shock",
        name: "Income Drop",
        severity: Severity::Moderate,
        scenario: format!(
            "Your income drops {:.0}% to ${shocked_income:.0}/mo while expenses stay unchanged.",
            INCOME_SHOCK_PCT * 100.0
        ),
        passed,
        consequence,
    }
}

fn expense_shock(expenses: f64, savings: f64) -> StressTestResult {
    let shocked_expenses = expenses + expenses * EXPENSE_SHOCK_PCT;
    let shocked_runway = runway_days(shocked_expenses, savings);
    let passed = shocked_runway >= MIN_RUNWAY_DAYS;

    StressTestResult {
        id: "expense-shock",
        name: "Expense Spike",
        severity: Severity::Mild,
        scenario: format!(
            "An unplanned {:.0}% increase raises monthly expenses to ${shocked_expenses:.0}.",
            EXPENSE_SHOCK_PCT * 100.0
        ),
        passed,
        consequence: if passed {
            format!("Runway holds at {shocked_runway} days at the higher burn rate.")
        } else {
            format!("Runway falls to {shocked_runway} days at the higher burn rate.")
        },
    }
}

fn emergency_shock(expenses: f64, savings: f64) -> StressTestResult {
    let cost = expenses * EMERGENCY_COST_MONTHS;
    let remaining = (savings - cost).max(0.0);
    let remaining_runway = runway_days(expenses, remaining);
    let passed = remaining_runway >= EMERGENCY_MIN_RUNWAY_DAYS;

    StressTestResult {
        id: "emergency-shock",
        name: "Emergency Cost",
        severity: Severity::Severe,
        scenario: format!(
            "A one-time ${cost:.0} emergency is paid out of savings, leaving ${remaining:.0}."
        ),
        passed,
        consequence: if passed {
            format!("The remaining savings still cover {remaining_runway} days of expenses.")
        } else {
            format!("The remaining savings cover only {remaining_runway} days of expenses.")
        },
    }
}

/// Root-cause labels derived from the profile's structural ratios.
/// Stable order; each label fires at most once. An empty result is the
/// valid "no critical weaknesses" terminal state.
pub fn diagnose(profile: &BaselineProfile) -> Vec<Diagnosis> {
    let mut diagnoses = Vec::new();

    if profile.fixed_expenses() > profile.income * FIXED_SHARE_THRESHOLD {
        diagnoses.push(Diagnosis::Fixed);
    }
    if runway_days(profile.total_expenses(), profile.savings) < MIN_RUNWAY_DAYS {
        diagnoses.push(Diagnosis::Buffer);
    }
    if profile.total_expenses() > profile.income {
        diagnoses.push(Diagnosis::Income);
    }

    diagnoses
}
