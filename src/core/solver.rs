use super::engine::{health_score, run_stress_tests, runway_days};
use super::policy::{
    DAYS_PER_MONTH, EXPENSE_SLIDER_FLOOR, EXPENSE_SLIDER_UPPER_SCALE, INCOME_SLIDER_FLOOR,
    INCOME_SLIDER_UPPER_SCALE, MAX_EXPENSE_REDUCTION_PCT, PLANNING_HORIZON_MONTHS,
    SAVINGS_INCREASE_INCOME_MULTIPLE, SAVINGS_SLIDER_CEILING_FLOOR, SAVINGS_SLIDER_UPPER_SCALE,
    SLIDER_LOWER_SCALE,
};
use super::types::{
    BaselineProfile, EqualizerBounds, EqualizerReading, RepairRequirements, SliderRange,
};

/// Minimum changes needed to reach `target_days` of runway. The three
/// paths (save more, spend less, earn more) are alternatives, not a
/// combined requirement; the achievability flag is satisfied by any
/// one of them.
pub fn solve_for_target(profile: &BaselineProfile, target_days: u32) -> RepairRequirements {
    // Defensive floor so the expense path never divides by zero.
    let target_days = target_days.max(1);
    let total_expenses = profile.total_expenses();
    let target_met = target_days <= runway_days(total_expenses, profile.savings);

    let required_savings = (target_days as f64 / DAYS_PER_MONTH * total_expenses).ceil();
    let savings_increase = (required_savings - profile.savings).max(0.0);

    let required_expenses = if profile.savings > 0.0 {
        (profile.savings * DAYS_PER_MONTH / target_days as f64).floor()
    } else {
        0.0
    };
    let expense_reduction = (total_expenses - required_expenses).max(0.0);
    let expense_reduction_percent = if total_expenses > 0.0 {
        (expense_reduction / total_expenses * 100.0).round() as u32
    } else {
        0
    };

    // The income path accumulates the savings shortfall over a fixed
    // planning horizon on top of the current monthly surplus.
    let monthly_savings_needed = savings_increase / PLANNING_HORIZON_MONTHS;
    let current_monthly_surplus = profile.income - total_expenses;
    let income_increase = (monthly_savings_needed - current_monthly_surplus).ceil().max(0.0);

    if target_met {
        return RepairRequirements {
            required_savings,
            savings_increase: 0.0,
            required_expenses,
            expense_reduction: 0.0,
            expense_reduction_percent: 0,
            income_increase: 0.0,
            required_income: profile.income,
            is_achievable: true,
            target_met: true,
        };
    }

    RepairRequirements {
        required_savings,
        savings_increase,
        required_expenses,
        expense_reduction,
        expense_reduction_percent,
        income_increase,
        required_income: profile.income + income_increase,
        is_achievable: expense_reduction_percent <= MAX_EXPENSE_REDUCTION_PCT
            || savings_increase <= profile.income * SAVINGS_INCREASE_INCOME_MULTIPLE,
        target_met: false,
    }
}

/// Slider ranges for the interactive equalizer, derived from the
/// baseline so exploration stays within a plausible neighbourhood.
pub fn equalizer_bounds(profile: &BaselineProfile) -> EqualizerBounds {
    let total_expenses = profile.total_expenses();
    EqualizerBounds {
        income: SliderRange {
            min: (profile.income * SLIDER_LOWER_SCALE).max(INCOME_SLIDER_FLOOR),
            max: profile.income * INCOME_SLIDER_UPPER_SCALE,
        },
        expenses: SliderRange {
            min: (total_expenses * SLIDER_LOWER_SCALE).max(EXPENSE_SLIDER_FLOOR),
            max: total_expenses * EXPENSE_SLIDER_UPPER_SCALE,
        },
        savings: SliderRange {
            min: 0.0,
            max: (profile.savings * SAVINGS_SLIDER_UPPER_SCALE).max(SAVINGS_SLIDER_CEILING_FLOOR),
        },
    }
}

/// Re-evaluates runway, health score and the stress battery for a
/// hypothetical slider triple, clamped to the baseline-derived bounds.
/// Pure re-evaluation; cheap enough to run on every slider movement.
pub fn evaluate_adjustment(
    profile: &BaselineProfile,
    income: f64,
    expenses: f64,
    savings: f64,
) -> EqualizerReading {
    let bounds = equalizer_bounds(profile);
    let income = bounds.income.clamp(income);
    let expenses = bounds.expenses.clamp(expenses);
    let savings = bounds.savings.clamp(savings);

    let tests = run_stress_tests(income, expenses, savings);
    let passed_count = tests.iter().filter(|t| t.passed).count();

    EqualizerReading {
        income,
        expenses,
        savings,
        runway_days: runway_days(expenses, savings),
        health_score: health_score(income, expenses, savings),
        tests,
        passed_count,
    }
}
