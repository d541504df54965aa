use serde::Serialize;

use super::policy::{STABLE_SCORE_MIN, VULNERABLE_SCORE_MIN};

/// Monthly budget baseline. All amounts are monthly except `savings`,
/// which is the liquid balance available today.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineProfile {
    pub income: f64,
    pub rent: f64,
    pub transportation: f64,
    pub groceries: f64,
    pub other: f64,
    pub savings: f64,
}

impl BaselineProfile {
    pub fn fixed_expenses(&self) -> f64 {
        self.rent + self.transportation
    }

    pub fn flexible_expenses(&self) -> f64 {
        self.groceries + self.other
    }

    pub fn total_expenses(&self) -> f64 {
        self.fixed_expenses() + self.flexible_expenses()
    }

    pub fn burn_rate(&self) -> f64 {
        self.total_expenses()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StressTestResult {
    pub id: &'static str,
    pub name: &'static str,
    pub severity: Severity,
    pub scenario: String,
    pub passed: bool,
    pub consequence: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Diagnosis {
    Fixed,
    Buffer,
    Income,
}

impl Diagnosis {
    pub fn label(self) -> &'static str {
        match self {
            Diagnosis::Fixed => "Fixed expenses too high",
            Diagnosis::Buffer => "Insufficient savings buffer",
            Diagnosis::Income => "Income too low for expense structure",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Diagnosis::Fixed => {
                "Rent and transportation consume a large portion of income, leaving little flexibility."
            }
            Diagnosis::Buffer => "Your savings cannot absorb unexpected costs or income gaps.",
            Diagnosis::Income => "Current income cannot sustainably support your expense structure.",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreBand {
    Stable,
    Vulnerable,
    AtRisk,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        if score >= STABLE_SCORE_MIN {
            ScoreBand::Stable
        } else if score >= VULNERABLE_SCORE_MIN {
            ScoreBand::Vulnerable
        } else {
            ScoreBand::AtRisk
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Stable => "Stable",
            ScoreBand::Vulnerable => "Vulnerable",
            ScoreBand::AtRisk => "At Risk",
        }
    }
}

/// Output of the target-runway solver. The three increase paths are
/// alternatives; satisfying any one of them reaches the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairRequirements {
    pub required_savings: f64,
    pub savings_increase: f64,
    pub required_expenses: f64,
    pub expense_reduction: f64,
    pub expense_reduction_percent: u32,
    pub income_increase: f64,
    pub required_income: f64,
    pub is_achievable: bool,
    pub target_met: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
}

impl SliderRange {
    /// Total clamp: when a degenerate baseline inverts the range the
    /// upper bound wins, so the result stays deterministic.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EqualizerBounds {
    pub income: SliderRange,
    pub expenses: SliderRange,
    pub savings: SliderRange,
}

/// Snapshot of all derived metrics for one hypothetical slider triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EqualizerReading {
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub runway_days: u32,
    pub health_score: u32,
    pub tests: [StressTestResult; 3],
    pub passed_count: usize,
}
