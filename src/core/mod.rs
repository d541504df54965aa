mod engine;
pub mod policy;
mod solver;
mod types;

pub use engine::{diagnose, health_score, run_stress_tests, runway_days};
pub use solver::{equalizer_bounds, evaluate_adjustment, solve_for_target};
pub use types::{
    BaselineProfile, Diagnosis, EqualizerBounds, EqualizerReading, RepairRequirements, ScoreBand,
    Severity, SliderRange, StressTestResult,
};
