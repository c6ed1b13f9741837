//! What-if analysis over the core calculation: fixed-grid parameter
//! sensitivity, standardized stress scenarios, and Monte Carlo simulation.

pub mod parameters;
pub mod stress;

#[cfg(feature = "monte_carlo")]
pub mod monte_carlo;

pub use parameters::{
    analyze_sensitivity, SensitivityAnalysis, SensitivityParameter, SensitivityVariation,
};
pub use stress::{run_stress_tests, standard_scenarios, StressScenario, StressTestResult};

#[cfg(feature = "monte_carlo")]
pub use monte_carlo::{
    run_monte_carlo, DistributionStats, HistogramBin, MonteCarloInput, MonteCarloSimulation,
};
