//! Monte Carlo simulation over the core calculation.
//!
//! Each iteration draws independent normal shocks for the discount rate,
//! the monthly payment, and the term, applies them to the base terms, and
//! re-runs the full calculation. The random source is seedable so tests
//! can pin the draw sequence; unseeded runs are not bit-reproducible and
//! must be asserted with statistical tolerance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;

use crate::error::LeaseEngineError;
use crate::lease::engine::{add_months, calculate_lease};
use crate::lease::terms::LeaseTerms;
use crate::LeaseEngineResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MIN_ITERATIONS: u32 = 100;
const HISTOGRAM_BINS: usize = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Simulation controls. The defaults reproduce the standard run: 1,000
/// iterations with σ of 1 rate point, 5% of the base payment, and 2 months.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloInput {
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Seed for reproducible runs; entropy-seeded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Standard deviation of the rate shock, in percentage points.
    #[serde(default = "default_rate_sigma")]
    pub rate_sigma_points: f64,
    /// Standard deviation of the payment shock, in percent of the base
    /// payment.
    #[serde(default = "default_payment_sigma")]
    pub payment_sigma_pct: f64,
    /// Standard deviation of the term shock, in months.
    #[serde(default = "default_term_sigma")]
    pub term_sigma_months: f64,
}

fn default_iterations() -> u32 {
    1_000
}
fn default_rate_sigma() -> f64 {
    1.0
}
fn default_payment_sigma() -> f64 {
    5.0
}
fn default_term_sigma() -> f64 {
    2.0
}

impl Default for MonteCarloInput {
    fn default() -> Self {
        MonteCarloInput {
            iterations: default_iterations(),
            seed: None,
            rate_sigma_points: default_rate_sigma(),
            payment_sigma_pct: default_payment_sigma(),
            term_sigma_months: default_term_sigma(),
        }
    }
}

/// Descriptive statistics over one simulated output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p95: f64,
}

/// A single histogram bin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
    pub frequency: f64,
}

/// Full simulation output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloSimulation {
    pub iterations: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub liability: DistributionStats,
    pub asset: DistributionStats,
    /// Equal-width distribution of the simulated liabilities.
    pub liability_histogram: Vec<HistogramBin>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the simulation against base terms.
pub fn run_monte_carlo(
    terms: &LeaseTerms,
    input: &MonteCarloInput,
) -> LeaseEngineResult<MonteCarloSimulation> {
    if input.iterations < MIN_ITERATIONS {
        return Err(LeaseEngineError::InvalidInput {
            field: "iterations".into(),
            reason: format!("Must be at least {MIN_ITERATIONS}"),
        });
    }
    // Fail fast on invalid base terms before looping.
    calculate_lease(terms)?;

    let mut rng = match input.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let base_rate = decimal_to_f64(terms.discount_rate_annual_pct);
    let base_payment = decimal_to_f64(terms.monthly_payment);
    let base_term = terms.term_months as f64;

    let rate_dist = normal(input.rate_sigma_points)?;
    let payment_dist = normal(base_payment * input.payment_sigma_pct / 100.0)?;
    let term_dist = normal(input.term_sigma_months)?;

    let n = input.iterations as usize;
    let mut liabilities = Vec::with_capacity(n);
    let mut assets = Vec::with_capacity(n);

    for _ in 0..n {
        let rate = (base_rate + draw(&mut rng, &rate_dist)).clamp(0.0, 100.0);
        let payment = (base_payment + draw(&mut rng, &payment_dist)).max(0.01);
        let term = (base_term + draw(&mut rng, &term_dist)).round().max(1.0) as u32;

        let mut trial = terms.clone();
        trial.discount_rate_annual_pct = f64_to_decimal(rate, "discount_rate")?;
        trial.monthly_payment = f64_to_decimal(payment, "monthly_payment")?;
        trial.term_months = term;
        trial.end_date = add_months(trial.start_date, term);

        let result = calculate_lease(&trial)?;
        liabilities.push(decimal_to_f64(result.lease_liability_initial));
        assets.push(decimal_to_f64(result.right_of_use_asset_initial));
    }

    liabilities.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    assets.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let liability_histogram = build_histogram(&liabilities, HISTOGRAM_BINS);

    Ok(MonteCarloSimulation {
        iterations: input.iterations,
        seed: input.seed,
        liability: compute_statistics(&liabilities),
        asset: compute_statistics(&assets),
        liability_histogram,
    })
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Normal shock distribution, or `None` for a degenerate σ of zero.
fn normal(sigma: f64) -> LeaseEngineResult<Option<Normal>> {
    if sigma == 0.0 {
        return Ok(None);
    }
    Normal::new(0.0, sigma)
        .map(Some)
        .map_err(|e| LeaseEngineError::InvalidInput {
            field: "sigma".into(),
            reason: format!("Invalid Normal parameters: {e}"),
        })
}

fn draw(rng: &mut StdRng, dist: &Option<Normal>) -> f64 {
    match dist {
        Some(d) => rng.sample(*d),
        None => 0.0,
    }
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn f64_to_decimal(value: f64, field: &str) -> LeaseEngineResult<Decimal> {
    Decimal::from_f64(value).ok_or_else(|| LeaseEngineError::InvalidInput {
        field: field.into(),
        reason: format!("Cannot represent {value} as a decimal"),
    })
}

// ---------------------------------------------------------------------------
// Statistics helpers
// ---------------------------------------------------------------------------

/// Percentile from a **sorted** slice using linear interpolation.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = rank - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

fn compute_statistics(sorted: &[f64]) -> DistributionStats {
    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;

    let median = if sorted.len() % 2 == 0 {
        let mid = sorted.len() / 2;
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[sorted.len() / 2]
    };

    let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    DistributionStats {
        mean,
        median,
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        p5: percentile_sorted(sorted, 5.0),
        p95: percentile_sorted(sorted, 95.0),
    }
}

/// Equal-width histogram over a **sorted** slice.
fn build_histogram(sorted: &[f64], num_bins: usize) -> Vec<HistogramBin> {
    let min_val = sorted[0];
    let max_val = sorted[sorted.len() - 1];

    // All values identical: a single full bin.
    if (max_val - min_val).abs() < f64::EPSILON {
        return vec![HistogramBin {
            lower: min_val,
            upper: max_val,
            count: sorted.len() as u32,
            frequency: 1.0,
        }];
    }

    let bin_width = (max_val - min_val) / num_bins as f64;
    let n = sorted.len() as f64;

    let mut bins: Vec<HistogramBin> = (0..num_bins)
        .map(|i| {
            let lower = min_val + i as f64 * bin_width;
            let upper = if i == num_bins - 1 {
                max_val
            } else {
                min_val + (i + 1) as f64 * bin_width
            };
            HistogramBin {
                lower,
                upper,
                count: 0,
                frequency: 0.0,
            }
        })
        .collect();

    for &val in sorted {
        let mut idx = ((val - min_val) / bin_width).floor() as usize;
        if idx >= num_bins {
            idx = num_bins - 1;
        }
        bins[idx].count += 1;
    }

    for bin in &mut bins {
        bin.frequency = bin.count as f64 / n;
    }

    bins
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
