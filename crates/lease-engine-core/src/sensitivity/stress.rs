//! Standardized stress scenarios.
//!
//! Four fixed scenarios re-run the core calculation under an assigned
//! shock. Probability and severity are reporting attributes only; they
//! never alter the calculation itself.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::lease::engine::calculate_lease;
use crate::lease::terms::LeaseTerms;
use crate::types::{round_money, Money, Severity};
use crate::LeaseEngineResult;

use super::parameters::{with_payment_shift, with_rate_shift, with_term_shift};

const PERCENT: Decimal = Decimal::ONE_HUNDRED;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A fixed stress scenario definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressScenario {
    pub name: String,
    pub description: String,
    /// Occurrence probability in percent, used for weighting only.
    pub probability_pct: Decimal,
    pub severity: Severity,
    /// Rate shock in percentage points.
    pub rate_shock_points: Decimal,
    /// Payment shock in percent.
    pub payment_shock_pct: Decimal,
    /// Term shock in months.
    pub term_shock_months: i32,
    /// Asserted market-value decline in percent; reported, not calculated.
    pub market_value_decline_pct: Decimal,
}

/// Outcome of one stress scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressTestResult {
    pub scenario: StressScenario,
    pub base_liability: Money,
    pub stressed_liability: Money,
    pub base_asset: Money,
    pub stressed_asset: Money,
    /// Liability change under the scenario.
    pub financial_impact: Money,
    /// `financial_impact * probability_pct / 100`.
    pub probability_weighted_impact: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The four standard stress scenarios.
pub fn standard_scenarios() -> Vec<StressScenario> {
    vec![
        StressScenario {
            name: "interest_rate_shock".into(),
            description: "Discount rate rises by 3 percentage points".into(),
            probability_pct: dec!(15),
            severity: Severity::High,
            rate_shock_points: dec!(3),
            payment_shock_pct: Decimal::ZERO,
            term_shock_months: 0,
            market_value_decline_pct: Decimal::ZERO,
        },
        StressScenario {
            name: "payment_reduction".into(),
            description: "Renegotiated payments fall by 20%".into(),
            probability_pct: dec!(10),
            severity: Severity::Medium,
            rate_shock_points: Decimal::ZERO,
            payment_shock_pct: dec!(-20),
            term_shock_months: 0,
            market_value_decline_pct: Decimal::ZERO,
        },
        StressScenario {
            name: "early_termination".into(),
            description: "Lease cut short by 12 months".into(),
            probability_pct: dec!(5),
            severity: Severity::High,
            rate_shock_points: Decimal::ZERO,
            payment_shock_pct: Decimal::ZERO,
            term_shock_months: -12,
            market_value_decline_pct: Decimal::ZERO,
        },
        StressScenario {
            name: "market_crash".into(),
            description: "Rates up 5 points with a 30% market value decline".into(),
            probability_pct: dec!(3),
            severity: Severity::Extreme,
            rate_shock_points: dec!(5),
            payment_shock_pct: Decimal::ZERO,
            term_shock_months: 0,
            market_value_decline_pct: dec!(30),
        },
    ]
}

/// Run all standard scenarios against the base terms.
pub fn run_stress_tests(terms: &LeaseTerms) -> LeaseEngineResult<Vec<StressTestResult>> {
    let base = calculate_lease(terms)?;
    let mut results = Vec::with_capacity(4);

    for scenario in standard_scenarios() {
        let mut stressed_terms = terms.clone();
        if !scenario.rate_shock_points.is_zero() {
            stressed_terms = with_rate_shift(&stressed_terms, scenario.rate_shock_points);
        }
        if !scenario.payment_shock_pct.is_zero() {
            stressed_terms = with_payment_shift(&stressed_terms, scenario.payment_shock_pct);
        }
        if scenario.term_shock_months != 0 {
            stressed_terms = with_term_shift(&stressed_terms, scenario.term_shock_months);
        }

        let stressed = calculate_lease(&stressed_terms)?;
        let financial_impact = stressed.lease_liability_initial - base.lease_liability_initial;
        let probability_weighted_impact =
            round_money(financial_impact * scenario.probability_pct / PERCENT);

        results.push(StressTestResult {
            scenario,
            base_liability: base.lease_liability_initial,
            stressed_liability: stressed.lease_liability_initial,
            base_asset: base.right_of_use_asset_initial,
            stressed_asset: stressed.right_of_use_asset_initial,
            financial_impact,
            probability_weighted_impact,
        });
    }

    Ok(results)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
