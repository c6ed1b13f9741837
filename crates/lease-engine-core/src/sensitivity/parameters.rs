//! Fixed-grid parameter sensitivity.
//!
//! Perturbs the discount rate, the monthly payment, and the term by a fixed
//! set of variations, re-runs the core calculation for each, and reports
//! the change against the base case.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::lease::engine::{add_months, calculate_lease};
use crate::lease::terms::LeaseTerms;
use crate::types::{round_money, Money, Rate};
use crate::LeaseEngineResult;

const PERCENT: Decimal = Decimal::ONE_HUNDRED;
const MAX_RATE_PCT: Decimal = dec!(100);

/// Rate shocks in percentage points.
const RATE_VARIATIONS: [Decimal; 6] = [
    dec!(-2),
    dec!(-1),
    dec!(-0.5),
    dec!(0.5),
    dec!(1),
    dec!(2),
];
/// Payment shocks in percent of the base payment.
const PAYMENT_VARIATIONS: [Decimal; 6] = [
    dec!(-20),
    dec!(-10),
    dec!(-5),
    dec!(5),
    dec!(10),
    dec!(20),
];
/// Term shocks in months.
const TERM_VARIATIONS: [i32; 6] = [-12, -6, -3, 3, 6, 12];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which input the variation perturbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityParameter {
    DiscountRate,
    MonthlyPayment,
    TermMonths,
}

/// One perturbed re-run of the core calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityVariation {
    pub parameter: SensitivityParameter,
    /// Human-readable shock, e.g. "+1 pts" or "-10%".
    pub label: String,
    /// The shock magnitude in the parameter's own unit.
    pub variation: Decimal,
    pub liability: Money,
    pub asset: Money,
    pub monthly_payment: Money,
    pub liability_change: Money,
    pub asset_change: Money,
    /// Liability change as a percentage of the base liability.
    pub impact_pct: Decimal,
}

/// Full sensitivity grid against a base case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityAnalysis {
    pub base_liability: Money,
    pub base_asset: Money,
    pub variations: Vec<SensitivityVariation>,
}

// ---------------------------------------------------------------------------
// Derived terms
// ---------------------------------------------------------------------------

/// Terms with the discount rate shifted by `points`, kept inside [0, 100].
pub(crate) fn with_rate_shift(terms: &LeaseTerms, points: Rate) -> LeaseTerms {
    let mut next = terms.clone();
    next.discount_rate_annual_pct = (terms.discount_rate_annual_pct + points)
        .max(Decimal::ZERO)
        .min(MAX_RATE_PCT);
    next
}

/// Terms with the payment scaled by `pct` percent, kept positive.
pub(crate) fn with_payment_shift(terms: &LeaseTerms, pct: Decimal) -> LeaseTerms {
    let mut next = terms.clone();
    next.monthly_payment =
        (terms.monthly_payment * (Decimal::ONE + pct / PERCENT)).max(dec!(0.01));
    next
}

/// Terms with the term shifted by `months` (floored at one month), end date
/// recomputed to match.
pub(crate) fn with_term_shift(terms: &LeaseTerms, months: i32) -> LeaseTerms {
    let mut next = terms.clone();
    let shifted = (terms.term_months as i64 + months as i64).max(1) as u32;
    next.term_months = shifted;
    next.end_date = add_months(terms.start_date, shifted);
    next
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the fixed variation grid for all three parameters.
pub fn analyze_sensitivity(terms: &LeaseTerms) -> LeaseEngineResult<SensitivityAnalysis> {
    let base = calculate_lease(terms)?;
    let mut variations = Vec::with_capacity(18);

    for points in RATE_VARIATIONS {
        let derived = with_rate_shift(terms, points);
        variations.push(run_variation(
            &derived,
            &base,
            SensitivityParameter::DiscountRate,
            format!("{} pts", signed(points)),
            points,
        )?);
    }
    for pct in PAYMENT_VARIATIONS {
        let derived = with_payment_shift(terms, pct);
        variations.push(run_variation(
            &derived,
            &base,
            SensitivityParameter::MonthlyPayment,
            format!("{}%", signed(pct)),
            pct,
        )?);
    }
    for months in TERM_VARIATIONS {
        let derived = with_term_shift(terms, months);
        variations.push(run_variation(
            &derived,
            &base,
            SensitivityParameter::TermMonths,
            format!("{months:+} months"),
            Decimal::from(months),
        )?);
    }

    Ok(SensitivityAnalysis {
        base_liability: base.lease_liability_initial,
        base_asset: base.right_of_use_asset_initial,
        variations,
    })
}

/// Explicit sign for variation labels.
fn signed(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

fn run_variation(
    derived: &LeaseTerms,
    base: &crate::lease::engine::CalculationResult,
    parameter: SensitivityParameter,
    label: String,
    variation: Decimal,
) -> LeaseEngineResult<SensitivityVariation> {
    let result = calculate_lease(derived)?;
    let liability_change = result.lease_liability_initial - base.lease_liability_initial;
    let impact_pct = if base.lease_liability_initial.is_zero() {
        Decimal::ZERO
    } else {
        round_money(liability_change / base.lease_liability_initial * PERCENT)
    };

    Ok(SensitivityVariation {
        parameter,
        label,
        variation,
        liability: result.lease_liability_initial,
        asset: result.right_of_use_asset_initial,
        monthly_payment: derived.monthly_payment,
        liability_change,
        asset_change: result.right_of_use_asset_initial - base.right_of_use_asset_initial,
        impact_pct,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
