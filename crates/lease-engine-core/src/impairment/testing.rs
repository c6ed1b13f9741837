//! Recoverable amount, impairment test, and reversal limits.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LeaseEngineError;
use crate::lease::engine::{monthly_discount_rate, months_between};
use crate::lease::terms::{validate_lease_terms, LeaseTerms};
use crate::types::{round_money, Money, Severity};
use crate::LeaseEngineResult;

use super::indicators::{identify_indicators, AssetCondition, ImpairmentIndicator};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Assumed cost of disposal when deriving fair value less costs to sell.
const DISPOSAL_COST_PCT: Decimal = dec!(0.05);
/// Retest horizon when a high-severity indicator is present.
const RETEST_MONTHS_HIGH: u32 = 6;
/// Standard annual retest horizon.
const RETEST_MONTHS_ANNUAL: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The two legs of the recoverable-amount measurement and their maximum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverableAmount {
    /// Discounted remaining payments plus discounted residual over the
    /// months left from the assessment date to lease end.
    pub value_in_use: Money,
    /// Fair value net of the assumed 5% disposal cost, floored at zero.
    pub fair_value_less_costs_to_sell: Money,
    /// `max(value_in_use, fair_value_less_costs_to_sell)`.
    pub recoverable_amount: Money,
    /// Months remaining at the assessment date.
    pub remaining_months: u32,
}

/// Result of an impairment test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpairmentTest {
    pub assessment_date: NaiveDate,
    pub carrying_amount: Money,
    pub recoverable: RecoverableAmount,
    /// `max(0, carrying_amount - recoverable_amount)`.
    pub impairment_loss: Money,
    pub impaired: bool,
    pub indicators: Vec<ImpairmentIndicator>,
    /// Six months out when a high-severity indicator is present, otherwise
    /// the annual cycle.
    pub next_test_date: NaiveDate,
}

/// Result of a reversal test against a previously recognized loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpairmentReversal {
    pub previous_loss: Money,
    /// `min(previous_loss, carrying_amount - recoverable_amount)`.
    pub max_reversal: Money,
    /// The max reversal when positive, otherwise zero.
    pub reversal_recognized: Money,
    pub reversible: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Measure the recoverable amount of the leased asset at the assessment
/// date in `condition`.
pub fn recoverable_amount(terms: &LeaseTerms, condition: &AssetCondition) -> RecoverableAmount {
    let remaining = months_between(condition.assessment_date, terms.end_date)
        .max(0)
        .min(terms.term_months as i32) as u32;

    let monthly_rate = monthly_discount_rate(terms.discount_rate_annual_pct);
    let one_plus_r = Decimal::ONE + monthly_rate;

    let mut value_in_use = Decimal::ZERO;
    let mut discount_factor = Decimal::ONE;
    for _ in 0..remaining {
        discount_factor *= one_plus_r;
        if !discount_factor.is_zero() {
            value_in_use += terms.monthly_payment / discount_factor;
        }
    }
    if let Some(grv) = terms.guaranteed_residual_value {
        if remaining > 0 && !discount_factor.is_zero() {
            // discount_factor sits at (1+r)^remaining after the loop
            value_in_use += grv / discount_factor;
        }
    }
    let value_in_use = round_money(value_in_use);

    let fair_value = condition
        .current_market_value
        .or(terms.asset_fair_value)
        .unwrap_or(Decimal::ZERO);
    let fair_value_less_costs_to_sell =
        round_money((fair_value * (Decimal::ONE - DISPOSAL_COST_PCT)).max(Decimal::ZERO));

    RecoverableAmount {
        value_in_use,
        fair_value_less_costs_to_sell,
        recoverable_amount: value_in_use.max(fair_value_less_costs_to_sell),
        remaining_months: remaining,
    }
}

/// Run the full impairment test: indicators, recoverable amount, loss, and
/// the next test date.
pub fn test_impairment(
    terms: &LeaseTerms,
    carrying_amount: Money,
    condition: &AssetCondition,
) -> LeaseEngineResult<ImpairmentTest> {
    let report = validate_lease_terms(terms);
    if !report.is_valid {
        return Err(LeaseEngineError::Validation {
            errors: report.errors,
        });
    }

    let indicators = identify_indicators(terms, carrying_amount, condition);
    let recoverable = recoverable_amount(terms, condition);

    let impairment_loss =
        round_money((carrying_amount - recoverable.recoverable_amount).max(Decimal::ZERO));
    let impaired = impairment_loss > Decimal::ZERO;

    let retest_months = if indicators.iter().any(|i| i.severity >= Severity::High) {
        RETEST_MONTHS_HIGH
    } else {
        RETEST_MONTHS_ANNUAL
    };
    let next_test_date =
        condition.assessment_date + chrono::Months::new(retest_months);

    Ok(ImpairmentTest {
        assessment_date: condition.assessment_date,
        carrying_amount,
        recoverable,
        impairment_loss,
        impaired,
        indicators,
        next_test_date,
    })
}

/// Cap a reversal of a previously recognized impairment loss.
pub fn test_reversal(
    terms: &LeaseTerms,
    carrying_amount: Money,
    condition: &AssetCondition,
    previous_loss: Money,
) -> ImpairmentReversal {
    let recoverable = recoverable_amount(terms, condition);
    let max_reversal = round_money(
        previous_loss.min(carrying_amount - recoverable.recoverable_amount),
    );
    let reversible = max_reversal > Decimal::ZERO;

    ImpairmentReversal {
        previous_loss,
        max_reversal,
        reversal_recognized: max_reversal.max(Decimal::ZERO),
        reversible,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
