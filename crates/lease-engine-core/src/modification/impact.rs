//! Financial impact of modifications and early termination.
//!
//! Impact is measured by running the core calculation on the terms before
//! and after the change and reporting the deltas; termination derecognizes
//! the remaining balances at the elapsed period instead.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lease::engine::{calculate_lease, months_between, period_at};
use crate::lease::terms::LeaseTerms;
use crate::types::{round_money, Money, Rate};
use crate::LeaseEngineResult;

use super::apply::{apply_one, Modification};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Before/after deltas for a single modification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModificationImpact {
    pub liability_before: Money,
    pub liability_after: Money,
    pub liability_change: Money,
    pub asset_before: Money,
    pub asset_after: Money,
    pub asset_change: Money,
    pub payment_change: Money,
    /// Rate change in percentage points.
    pub rate_change_points: Rate,
    pub term_change_months: i64,
    /// `liability_change + modification_fee + additional_costs
    /// - incentives_received`.
    pub net_financial_impact: Money,
}

/// Derecognition at early termination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminationImpact {
    pub termination_date: NaiveDate,
    /// Whole months elapsed from lease start to the termination date.
    pub periods_elapsed: u32,
    /// Liability still on the books at the termination period; fully
    /// derecognized.
    pub remaining_liability: Money,
    /// ROU asset still on the books; fully derecognized.
    pub remaining_asset: Money,
    pub termination_fee: Money,
    /// `-remaining_liability - remaining_asset - termination_fee`.
    pub net_impact: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Measure the financial impact of one modification against base terms.
pub fn modification_impact(
    base: &LeaseTerms,
    modification: &Modification,
) -> LeaseEngineResult<ModificationImpact> {
    let before = calculate_lease(base)?;
    let modified_terms = apply_one(base, modification)?;
    let after = calculate_lease(&modified_terms)?;

    let liability_change = after.lease_liability_initial - before.lease_liability_initial;
    let fee = modification.modification_fee.unwrap_or(Decimal::ZERO);
    let costs = modification.additional_costs.unwrap_or(Decimal::ZERO);
    let incentives = modification.incentives_received.unwrap_or(Decimal::ZERO);

    Ok(ModificationImpact {
        liability_before: before.lease_liability_initial,
        liability_after: after.lease_liability_initial,
        liability_change,
        asset_before: before.right_of_use_asset_initial,
        asset_after: after.right_of_use_asset_initial,
        asset_change: after.right_of_use_asset_initial - before.right_of_use_asset_initial,
        payment_change: modified_terms.monthly_payment - base.monthly_payment,
        rate_change_points: modified_terms.discount_rate_annual_pct
            - base.discount_rate_annual_pct,
        term_change_months: modified_terms.term_months as i64 - base.term_months as i64,
        net_financial_impact: round_money(liability_change + fee + costs - incentives),
    })
}

/// Measure derecognition on early termination at `termination_date`.
///
/// The remaining balances are read from the pre-termination schedule at the
/// period reached by the elapsed months. Terminating on the start date
/// derecognizes the full initial balances; terminating past the schedule
/// end derecognizes nothing.
pub fn termination_impact(
    base: &LeaseTerms,
    termination_date: NaiveDate,
    termination_fee: Option<Money>,
) -> LeaseEngineResult<TerminationImpact> {
    let result = calculate_lease(base)?;

    let elapsed = months_between(base.start_date, termination_date).max(0) as u32;
    let (remaining_liability, remaining_asset) = if elapsed == 0 {
        (
            result.lease_liability_initial,
            result.right_of_use_asset_initial,
        )
    } else {
        match period_at(&result.schedule, elapsed) {
            Some(p) => (p.ending_liability, p.ending_asset),
            // Past the schedule: everything already amortized.
            None => (Decimal::ZERO, Decimal::ZERO),
        }
    };

    let fee = termination_fee.unwrap_or(Decimal::ZERO);

    Ok(TerminationImpact {
        termination_date,
        periods_elapsed: elapsed,
        remaining_liability,
        remaining_asset,
        termination_fee: fee,
        net_impact: round_money(-remaining_liability - remaining_asset - fee),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lease::terms::{PaymentFrequency, PaymentTiming};
    use crate::modification::apply::ModificationChange;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn base_lease() -> LeaseTerms {
        LeaseTerms {
            start_date: date(2024, 1, 1),
            end_date: date(2027, 1, 1),
            term_months: 36,
            monthly_payment: dec!(1500),
            payment_frequency: PaymentFrequency::Monthly,
            payment_timing: PaymentTiming::End,
            discount_rate_annual_pct: dec!(8.5),
            initial_payment: None,
            guaranteed_residual_value: None,
            initial_direct_costs: None,
            lease_incentives: None,
            variable_payments: None,
            purchase_option: None,
            renewal_option: None,
            asset_fair_value: None,
        }
    }

    // -----------------------------------------------------------------------
    // 1. Payment increase raises the liability and nets with fees
    // -----------------------------------------------------------------------
    #[test]
    fn test_payment_increase_impact() {
        let base = base_lease();
        let m = Modification {
            modification_date: date(2024, 6, 1),
            effective_date: date(2024, 7, 1),
            description: "payment uplift".into(),
            change: ModificationChange::Payment {
                new_monthly_payment: Some(dec!(1800)),
                payment_delta: None,
                payment_pct_change: None,
            },
            modification_fee: Some(dec!(500)),
            additional_costs: Some(dec!(200)),
            incentives_received: Some(dec!(100)),
        };

        let impact = modification_impact(&base, &m).unwrap();
        assert!(impact.liability_change > Decimal::ZERO);
        assert_eq!(impact.payment_change, dec!(300));
        assert_eq!(impact.rate_change_points, Decimal::ZERO);
        assert_eq!(impact.term_change_months, 0);
        assert_eq!(
            impact.net_financial_impact,
            round_money(impact.liability_change + dec!(600))
        );
    }

    // -----------------------------------------------------------------------
    // 2. Rate increase lowers the liability
    // -----------------------------------------------------------------------
    #[test]
    fn test_rate_increase_impact() {
        let base = base_lease();
        let m = Modification {
            modification_date: date(2024, 6, 1),
            effective_date: date(2024, 7, 1),
            description: "rate reset".into(),
            change: ModificationChange::Rate {
                new_rate_pct: Some(dec!(10.5)),
                rate_delta_points: None,
                rate_pct_change: None,
            },
            modification_fee: None,
            additional_costs: None,
            incentives_received: None,
        };

        let impact = modification_impact(&base, &m).unwrap();
        assert!(impact.liability_change < Decimal::ZERO);
        assert_eq!(impact.rate_change_points, dec!(2.0));
        assert_eq!(impact.net_financial_impact, impact.liability_change);
    }

    // -----------------------------------------------------------------------
    // 3. Termination on the start date derecognizes the initial balances
    // -----------------------------------------------------------------------
    #[test]
    fn test_termination_on_start_date() {
        let base = base_lease();
        let impact = termination_impact(&base, base.start_date, Some(dec!(2500))).unwrap();
        let result = calculate_lease(&base).unwrap();

        assert_eq!(impact.periods_elapsed, 0);
        assert_eq!(impact.remaining_liability, result.lease_liability_initial);
        assert_eq!(impact.remaining_asset, result.right_of_use_asset_initial);
        assert_eq!(
            impact.net_impact,
            round_money(
                -result.lease_liability_initial
                    - result.right_of_use_asset_initial
                    - dec!(2500)
            )
        );
    }

    // -----------------------------------------------------------------------
    // 4. Mid-term termination reads the elapsed period's balances
    // -----------------------------------------------------------------------
    #[test]
    fn test_termination_mid_term() {
        let base = base_lease();
        let result = calculate_lease(&base).unwrap();
        let impact = termination_impact(&base, date(2025, 1, 1), None).unwrap();

        assert_eq!(impact.periods_elapsed, 12);
        let period_12 = period_at(&result.schedule, 12).unwrap();
        assert_eq!(impact.remaining_liability, period_12.ending_liability);
        assert_eq!(impact.remaining_asset, period_12.ending_asset);
        assert!(impact.net_impact < Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 5. Termination past the end derecognizes nothing but the fee
    // -----------------------------------------------------------------------
    #[test]
    fn test_termination_after_end() {
        let base = base_lease();
        let impact = termination_impact(&base, date(2030, 6, 1), Some(dec!(100))).unwrap();
        assert_eq!(impact.remaining_liability, Decimal::ZERO);
        assert_eq!(impact.remaining_asset, Decimal::ZERO);
        assert_eq!(impact.net_impact, dec!(-100));
    }
}
