//! Maturity analysis: the amortization schedule bucketed by calendar year.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::lease::engine::CalculationResult;
use crate::types::Money;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One calendar year of the maturity profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaturityBucket {
    pub year: i32,
    /// Cash paid during the year: interest plus principal.
    pub payments: Money,
    pub interest: Money,
    pub principal: Money,
    /// Liability outstanding at the end of the year.
    pub ending_liability: Money,
}

/// Year-by-year maturity profile with reconciling totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaturityAnalysis {
    pub buckets: Vec<MaturityBucket>,
    pub total_payments: Money,
    pub total_interest: Money,
    pub total_principal: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Bucket a calculation's schedule by calendar year.
///
/// The bucket totals reconcile exactly with the schedule-wide totals on the
/// calculation result.
pub fn maturity_analysis(result: &CalculationResult) -> MaturityAnalysis {
    let mut buckets: Vec<MaturityBucket> = Vec::new();

    for row in &result.schedule {
        let year = row.date.year();
        let payment = row.interest_expense + row.principal_payment;

        match buckets.last_mut() {
            Some(bucket) if bucket.year == year => {
                bucket.payments += payment;
                bucket.interest += row.interest_expense;
                bucket.principal += row.principal_payment;
                bucket.ending_liability = row.ending_liability;
            }
            _ => buckets.push(MaturityBucket {
                year,
                payments: payment,
                interest: row.interest_expense,
                principal: row.principal_payment,
                ending_liability: row.ending_liability,
            }),
        }
    }

    let total_payments: Money = buckets.iter().map(|b| b.payments).sum();
    let total_interest: Money = buckets.iter().map(|b| b.interest).sum();
    let total_principal: Money = buckets.iter().map(|b| b.principal).sum();

    MaturityAnalysis {
        buckets,
        total_payments,
        total_interest,
        total_principal,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lease::engine::calculate_lease;
    use crate::lease::terms::{LeaseTerms, PaymentFrequency, PaymentTiming};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn lease(start: NaiveDate, term_months: u32) -> LeaseTerms {
        LeaseTerms {
            start_date: start,
            end_date: start + chrono::Months::new(term_months),
            term_months,
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
    // 1. A 36-month lease starting in January spans three years
    // -----------------------------------------------------------------------
    #[test]
    fn test_three_year_buckets() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let result = calculate_lease(&lease(start, 36)).unwrap();
        let analysis = maturity_analysis(&result);

        assert_eq!(analysis.buckets.len(), 3);
        assert_eq!(analysis.buckets[0].year, 2024);
        assert_eq!(analysis.buckets[2].year, 2026);

        // Final year runs the liability to zero.
        assert_eq!(analysis.buckets[2].ending_liability, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 2. Bucket totals reconcile with the calculation totals
    // -----------------------------------------------------------------------
    #[test]
    fn test_totals_reconcile() {
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let result = calculate_lease(&lease(start, 30)).unwrap();
        let analysis = maturity_analysis(&result);

        assert_eq!(analysis.total_interest, result.total_interest);
        assert_eq!(analysis.total_principal, result.total_principal);
        assert_eq!(
            analysis.total_payments,
            result.total_interest + result.total_principal
        );
    }

    // -----------------------------------------------------------------------
    // 3. A mid-year start splits years correctly
    // -----------------------------------------------------------------------
    #[test]
    fn test_mid_year_start() {
        let start = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let result = calculate_lease(&lease(start, 12)).unwrap();
        let analysis = maturity_analysis(&result);

        assert_eq!(analysis.buckets.len(), 2);
        // Oct, Nov, Dec 2024 = 3 periods; 9 in 2025.
        let year_one_principal = analysis.buckets[0].principal;
        let year_two_principal = analysis.buckets[1].principal;
        assert!(year_one_principal < year_two_principal);
        assert_eq!(
            year_one_principal + year_two_principal,
            result.total_principal
        );
    }
}
