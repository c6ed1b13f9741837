//! Lease contract terms and business-rule validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate, ValidationReport};

const MAX_RATE_PCT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// When within a period the fixed payment falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentTiming {
    /// Annuity due: payment at the start of each period.
    Beginning,
    /// Ordinary annuity: payment at the end of each period.
    End,
}

/// Contractual payment cadence.
///
/// Carried for the caller's reporting; the measurement basis is always
/// monthly and `monthly_payment` is the monthly-equivalent amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Quarterly,
    Annually,
}

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A variable lease payment due on a specific date.
///
/// Only payments falling inside the lease term window contribute to the
/// initial liability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariablePayment {
    pub date: NaiveDate,
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Purchase option attached to the lease.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOption {
    /// Strike price payable at end of term.
    pub price: Money,
    /// Whether exercise is reasonably certain. Only then does the option
    /// price enter the liability measurement.
    pub reasonably_certain: bool,
}

/// Renewal option attached to the lease, consumed by renewal modifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewalOption {
    /// Months added to the term on renewal.
    pub additional_term_months: u32,
    /// Payment applying during the renewal period, if renegotiated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_monthly_payment: Option<Money>,
    /// Discount rate applying from renewal, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_discount_rate_pct: Option<Rate>,
}

/// Full commercial terms of a lease contract, immutable per calculation.
///
/// Monetary amounts are plain decimals in the contract currency's minor
/// unit; dates are calendar dates with no time-of-day component. Rates are
/// percentages in `[0, 100]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseTerms {
    /// Lease commencement date.
    pub start_date: NaiveDate,
    /// Lease end date; must be strictly after `start_date`.
    pub end_date: NaiveDate,
    /// Lease term in months.
    pub term_months: u32,
    /// Fixed monthly payment.
    pub monthly_payment: Money,
    /// Contractual payment cadence (reporting only).
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
    /// Payment timing within each period.
    pub payment_timing: PaymentTiming,
    /// Annual discount rate in percent.
    pub discount_rate_annual_pct: Rate,
    /// Payment made at or before commencement, added at face value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_payment: Option<Money>,
    /// Residual value guaranteed to the lessor at end of term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guaranteed_residual_value: Option<Money>,
    /// Initial direct costs capitalized into the ROU asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_direct_costs: Option<Money>,
    /// Incentives received, deducted from the ROU asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_incentives: Option<Money>,
    /// Date-specific variable payments, in contract order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_payments: Option<Vec<VariablePayment>>,
    /// Purchase option, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_option: Option<PurchaseOption>,
    /// Renewal option, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_option: Option<RenewalOption>,
    /// Fair value of the underlying asset, used by impairment testing and
    /// asset-change modifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_fair_value: Option<Money>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the business rules on a set of lease terms.
///
/// Never panics and never returns `Err`: failures come back as a
/// [`ValidationReport`] so the caller can surface field-level messages.
/// Calling this twice on the same terms yields identical results.
pub fn validate_lease_terms(terms: &LeaseTerms) -> ValidationReport {
    let mut errors = Vec::new();

    if terms.end_date <= terms.start_date {
        errors.push("end_date must be strictly after start_date".to_string());
    }
    if terms.term_months == 0 {
        errors.push("term_months must be greater than zero".to_string());
    }
    if terms.monthly_payment <= Decimal::ZERO {
        errors.push("monthly_payment must be positive".to_string());
    }
    if terms.discount_rate_annual_pct < Decimal::ZERO
        || terms.discount_rate_annual_pct > MAX_RATE_PCT
    {
        errors.push("discount_rate_annual_pct must be between 0 and 100".to_string());
    }
    if let Some(initial) = terms.initial_payment {
        if initial < Decimal::ZERO {
            errors.push("initial_payment must not be negative".to_string());
        }
    }
    if let Some(grv) = terms.guaranteed_residual_value {
        if grv < Decimal::ZERO {
            errors.push("guaranteed_residual_value must not be negative".to_string());
        }
    }
    if let Some(idc) = terms.initial_direct_costs {
        if idc < Decimal::ZERO {
            errors.push("initial_direct_costs must not be negative".to_string());
        }
    }
    if let Some(incentives) = terms.lease_incentives {
        if incentives < Decimal::ZERO {
            errors.push("lease_incentives must not be negative".to_string());
        }
    }
    if let Some(variable) = &terms.variable_payments {
        for (i, vp) in variable.iter().enumerate() {
            if vp.amount <= Decimal::ZERO {
                errors.push(format!("variable_payments[{i}].amount must be positive"));
            }
        }
    }

    ValidationReport::from_errors(errors)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
