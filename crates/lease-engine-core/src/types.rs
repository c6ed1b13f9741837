use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as percentages (8.5 = 8.5%) at the input boundary.
/// Internal engine math converts to decimal fractions once.
pub type Rate = Decimal;

/// Round a monetary amount to the currency minor unit (2 decimal places).
///
/// Used only at reporting boundaries; intermediate present-value math runs
/// at full Decimal precision.
pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Severity grading shared by impairment indicators and stress scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Extreme,
}

/// Structured outcome of a business-rule validation.
///
/// Business-rule failures are never raised as errors from the `validate_*`
/// functions; they come back here so a caller can render field-level
/// messages. Calculation entry points wrap an invalid report in
/// [`crate::LeaseEngineError::Validation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// A report with no errors.
    pub fn valid() -> Self {
        ValidationReport {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Build a report from a collected error list; valid iff empty.
    pub fn from_errors(errors: Vec<String>) -> Self {
        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}
