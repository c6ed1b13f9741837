//! Applying contract modifications to lease terms.
//!
//! A modification never mutates the original contract: each application
//! derives a fresh [`LeaseTerms`] value, and a list of modifications is
//! applied in effective-date order.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LeaseEngineError;
use crate::lease::engine::add_months;
use crate::lease::terms::LeaseTerms;
use crate::types::{Money, Rate, ValidationReport};
use crate::LeaseEngineResult;

const PERCENT: Decimal = Decimal::ONE_HUNDRED;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The type-specific content of a modification.
///
/// `Payment` and `Rate` accept an absolute value, an additive delta, or a
/// percentage change. When more than one is set the priority is
/// absolute, then delta, then percentage; the extra fields are ignored
/// without a validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModificationChange {
    /// Term extension or reduction.
    Term {
        #[serde(skip_serializing_if = "Option::is_none")]
        new_term_months: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        delta_months: Option<i32>,
    },
    /// Fixed payment change.
    Payment {
        #[serde(skip_serializing_if = "Option::is_none")]
        new_monthly_payment: Option<Money>,
        #[serde(skip_serializing_if = "Option::is_none")]
        payment_delta: Option<Money>,
        /// Percentage change, e.g. 10 = +10%.
        #[serde(skip_serializing_if = "Option::is_none")]
        payment_pct_change: Option<Decimal>,
    },
    /// Discount rate change, all values in percent.
    Rate {
        #[serde(skip_serializing_if = "Option::is_none")]
        new_rate_pct: Option<Rate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        rate_delta_points: Option<Rate>,
        /// Percentage change of the rate itself, e.g. 10 = +10%.
        #[serde(skip_serializing_if = "Option::is_none")]
        rate_pct_change: Option<Decimal>,
    },
    /// Underlying asset fair-value change.
    Asset {
        #[serde(skip_serializing_if = "Option::is_none")]
        new_fair_value: Option<Money>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fair_value_delta: Option<Money>,
    },
    /// Renewal: extends the term and may reset payment and rate.
    Renewal {
        additional_term_months: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        renewal_monthly_payment: Option<Money>,
        #[serde(skip_serializing_if = "Option::is_none")]
        renewal_discount_rate_pct: Option<Rate>,
    },
    /// Early termination. Measured through
    /// [`crate::modification::termination_impact`], never through the
    /// generic field-mutation path.
    Termination {
        #[serde(skip_serializing_if = "Option::is_none")]
        termination_fee: Option<Money>,
    },
}

/// A single contract modification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Modification {
    /// Date the modification was agreed.
    pub modification_date: NaiveDate,
    /// Date the modification takes effect; never before `modification_date`.
    pub effective_date: NaiveDate,
    pub description: String,
    pub change: ModificationChange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_costs: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incentives_received: Option<Money>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the business rules on a modification.
pub fn validate_modification(modification: &Modification) -> ValidationReport {
    let mut errors = Vec::new();

    if modification.description.trim().is_empty() {
        errors.push("description must not be empty".to_string());
    }
    if modification.effective_date < modification.modification_date {
        errors.push("effective_date must not precede modification_date".to_string());
    }

    match &modification.change {
        ModificationChange::Term {
            new_term_months,
            delta_months,
        } => {
            if new_term_months.is_none() && delta_months.is_none() {
                errors.push(
                    "term change requires new_term_months or delta_months".to_string(),
                );
            }
            if let Some(t) = new_term_months {
                if *t == 0 {
                    errors.push("new_term_months must be greater than zero".to_string());
                }
            }
        }
        ModificationChange::Payment {
            new_monthly_payment,
            payment_delta,
            payment_pct_change,
        } => {
            if new_monthly_payment.is_none()
                && payment_delta.is_none()
                && payment_pct_change.is_none()
            {
                errors.push(
                    "payment change requires new_monthly_payment, payment_delta, or payment_pct_change"
                        .to_string(),
                );
            }
            if let Some(p) = new_monthly_payment {
                if *p <= Decimal::ZERO {
                    errors.push("new_monthly_payment must be positive".to_string());
                }
            }
        }
        ModificationChange::Rate {
            new_rate_pct,
            rate_delta_points,
            rate_pct_change,
        } => {
            if new_rate_pct.is_none() && rate_delta_points.is_none() && rate_pct_change.is_none() {
                errors.push(
                    "rate change requires new_rate_pct, rate_delta_points, or rate_pct_change"
                        .to_string(),
                );
            }
            if let Some(r) = new_rate_pct {
                if *r < Decimal::ZERO || *r > PERCENT {
                    errors.push("new_rate_pct must be between 0 and 100".to_string());
                }
            }
        }
        ModificationChange::Asset {
            new_fair_value,
            fair_value_delta,
        } => {
            if new_fair_value.is_none() && fair_value_delta.is_none() {
                errors.push(
                    "asset change requires new_fair_value or fair_value_delta".to_string(),
                );
            }
        }
        ModificationChange::Renewal {
            additional_term_months,
            ..
        } => {
            if *additional_term_months == 0 {
                errors.push("additional_term_months must be greater than zero".to_string());
            }
        }
        ModificationChange::Termination { termination_fee } => {
            if let Some(fee) = termination_fee {
                if *fee < Decimal::ZERO {
                    errors.push("termination_fee must not be negative".to_string());
                }
            }
        }
    }

    ValidationReport::from_errors(errors)
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Apply a list of modifications to base terms, in effective-date order.
///
/// Pure transformation: the base terms are never aliased or mutated. Each
/// modification is validated before application; terminations are rejected
/// here because derecognition is a measurement, not a terms rewrite.
pub fn apply_modifications(
    base: &LeaseTerms,
    modifications: &[Modification],
) -> LeaseEngineResult<LeaseTerms> {
    let mut ordered: Vec<&Modification> = modifications.iter().collect();
    ordered.sort_by_key(|m| m.effective_date);

    let mut terms = base.clone();
    for modification in ordered {
        terms = apply_one(&terms, modification)?;
    }
    Ok(terms)
}

pub(crate) fn apply_one(
    terms: &LeaseTerms,
    modification: &Modification,
) -> LeaseEngineResult<LeaseTerms> {
    let report = validate_modification(modification);
    if !report.is_valid {
        return Err(LeaseEngineError::Validation {
            errors: report.errors,
        });
    }

    let mut next = terms.clone();
    match &modification.change {
        ModificationChange::Term {
            new_term_months,
            delta_months,
        } => {
            let new_term = match (new_term_months, delta_months) {
                (Some(t), _) => *t,
                (None, Some(d)) => shifted_term(terms.term_months, *d),
                (None, None) => unreachable!("rejected by validate_modification"),
            };
            set_term(&mut next, new_term);
        }
        ModificationChange::Payment {
            new_monthly_payment,
            payment_delta,
            payment_pct_change,
        } => {
            if let Some(p) = new_monthly_payment {
                next.monthly_payment = *p;
            } else if let Some(d) = payment_delta {
                next.monthly_payment += *d;
            } else if let Some(pct) = payment_pct_change {
                next.monthly_payment *= Decimal::ONE + *pct / PERCENT;
            }
            // A delta or percentage can wipe out the payment; reject here so
            // the caller gets a field-level message instead of a downstream
            // calculation failure.
            if next.monthly_payment <= Decimal::ZERO {
                return Err(LeaseEngineError::InvalidInput {
                    field: "monthly_payment".into(),
                    reason: format!(
                        "payment change yields non-positive payment {}",
                        next.monthly_payment
                    ),
                });
            }
        }
        ModificationChange::Rate {
            new_rate_pct,
            rate_delta_points,
            rate_pct_change,
        } => {
            if let Some(r) = new_rate_pct {
                next.discount_rate_annual_pct = *r;
            } else if let Some(d) = rate_delta_points {
                next.discount_rate_annual_pct += *d;
            } else if let Some(pct) = rate_pct_change {
                next.discount_rate_annual_pct *= Decimal::ONE + *pct / PERCENT;
            }
        }
        ModificationChange::Asset {
            new_fair_value,
            fair_value_delta,
        } => {
            if let Some(fv) = new_fair_value {
                next.asset_fair_value = Some(*fv);
            } else if let Some(d) = fair_value_delta {
                let current = terms.asset_fair_value.unwrap_or(Decimal::ZERO);
                next.asset_fair_value = Some(current + *d);
            }
        }
        ModificationChange::Renewal {
            additional_term_months,
            renewal_monthly_payment,
            renewal_discount_rate_pct,
        } => {
            set_term(&mut next, terms.term_months + additional_term_months);
            if let Some(p) = renewal_monthly_payment {
                next.monthly_payment = *p;
            }
            if let Some(r) = renewal_discount_rate_pct {
                next.discount_rate_annual_pct = *r;
            }
        }
        ModificationChange::Termination { .. } => {
            return Err(LeaseEngineError::InvalidInput {
                field: "change".into(),
                reason: "termination is measured via termination_impact, not applied to terms"
                    .into(),
            });
        }
    }
    Ok(next)
}

/// New term after a signed month delta, floored at one month.
fn shifted_term(term_months: u32, delta: i32) -> u32 {
    let shifted = term_months as i64 + delta as i64;
    shifted.max(1) as u32
}

/// Set the term and keep the end date consistent with it.
fn set_term(terms: &mut LeaseTerms, new_term_months: u32) {
    terms.term_months = new_term_months;
    terms.end_date = add_months(terms.start_date, new_term_months);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
