//! Exercised-option history and templated qualitative disclosures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lease::engine::{months_between, CalculationResult};
use crate::lease::terms::LeaseTerms;
use crate::modification::apply::{Modification, ModificationChange};
use crate::modification::impact::{modification_impact, termination_impact};
use crate::types::{round_money, Money};
use crate::LeaseEngineResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExercisedOptionKind {
    Renewal,
    TermExtension,
    Termination,
}

/// An option from the modification history whose effective date has passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExercisedOption {
    pub kind: ExercisedOptionKind,
    pub effective_date: NaiveDate,
    pub description: String,
    pub financial_impact: Money,
}

/// Templated narrative for the notes to the financial statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualitativeDisclosures {
    pub accounting_policy: String,
    pub significant_judgments: Vec<String>,
    pub future_commitments: String,
    pub risk_factors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Scan a modification history for renewal, extension, and termination
/// records already effective at `as_of`, with their financial impact.
pub fn exercised_options(
    base: &LeaseTerms,
    history: &[Modification],
    as_of: NaiveDate,
) -> LeaseEngineResult<Vec<ExercisedOption>> {
    let mut options = Vec::new();

    for modification in history {
        if modification.effective_date > as_of {
            continue;
        }
        match &modification.change {
            ModificationChange::Renewal { .. } => {
                let impact = modification_impact(base, modification)?;
                options.push(ExercisedOption {
                    kind: ExercisedOptionKind::Renewal,
                    effective_date: modification.effective_date,
                    description: modification.description.clone(),
                    financial_impact: impact.net_financial_impact,
                });
            }
            ModificationChange::Term { .. } => {
                let impact = modification_impact(base, modification)?;
                if impact.term_change_months > 0 {
                    options.push(ExercisedOption {
                        kind: ExercisedOptionKind::TermExtension,
                        effective_date: modification.effective_date,
                        description: modification.description.clone(),
                        financial_impact: impact.net_financial_impact,
                    });
                }
            }
            ModificationChange::Termination { termination_fee } => {
                let impact =
                    termination_impact(base, modification.effective_date, *termination_fee)?;
                options.push(ExercisedOption {
                    kind: ExercisedOptionKind::Termination,
                    effective_date: modification.effective_date,
                    description: modification.description.clone(),
                    financial_impact: impact.net_impact,
                });
            }
            _ => {}
        }
    }

    Ok(options)
}

/// Build the qualitative disclosure narrative for a lease.
pub fn qualitative_disclosures(
    terms: &LeaseTerms,
    result: &CalculationResult,
    as_of: NaiveDate,
) -> QualitativeDisclosures {
    let accounting_policy = format!(
        "Right-of-use assets and lease liabilities are recognized at the lease \
         commencement date. The lease liability is measured at the present value \
         of remaining lease payments, discounted at {}% per annum; the \
         right-of-use asset is amortized on a straight-line basis over the \
         {}-month lease term.",
        terms.discount_rate_annual_pct, terms.term_months
    );

    let mut significant_judgments = vec![format!(
        "The discount rate of {}% reflects the rate implicit in the lease or, \
         where not readily determinable, the incremental borrowing rate.",
        terms.discount_rate_annual_pct
    )];
    if terms.renewal_option.is_some() || terms.purchase_option.is_some() {
        significant_judgments.push(
            "Assessment of whether renewal and purchase options are reasonably \
             certain to be exercised affects the lease term and measurement."
                .to_string(),
        );
    }
    if terms
        .variable_payments
        .as_ref()
        .is_some_and(|v| !v.is_empty())
    {
        significant_judgments.push(
            "Variable lease payments are included in the liability only when \
             in-substance fixed within the lease term."
                .to_string(),
        );
    }

    let remaining_months = months_between(as_of, terms.end_date)
        .clamp(0, terms.term_months as i32);
    let remaining_commitment =
        round_money(terms.monthly_payment * Decimal::from(remaining_months));
    let future_commitments = format!(
        "Total undiscounted lease payments amount to {}; {} remains payable \
         over the {} months from the reporting date to lease end.",
        result.total_lease_payments, remaining_commitment, remaining_months
    );

    let mut risk_factors = vec![
        "Exposure to interest rate changes on remeasurement of the lease liability"
            .to_string(),
        "Potential early termination or modification of contractual terms".to_string(),
    ];
    if terms.asset_fair_value.is_some() {
        risk_factors
            .push("Market value decline of the underlying leased asset".to_string());
    }
    if terms
        .variable_payments
        .as_ref()
        .is_some_and(|v| !v.is_empty())
    {
        risk_factors.push("Variability of usage-based lease payments".to_string());
    }

    QualitativeDisclosures {
        accounting_policy,
        significant_judgments,
        future_commitments,
        risk_factors,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
