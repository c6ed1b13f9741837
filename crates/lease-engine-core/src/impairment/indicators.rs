//! Impairment indicator identification.
//!
//! Screens external, internal, and asset-specific conditions against the
//! current carrying amount. Indicators that only reach low severity are
//! not surfaced; a caller sees the medium and high findings that require
//! a recoverable-amount test.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::lease::terms::LeaseTerms;
use crate::types::{Money, Rate, Severity};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Market value decline vs. carrying amount that flags an external
/// indicator.
const MARKET_DECLINE_THRESHOLD: Decimal = dec!(0.20);
/// Decline at which the indicator is graded high rather than medium.
const MARKET_DECLINE_SEVERE: Decimal = dec!(0.35);
/// Divergence between contract and market rate, in percentage points.
const RATE_DIVERGENCE_THRESHOLD: Decimal = dec!(2);
const RATE_DIVERGENCE_SEVERE: Decimal = dec!(4);
/// Asset age as a share of useful life that flags an internal indicator.
const AGE_RATIO_THRESHOLD: Decimal = dec!(0.70);
const AGE_RATIO_SEVERE: Decimal = dec!(0.90);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Where an indicator comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorCategory {
    External,
    Internal,
    AssetSpecific,
}

/// A single impairment indicator finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpairmentIndicator {
    pub category: IndicatorCategory,
    pub name: String,
    pub severity: Severity,
    pub description: String,
}

/// Observed condition of the leased asset at an assessment date.
///
/// Produced fresh by the caller for each analysis; nothing here is
/// persisted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetCondition {
    pub assessment_date: NaiveDate,
    /// Current market value of the asset, if observable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_market_value: Option<Money>,
    /// Current market discount rate for comparable leases, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_market_rate_pct: Option<Rate>,
    /// Generally adverse economic conditions in the asset's market.
    #[serde(default)]
    pub adverse_economic_conditions: bool,
    /// Asset age in months, for the useful-life screen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_age_months: Option<u32>,
    /// Economic useful life in months.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub useful_life_months: Option<u32>,
    /// The way the asset is used has changed significantly.
    #[serde(default)]
    pub usage_pattern_changed: bool,
    /// Physical damage observed.
    #[serde(default)]
    pub physical_damage: bool,
    /// Technology-classified asset exposed to obsolescence.
    #[serde(default)]
    pub technology_asset: bool,
    /// Regulatory change affecting the asset's use.
    #[serde(default)]
    pub regulatory_change: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Identify impairment indicators for a lease against its current carrying
/// amount. Only medium and high severity findings are returned.
pub fn identify_indicators(
    terms: &LeaseTerms,
    carrying_amount: Money,
    condition: &AssetCondition,
) -> Vec<ImpairmentIndicator> {
    let mut indicators = Vec::new();

    // External: market value decline beyond 20% of carrying amount.
    if let Some(market_value) = condition.current_market_value {
        if carrying_amount > Decimal::ZERO {
            let decline = (carrying_amount - market_value) / carrying_amount;
            if decline > MARKET_DECLINE_THRESHOLD {
                let severity = if decline > MARKET_DECLINE_SEVERE {
                    Severity::High
                } else {
                    Severity::Medium
                };
                indicators.push(ImpairmentIndicator {
                    category: IndicatorCategory::External,
                    name: "market_value_decline".into(),
                    severity,
                    description: format!(
                        "Market value {} is {:.1}% below carrying amount {}",
                        market_value,
                        decline * dec!(100),
                        carrying_amount
                    ),
                });
            }
        }
    }

    // External: contract rate diverges from the market rate.
    if let Some(market_rate) = condition.estimated_market_rate_pct {
        let divergence = (terms.discount_rate_annual_pct - market_rate).abs();
        if divergence > RATE_DIVERGENCE_THRESHOLD {
            let severity = if divergence > RATE_DIVERGENCE_SEVERE {
                Severity::High
            } else {
                Severity::Medium
            };
            indicators.push(ImpairmentIndicator {
                category: IndicatorCategory::External,
                name: "interest_rate_divergence".into(),
                severity,
                description: format!(
                    "Contract rate {}% diverges from market rate {}% by {} points",
                    terms.discount_rate_annual_pct, market_rate, divergence
                ),
            });
        }
    }

    // External: adverse economic conditions.
    if condition.adverse_economic_conditions {
        indicators.push(ImpairmentIndicator {
            category: IndicatorCategory::External,
            name: "adverse_economic_conditions".into(),
            severity: Severity::Medium,
            description: "Adverse economic conditions in the asset's market".into(),
        });
    }

    // Internal: asset age beyond 70% of useful life.
    if let (Some(age), Some(life)) = (condition.asset_age_months, condition.useful_life_months) {
        if life > 0 {
            let ratio = Decimal::from(age) / Decimal::from(life);
            if ratio > AGE_RATIO_THRESHOLD {
                let severity = if ratio > AGE_RATIO_SEVERE {
                    Severity::High
                } else {
                    Severity::Medium
                };
                indicators.push(ImpairmentIndicator {
                    category: IndicatorCategory::Internal,
                    name: "asset_age".into(),
                    severity,
                    description: format!(
                        "Asset age {age}/{life} months is {:.1}% of useful life",
                        ratio * dec!(100)
                    ),
                });
            }
        }
    }

    // Internal: usage pattern change.
    if condition.usage_pattern_changed {
        indicators.push(ImpairmentIndicator {
            category: IndicatorCategory::Internal,
            name: "usage_pattern_change".into(),
            severity: Severity::Medium,
            description: "Significant change in how the asset is used".into(),
        });
    }

    // Internal: physical damage.
    if condition.physical_damage {
        indicators.push(ImpairmentIndicator {
            category: IndicatorCategory::Internal,
            name: "physical_damage".into(),
            severity: Severity::High,
            description: "Physical damage to the leased asset".into(),
        });
    }

    // Asset-specific: technology obsolescence.
    if condition.technology_asset {
        indicators.push(ImpairmentIndicator {
            category: IndicatorCategory::AssetSpecific,
            name: "technology_obsolescence".into(),
            severity: Severity::Medium,
            description: "Technology asset exposed to obsolescence risk".into(),
        });
    }

    // Asset-specific: regulatory change.
    if condition.regulatory_change {
        indicators.push(ImpairmentIndicator {
            category: IndicatorCategory::AssetSpecific,
            name: "regulatory_change".into(),
            severity: Severity::Medium,
            description: "Regulatory change restricting the asset's use".into(),
        });
    }

    indicators.retain(|i| i.severity >= Severity::Medium);
    indicators
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
