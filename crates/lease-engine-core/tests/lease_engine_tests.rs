use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use lease_engine_core::disclosure::{
    exercised_options, maturity_analysis, qualitative_disclosures, ExercisedOptionKind,
};
use lease_engine_core::impairment::{test_impairment, AssetCondition};
use lease_engine_core::lease::{
    calculate_lease, period_at, validate_lease_terms, LeaseTerms, PaymentFrequency,
    PaymentTiming, PurchaseOption,
};
use lease_engine_core::modification::{
    apply_modifications, modification_impact, termination_impact, Modification,
    ModificationChange,
};
use lease_engine_core::sensitivity::{
    analyze_sensitivity, run_monte_carlo, run_stress_tests, MonteCarloInput,
    SensitivityParameter,
};
use lease_engine_core::LeaseEngineError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn office_lease() -> LeaseTerms {
    LeaseTerms {
        start_date: date(2024, 1, 1),
        end_date: date(2027, 1, 1),
        term_months: 36,
        monthly_payment: dec!(1500),
        payment_frequency: PaymentFrequency::Monthly,
        payment_timing: PaymentTiming::End,
        discount_rate_annual_pct: dec!(8.5),
        initial_payment: Some(dec!(5000)),
        guaranteed_residual_value: Some(dec!(10000)),
        initial_direct_costs: None,
        lease_incentives: None,
        variable_payments: None,
        purchase_option: None,
        renewal_option: None,
        asset_fair_value: Some(dec!(60000)),
    }
}

// ===========================================================================
// Core measurement
// ===========================================================================

#[test]
fn test_reference_office_lease() {
    let terms = office_lease();
    assert!(validate_lease_terms(&terms).is_valid);

    let result = calculate_lease(&terms).unwrap();

    // 36 undiscounted payments are 54,000; the initial payment and the
    // discounted residual push the liability above that despite discounting.
    assert!(result.lease_liability_initial > dec!(54000));
    assert_eq!(result.schedule.len(), 36);

    let last = result.schedule.last().unwrap();
    assert_eq!(last.ending_liability, Decimal::ZERO);
    assert_eq!(last.ending_asset, Decimal::ZERO);

    // Every row honors the effective-interest identities on reported values.
    for row in &result.schedule {
        assert_eq!(
            row.ending_liability,
            row.beginning_liability - row.principal_payment,
            "period {}",
            row.period
        );
        assert_eq!(row.ending_asset, row.beginning_asset - row.amortization);
    }
}

#[test]
fn test_purchase_option_raises_liability() {
    let mut with_option = office_lease();
    with_option.purchase_option = Some(PurchaseOption {
        price: dec!(20000),
        reasonably_certain: true,
    });

    let base = calculate_lease(&office_lease()).unwrap();
    let optioned = calculate_lease(&with_option).unwrap();
    assert!(optioned.lease_liability_initial > base.lease_liability_initial);

    // Not reasonably certain: excluded from measurement.
    with_option.purchase_option = Some(PurchaseOption {
        price: dec!(20000),
        reasonably_certain: false,
    });
    let ignored = calculate_lease(&with_option).unwrap();
    assert_eq!(ignored.lease_liability_initial, base.lease_liability_initial);
}

#[test]
fn test_invalid_terms_rejected() {
    let mut terms = office_lease();
    terms.monthly_payment = dec!(-100);
    terms.term_months = 0;

    let report = validate_lease_terms(&terms);
    assert!(!report.is_valid);
    assert!(report.errors.len() >= 2);

    assert!(matches!(
        calculate_lease(&terms),
        Err(LeaseEngineError::Validation { .. })
    ));
}

// ===========================================================================
// Modification lifecycle
// ===========================================================================

#[test]
fn test_renewal_then_rate_reset() {
    let base = office_lease();
    let history = vec![
        Modification {
            modification_date: date(2026, 6, 1),
            effective_date: date(2026, 12, 1),
            description: "exercise renewal".into(),
            change: ModificationChange::Renewal {
                additional_term_months: 24,
                renewal_monthly_payment: Some(dec!(1400)),
                renewal_discount_rate_pct: None,
            },
            modification_fee: None,
            additional_costs: None,
            incentives_received: None,
        },
        Modification {
            modification_date: date(2025, 1, 1),
            effective_date: date(2025, 1, 1),
            description: "rate reset".into(),
            change: ModificationChange::Rate {
                new_rate_pct: Some(dec!(9.5)),
                rate_delta_points: None,
                rate_pct_change: None,
            },
            modification_fee: None,
            additional_costs: None,
            incentives_received: None,
        },
    ];

    // Applied in effective-date order regardless of input order: the rate
    // reset lands first, then the renewal extends the term and swaps the
    // payment.
    let modified = apply_modifications(&base, &history).unwrap();
    assert_eq!(modified.term_months, 60);
    assert_eq!(modified.monthly_payment, dec!(1400));
    assert_eq!(modified.discount_rate_annual_pct, dec!(9.5));
    assert_eq!(modified.end_date, date(2029, 1, 1));

    // The base terms are untouched.
    assert_eq!(base.term_months, 36);
    assert_eq!(base.monthly_payment, dec!(1500));
}

#[test]
fn test_modification_impact_nets_fees() {
    let base = office_lease();
    let uplift = Modification {
        modification_date: date(2024, 6, 1),
        effective_date: date(2024, 7, 1),
        description: "indexation uplift".into(),
        change: ModificationChange::Payment {
            new_monthly_payment: None,
            payment_delta: Some(dec!(250)),
            payment_pct_change: None,
        },
        modification_fee: Some(dec!(750)),
        additional_costs: None,
        incentives_received: Some(dec!(250)),
    };

    let impact = modification_impact(&base, &uplift).unwrap();
    assert_eq!(impact.payment_change, dec!(250));
    assert!(impact.liability_change > Decimal::ZERO);
    assert_eq!(
        impact.net_financial_impact,
        impact.liability_change + dec!(750) - dec!(250)
    );
}

#[test]
fn test_termination_derecognizes_schedule_balances() {
    let base = office_lease();
    let result = calculate_lease(&base).unwrap();

    let impact = termination_impact(&base, date(2025, 7, 1), Some(dec!(3000))).unwrap();
    assert_eq!(impact.periods_elapsed, 18);

    let row = period_at(&result.schedule, 18).unwrap();
    assert_eq!(impact.remaining_liability, row.ending_liability);
    assert_eq!(impact.remaining_asset, row.ending_asset);
    assert!(impact.net_impact < Decimal::ZERO);
}

// ===========================================================================
// Impairment after a market shock
// ===========================================================================

#[test]
fn test_impairment_after_market_decline() {
    let terms = office_lease();
    let result = calculate_lease(&terms).unwrap();

    // One year in, the market value has collapsed well below the asset's
    // carrying amount.
    let carrying = period_at(&result.schedule, 12).unwrap().ending_asset;
    let condition = AssetCondition {
        assessment_date: date(2025, 1, 1),
        current_market_value: Some(dec!(15000)),
        estimated_market_rate_pct: None,
        adverse_economic_conditions: true,
        asset_age_months: None,
        useful_life_months: None,
        usage_pattern_changed: false,
        physical_damage: false,
        technology_asset: false,
        regulatory_change: false,
    };

    let test = test_impairment(&terms, carrying, &condition).unwrap();
    assert!(!test.indicators.is_empty());
    assert_eq!(test.recoverable.remaining_months, 24);
    assert_eq!(
        test.recoverable.recoverable_amount,
        test.recoverable
            .value_in_use
            .max(test.recoverable.fair_value_less_costs_to_sell)
    );
    assert_eq!(
        test.impairment_loss,
        (carrying - test.recoverable.recoverable_amount).max(Decimal::ZERO)
    );
}

// ===========================================================================
// Sensitivity, stress, Monte Carlo
// ===========================================================================

#[test]
fn test_sensitivity_grid_is_monotone_in_payment() {
    let analysis = analyze_sensitivity(&office_lease()).unwrap();
    assert_eq!(analysis.variations.len(), 18);

    // A larger payment always means a larger liability.
    for v in analysis
        .variations
        .iter()
        .filter(|v| v.parameter == SensitivityParameter::MonthlyPayment)
    {
        if v.variation > Decimal::ZERO {
            assert!(v.liability_change > Decimal::ZERO, "{}", v.label);
        } else {
            assert!(v.liability_change < Decimal::ZERO, "{}", v.label);
        }
    }
}

#[test]
fn test_stress_scenarios_shrink_liability() {
    let results = run_stress_tests(&office_lease()).unwrap();
    assert_eq!(results.len(), 4);
    for r in &results {
        assert!(r.financial_impact < Decimal::ZERO, "{}", r.scenario.name);
        assert!(r.probability_weighted_impact.abs() <= r.financial_impact.abs());
    }
}

#[test]
fn test_monte_carlo_reproducible_and_centered() {
    let terms = office_lease();
    let input = MonteCarloInput {
        iterations: 500,
        seed: Some(42),
        ..MonteCarloInput::default()
    };

    let first = run_monte_carlo(&terms, &input).unwrap();
    let second = run_monte_carlo(&terms, &input).unwrap();
    assert_eq!(first.liability.mean, second.liability.mean);
    assert_eq!(first.liability.p95, second.liability.p95);

    // The simulated mean stays near the deterministic base.
    let base = calculate_lease(&terms)
        .unwrap()
        .lease_liability_initial
        .to_f64()
        .unwrap_or(0.0);
    let spread = (first.liability.mean - base).abs() / base;
    assert!(spread < 0.05, "mean drifted {spread} from base");

    let bin_total: u32 = first.liability_histogram.iter().map(|b| b.count).sum();
    assert_eq!(bin_total, 500);
}

// ===========================================================================
// Disclosure
// ===========================================================================

#[test]
fn test_disclosure_pack() {
    let terms = office_lease();
    let result = calculate_lease(&terms).unwrap();

    let maturity = maturity_analysis(&result);
    assert_eq!(maturity.buckets.len(), 3);
    assert_eq!(maturity.total_interest, result.total_interest);
    assert_eq!(maturity.total_principal, result.total_principal);

    let history = vec![Modification {
        modification_date: date(2025, 1, 1),
        effective_date: date(2025, 1, 1),
        description: "exercise renewal".into(),
        change: ModificationChange::Renewal {
            additional_term_months: 12,
            renewal_monthly_payment: None,
            renewal_discount_rate_pct: None,
        },
        modification_fee: None,
        additional_costs: None,
        incentives_received: None,
    }];
    let options = exercised_options(&terms, &history, date(2025, 6, 30)).unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].kind, ExercisedOptionKind::Renewal);

    let notes = qualitative_disclosures(&terms, &result, date(2025, 1, 1));
    assert!(notes.accounting_policy.contains("8.5%"));
    assert!(!notes.risk_factors.is_empty());
}
