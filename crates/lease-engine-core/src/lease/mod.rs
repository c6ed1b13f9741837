//! Core IFRS 16 measurement: lease terms, initial liability and
//! right-of-use asset, and the effective-interest amortization schedule.

pub mod engine;
pub mod terms;

pub use engine::{
    calculate_lease, monthly_discount_rate, months_between, period_at, AmortizationPeriod,
    CalculationResult,
};
pub use terms::{
    validate_lease_terms, LeaseTerms, PaymentFrequency, PaymentTiming, PurchaseOption,
    RenewalOption, VariablePayment,
};
