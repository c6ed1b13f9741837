//! Initial measurement and amortization under IFRS 16.
//!
//! Computes the initial lease liability as the present value of the fixed
//! payment stream (plus residual guarantee, in-window variable payments,
//! and a reasonably-certain purchase option), the initial right-of-use
//! asset, and the month-by-month effective-interest schedule.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LeaseEngineError;
use crate::types::{round_money, Money, Rate};
use crate::LeaseEngineResult;

use super::terms::{validate_lease_terms, LeaseTerms, PaymentTiming};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const NEWTON_ITERATIONS: u32 = 30;
const PERCENT: Decimal = dec!(100);
const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One month of the amortization schedule.
///
/// Row identities hold exactly on the reported 2-decimal values:
/// `ending_liability = beginning_liability - principal_payment` and
/// `ending_asset = beginning_asset - amortization`, both floored at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    /// Period number (1-indexed).
    pub period: u32,
    /// Calendar date: lease start plus `period - 1` months.
    pub date: NaiveDate,
    pub beginning_liability: Money,
    pub interest_expense: Money,
    pub principal_payment: Money,
    pub ending_liability: Money,
    pub beginning_asset: Money,
    pub amortization: Money,
    pub ending_asset: Money,
}

/// Complete output of a lease calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResult {
    /// PV of the lease payment obligations at commencement.
    pub lease_liability_initial: Money,
    /// Liability after the first period. "Current" is always period 1,
    /// regardless of the calendar date of the call.
    pub lease_liability_current: Money,
    /// ROU asset at commencement.
    pub right_of_use_asset_initial: Money,
    /// ROU asset after the first period (see `lease_liability_current`).
    pub right_of_use_asset_current: Money,
    /// Interest expense of period 1.
    pub monthly_interest: Money,
    /// Principal reduction of period 1.
    pub monthly_principal: Money,
    /// Asset amortization of period 1.
    pub monthly_amortization: Money,
    /// Month-by-month schedule over the full term.
    pub schedule: Vec<AmortizationPeriod>,
    /// Sum of interest expense over the term.
    pub total_interest: Money,
    /// Sum of principal payments over the term.
    pub total_principal: Money,
    /// Undiscounted total of all lease payments: fixed stream, initial
    /// payment, and in-window variable payments.
    pub total_lease_payments: Money,
    /// Effective monthly discount rate, as a decimal fraction.
    pub effective_monthly_rate: Rate,
    /// Monthly rate compounded to a year: `(1 + monthly)^12 - 1`.
    pub effective_annual_rate: Rate,
    /// True when a period's principal was adjusted so the liability lands
    /// exactly at zero. The final period absorbing residual rounding is the
    /// expected case; mid-schedule clamps indicate overshoot.
    pub liability_clamped: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full IFRS 16 measurement for a set of lease terms.
///
/// Business-rule violations return [`LeaseEngineError::Validation`] carrying
/// the same error list [`validate_lease_terms`] reports.
pub fn calculate_lease(terms: &LeaseTerms) -> LeaseEngineResult<CalculationResult> {
    let report = validate_lease_terms(terms);
    if !report.is_valid {
        return Err(LeaseEngineError::Validation {
            errors: report.errors,
        });
    }

    let monthly_rate = monthly_discount_rate(terms.discount_rate_annual_pct);
    let initial_liability = initial_lease_liability(terms, monthly_rate);
    let initial_asset = initial_right_of_use_asset(terms, initial_liability);

    let (schedule, liability_clamped) =
        build_amortization_schedule(terms, monthly_rate, initial_liability, initial_asset);

    let total_interest: Money = schedule.iter().map(|p| p.interest_expense).sum();
    let total_principal: Money = schedule.iter().map(|p| p.principal_payment).sum();
    let total_lease_payments = total_lease_payments(terms);

    let first = &schedule[0];

    let effective_annual_rate =
        pow_u32(Decimal::ONE + monthly_rate, MONTHS_PER_YEAR) - Decimal::ONE;

    Ok(CalculationResult {
        lease_liability_initial: initial_liability,
        lease_liability_current: first.ending_liability,
        right_of_use_asset_initial: initial_asset,
        right_of_use_asset_current: first.ending_asset,
        monthly_interest: first.interest_expense,
        monthly_principal: first.principal_payment,
        monthly_amortization: first.amortization,
        schedule,
        total_interest,
        total_principal,
        total_lease_payments,
        effective_monthly_rate: monthly_rate,
        effective_annual_rate,
        liability_clamped,
    })
}

/// Look up a schedule row by 1-based period number.
///
/// `None` past the end means the lease is fully amortized; callers treat it
/// as zero remaining balances.
pub fn period_at(schedule: &[AmortizationPeriod], period: u32) -> Option<&AmortizationPeriod> {
    if period == 0 {
        return None;
    }
    schedule.get(period as usize - 1)
}

/// Monthly discount rate from an annual percentage, by compounding:
/// `(1 + annual)^(1/12) - 1`. Simple division by 12 would materially
/// misstate liabilities and is deliberately not used.
pub fn monthly_discount_rate(annual_pct: Rate) -> Rate {
    let annual = annual_pct / PERCENT;
    nth_root(Decimal::ONE + annual, MONTHS_PER_YEAR) - Decimal::ONE
}

/// Whole calendar months from `from` to `to`; negative when `to` precedes
/// `from`. A partial month does not count.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    let mut months =
        (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32);
    if to.day() < from.day() {
        months -= 1;
    }
    months
}

/// `date` shifted forward by `months` calendar months.
pub(crate) fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date + Months::new(months)
}

// ---------------------------------------------------------------------------
// Initial measurement
// ---------------------------------------------------------------------------

fn initial_lease_liability(terms: &LeaseTerms, monthly_rate: Rate) -> Money {
    let n = terms.term_months;
    let payment = terms.monthly_payment;

    let mut pv = if monthly_rate.is_zero() {
        // Annuity formula divides by the rate; at zero the PV is the sum.
        payment * Decimal::from(n)
    } else {
        let growth = pow_u32(Decimal::ONE + monthly_rate, n);
        let mut annuity = payment * (Decimal::ONE - Decimal::ONE / growth) / monthly_rate;
        if terms.payment_timing == PaymentTiming::Beginning {
            annuity *= Decimal::ONE + monthly_rate;
        }
        annuity
    };

    if let Some(initial) = terms.initial_payment {
        pv += initial;
    }
    if let Some(grv) = terms.guaranteed_residual_value {
        pv += grv / pow_u32(Decimal::ONE + monthly_rate, n);
    }
    if let Some(variable) = &terms.variable_payments {
        for vp in variable {
            let offset = months_between(terms.start_date, vp.date);
            if offset >= 0 && (offset as u32) < n {
                pv += vp.amount / pow_u32(Decimal::ONE + monthly_rate, offset as u32);
            }
        }
    }
    if let Some(option) = &terms.purchase_option {
        if option.reasonably_certain {
            pv += option.price / pow_u32(Decimal::ONE + monthly_rate, n);
        }
    }

    round_money(pv)
}

fn initial_right_of_use_asset(terms: &LeaseTerms, initial_liability: Money) -> Money {
    let idc = terms.initial_direct_costs.unwrap_or(Decimal::ZERO);
    let incentives = terms.lease_incentives.unwrap_or(Decimal::ZERO);
    round_money(initial_liability + idc - incentives)
}

fn total_lease_payments(terms: &LeaseTerms) -> Money {
    let mut total = terms.monthly_payment * Decimal::from(terms.term_months);
    if let Some(initial) = terms.initial_payment {
        total += initial;
    }
    if let Some(variable) = &terms.variable_payments {
        for vp in variable {
            let offset = months_between(terms.start_date, vp.date);
            if offset >= 0 && (offset as u32) < terms.term_months {
                total += vp.amount;
            }
        }
    }
    round_money(total)
}

// ---------------------------------------------------------------------------
// Amortization schedule
// ---------------------------------------------------------------------------

fn build_amortization_schedule(
    terms: &LeaseTerms,
    monthly_rate: Rate,
    initial_liability: Money,
    initial_asset: Money,
) -> (Vec<AmortizationPeriod>, bool) {
    let n = terms.term_months;
    let payment = terms.monthly_payment;
    let straight_line = round_money(initial_asset / Decimal::from(n));

    let mut liability = initial_liability;
    let mut asset = initial_asset;
    let mut clamped = false;
    let mut schedule = Vec::with_capacity(n as usize);

    for period in 1..=n {
        let beginning_liability = liability;
        let beginning_asset = asset;

        // Annuity-due effect: in period 1 the payment reduces the balance
        // before interest accrues. Later periods accrue on the full balance.
        let interest_base = if period == 1 && terms.payment_timing == PaymentTiming::Beginning {
            beginning_liability - payment
        } else {
            beginning_liability
        };
        let interest = round_money(interest_base * monthly_rate);
        let mut principal = round_money(payment - interest);
        let mut ending_liability = beginning_liability - principal;

        if ending_liability < Decimal::ZERO {
            // Overshoot: the excess is absorbed into the principal payment
            // so the balance lands exactly at zero.
            principal = beginning_liability;
            ending_liability = Decimal::ZERO;
            clamped = true;
        }
        if period == n && !ending_liability.is_zero() {
            // The final period retires whatever balance remains.
            principal += ending_liability;
            ending_liability = Decimal::ZERO;
            clamped = true;
        }

        let amortization = if period == n {
            beginning_asset
        } else {
            straight_line.min(beginning_asset)
        };
        let ending_asset = beginning_asset - amortization;

        liability = ending_liability;
        asset = ending_asset;

        schedule.push(AmortizationPeriod {
            period,
            date: add_months(terms.start_date, period - 1),
            beginning_liability,
            interest_expense: interest,
            principal_payment: principal,
            ending_liability,
            beginning_asset,
            amortization,
            ending_asset,
        });
    }

    (schedule, clamped)
}

// ---------------------------------------------------------------------------
// Math helpers
// ---------------------------------------------------------------------------

/// Iterated multiplication; exponents stay small (term months).
fn pow_u32(base: Decimal, exponent: u32) -> Decimal {
    let mut result = Decimal::ONE;
    for _ in 0..exponent {
        result *= base;
    }
    result
}

/// Newton's method for the nth root of A:
/// `x_{k+1} = ((n-1)*x_k + A / x_k^(n-1)) / n`
fn nth_root(a: Decimal, n: u32) -> Decimal {
    if a <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if a == Decimal::ONE {
        return Decimal::ONE;
    }
    let n_dec = Decimal::from(n);
    let n_minus_1 = n_dec - Decimal::ONE;

    // Rates keep A close to 1, where a linearized guess converges fast.
    let mut x = a;
    if a > dec!(0.5) && a < dec!(2.0) {
        x = Decimal::ONE + (a - Decimal::ONE) / n_dec;
    }

    for _ in 0..NEWTON_ITERATIONS {
        let x_pow = pow_u32(x, n - 1);
        if x_pow.is_zero() {
            break;
        }
        let x_new = (n_minus_1 * x + a / x_pow) / n_dec;
        if (x_new - x).abs() < dec!(0.0000000000001) {
            return x_new;
        }
        x = x_new;
    }
    x
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
