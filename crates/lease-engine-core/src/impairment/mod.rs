//! Impairment of the right-of-use asset: indicator identification,
//! recoverable-amount measurement, impairment testing, and reversal limits.

pub mod indicators;
pub mod testing;

pub use indicators::{
    identify_indicators, AssetCondition, ImpairmentIndicator, IndicatorCategory,
};
pub use testing::{
    recoverable_amount, test_impairment, test_reversal, ImpairmentReversal, ImpairmentTest,
    RecoverableAmount,
};
