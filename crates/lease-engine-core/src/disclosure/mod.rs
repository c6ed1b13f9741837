//! Regulatory disclosure aggregates: maturity analysis of the amortization
//! schedule, exercised-option history, and templated qualitative notes.

pub mod maturity;
pub mod narrative;

pub use maturity::{maturity_analysis, MaturityAnalysis, MaturityBucket};
pub use narrative::{
    exercised_options, qualitative_disclosures, ExercisedOption, ExercisedOptionKind,
    QualitativeDisclosures,
};
