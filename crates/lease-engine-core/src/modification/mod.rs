//! Contract modifications: ordered reapplication of term, payment, rate,
//! asset, and renewal changes onto base lease terms, plus before/after
//! impact measurement and termination derecognition.

pub mod apply;
pub mod impact;

pub use apply::{
    apply_modifications, validate_modification, Modification, ModificationChange,
};
pub use impact::{modification_impact, termination_impact, ModificationImpact, TerminationImpact};
