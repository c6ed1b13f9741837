//! IFRS 16 lease-accounting calculation engine.
//!
//! Turns a lease contract's commercial terms (payments, term, discount
//! rate, options) into the regulated quantities a lessee reports: initial
//! lease liability, right-of-use asset, a month-by-month amortization
//! schedule, and the derived analyses built on top of it (contract
//! modifications, impairment testing, sensitivity and stress analysis,
//! Monte Carlo simulation, disclosure aggregates).
//!
//! Every engine is a synchronous, side-effect-free function over immutable
//! input records; nothing here persists, logs, or talks to a network. The
//! hosting application owns storage, authorization, and presentation.

pub mod error;
pub mod types;

pub mod lease;

#[cfg(feature = "modification")]
pub mod modification;

#[cfg(feature = "impairment")]
pub mod impairment;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

#[cfg(feature = "disclosure")]
pub mod disclosure;

pub use error::LeaseEngineError;
pub use types::*;

/// Standard result type for all lease-engine operations
pub type LeaseEngineResult<T> = Result<T, LeaseEngineError>;
