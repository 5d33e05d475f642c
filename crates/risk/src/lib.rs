//! # Meridian Risk Crate
//!
//! Tail-risk measures over daily return series. The only measure the report
//! needs is historical (empirical-quantile) Value-at-Risk, computed directly
//! from the observed return distribution with no distributional assumption.
//!
//! This is a pure logic crate: it has no knowledge of symbols, dates, or
//! data sources, and operates on plain slices of returns.

pub mod error;
pub mod var;

// Re-export the key components to create a clean, public-facing API.
pub use error::RiskError;
pub use var::historical_var;
