//! # Meridian Analytics Engine
//!
//! This crate is the computational core of the report pipeline. It turns
//! adjusted-close price series into daily log-return series, aligns them on
//! their shared trading dates, and derives the per-company risk and
//! performance statistics the report presents.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   data providers or presentation. It depends only on `core-types` and
//!   `risk`.
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless
//!   calculator parameterized by the risk-free rate and VaR confidence. It
//!   takes aligned return columns as input and produces a
//!   `CompanyStatistics` record as output, which makes it highly reliable
//!   and easy to test.
//! - **Forward-only data flow:** smoothed series are derived for display and
//!   are never an input to any statistic.
//!
//! ## Public API
//!
//! - `log_returns` / `align`: the return calculator.
//! - `rolling_mean`: the smoothing stage.
//! - `AnalyticsEngine`: the statistics engine.
//! - `CompanyStatistics`: the standardized per-company result record.
//! - `AnalyticsError`: the specific error types this crate can return.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod returns;
pub mod smoothing;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::CompanyStatistics;
pub use returns::{align, log_returns};
pub use smoothing::{rolling_mean, SmoothedPoint, SmoothedSeries};
