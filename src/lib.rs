//! Financial-advisory computation engine.
//!
//! Market analysis (provider routing, indicators, reports), client state
//! normalization (profile, portfolio, goals), fundamentals normalization,
//! and the advisory engines: suitability, position strategy, IPS, portfolio
//! review, drift, stress, risk-budget monitoring, rebalance planning and
//! client reporting. Engines return [`models::Computed`] values that the
//! bounded [`store::AdvisoryStore`] stamps into envelopes.

pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;

pub use errors::AdvisoryError;
