//! Risk calculations derived from the configuration.
//!
//! `sizing` adds the stateless formulas to [`crate::config::Config`];
//! [`RiskGuard`] keeps the per-session state the trading loop consults.

mod guard;
mod sizing;

pub use guard::{HaltReason, RiskGuard, TradingStatus};
