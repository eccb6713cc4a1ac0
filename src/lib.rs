//! Risk-managed configuration core for a fixed-capital trading bot.
//!
//! Loads capital, take-profit, risk, trading and logging settings from the
//! environment, validates them, and derives position sizes and trading
//! halts from the result.

pub mod bot;
pub mod config;
pub mod logging;
pub mod notification;
pub mod risk;
