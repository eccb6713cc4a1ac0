//! Capital allocation configuration.

use serde::{Deserialize, Serialize};

use super::env::EnvSource;
use super::error::{require_fraction, require_positive, ConfigError};

/// How much capital the bot may put to work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalAllocation {
    /// Total capital allocated to the strategy, in quote currency.
    pub total_capital: f64,
    /// Fraction of equity risked per trade (e.g., 0.05 for 5%).
    pub risk_percentage: f64,
    /// Capital floor below which no new trade is opened.
    pub minimum_capital: f64,
    /// Upper bound for capital committed to a single trade.
    pub max_capital_per_trade: f64,
    /// Scale allocation with the observed win rate.
    pub dynamic_allocation_enabled: bool,
    /// Win rate above which allocation may increase.
    pub min_win_rate_for_increase: f64,
    /// Win rate at which allocation stops increasing.
    pub max_win_rate_threshold: f64,
}

impl Default for CapitalAllocation {
    fn default() -> Self {
        Self {
            total_capital: 1000.0,
            risk_percentage: 0.05,
            minimum_capital: 10.0,
            max_capital_per_trade: 500.0,
            dynamic_allocation_enabled: false,
            min_win_rate_for_increase: 0.55,
            max_win_rate_threshold: 0.85,
        }
    }
}

impl CapitalAllocation {
    pub fn from_env(env: &impl EnvSource) -> Self {
        let d = Self::default();
        Self {
            total_capital: env.float("FIXED_CAPITAL_TOTAL", d.total_capital),
            risk_percentage: env.float("FIXED_CAPITAL_RISK_PERCENT", d.risk_percentage),
            minimum_capital: env.float("FIXED_CAPITAL_MINIMUM", d.minimum_capital),
            max_capital_per_trade: env.float(
                "FIXED_CAPITAL_MAX_PER_TRADE",
                d.max_capital_per_trade,
            ),
            dynamic_allocation_enabled: env.boolean(
                "FIXED_CAPITAL_DYNAMIC_ALLOCATION",
                d.dynamic_allocation_enabled,
            ),
            min_win_rate_for_increase: env.float(
                "FIXED_CAPITAL_MIN_WIN_RATE",
                d.min_win_rate_for_increase,
            ),
            max_win_rate_threshold: env.float(
                "FIXED_CAPITAL_MAX_WIN_RATE",
                d.max_win_rate_threshold,
            ),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("capital.total_capital", self.total_capital)?;
        require_fraction("capital.risk_percentage", self.risk_percentage)?;
        require_positive("capital.minimum_capital", self.minimum_capital)?;
        require_positive("capital.max_capital_per_trade", self.max_capital_per_trade)?;
        if self.max_capital_per_trade > self.total_capital {
            return Err(ConfigError::Inconsistent {
                field: "capital.max_capital_per_trade",
                constraint: format!(
                    "cannot exceed total capital {}, got {}",
                    self.total_capital, self.max_capital_per_trade
                ),
            });
        }
        require_fraction(
            "capital.min_win_rate_for_increase",
            self.min_win_rate_for_increase,
        )?;
        require_fraction("capital.max_win_rate_threshold", self.max_win_rate_threshold)?;
        Ok(())
    }
}
