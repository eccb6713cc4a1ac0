//! Risk management configuration.

use serde::{Deserialize, Serialize};

use super::env::EnvSource;
use super::error::{
    require_closed_fraction, require_fraction, require_non_negative, require_positive_int,
    ConfigError,
};

/// Risk management limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskManagement {
    /// Maximum fraction of the portfolio risked per trade.
    pub max_risk_percentage: f64,
    /// Losing trades in a row before trading pauses.
    pub max_consecutive_losses: i64,
    /// Pause length after hitting `max_consecutive_losses`.
    pub pause_duration_minutes: i64,
    /// Maximum loss in a day as a fraction of starting equity.
    pub max_daily_loss_percentage: f64,
    /// Stop loss distance as a fraction of entry (e.g., 0.03 for 3%).
    pub stop_loss_percentage: f64,
    /// Move the stop to entry once `break_even_threshold` profit is reached.
    pub break_even_stop_enabled: bool,
    /// Profit in percent that arms the break-even stop.
    pub break_even_threshold: f64,
    /// Maximum position value as a fraction of equity.
    pub max_position_size: f64,
    pub correlation_check_enabled: bool,
    pub max_correlation_threshold: f64,
    pub drawdown_monitoring_enabled: bool,
    /// Maximum decline from peak equity, as a fraction.
    pub max_drawdown_percentage: f64,
    pub equity_protection_enabled: bool,
    /// Equity level below which trading stops.
    pub minimum_equity_level: f64,
}

impl Default for RiskManagement {
    fn default() -> Self {
        Self {
            max_risk_percentage: 0.02,
            max_consecutive_losses: 5,
            pause_duration_minutes: 30,
            max_daily_loss_percentage: 0.05,
            stop_loss_percentage: 0.03,
            break_even_stop_enabled: true,
            break_even_threshold: 0.5,
            max_position_size: 0.1,
            correlation_check_enabled: true,
            max_correlation_threshold: 0.8,
            drawdown_monitoring_enabled: true,
            max_drawdown_percentage: 0.15,
            equity_protection_enabled: true,
            minimum_equity_level: 500.0,
        }
    }
}

impl RiskManagement {
    pub fn from_env(env: &impl EnvSource) -> Self {
        let d = Self::default();
        Self {
            max_risk_percentage: env.float("RISK_MAX_RISK_PERCENT", d.max_risk_percentage),
            max_consecutive_losses: env.int(
                "RISK_MAX_CONSECUTIVE_LOSSES",
                d.max_consecutive_losses,
            ),
            pause_duration_minutes: env.int(
                "RISK_PAUSE_DURATION_MINUTES",
                d.pause_duration_minutes,
            ),
            max_daily_loss_percentage: env.float(
                "RISK_MAX_DAILY_LOSS_PERCENT",
                d.max_daily_loss_percentage,
            ),
            stop_loss_percentage: env.float("RISK_STOP_LOSS_PERCENT", d.stop_loss_percentage),
            break_even_stop_enabled: env.boolean(
                "RISK_BREAK_EVEN_STOP_ENABLED",
                d.break_even_stop_enabled,
            ),
            break_even_threshold: env.float(
                "RISK_BREAK_EVEN_THRESHOLD",
                d.break_even_threshold,
            ),
            max_position_size: env.float("RISK_MAX_POSITION_SIZE", d.max_position_size),
            correlation_check_enabled: env.boolean(
                "RISK_CORRELATION_CHECK_ENABLED",
                d.correlation_check_enabled,
            ),
            max_correlation_threshold: env.float(
                "RISK_MAX_CORRELATION_THRESHOLD",
                d.max_correlation_threshold,
            ),
            drawdown_monitoring_enabled: env.boolean(
                "RISK_DRAWDOWN_MONITORING_ENABLED",
                d.drawdown_monitoring_enabled,
            ),
            max_drawdown_percentage: env.float(
                "RISK_MAX_DRAWDOWN_PERCENT",
                d.max_drawdown_percentage,
            ),
            equity_protection_enabled: env.boolean(
                "RISK_EQUITY_PROTECTION_ENABLED",
                d.equity_protection_enabled,
            ),
            minimum_equity_level: env.float(
                "RISK_MINIMUM_EQUITY_LEVEL",
                d.minimum_equity_level,
            ),
        }
    }

    /// Threshold checks only run when the matching feature is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_fraction("risk.max_risk_percentage", self.max_risk_percentage)?;
        require_positive_int("risk.max_consecutive_losses", self.max_consecutive_losses)?;
        require_positive_int("risk.pause_duration_minutes", self.pause_duration_minutes)?;
        require_fraction(
            "risk.max_daily_loss_percentage",
            self.max_daily_loss_percentage,
        )?;
        require_closed_fraction("risk.stop_loss_percentage", self.stop_loss_percentage)?;
        require_non_negative("risk.break_even_threshold", self.break_even_threshold)?;
        require_fraction("risk.max_position_size", self.max_position_size)?;
        if self.correlation_check_enabled {
            require_closed_fraction(
                "risk.max_correlation_threshold",
                self.max_correlation_threshold,
            )?;
        }
        if self.drawdown_monitoring_enabled {
            require_fraction("risk.max_drawdown_percentage", self.max_drawdown_percentage)?;
        }
        if self.equity_protection_enabled {
            require_non_negative("risk.minimum_equity_level", self.minimum_equity_level)?;
        }
        Ok(())
    }
}
