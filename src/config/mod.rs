//! Configuration loading and validation for the trading bot.
//!
//! Settings come from environment variables (optionally seeded from a `.env`
//! file), fall back to documented defaults, and are validated once at
//! startup. A configuration that fails validation is never returned.

mod capital;
mod env;
mod error;
mod logging;
mod risk;
mod tiers;
mod trading;

pub use capital::CapitalAllocation;
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::ConfigError;
pub use logging::LoggingSettings;
pub use risk::RiskManagement;
pub use tiers::{DEFAULT_EXIT_TIERS, ExitTier, TierExit, TieredExitPolicy};
pub use trading::TradingParameters;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use error::require_positive_int;

/// Root configuration structure for the trading bot.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub capital: CapitalAllocation,
    pub exit_policy: TieredExitPolicy,
    pub risk: RiskManagement,
    pub trading: TradingParameters,
    pub logging: LoggingSettings,
    /// Market data refresh interval.
    pub refresh_interval_seconds: i64,
    /// Compute decisions without submitting orders.
    pub dry_run_enabled: bool,
    /// Notification webhook (loaded from WEBHOOK_URL env var).
    #[serde(skip)]
    pub webhook_url: String,
    pub notifications_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capital: CapitalAllocation::default(),
            exit_policy: TieredExitPolicy::default(),
            risk: RiskManagement::default(),
            trading: TradingParameters::default(),
            logging: LoggingSettings::default(),
            refresh_interval_seconds: 5,
            dry_run_enabled: false,
            webhook_url: String::new(),
            notifications_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Variables from a `.env` file in the working directory are loaded first
    /// when the file exists; already-set variables win.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore error if not found)
        dotenvy::dotenv().ok();

        Self::from_source(&ProcessEnv)
    }

    /// Populate from `env` and validate.
    pub fn from_source(env: &impl EnvSource) -> Result<Self, ConfigError> {
        let d = Self::default();
        let config = Config {
            capital: CapitalAllocation::from_env(env),
            exit_policy: TieredExitPolicy::from_env(env),
            risk: RiskManagement::from_env(env),
            trading: TradingParameters::from_env(env),
            logging: LoggingSettings::from_env(env),
            refresh_interval_seconds: env.int(
                "REFRESH_INTERVAL_SECONDS",
                d.refresh_interval_seconds,
            ),
            dry_run_enabled: env.boolean("DRY_RUN_MODE", d.dry_run_enabled),
            webhook_url: env.secret("WEBHOOK_URL"),
            notifications_enabled: env.boolean(
                "NOTIFICATIONS_ENABLED",
                d.notifications_enabled,
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Blocks are checked in a fixed order and the first violation is
    /// returned: capital, exit policy, risk, trading, logging, then the
    /// top-level settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capital.validate()?;
        self.exit_policy.validate()?;
        self.risk.validate()?;
        self.trading.validate()?;
        self.logging.validate()?;
        require_positive_int("refresh_interval_seconds", self.refresh_interval_seconds)?;
        Ok(())
    }

    /// Refresh interval as a `Duration`.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds.max(1) as u64)
    }

    /// Returns the webhook URL when notifications should be delivered.
    pub fn notification_webhook(&self) -> Option<&str> {
        if self.notifications_enabled && !self.webhook_url.is_empty() {
            Some(&self.webhook_url)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests;
