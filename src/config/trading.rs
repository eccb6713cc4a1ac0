//! Trading pair and order configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::env::EnvSource;
use super::error::{require_closed_fraction, require_positive, require_positive_int, ConfigError};

/// Order parameters for the traded pair.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingParameters {
    /// Pair to trade (e.g., "BNBUSDT").
    pub pair: String,
    /// Exchange API key (loaded from API_KEY env var).
    #[serde(skip)]
    pub api_key: String,
    /// Exchange API secret (loaded from API_SECRET env var).
    #[serde(skip)]
    pub api_secret: String,
    /// Trade against the exchange sandbox. Credentials are optional here.
    pub testnet_enabled: bool,
    pub min_order_quantity: f64,
    pub max_order_quantity: f64,
    /// Accepted deviation from the expected fill price, as a fraction.
    pub slippage_tolerance: f64,
    pub order_timeout_seconds: i64,
    /// Check orders locally before submitting them.
    pub order_validation_enabled: bool,
    /// Maker fee as a fraction (e.g., 0.001 for 0.1%).
    pub maker_fee: f64,
    /// Taker fee as a fraction.
    pub taker_fee: f64,
}

impl Default for TradingParameters {
    fn default() -> Self {
        Self {
            pair: "BNBUSDT".to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            testnet_enabled: false,
            min_order_quantity: 0.01,
            max_order_quantity: 1000.0,
            slippage_tolerance: 0.01,
            order_timeout_seconds: 30,
            order_validation_enabled: true,
            maker_fee: 0.001,
            taker_fee: 0.001,
        }
    }
}

// Credentials never end up in logs.
impl fmt::Debug for TradingParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TradingParameters")
            .field("pair", &self.pair)
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("testnet_enabled", &self.testnet_enabled)
            .field("min_order_quantity", &self.min_order_quantity)
            .field("max_order_quantity", &self.max_order_quantity)
            .field("slippage_tolerance", &self.slippage_tolerance)
            .field("order_timeout_seconds", &self.order_timeout_seconds)
            .field("order_validation_enabled", &self.order_validation_enabled)
            .field("maker_fee", &self.maker_fee)
            .field("taker_fee", &self.taker_fee)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

impl TradingParameters {
    pub fn from_env(env: &impl EnvSource) -> Self {
        let d = Self::default();
        Self {
            pair: env.string("TRADING_PAIR", &d.pair),
            api_key: env.secret("API_KEY"),
            api_secret: env.secret("API_SECRET"),
            testnet_enabled: env.boolean("TRADING_TESTNET_ENABLED", d.testnet_enabled),
            min_order_quantity: env.float("TRADING_MIN_ORDER_QUANTITY", d.min_order_quantity),
            max_order_quantity: env.float("TRADING_MAX_ORDER_QUANTITY", d.max_order_quantity),
            slippage_tolerance: env.float("TRADING_SLIPPAGE_TOLERANCE", d.slippage_tolerance),
            order_timeout_seconds: env.int(
                "TRADING_ORDER_TIMEOUT_SECONDS",
                d.order_timeout_seconds,
            ),
            order_validation_enabled: env.boolean(
                "TRADING_ORDER_VALIDATION_ENABLED",
                d.order_validation_enabled,
            ),
            maker_fee: env.float("TRADING_MAKER_FEE", d.maker_fee),
            taker_fee: env.float("TRADING_TAKER_FEE", d.taker_fee),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pair.is_empty() {
            return Err(ConfigError::Missing {
                field: "trading.pair",
                reason: "trading pair must be specified",
            });
        }
        if !self.testnet_enabled && (self.api_key.is_empty() || self.api_secret.is_empty()) {
            return Err(ConfigError::Missing {
                field: "trading.api_key",
                reason: "API key and secret must be provided for live trading (set API_KEY and API_SECRET env vars)",
            });
        }
        require_positive("trading.min_order_quantity", self.min_order_quantity)?;
        require_positive("trading.max_order_quantity", self.max_order_quantity)?;
        if self.max_order_quantity < self.min_order_quantity {
            return Err(ConfigError::Inconsistent {
                field: "trading.max_order_quantity",
                constraint: format!(
                    "cannot be less than min order quantity {}, got {}",
                    self.min_order_quantity, self.max_order_quantity
                ),
            });
        }
        require_closed_fraction("trading.slippage_tolerance", self.slippage_tolerance)?;
        require_positive_int("trading.order_timeout_seconds", self.order_timeout_seconds)?;
        require_closed_fraction("trading.maker_fee", self.maker_fee)?;
        require_closed_fraction("trading.taker_fee", self.taker_fee)?;
        Ok(())
    }
}
