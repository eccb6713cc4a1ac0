//! Multi-tier take profit configuration.

use serde::{Deserialize, Serialize};

use super::env::EnvSource;
use super::error::{require_non_negative, require_positive_int, ConfigError, FRACTION, POSITIVE};

/// A single take-profit step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitTier {
    /// Profit that triggers this tier, in percent (0.5 = 0.5%).
    pub profit_percentage: f64,
    /// Fraction of the remaining position closed at this tier.
    pub close_percentage: f64,
    pub enabled: bool,
}

impl ExitTier {
    pub const fn new(profit_percentage: f64, close_percentage: f64) -> Self {
        Self {
            profit_percentage,
            close_percentage,
            enabled: true,
        }
    }
}

/// Default ladder, sorted by ascending profit.
pub const DEFAULT_EXIT_TIERS: [ExitTier; 4] = [
    ExitTier::new(0.5, 0.2),
    ExitTier::new(1.0, 0.3),
    ExitTier::new(1.5, 0.25),
    ExitTier::new(2.0, 0.25),
];

/// Take-profit ladder and position time limits.
///
/// Tiers are expected in ascending profit order. The order is not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieredExitPolicy {
    pub tiers: Vec<ExitTier>,
    pub enabled: bool,
    /// Close the whole position once `max_hold_minutes` elapse without
    /// reaching a tier.
    pub close_on_timeout_enabled: bool,
    pub max_hold_minutes: i64,
    pub trailing_stop_percentage: f64,
}

impl Default for TieredExitPolicy {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_EXIT_TIERS.to_vec(),
            enabled: true,
            close_on_timeout_enabled: true,
            max_hold_minutes: 240,
            trailing_stop_percentage: 0.5,
        }
    }
}

/// Quantity to close when a tier is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierExit {
    pub index: usize,
    pub profit_percentage: f64,
    pub quantity: f64,
}

impl TieredExitPolicy {
    /// Loads the scalar settings. The ladder itself always comes from
    /// [`DEFAULT_EXIT_TIERS`].
    pub fn from_env(env: &impl EnvSource) -> Self {
        let d = Self::default();
        Self {
            tiers: d.tiers,
            enabled: env.boolean("MULTI_TIER_ENABLED", d.enabled),
            close_on_timeout_enabled: env.boolean(
                "MULTI_TIER_CLOSE_ON_TIMEOUT",
                d.close_on_timeout_enabled,
            ),
            max_hold_minutes: env.int("MULTI_TIER_MAX_HOLD_TIME", d.max_hold_minutes),
            trailing_stop_percentage: env.float(
                "MULTI_TIER_TRAILING_STOP",
                d.trailing_stop_percentage,
            ),
        }
    }

    /// Nothing is checked while the policy is disabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        if self.tiers.is_empty() {
            return Err(ConfigError::Missing {
                field: "exit_policy.tiers",
                reason: "at least one profit tier must be configured",
            });
        }
        for (index, tier) in self.tiers.iter().enumerate() {
            if tier.profit_percentage.is_nan() || tier.profit_percentage <= 0.0 {
                return Err(ConfigError::InvalidTier {
                    index,
                    field: "profit_percentage",
                    constraint: POSITIVE,
                    value: tier.profit_percentage,
                });
            }
            if tier.close_percentage.is_nan()
                || tier.close_percentage <= 0.0
                || tier.close_percentage > 1.0
            {
                return Err(ConfigError::InvalidTier {
                    index,
                    field: "close_percentage",
                    constraint: FRACTION,
                    value: tier.close_percentage,
                });
            }
        }
        require_positive_int("exit_policy.max_hold_minutes", self.max_hold_minutes)?;
        require_non_negative(
            "exit_policy.trailing_stop_percentage",
            self.trailing_stop_percentage,
        )?;
        Ok(())
    }

    /// Splits `position_quantity` across the enabled tiers.
    ///
    /// Each tier closes its fraction of what is still open, walking the
    /// ladder in stored order. Returns nothing while the policy is disabled.
    pub fn exit_plan(&self, position_quantity: f64) -> Vec<TierExit> {
        if !self.enabled {
            return Vec::new();
        }
        let mut remaining = position_quantity;
        let mut plan = Vec::new();
        for (index, tier) in self.tiers.iter().enumerate() {
            if !tier.enabled {
                continue;
            }
            let quantity = remaining * tier.close_percentage;
            remaining -= quantity;
            plan.push(TierExit {
                index,
                profit_percentage: tier.profit_percentage,
                quantity,
            });
        }
        plan
    }
}
