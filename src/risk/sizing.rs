//! Position sizing and loss-limit formulas.
//!
//! Pure functions of a validated [`Config`] and live equity/price inputs.

use crate::config::Config;

impl Config {
    /// Capital to risk on the next trade.
    ///
    /// `equity` must be non-negative.
    pub fn risk_capital(&self, equity: f64) -> f64 {
        equity * self.capital.risk_percentage
    }

    /// Quantity to buy so that hitting `stop_loss_price` loses exactly the
    /// risk capital, capped at `max_position_size` of equity.
    ///
    /// Returns 0 when the stop is not below the entry.
    pub fn position_size(&self, equity: f64, entry_price: f64, stop_loss_price: f64) -> f64 {
        let price_difference = entry_price - stop_loss_price;
        if price_difference <= 0.0 {
            return 0.0;
        }

        let size = self.risk_capital(equity) / price_difference;

        let max_position_value = equity * self.risk.max_position_size;
        let max_quantity = max_position_value / entry_price;
        if size > max_quantity {
            return max_quantity;
        }
        size
    }

    /// True while today's loss stays within `max_daily_loss_percentage`.
    ///
    /// `starting_equity` must be positive.
    pub fn is_within_daily_loss_limit(&self, starting_equity: f64, current_equity: f64) -> bool {
        let loss = (starting_equity - current_equity) / starting_equity;
        loss <= self.risk.max_daily_loss_percentage
    }

    /// True while the decline from `peak_equity` stays within
    /// `max_drawdown_percentage`. Always true before a peak exists.
    pub fn is_within_drawdown_limit(&self, peak_equity: f64, current_equity: f64) -> bool {
        if peak_equity <= 0.0 {
            return true;
        }
        let drawdown = (peak_equity - current_equity) / peak_equity;
        drawdown <= self.risk.max_drawdown_percentage
    }

    /// Stop price once the break-even stop is armed.
    ///
    /// `price` gain over `entry_price`, in percent, must reach
    /// `break_even_threshold`. Returns `None` while disarmed or disabled.
    pub fn break_even_stop(&self, entry_price: f64, price: f64) -> Option<f64> {
        if !self.risk.break_even_stop_enabled || entry_price <= 0.0 {
            return None;
        }
        let gain_percent = (price - entry_price) / entry_price * 100.0;
        (gain_percent >= self.risk.break_even_threshold).then_some(entry_price)
    }

    /// Order quantity for a new entry, after exchange and capital limits.
    ///
    /// Starts from [`Config::position_size`], caps the notional at
    /// `max_capital_per_trade` and the quantity at `max_order_quantity`.
    /// Returns 0 when the result is below `min_order_quantity`.
    pub fn order_quantity(&self, equity: f64, entry_price: f64, stop_loss_price: f64) -> f64 {
        let mut quantity = self.position_size(equity, entry_price, stop_loss_price);
        if quantity <= 0.0 {
            return 0.0;
        }

        let max_by_capital = self.capital.max_capital_per_trade / entry_price;
        if quantity > max_by_capital {
            quantity = max_by_capital;
        }
        if quantity > self.trading.max_order_quantity {
            quantity = self.trading.max_order_quantity;
        }
        if quantity < self.trading.min_order_quantity {
            return 0.0;
        }
        quantity
    }
}
