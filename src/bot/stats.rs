//! Runtime statistics for the bot.

/// Runtime statistics for the bot.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub refresh_cycles: u64,
    pub trades: u64,
    pub winning_trades: u64,
    pub losing_trades: u64,
    pub realized_pnl: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub halts: u64,
}

impl Stats {
    pub(crate) fn record_trade(&mut self, pnl: f64) {
        self.trades += 1;
        if pnl < 0.0 {
            self.losing_trades += 1;
        } else {
            self.winning_trades += 1;
        }
        self.realized_pnl += pnl;
        if self.trades == 1 {
            self.best_trade = pnl;
            self.worst_trade = pnl;
        } else {
            self.best_trade = self.best_trade.max(pnl);
            self.worst_trade = self.worst_trade.min(pnl);
        }
    }
}
