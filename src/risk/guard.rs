//! Session risk state: equity tracking, loss streaks and trading halts.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::Config;

/// Why trading is halted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HaltReason {
    /// Too many losing trades in a row. Trading resumes after `resume_in`,
    /// or never when the pause does not fit in the clock.
    ConsecutiveLosses {
        losses: u32,
        resume_in: Option<Duration>,
    },
    DailyLossLimit { loss: f64 },
    DrawdownLimit { drawdown: f64 },
    EquityProtection { equity: f64 },
    BelowMinimumCapital { equity: f64 },
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::ConsecutiveLosses {
                losses,
                resume_in: Some(resume_in),
            } => write!(
                f,
                "{} consecutive losses, paused for {}s",
                losses,
                resume_in.as_secs()
            ),
            HaltReason::ConsecutiveLosses {
                losses,
                resume_in: None,
            } => write!(f, "{} consecutive losses, paused until restart", losses),
            HaltReason::DailyLossLimit { loss } => {
                write!(f, "daily loss limit reached ({:.2}%)", loss * 100.0)
            }
            HaltReason::DrawdownLimit { drawdown } => {
                write!(f, "drawdown limit reached ({:.2}%)", drawdown * 100.0)
            }
            HaltReason::EquityProtection { equity } => {
                write!(f, "equity {:.2} below protection level", equity)
            }
            HaltReason::BelowMinimumCapital { equity } => {
                write!(f, "equity {:.2} below minimum capital", equity)
            }
        }
    }
}

/// Result of a risk check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TradingStatus {
    Allowed,
    Halted(HaltReason),
}

impl TradingStatus {
    pub fn is_allowed(&self) -> bool {
        matches!(self, TradingStatus::Allowed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pause {
    Until(Instant),
    Indefinite,
}

/// Tracks equity and trade outcomes for one trading session.
#[derive(Debug, Clone)]
pub struct RiskGuard {
    cfg: Config,
    starting_equity: f64,
    peak_equity: f64,
    current_equity: f64,
    consecutive_losses: u32,
    pause: Option<Pause>,
    /// Streak length that started the current pause.
    pause_losses: u32,
}

impl RiskGuard {
    /// Starts a session at `starting_equity`.
    pub fn new(cfg: &Config, starting_equity: f64) -> Self {
        Self {
            cfg: cfg.clone(),
            starting_equity,
            peak_equity: starting_equity,
            current_equity: starting_equity,
            consecutive_losses: 0,
            pause: None,
            pause_losses: 0,
        }
    }

    pub fn starting_equity(&self) -> f64 {
        self.starting_equity
    }

    pub fn peak_equity(&self) -> f64 {
        self.peak_equity
    }

    pub fn current_equity(&self) -> f64 {
        self.current_equity
    }

    pub fn consecutive_losses(&self) -> u32 {
        self.consecutive_losses
    }

    /// Sets the latest equity reading.
    pub fn update_equity(&mut self, equity: f64) {
        self.current_equity = equity;
        if equity > self.peak_equity {
            self.peak_equity = equity;
        }
    }

    /// Applies a closed trade's profit or loss.
    ///
    /// Reaching `max_consecutive_losses` starts a pause of
    /// `pause_duration_minutes` and resets the streak.
    pub fn record_trade(&mut self, pnl: f64, now: Instant) {
        self.update_equity(self.current_equity + pnl);

        if pnl >= 0.0 {
            self.consecutive_losses = 0;
            return;
        }

        self.consecutive_losses = self.consecutive_losses.saturating_add(1);
        debug!(
            pnl,
            consecutive_losses = self.consecutive_losses,
            "Losing trade recorded"
        );

        if i64::from(self.consecutive_losses) >= self.cfg.risk.max_consecutive_losses {
            let pause = self.pause_duration();
            warn!(
                losses = self.consecutive_losses,
                pause_minutes = self.cfg.risk.pause_duration_minutes,
                "Consecutive loss limit reached, pausing trading"
            );
            self.pause = Some(match now.checked_add(pause) {
                Some(until) => Pause::Until(until),
                None => {
                    warn!("Pause exceeds the clock range, halting until restart");
                    Pause::Indefinite
                }
            });
            self.pause_losses = self.consecutive_losses;
            self.consecutive_losses = 0;
        }
    }

    /// Starts a new trading day at the current equity.
    pub fn reset_day(&mut self) {
        info!(
            equity = self.current_equity,
            previous = self.starting_equity,
            "Resetting daily loss baseline"
        );
        self.starting_equity = self.current_equity;
    }

    /// Checks, in order: loss-streak pause, daily loss, drawdown, equity
    /// protection and the minimum capital floor.
    pub fn check(&self, now: Instant) -> TradingStatus {
        let resume_in = match self.pause {
            Some(Pause::Until(until)) if now < until => Some(Some(until - now)),
            Some(Pause::Indefinite) => Some(None),
            _ => None,
        };
        if let Some(resume_in) = resume_in {
            return TradingStatus::Halted(HaltReason::ConsecutiveLosses {
                losses: self.pause_losses,
                resume_in,
            });
        }

        if self.starting_equity > 0.0
            && !self
                .cfg
                .is_within_daily_loss_limit(self.starting_equity, self.current_equity)
        {
            let loss = (self.starting_equity - self.current_equity) / self.starting_equity;
            return TradingStatus::Halted(HaltReason::DailyLossLimit { loss });
        }

        if self.cfg.risk.drawdown_monitoring_enabled
            && !self
                .cfg
                .is_within_drawdown_limit(self.peak_equity, self.current_equity)
        {
            let drawdown = (self.peak_equity - self.current_equity) / self.peak_equity;
            return TradingStatus::Halted(HaltReason::DrawdownLimit { drawdown });
        }

        if self.cfg.risk.equity_protection_enabled
            && self.current_equity < self.cfg.risk.minimum_equity_level
        {
            return TradingStatus::Halted(HaltReason::EquityProtection {
                equity: self.current_equity,
            });
        }

        if self.current_equity < self.cfg.capital.minimum_capital {
            return TradingStatus::Halted(HaltReason::BelowMinimumCapital {
                equity: self.current_equity,
            });
        }

        TradingStatus::Allowed
    }

    fn pause_duration(&self) -> Duration {
        let minutes = self.cfg.risk.pause_duration_minutes.max(0) as u64;
        Duration::from_secs(minutes.saturating_mul(60))
    }
}
