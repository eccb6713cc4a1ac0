//! Trading bot runtime.
//!
//! Owns the validated configuration, tracks session risk on every refresh
//! and reports state changes through the configured notifier.

mod error;
mod stats;

pub use error::BotError;
pub use stats::Stats;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::notification::{
    Event, NoopNotifier, Notifier, OverviewData, RiskHaltData, ShutdownData, StartupData,
    WebhookNotifier,
};
use crate::risk::{RiskGuard, TradingStatus};

const OVERVIEW_INTERVAL: Duration = Duration::from_secs(3600);

/// Main bot that applies the risk configuration to a trading session.
pub struct Bot {
    cfg: Config,
    notifier: Arc<dyn Notifier>,
    version: String,

    // Runtime state
    started_at: Mutex<Option<Instant>>,
    running: Mutex<bool>,
    stats: Mutex<Stats>,
    guard: Mutex<RiskGuard>,
    status: Mutex<TradingStatus>,
    trading_day: Mutex<NaiveDate>,
}

impl Bot {
    /// Creates a new Bot instance.
    ///
    /// A webhook notifier is created when notifications are enabled and a
    /// webhook URL is set; otherwise events are dropped.
    pub fn new(cfg: Config) -> Result<Self, BotError> {
        let notifier: Arc<dyn Notifier> = match cfg.notification_webhook() {
            Some(url) => match WebhookNotifier::new(url) {
                Ok(notifier) => {
                    info!("Webhook notifier created");
                    Arc::new(notifier)
                }
                Err(e) => {
                    warn!(error = %e, "Failed to create webhook notifier");
                    Arc::new(NoopNotifier)
                }
            },
            None => Arc::new(NoopNotifier),
        };

        Self::with_notifier(cfg, notifier)
    }

    /// Creates a Bot that reports through `notifier`.
    pub fn with_notifier(cfg: Config, notifier: Arc<dyn Notifier>) -> Result<Self, BotError> {
        cfg.validate()?;

        let guard = RiskGuard::new(&cfg, cfg.capital.total_capital);

        Ok(Bot {
            notifier,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Mutex::new(None),
            running: Mutex::new(false),
            stats: Mutex::new(Stats::default()),
            guard: Mutex::new(guard),
            status: Mutex::new(TradingStatus::Allowed),
            trading_day: Mutex::new(Utc::now().date_naive()),
            cfg,
        })
    }

    /// Starts the bot and runs the refresh loop until [`Bot::stop`] is called.
    pub async fn start(&self) -> Result<(), BotError> {
        {
            let mut running = self.running.lock().await;
            if *running {
                return Err(BotError::AlreadyRunning);
            }
            *running = true;
        }

        {
            let mut started_at = self.started_at.lock().await;
            *started_at = Some(Instant::now());
        }

        info!(
            version = %self.version,
            pair = %self.cfg.trading.pair,
            dry_run = self.cfg.dry_run_enabled,
            testnet = self.cfg.trading.testnet_enabled,
            "Starting trading bot"
        );

        self.send_notification(Event::startup(StartupData {
            version: self.version.clone(),
            pair: self.cfg.trading.pair.clone(),
            dry_run: self.cfg.dry_run_enabled,
            testnet: self.cfg.trading.testnet_enabled,
            total_capital: self.cfg.capital.total_capital,
        }))
        .await;

        self.run_main_loop().await
    }

    /// Gracefully stops the bot.
    pub async fn stop(&self) -> Result<(), BotError> {
        {
            let mut running = self.running.lock().await;
            if !*running {
                return Ok(());
            }
            *running = false;
        }

        info!("Stopping bot...");

        let uptime = self.uptime().await;

        self.send_notification(Event::shutdown(ShutdownData {
            reason: "graceful shutdown".to_string(),
            uptime,
            graceful: true,
        }))
        .await;

        let stats = self.stats().await;
        info!(
            uptime = ?uptime,
            cycles = stats.refresh_cycles,
            trades = stats.trades,
            winning = stats.winning_trades,
            losing = stats.losing_trades,
            realized_pnl = stats.realized_pnl,
            best_trade = stats.best_trade,
            worst_trade = stats.worst_trade,
            halts = stats.halts,
            "Bot stopped"
        );

        Ok(())
    }

    /// Returns a copy of the current statistics.
    pub async fn stats(&self) -> Stats {
        self.stats.lock().await.clone()
    }

    /// Returns true if the bot is currently running.
    pub async fn is_running(&self) -> bool {
        *self.running.lock().await
    }

    /// Returns how long the bot has been running.
    pub async fn uptime(&self) -> Duration {
        self.started_at
            .lock()
            .await
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Trading status as of the last risk evaluation.
    pub async fn status(&self) -> TradingStatus {
        *self.status.lock().await
    }

    /// Records a closed trade and re-evaluates the risk limits.
    pub async fn record_trade(&self, pnl: f64) -> TradingStatus {
        self.stats.lock().await.record_trade(pnl);
        self.guard.lock().await.record_trade(pnl, Instant::now());
        self.evaluate_risk().await
    }

    /// Records a new equity reading and re-evaluates the risk limits.
    pub async fn update_equity(&self, equity: f64) -> TradingStatus {
        self.guard.lock().await.update_equity(equity);
        self.evaluate_risk().await
    }

    /// Quantity for a new entry at the current equity, or 0 while halted.
    pub async fn order_quantity(&self, entry_price: f64, stop_loss_price: f64) -> f64 {
        if !self.status().await.is_allowed() {
            return 0.0;
        }
        let equity = self.guard.lock().await.current_equity();
        self.cfg.order_quantity(equity, entry_price, stop_loss_price)
    }

    /// Main refresh loop.
    async fn run_main_loop(&self) -> Result<(), BotError> {
        let refresh_interval = self.cfg.refresh_interval();
        let mut interval = tokio::time::interval(refresh_interval);
        let mut overview_interval_timer = tokio::time::interval(OVERVIEW_INTERVAL);
        // The first tick completes immediately.
        overview_interval_timer.tick().await;

        info!(
            refresh_interval = ?refresh_interval,
            overview_interval = ?OVERVIEW_INTERVAL,
            "Starting main refresh loop"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if !self.is_running().await {
                        break;
                    }
                    self.refresh().await;
                }
                _ = overview_interval_timer.tick() => {
                    if !self.is_running().await {
                        break;
                    }
                    self.send_overview().await;
                }
            }
        }

        Ok(())
    }

    /// Runs one refresh cycle.
    async fn refresh(&self) {
        let cycles = {
            let mut stats = self.stats.lock().await;
            stats.refresh_cycles += 1;
            stats.refresh_cycles
        };

        self.roll_trading_day(Utc::now().date_naive()).await;
        let status = self.evaluate_risk().await;

        debug!(
            cycle = cycles,
            pair = %self.cfg.trading.pair,
            allowed = status.is_allowed(),
            "Refresh cycle"
        );
    }

    /// Resets the daily loss baseline when the UTC date changes.
    async fn roll_trading_day(&self, today: NaiveDate) {
        let mut day = self.trading_day.lock().await;
        if *day != today {
            *day = today;
            self.guard.lock().await.reset_day();
        }
    }

    /// Checks the guard and notifies on status transitions.
    async fn evaluate_risk(&self) -> TradingStatus {
        let (status, equity) = {
            let guard = self.guard.lock().await;
            (guard.check(Instant::now()), guard.current_equity())
        };

        let previous = {
            let mut current = self.status.lock().await;
            std::mem::replace(&mut *current, status)
        };

        match (previous, status) {
            (TradingStatus::Allowed, TradingStatus::Halted(reason)) => {
                warn!(reason = %reason, equity, "Trading halted");
                self.stats.lock().await.halts += 1;
                self.send_notification(Event::risk_halt(RiskHaltData {
                    pair: self.cfg.trading.pair.clone(),
                    reason: reason.to_string(),
                    equity,
                }))
                .await;
            }
            (TradingStatus::Halted(_), TradingStatus::Allowed) => {
                info!(equity, "Trading resumed");
            }
            _ => {}
        }

        status
    }

    /// Sends a notification event if the notifier accepts it.
    async fn send_notification(&self, event: Event) {
        if !self.notifier.is_enabled(event.event_type) {
            return;
        }
        if let Err(e) = self.notifier.send(&event).await {
            debug!(
                event_type = %event.event_type,
                error = %e,
                "Failed to send notification"
            );
        }
    }

    /// Sends a periodic overview notification with current stats.
    async fn send_overview(&self) {
        let stats = self.stats().await;
        let uptime = self.uptime().await;
        let (equity, peak_equity) = {
            let guard = self.guard.lock().await;
            (guard.current_equity(), guard.peak_equity())
        };

        self.send_notification(Event::overview(OverviewData {
            uptime,
            refresh_cycles: stats.refresh_cycles,
            trades: stats.trades,
            losing_trades: stats.losing_trades,
            equity,
            peak_equity,
            trading_allowed: self.status().await.is_allowed(),
            dry_run: self.cfg.dry_run_enabled,
        }))
        .await;
    }
}
