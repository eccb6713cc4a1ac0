use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Kind of notification event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Bot started
    Startup,
    /// Bot stopped
    Shutdown,
    /// A risk limit stopped trading
    RiskHalt,
    /// Periodic status summary
    Overview,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Startup => write!(f, "startup"),
            EventType::Shutdown => write!(f, "shutdown"),
            EventType::RiskHalt => write!(f, "risk_halt"),
            EventType::Overview => write!(f, "overview"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StartupData {
    pub version: String,
    pub pair: String,
    pub dry_run: bool,
    pub testnet: bool,
    pub total_capital: f64,
}

#[derive(Debug, Clone)]
pub struct ShutdownData {
    pub reason: String,
    pub uptime: Duration,
    pub graceful: bool,
}

#[derive(Debug, Clone)]
pub struct RiskHaltData {
    pub pair: String,
    pub reason: String,
    pub equity: f64,
}

#[derive(Debug, Clone)]
pub struct OverviewData {
    pub uptime: Duration,
    pub refresh_cycles: u64,
    pub trades: u64,
    pub losing_trades: u64,
    pub equity: f64,
    pub peak_equity: f64,
    pub trading_allowed: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub enum EventData {
    Startup(StartupData),
    Shutdown(ShutdownData),
    RiskHalt(RiskHaltData),
    Overview(OverviewData),
}

/// Notification event.
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub data: EventData,
}

impl Event {
    pub fn new(event_type: EventType, data: EventData) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            data,
        }
    }

    pub fn startup(data: StartupData) -> Self {
        Self::new(EventType::Startup, EventData::Startup(data))
    }

    pub fn shutdown(data: ShutdownData) -> Self {
        Self::new(EventType::Shutdown, EventData::Shutdown(data))
    }

    pub fn risk_halt(data: RiskHaltData) -> Self {
        Self::new(EventType::RiskHalt, EventData::RiskHalt(data))
    }

    pub fn overview(data: OverviewData) -> Self {
        Self::new(EventType::Overview, EventData::Overview(data))
    }
}

/// Delivers notification events.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, event: &Event) -> Result<(), NotificationError>;

    /// Whether events of this type are delivered at all.
    fn is_enabled(&self, event_type: EventType) -> bool;
}

/// Notification delivery error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("notification error: {message}")]
pub struct NotificationError {
    pub message: String,
}

impl NotificationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Drops every event. Used when notifications are off.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait::async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, _event: &Event) -> Result<(), NotificationError> {
        Ok(())
    }

    fn is_enabled(&self, _event_type: EventType) -> bool {
        false
    }
}

// === Formatting ===

fn mode(dry_run: bool) -> &'static str {
    if dry_run { "DRY RUN" } else { "LIVE" }
}

pub fn format_startup(data: &StartupData) -> String {
    let network = if data.testnet { "testnet" } else { "mainnet" };
    format!(
        "Bot started\n\
         Version: {}\n\
         Mode: {} ({})\n\
         Pair: {}\n\
         Capital: ${:.2}",
        data.version,
        mode(data.dry_run),
        network,
        data.pair,
        data.total_capital
    )
}

pub fn format_shutdown(data: &ShutdownData) -> String {
    let status = if data.graceful { "graceful" } else { "forced" };
    format!(
        "Bot stopped\n\
         Reason: {}\n\
         Status: {}\n\
         Uptime: {}",
        data.reason,
        status,
        format_duration(data.uptime)
    )
}

pub fn format_risk_halt(data: &RiskHaltData) -> String {
    format!(
        "Trading halted on {}\n\
         Reason: {}\n\
         Equity: ${:.2}",
        data.pair, data.reason, data.equity
    )
}

pub fn format_overview(data: &OverviewData) -> String {
    let trading = if data.trading_allowed { "active" } else { "halted" };
    format!(
        "Status overview [{}]\n\
         Uptime: {}\n\
         Refresh cycles: {}\n\
         Trades: {} ({} losing)\n\
         Equity: ${:.2} (peak ${:.2})\n\
         Trading: {}",
        mode(data.dry_run),
        format_duration(data.uptime),
        data.refresh_cycles,
        data.trades,
        data.losing_trades,
        data.equity,
        data.peak_equity,
        trading
    )
}

/// Renders an event as plain text.
pub fn format_event(event: &Event) -> String {
    match &event.data {
        EventData::Startup(data) => format_startup(data),
        EventData::Shutdown(data) => format_shutdown(data),
        EventData::RiskHalt(data) => format_risk_halt(data),
        EventData::Overview(data) => format_overview(data),
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
