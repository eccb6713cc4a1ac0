//! Operator notifications delivered over a webhook.

mod notifier;
mod webhook;

pub use notifier::{
    Event, EventData, EventType, NoopNotifier, NotificationError, Notifier, OverviewData,
    RiskHaltData, ShutdownData, StartupData, format_event,
};
pub use webhook::WebhookNotifier;
