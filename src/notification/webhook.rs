use std::time::Duration;

use serde::Serialize;

use crate::notification::{Event, EventType, NotificationError, Notifier, format_event};

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON body posted to the webhook.
#[derive(Debug, Serialize)]
pub(crate) struct WebhookPayload<'a> {
    pub event: String,
    pub timestamp: String,
    pub text: &'a str,
}

impl<'a> WebhookPayload<'a> {
    pub(crate) fn new(event: &Event, text: &'a str) -> Self {
        Self {
            event: event.event_type.to_string(),
            timestamp: event.timestamp.to_rfc3339(),
            text,
        }
    }
}

/// Posts events as JSON to a webhook URL.
pub struct WebhookNotifier {
    url: String,
    http_client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotificationError> {
        let url = url.into();
        if url.is_empty() {
            return Err(NotificationError::new("webhook url is required"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| NotificationError::new(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { url, http_client })
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, event: &Event) -> Result<(), NotificationError> {
        let text = format_event(event);
        let payload = WebhookPayload::new(event, &text);

        let response = self
            .http_client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::new(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotificationError::new(format!(
                "Webhook error: {} - {}",
                status, body
            )));
        }

        Ok(())
    }

    fn is_enabled(&self, _event_type: EventType) -> bool {
        true
    }
}
