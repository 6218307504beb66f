//! Alert channel implementations (Slack, PagerDuty, Teams, webhook, email).

#[cfg(test)]
#[path = "channels_tests.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use pollwatch_core::Severity;
use tracing::{debug, warn};

use crate::alerts::{Alert, AlertChannel};
use crate::config::EmailConfig;
use crate::error::NotifyError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

async fn check_response(
    channel: &'static str,
    response: reqwest::Response,
) -> Result<(), NotifyError> {
    if response.status().is_success() {
        debug!("{} alert sent successfully", channel);
        Ok(())
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::delivery(
            channel,
            format!("endpoint returned {}: {}", status, body),
        ))
    }
}

/// Slack webhook channel.
pub struct SlackChannel {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackChannel {
    /// Create a new Slack channel.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AlertChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let fields: Vec<serde_json::Value> = alert
            .metadata
            .iter()
            .map(|(k, v)| {
                serde_json::json!({
                    "title": k,
                    "value": v,
                    "short": true
                })
            })
            .collect();

        let payload = serde_json::json!({
            "attachments": [{
                "color": alert.severity.color(),
                "title": format!("{} {} - {}", alert.severity.emoji(), alert.title, alert.severity),
                "text": alert.message,
                "footer": alert.entity.as_deref().unwrap_or("pollwatch"),
                "ts": alert.timestamp.timestamp(),
                "fields": fields,
            }]
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::delivery("slack", format!("request failed: {}", e)))?;

        check_response("slack", response).await
    }
}

/// PagerDuty Events v2 channel.
///
/// Abnormal severities trigger an incident; an OK alert (recovery)
/// resolves it. The dedup key is stable per entity so repeats collapse
/// onto one incident.
pub struct PagerDutyChannel {
    routing_key: String,
    events_url: String,
    client: reqwest::Client,
}

impl PagerDutyChannel {
    const EVENTS_URL: &'static str = "https://events.pagerduty.com/v2/enqueue";

    /// Create a new PagerDuty channel.
    pub fn new(routing_key: impl Into<String>) -> Self {
        Self {
            routing_key: routing_key.into(),
            events_url: Self::EVENTS_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    #[cfg(test)]
    fn with_events_url(mut self, url: impl Into<String>) -> Self {
        self.events_url = url.into();
        self
    }

    fn pd_severity(severity: Severity) -> &'static str {
        match severity {
            Severity::Ok => "info",
            Severity::Warning => "warning",
            Severity::High => "error",
            Severity::Critical => "critical",
        }
    }
}

#[async_trait]
impl AlertChannel for PagerDutyChannel {
    fn name(&self) -> &'static str {
        "pagerduty"
    }

    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let event_action = if alert.severity > Severity::Ok {
            "trigger"
        } else {
            "resolve"
        };
        let dedup_key = format!(
            "pollwatch-{}",
            alert.entity.as_deref().unwrap_or("global")
        );

        let payload = serde_json::json!({
            "routing_key": self.routing_key,
            "event_action": event_action,
            "dedup_key": dedup_key,
            "payload": {
                "summary": format!("{}: {}", alert.title, alert.message),
                "severity": Self::pd_severity(alert.severity),
                "source": alert.entity.as_deref().unwrap_or("pollwatch"),
                "custom_details": alert.metadata,
            }
        });

        let response = self
            .client
            .post(&self.events_url)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::delivery("pagerduty", format!("request failed: {}", e)))?;

        check_response("pagerduty", response).await
    }
}

/// Microsoft Teams webhook channel (MessageCard format).
pub struct TeamsChannel {
    webhook_url: String,
    client: reqwest::Client,
}

impl TeamsChannel {
    /// Create a new Teams channel.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn theme_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Ok => "00FF00",
            Severity::Warning => "FFFF00",
            Severity::High => "FFA500",
            Severity::Critical => "FF0000",
        }
    }
}

#[async_trait]
impl AlertChannel for TeamsChannel {
    fn name(&self) -> &'static str {
        "teams"
    }

    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let mut facts = vec![
            serde_json::json!({"name": "Severity", "value": alert.severity.to_string()}),
            serde_json::json!({"name": "Message", "value": alert.message}),
        ];
        if let Some(ref entity) = alert.entity {
            facts.push(serde_json::json!({"name": "Entity", "value": entity}));
        }
        for (key, value) in &alert.metadata {
            facts.push(serde_json::json!({"name": key, "value": value}));
        }

        let payload = serde_json::json!({
            "@type": "MessageCard",
            "@context": "http://schema.org/extensions",
            "themeColor": Self::theme_color(alert.severity),
            "summary": format!("{} - {}", alert.title, alert.severity),
            "sections": [{
                "activityTitle": format!("{} - {}", alert.title, alert.severity),
                "facts": facts,
                "markdown": true
            }]
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::delivery("teams", format!("request failed: {}", e)))?;

        check_response("teams", response).await
    }
}

/// Generic JSON webhook channel for custom integrations.
pub struct WebhookChannel {
    url: String,
    client: reqwest::Client,
}

impl WebhookChannel {
    /// Create a new webhook channel.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AlertChannel for WebhookChannel {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        // The whole alert, verbatim. Consumers get everything the
        // richer channels render.
        let payload = serde_json::json!({
            "source": "pollwatch",
            "alert": alert,
        });

        let response = self
            .client
            .post(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::delivery("webhook", format!("request failed: {}", e)))?;

        check_response("webhook", response).await
    }
}

/// Email channel (SMTP).
///
/// Note: This is a basic implementation. For production use,
/// consider using a dedicated email library like `lettre`.
pub struct EmailChannel {
    config: EmailConfig,
}

impl EmailChannel {
    /// Create a new Email channel.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AlertChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        warn!(
            "Email channel is using placeholder implementation. \
             Alert '{}' would be sent to {:?}",
            alert.title, self.config.to
        );

        debug!(
            "Email alert details:\n\
             From: {}\n\
             To: {:?}\n\
             Subject: [{}] {}\n\
             Body: {}",
            self.config.from,
            self.config.to,
            alert.severity,
            alert.title,
            alert.format_text()
        );

        Ok(())
    }
}
