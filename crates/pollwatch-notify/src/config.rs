//! Notification channel configuration.

use serde::{Deserialize, Serialize};

/// Which channels are enabled, by presence of their settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsConfig {
    /// Slack incoming-webhook URL.
    pub slack_webhook: Option<String>,

    /// PagerDuty Events v2 routing key.
    pub pagerduty_routing_key: Option<String>,

    /// Microsoft Teams incoming-webhook URL.
    pub teams_webhook: Option<String>,

    /// Generic JSON webhook URL for custom integrations.
    pub webhook_url: Option<String>,

    /// Email settings.
    pub email: Option<EmailConfig>,
}

/// Email alert configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP server.
    pub smtp_server: String,
    /// SMTP port.
    pub smtp_port: u16,
    /// From address.
    pub from: String,
    /// To addresses.
    pub to: Vec<String>,
    /// SMTP username.
    pub username: Option<String>,
    /// SMTP password.
    pub password: Option<String>,
}
