//! Dispatcher for fanning alerts out to channels.

use tracing::{error, info};

use crate::alerts::{Alert, AlertChannel, LogChannel};
use crate::channels::{EmailChannel, PagerDutyChannel, SlackChannel, TeamsChannel, WebhookChannel};
use crate::config::ChannelsConfig;
use crate::error::NotifyError;

/// Fans one alert out to every enabled channel.
pub struct Dispatcher {
    channels: Vec<Box<dyn AlertChannel>>,
}

impl Dispatcher {
    /// Create a dispatcher with only the log channel.
    pub fn new() -> Self {
        Self {
            channels: vec![Box::new(LogChannel)],
        }
    }

    /// Create from config. A channel is enabled by the presence of its
    /// settings.
    pub fn from_config(config: &ChannelsConfig) -> Self {
        let mut dispatcher = Self::new();

        if let Some(ref webhook_url) = config.slack_webhook {
            if !webhook_url.is_empty() {
                info!("Adding Slack alert channel");
                dispatcher.add_channel(Box::new(SlackChannel::new(webhook_url)));
            }
        }

        if let Some(ref routing_key) = config.pagerduty_routing_key {
            if !routing_key.is_empty() {
                info!("Adding PagerDuty alert channel");
                dispatcher.add_channel(Box::new(PagerDutyChannel::new(routing_key)));
            }
        }

        if let Some(ref webhook_url) = config.teams_webhook {
            if !webhook_url.is_empty() {
                info!("Adding Teams alert channel");
                dispatcher.add_channel(Box::new(TeamsChannel::new(webhook_url)));
            }
        }

        if let Some(ref url) = config.webhook_url {
            if !url.is_empty() {
                info!("Adding generic webhook alert channel");
                dispatcher.add_channel(Box::new(WebhookChannel::new(url)));
            }
        }

        if let Some(ref email_config) = config.email {
            info!("Adding Email alert channel");
            dispatcher.add_channel(Box::new(EmailChannel::new(email_config.clone())));
        }

        dispatcher
    }

    /// Add a channel.
    pub fn add_channel(&mut self, channel: Box<dyn AlertChannel>) {
        self.channels.push(channel);
    }

    /// Get list of channel names.
    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Send an alert to all channels. Best-effort: every channel is
    /// attempted, failures are logged and collected, never raised.
    pub async fn send(&self, alert: &Alert) -> Vec<NotifyError> {
        let mut errors = Vec::new();

        for channel in &self.channels {
            if let Err(e) = channel.send(alert).await {
                error!("Failed to send alert via {}: {}", channel.name(), e);
                errors.push(e);
            }
        }

        errors
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
