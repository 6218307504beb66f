//! Alert types and the channel trait.

#[cfg(test)]
#[path = "alerts_tests.rs"]
mod tests;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pollwatch_core::Severity;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::NotifyError;

/// An alert message, severity plus human-readable context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Short headline, e.g. "Telemetry agent stale".
    pub title: String,
    /// What happened, in one or two sentences.
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    /// Entity this alert concerns, e.g. "agent-health/telemetry-agent".
    /// Also keys PagerDuty deduplication.
    pub entity: Option<String>,
    /// Contextual detail from the metric sample, carried into channel
    /// payloads as fields/facts.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Alert {
    /// Create a new alert.
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
            timestamp: Utc::now(),
            entity: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Set the entity this alert is about.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Attach contextual metadata.
    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Format for text output (email bodies, logs).
    pub fn format_text(&self) -> String {
        let mut text = format!(
            "[{}] {} - {}\n{}",
            self.severity,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.title,
            self.message
        );

        if let Some(ref entity) = self.entity {
            text.push_str(&format!("\nEntity: {}", entity));
        }
        for (key, value) in &self.metadata {
            text.push_str(&format!("\n{}: {}", key, value));
        }

        text
    }

    /// Format for Markdown output.
    pub fn format_markdown(&self) -> String {
        let mut text = format!(
            "{} **{}** - {}\n\n{}",
            self.severity.emoji(),
            self.title,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.message
        );

        if let Some(ref entity) = self.entity {
            text.push_str(&format!("\n\n_Entity: {}_", entity));
        }

        text
    }
}

/// Alert channel trait. Implementations are side-effecting and
/// best-effort; the dispatcher isolates their failures.
#[async_trait]
pub trait AlertChannel: Send + Sync {
    /// Channel name.
    fn name(&self) -> &'static str;

    /// Send an alert.
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError>;
}

/// Log channel (writes to tracing). Always enabled, so every alert
/// leaves at least one trace even with no webhooks configured.
pub struct LogChannel;

#[async_trait]
impl AlertChannel for LogChannel {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        match alert.severity {
            Severity::Ok => info!("[ALERT] {}: {}", alert.title, alert.message),
            Severity::Warning => warn!("[ALERT] {}: {}", alert.title, alert.message),
            Severity::High | Severity::Critical => {
                error!("[ALERT] {}: {}", alert.title, alert.message)
            }
        }
        Ok(())
    }
}
