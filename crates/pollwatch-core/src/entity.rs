//! Monitored entities and metric samples.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of monitor an entity belongs to.
///
/// Each type carries a suggested poll cadence for the external
/// scheduler; the evaluation pipeline is identical across types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorType {
    /// Agent last-activity staleness (telemetry, billing).
    AgentHealth,
    /// Failed/stuck job counts per queue.
    JobQueue,
    /// Failed logins and other audit counters.
    SecurityAudit,
    /// Endpoint availability and latency.
    ApiHealth,
    /// Export job document counts.
    Export,
}

impl MonitorType {
    /// Suggested scheduler cadence in minutes. Informational only;
    /// scheduling itself is external.
    pub fn default_interval_minutes(&self) -> u64 {
        match self {
            MonitorType::AgentHealth => 1,
            MonitorType::JobQueue => 5,
            MonitorType::SecurityAudit => 15,
            MonitorType::ApiHealth => 5,
            MonitorType::Export => 15,
        }
    }
}

impl std::str::FromStr for MonitorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('_', "-").as_str() {
            "agent-health" => Ok(MonitorType::AgentHealth),
            "job-queue" => Ok(MonitorType::JobQueue),
            "security-audit" => Ok(MonitorType::SecurityAudit),
            "api-health" => Ok(MonitorType::ApiHealth),
            "export" => Ok(MonitorType::Export),
            other => Err(format!("unknown monitor type '{other}'")),
        }
    }
}

impl std::fmt::Display for MonitorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorType::AgentHealth => write!(f, "agent-health"),
            MonitorType::JobQueue => write!(f, "job-queue"),
            MonitorType::SecurityAudit => write!(f, "security-audit"),
            MonitorType::ApiHealth => write!(f, "api-health"),
            MonitorType::Export => write!(f, "export"),
        }
    }
}

/// A single monitored target: an agent, a queue, an endpoint.
///
/// `id` is unique within its monitor type. Entities are implicitly
/// created on first observation; there is no registration step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonitoredEntity {
    pub id: String,
    pub monitor_type: MonitorType,
}

impl MonitoredEntity {
    pub fn new(id: impl Into<String>, monitor_type: MonitorType) -> Self {
        Self {
            id: id.into(),
            monitor_type,
        }
    }

    /// Key under which this entity's alert state is persisted.
    /// Ids are only unique within a monitor type, so the type is part
    /// of the key.
    pub fn state_key(&self) -> String {
        format!("{}--{}", self.monitor_type, self.id)
    }
}

impl std::fmt::Display for MonitoredEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.monitor_type, self.id)
    }
}

/// The raw value carried by a metric sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricValue {
    /// A numeric observation: minutes since last activity, failed job
    /// count, document count, latency in milliseconds.
    Gauge(f64),
    /// The target is in a hard-failure state that bypasses numeric
    /// thresholds entirely: disabled, not found, not responding.
    Failed(String),
}

impl MetricValue {
    pub fn as_gauge(&self) -> Option<f64> {
        match self {
            MetricValue::Gauge(v) => Some(*v),
            MetricValue::Failed(_) => None,
        }
    }
}

/// One observation of one entity. Created fresh every poll cycle and
/// never persisted; only the derived severity survives in the state
/// store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: MetricValue,
    /// Contextual detail carried verbatim into alert payloads.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl MetricSample {
    pub fn new(entity_id: impl Into<String>, value: MetricValue) -> Self {
        Self {
            entity_id: entity_id.into(),
            timestamp: Utc::now(),
            value,
            metadata: BTreeMap::new(),
        }
    }

    pub fn gauge(entity_id: impl Into<String>, value: f64) -> Self {
        Self::new(entity_id, MetricValue::Gauge(value))
    }

    pub fn failed(entity_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(entity_id, MetricValue::Failed(reason.into()))
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_key_includes_monitor_type() {
        let a = MonitoredEntity::new("telemetry-agent", MonitorType::AgentHealth);
        let b = MonitoredEntity::new("telemetry-agent", MonitorType::ApiHealth);
        assert_ne!(a.state_key(), b.state_key());
        assert!(a.state_key().contains("agent-health"));
    }

    #[test]
    fn test_sample_builders() {
        let sample = MetricSample::gauge("processing-queue", 5.0)
            .with_metadata("workspace", "Main Review");
        assert_eq!(sample.value.as_gauge(), Some(5.0));
        assert_eq!(sample.metadata.get("workspace").map(String::as_str), Some("Main Review"));

        let failed = MetricSample::failed("telemetry-agent", "agent disabled");
        assert_eq!(failed.value.as_gauge(), None);
    }

    #[test]
    fn test_monitor_type_parses_both_spellings() {
        assert_eq!(
            "agent-health".parse::<MonitorType>(),
            Ok(MonitorType::AgentHealth)
        );
        assert_eq!(
            "job_queue".parse::<MonitorType>(),
            Ok(MonitorType::JobQueue)
        );
        assert!("frobnicator".parse::<MonitorType>().is_err());
    }

    #[test]
    fn test_default_intervals() {
        assert_eq!(MonitorType::AgentHealth.default_interval_minutes(), 1);
        assert_eq!(MonitorType::SecurityAudit.default_interval_minutes(), 15);
    }
}
