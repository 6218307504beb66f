//! Configuration schema definitions.

use std::collections::BTreeMap;

use pollwatch_core::{
    MonitorType, MonitoredEntity, Predicate, Severity, ThresholdRule, ThresholdTable,
};
use pollwatch_notify::ChannelsConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory for persisted alert state.
    #[serde(default = "default_state_dir")]
    pub state_dir: String,

    /// Directory for rolling log files. Console-only logging when
    /// unset.
    pub log_dir: Option<String>,

    /// Upper bound on a single metric fetch. A hung call becomes a
    /// fetch error instead of stalling the cycle.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,

    /// Notification channels.
    #[serde(default)]
    pub channels: ChannelsConfig,

    /// Monitors, keyed by type.
    #[serde(default)]
    pub monitors: BTreeMap<MonitorType, MonitorConfig>,
}

fn default_state_dir() -> String {
    "~/.pollwatch/state".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

/// One monitor type: its entities and threshold table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Entity ids to poll, unique within this monitor.
    #[serde(default)]
    pub entities: Vec<String>,

    /// Scheduler cadence override in minutes. Informational; the
    /// scheduler itself is external.
    pub interval_minutes: Option<u64>,

    /// Severity tiers for this monitor's metric.
    #[serde(default)]
    pub thresholds: Vec<ThresholdRuleConfig>,
}

/// One threshold tier as written in TOML. Exactly one of `at_least` /
/// `above` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdRuleConfig {
    pub severity: Severity,

    /// Matches when the metric value is `>=` this bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_least: Option<f64>,

    /// Matches when the metric value is `>` this bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub above: Option<f64>,
}

impl ThresholdRuleConfig {
    fn predicate(&self) -> Result<Predicate, ConfigError> {
        match (self.at_least, self.above) {
            (Some(bound), None) => Ok(Predicate::AtLeast(bound)),
            (None, Some(bound)) => Ok(Predicate::Above(bound)),
            (None, None) => Err(ConfigError::MissingField(format!(
                "threshold for {} needs `at_least` or `above`",
                self.severity
            ))),
            (Some(_), Some(_)) => Err(ConfigError::InvalidValue {
                field: format!("threshold for {}", self.severity),
                message: "`at_least` and `above` are mutually exclusive".to_string(),
            }),
        }
    }
}

/// A monitor ready to run: entities plus a validated threshold table.
#[derive(Debug, Clone)]
pub struct CompiledMonitor {
    pub monitor_type: MonitorType,
    pub entities: Vec<MonitoredEntity>,
    pub thresholds: ThresholdTable,
    pub interval_minutes: u64,
}

impl Config {
    /// Compile every configured monitor, validating threshold tables.
    ///
    /// Fails fast: any malformed table aborts startup before the first
    /// poll.
    pub fn compile(&self) -> Result<Vec<CompiledMonitor>, ConfigError> {
        if self.monitors.is_empty() {
            return Err(ConfigError::MissingField("monitors".to_string()));
        }

        let mut compiled = Vec::with_capacity(self.monitors.len());
        for (&monitor_type, monitor) in &self.monitors {
            if monitor.entities.is_empty() {
                return Err(ConfigError::MissingField(format!(
                    "monitors.{}.entities",
                    monitor_type
                )));
            }

            let mut rules = Vec::with_capacity(monitor.thresholds.len());
            for rule in &monitor.thresholds {
                rules.push(ThresholdRule::new(rule.severity, rule.predicate()?));
            }
            let thresholds = ThresholdTable::new(rules).map_err(|source| {
                ConfigError::InvalidThresholds {
                    monitor: monitor_type.to_string(),
                    source,
                }
            })?;

            compiled.push(CompiledMonitor {
                monitor_type,
                entities: monitor
                    .entities
                    .iter()
                    .map(|id| MonitoredEntity::new(id, monitor_type))
                    .collect(),
                thresholds,
                interval_minutes: monitor
                    .interval_minutes
                    .unwrap_or_else(|| monitor_type.default_interval_minutes()),
            });
        }

        Ok(compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry_config() -> Config {
        let mut monitors = BTreeMap::new();
        monitors.insert(
            MonitorType::AgentHealth,
            MonitorConfig {
                entities: vec!["telemetry-agent".to_string()],
                interval_minutes: None,
                thresholds: vec![
                    ThresholdRuleConfig {
                        severity: Severity::Warning,
                        at_least: Some(30.0),
                        above: None,
                    },
                    ThresholdRuleConfig {
                        severity: Severity::High,
                        at_least: Some(60.0),
                        above: None,
                    },
                    ThresholdRuleConfig {
                        severity: Severity::Critical,
                        above: Some(120.0),
                        at_least: None,
                    },
                ],
            },
        );
        Config {
            monitors,
            ..Default::default()
        }
    }

    #[test]
    fn test_compile_valid_config() {
        let compiled = telemetry_config().compile().unwrap();
        assert_eq!(compiled.len(), 1);

        let monitor = &compiled[0];
        assert_eq!(monitor.monitor_type, MonitorType::AgentHealth);
        assert_eq!(monitor.entities[0].id, "telemetry-agent");
        assert_eq!(monitor.interval_minutes, 1);
        assert_eq!(
            monitor
                .thresholds
                .evaluate(&pollwatch_core::MetricValue::Gauge(125.0)),
            Severity::Critical
        );
    }

    #[test]
    fn test_compile_rejects_empty_monitors() {
        let err = Config::default().compile().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn test_compile_rejects_monitor_without_entities() {
        let mut config = telemetry_config();
        config
            .monitors
            .get_mut(&MonitorType::AgentHealth)
            .unwrap()
            .entities
            .clear();
        let err = config.compile().unwrap_err();
        assert!(err.to_string().contains("entities"));
    }

    #[test]
    fn test_compile_rejects_empty_threshold_table() {
        let mut config = telemetry_config();
        config
            .monitors
            .get_mut(&MonitorType::AgentHealth)
            .unwrap()
            .thresholds
            .clear();
        let err = config.compile().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThresholds { .. }));
    }

    #[test]
    fn test_rule_needs_exactly_one_bound() {
        let neither = ThresholdRuleConfig {
            severity: Severity::Warning,
            at_least: None,
            above: None,
        };
        assert!(neither.predicate().is_err());

        let both = ThresholdRuleConfig {
            severity: Severity::Warning,
            at_least: Some(1.0),
            above: Some(2.0),
        };
        assert!(both.predicate().is_err());
    }

    #[test]
    fn test_interval_override() {
        let mut config = telemetry_config();
        config
            .monitors
            .get_mut(&MonitorType::AgentHealth)
            .unwrap()
            .interval_minutes = Some(5);
        let compiled = config.compile().unwrap();
        assert_eq!(compiled[0].interval_minutes, 5);
    }
}
