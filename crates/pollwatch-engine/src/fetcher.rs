//! The metric fetcher seam.
//!
//! Vendor REST clients (agent status queries, job queue listings, audit
//! log counters) plug in behind this trait. The engine only sees typed
//! samples or a fetch error.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use pollwatch_core::{MetricSample, MonitoredEntity};
use serde::Deserialize;
use thiserror::Error;

/// Failure to observe a metric. Recoverable: the entity's persisted
/// severity history is left untouched, but the failure itself is
/// alerted as CRITICAL-equivalent. A monitoring system that cannot see
/// its target is itself an incident.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetch exceeded the configured deadline.
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    /// Could not authenticate against the metric source.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Network-level failure reaching the metric source.
    #[error("transport error: {0}")]
    Transport(String),

    /// The source answered with something unparseable.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Retrieves the current metric sample for an entity.
#[async_trait]
pub trait MetricFetcher: Send + Sync {
    async fn fetch(&self, entity: &MonitoredEntity) -> Result<MetricSample, FetchError>;
}

/// Sample value as written in a samples document: a bare number, or a
/// hard-failure marker.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SampleSpec {
    Gauge(f64),
    Failed { failed: String },
}

/// Fetcher backed by a JSON document mapping entity id to value:
///
/// ```json
/// { "telemetry-agent": 42.0, "billing-agent": { "failed": "agent disabled" } }
/// ```
///
/// The CLI uses this to evaluate pre-collected samples and to validate
/// configuration in dry runs; deployments with live metric sources
/// inject their own [`MetricFetcher`].
#[derive(Debug)]
pub struct JsonFileFetcher {
    samples: HashMap<String, SampleSpec>,
}

impl JsonFileFetcher {
    pub async fn load(path: &Path) -> Result<Self, FetchError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FetchError::Transport(format!("{}: {}", path.display(), e)))?;
        let samples = serde_json::from_str(&content)
            .map_err(|e| FetchError::Malformed(format!("{}: {}", path.display(), e)))?;
        Ok(Self { samples })
    }
}

#[async_trait]
impl MetricFetcher for JsonFileFetcher {
    async fn fetch(&self, entity: &MonitoredEntity) -> Result<MetricSample, FetchError> {
        match self.samples.get(&entity.id) {
            Some(SampleSpec::Gauge(v)) => Ok(MetricSample::gauge(&entity.id, *v)),
            Some(SampleSpec::Failed { failed }) => {
                Ok(MetricSample::failed(&entity.id, failed.clone()))
            }
            None => Err(FetchError::Transport(format!(
                "no sample for entity '{}'",
                entity.id
            ))),
        }
    }
}
