//! The run driver: one full poll cycle.

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pollwatch_config::CompiledMonitor;
use pollwatch_core::{
    decide, DecisionReason, MetricSample, MetricValue, MonitoredEntity, Severity,
};
use pollwatch_notify::{Alert, Dispatcher};
use pollwatch_state::StateStore;
use tracing::{debug, error, info, warn};

use crate::fetcher::{FetchError, MetricFetcher};

/// What happened to one entity during a cycle.
#[derive(Debug, Clone)]
pub struct EntityOutcome {
    pub entity: MonitoredEntity,
    /// Evaluated severity, or CRITICAL-equivalent for fetch failures.
    pub severity: Severity,
    pub notified: bool,
    pub reason: Option<DecisionReason>,
    pub fetch_error: Option<String>,
    /// The state store failed for this entity; duplicate suppression is
    /// degraded and the cycle exit code is forced to CRITICAL.
    pub state_degraded: bool,
}

/// Everything that happened during one `run_once`.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub outcomes: Vec<EntityOutcome>,
}

impl CycleReport {
    /// Worst severity observed this cycle. Fetch errors and state store
    /// degradation both count as CRITICAL.
    pub fn max_severity(&self) -> Severity {
        self.outcomes
            .iter()
            .map(|o| {
                if o.fetch_error.is_some() || o.state_degraded {
                    Severity::Critical
                } else {
                    o.severity
                }
            })
            .max()
            .unwrap_or(Severity::Ok)
    }

    /// Process exit code: 0/1/2/3 for the worst severity observed.
    pub fn exit_code(&self) -> i32 {
        self.max_severity().exit_code()
    }
}

/// Drives one poll cycle over all configured monitors.
///
/// Fully explicit construction: monitors, fetcher, store and dispatcher
/// are injected; there is no ambient configuration. Per-entity errors
/// are isolated; one entity's failure never aborts the rest of the
/// cycle.
pub struct RunDriver {
    monitors: Vec<CompiledMonitor>,
    fetcher: Arc<dyn MetricFetcher>,
    store: Arc<dyn StateStore>,
    dispatcher: Dispatcher,
    fetch_timeout: Duration,
    dry_run: bool,
}

impl RunDriver {
    pub fn new(
        monitors: Vec<CompiledMonitor>,
        fetcher: Arc<dyn MetricFetcher>,
        store: Arc<dyn StateStore>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            monitors,
            fetcher,
            store,
            dispatcher,
            fetch_timeout: Duration::from_secs(30),
            dry_run: false,
        }
    }

    /// Bound each metric fetch. A hung call becomes a fetch error
    /// instead of stalling the cycle.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Evaluate and log decisions without dispatching notifications or
    /// writing state. Operators use this to validate configuration.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run one full poll cycle and report per-entity outcomes.
    pub async fn run_once(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for monitor in &self.monitors {
            for entity in &monitor.entities {
                let outcome = self.poll_entity(monitor, entity).await;
                report.outcomes.push(outcome);
            }
        }

        info!(
            "Cycle complete: {} entities, max severity {}",
            report.outcomes.len(),
            report.max_severity()
        );
        report
    }

    async fn poll_entity(
        &self,
        monitor: &CompiledMonitor,
        entity: &MonitoredEntity,
    ) -> EntityOutcome {
        let sample = match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(entity))
            .await
        {
            Ok(Ok(sample)) => sample,
            Ok(Err(fetch_err)) => return self.handle_fetch_error(entity, fetch_err).await,
            Err(_) => {
                return self
                    .handle_fetch_error(entity, FetchError::Timeout(self.fetch_timeout))
                    .await
            }
        };

        let severity = monitor.thresholds.evaluate(&sample.value);
        debug!(
            "{}: value {:?} evaluated to {}",
            entity, sample.value, severity
        );

        // A failed read degrades to never-seen: better to over-alert
        // than silently miss an incident because state is unreadable.
        let mut state_degraded = false;
        let prior = match self.store.get(&entity.state_key()).await {
            Ok(prior) => prior,
            Err(e) => {
                error!("state store degraded: failed to read '{}': {}", entity, e);
                state_degraded = true;
                None
            }
        };

        let decision = decide(severity, prior.as_ref(), Utc::now());
        debug!(
            "{}: {} -> notify={} ({})",
            entity, severity, decision.notify, decision.reason
        );

        if decision.notify {
            let alert = Self::build_alert(entity, &sample, severity, decision.reason);
            if self.dry_run {
                info!(
                    "DRY RUN: would send {} alert for {}: {} ({})",
                    severity, entity, alert.message, decision.reason
                );
            } else {
                // Channel failures are already logged by the dispatcher
                // and must not affect the cycle.
                let _ = self.dispatcher.send(&alert).await;
            }
        }

        if !self.dry_run {
            if let Err(e) = self.store.put(&entity.state_key(), &decision.state).await {
                error!("state store degraded: failed to write '{}': {}", entity, e);
                state_degraded = true;
            }
        }

        EntityOutcome {
            entity: entity.clone(),
            severity,
            notified: decision.notify,
            reason: Some(decision.reason),
            fetch_error: None,
            state_degraded,
        }
    }

    /// Fetch failures are alerted as CRITICAL-equivalent but never
    /// persisted: once connectivity resumes, the engine compares
    /// against the last real severity, not the outage.
    async fn handle_fetch_error(
        &self,
        entity: &MonitoredEntity,
        fetch_err: FetchError,
    ) -> EntityOutcome {
        warn!("{}: metric fetch failed: {}", entity, fetch_err);

        let alert = Alert::new(
            format!("Cannot observe {}", entity),
            format!("Metric fetch failed: {}", fetch_err),
            Severity::Critical,
        )
        .with_entity(entity.to_string());

        if self.dry_run {
            info!(
                "DRY RUN: would send CRITICAL fetch-failure alert for {}",
                entity
            );
        } else {
            let _ = self.dispatcher.send(&alert).await;
        }

        EntityOutcome {
            entity: entity.clone(),
            severity: Severity::Critical,
            notified: true,
            reason: None,
            fetch_error: Some(fetch_err.to_string()),
            state_degraded: false,
        }
    }

    fn build_alert(
        entity: &MonitoredEntity,
        sample: &MetricSample,
        severity: Severity,
        reason: DecisionReason,
    ) -> Alert {
        let (title, message) = match (&sample.value, reason) {
            (_, DecisionReason::Recovered) => (
                format!("{} recovered", entity),
                "Condition cleared, back to OK".to_string(),
            ),
            (MetricValue::Failed(why), _) => {
                (format!("{} is {}", entity, severity), why.clone())
            }
            (MetricValue::Gauge(v), _) => (
                format!("{} is {}", entity, severity),
                format!("Metric value {} crossed the {} threshold", v, severity),
            ),
        };

        Alert::new(title, message, severity)
            .with_entity(entity.to_string())
            .with_metadata(sample.metadata.clone())
    }
}
