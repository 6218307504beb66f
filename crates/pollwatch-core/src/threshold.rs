//! Threshold tables and severity evaluation.

#[cfg(test)]
#[path = "threshold_tests.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use crate::entity::MetricValue;
use crate::error::CoreError;
use crate::severity::Severity;

/// A closed-form comparison against a gauge value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Matches when `value >= bound`.
    AtLeast(f64),
    /// Matches when `value > bound`.
    Above(f64),
}

impl Predicate {
    pub fn matches(&self, value: f64) -> bool {
        match self {
            Predicate::AtLeast(bound) => value >= *bound,
            Predicate::Above(bound) => value > *bound,
        }
    }

    fn bound(&self) -> f64 {
        match self {
            Predicate::AtLeast(bound) | Predicate::Above(bound) => *bound,
        }
    }
}

/// One severity tier of a threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub severity: Severity,
    pub predicate: Predicate,
}

impl ThresholdRule {
    pub fn new(severity: Severity, predicate: Predicate) -> Self {
        Self {
            severity,
            predicate,
        }
    }
}

/// A validated, immutable mapping from gauge values to severities.
///
/// Rules are held sorted highest-severity-first so that evaluation
/// returns the most severe matching tier. A value satisfying both the
/// WARNING and CRITICAL predicates resolves to CRITICAL, never to the
/// weaker match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    rules: Vec<ThresholdRule>,
}

impl ThresholdTable {
    /// Build a table from rules, validating at load time.
    ///
    /// Rejects empty tables, rules for OK, duplicate severities,
    /// non-finite bounds and bounds that do not grow with severity.
    /// Evaluation itself is then infallible.
    pub fn new(mut rules: Vec<ThresholdRule>) -> Result<Self, CoreError> {
        if rules.is_empty() {
            return Err(CoreError::EmptyThresholdTable);
        }
        for rule in &rules {
            if rule.severity == Severity::Ok {
                return Err(CoreError::ThresholdForOk);
            }
            if !rule.predicate.bound().is_finite() {
                return Err(CoreError::NonFiniteBound(rule.severity));
            }
        }

        // Sort ascending to check monotonicity, then flip for evaluation.
        rules.sort_by_key(|r| r.severity);
        for pair in rules.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            if lower.severity == higher.severity {
                return Err(CoreError::DuplicateSeverity(lower.severity));
            }
            if higher.predicate.bound() <= lower.predicate.bound() {
                return Err(CoreError::NonMonotonicBounds {
                    lower: lower.severity,
                    higher: higher.severity,
                });
            }
        }
        rules.reverse();

        Ok(Self { rules })
    }

    /// Rules in evaluation order (highest severity first).
    pub fn rules(&self) -> &[ThresholdRule] {
        &self.rules
    }

    /// Map a metric value to a severity.
    ///
    /// Hard-failure states (disabled, not found, not responding) are
    /// CRITICAL regardless of the numeric tiers. Gauges walk the table
    /// from CRITICAL down; the first match wins, and no match is OK.
    ///
    /// Pure and deterministic; safe to share across tasks.
    pub fn evaluate(&self, value: &MetricValue) -> Severity {
        match value {
            MetricValue::Failed(_) => Severity::Critical,
            MetricValue::Gauge(v) => self
                .rules
                .iter()
                .find(|rule| rule.predicate.matches(*v))
                .map(|rule| rule.severity)
                .unwrap_or(Severity::Ok),
        }
    }
}
