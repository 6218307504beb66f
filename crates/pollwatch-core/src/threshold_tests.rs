//! Tests for threshold table validation and evaluation.

use super::*;
use crate::entity::MetricValue;
use crate::error::CoreError;
use crate::severity::Severity;

fn staleness_table() -> ThresholdTable {
    // Telemetry agent activity tiers: 30/60/120 minutes.
    ThresholdTable::new(vec![
        ThresholdRule::new(Severity::Warning, Predicate::AtLeast(30.0)),
        ThresholdRule::new(Severity::High, Predicate::AtLeast(60.0)),
        ThresholdRule::new(Severity::Critical, Predicate::Above(120.0)),
    ])
    .unwrap()
}

#[test]
fn test_evaluate_tiers() {
    let table = staleness_table();
    assert_eq!(table.evaluate(&MetricValue::Gauge(5.0)), Severity::Ok);
    assert_eq!(table.evaluate(&MetricValue::Gauge(30.0)), Severity::Warning);
    assert_eq!(table.evaluate(&MetricValue::Gauge(59.9)), Severity::Warning);
    assert_eq!(table.evaluate(&MetricValue::Gauge(60.0)), Severity::High);
    assert_eq!(table.evaluate(&MetricValue::Gauge(120.0)), Severity::High);
    assert_eq!(table.evaluate(&MetricValue::Gauge(125.0)), Severity::Critical);
}

#[test]
fn test_stale_telemetry_agent_is_critical() {
    // 125 minutes since last activity against the documented 30/60/120 tiers.
    let table = staleness_table();
    let severity = table.evaluate(&MetricValue::Gauge(125.0));
    assert_eq!(severity, Severity::Critical);
    assert_eq!(severity.exit_code(), 3);
}

#[test]
fn test_failed_state_short_circuits_numeric_table() {
    let table = staleness_table();
    // Disabled agent is CRITICAL no matter what the tiers say.
    assert_eq!(
        table.evaluate(&MetricValue::Failed("agent disabled".into())),
        Severity::Critical
    );
    assert_eq!(
        table.evaluate(&MetricValue::Failed("agent not found".into())),
        Severity::Critical
    );
}

#[test]
fn test_highest_match_wins() {
    let table = staleness_table();
    // 500 satisfies every predicate in the table; the most severe wins.
    assert_eq!(table.evaluate(&MetricValue::Gauge(500.0)), Severity::Critical);
}

#[test]
fn test_evaluate_is_deterministic() {
    // Sweep a grid of bounds and values; repeated evaluation of the same
    // input always agrees, and the result is the highest matching tier.
    for warn in [1.0, 5.0, 30.0] {
        for step in [1.0, 10.0, 25.0] {
            let table = ThresholdTable::new(vec![
                ThresholdRule::new(Severity::Warning, Predicate::AtLeast(warn)),
                ThresholdRule::new(Severity::High, Predicate::AtLeast(warn + step)),
                ThresholdRule::new(Severity::Critical, Predicate::AtLeast(warn + 2.0 * step)),
            ])
            .unwrap();

            let mut v = -2.0;
            while v < warn + 3.0 * step {
                let value = MetricValue::Gauge(v);
                let first = table.evaluate(&value);
                assert_eq!(first, table.evaluate(&value));

                let expected = if v >= warn + 2.0 * step {
                    Severity::Critical
                } else if v >= warn + step {
                    Severity::High
                } else if v >= warn {
                    Severity::Warning
                } else {
                    Severity::Ok
                };
                assert_eq!(first, expected, "value {v}, warn {warn}, step {step}");
                v += 0.7;
            }
        }
    }
}

#[test]
fn test_single_rule_table() {
    let table = ThresholdTable::new(vec![ThresholdRule::new(
        Severity::Critical,
        Predicate::AtLeast(50.0),
    )])
    .unwrap();
    assert_eq!(table.evaluate(&MetricValue::Gauge(49.0)), Severity::Ok);
    assert_eq!(table.evaluate(&MetricValue::Gauge(50.0)), Severity::Critical);
}

#[test]
fn test_empty_table_rejected() {
    let err = ThresholdTable::new(vec![]).unwrap_err();
    assert!(matches!(err, CoreError::EmptyThresholdTable));
}

#[test]
fn test_ok_rule_rejected() {
    let err = ThresholdTable::new(vec![ThresholdRule::new(
        Severity::Ok,
        Predicate::AtLeast(0.0),
    )])
    .unwrap_err();
    assert!(matches!(err, CoreError::ThresholdForOk));
}

#[test]
fn test_duplicate_severity_rejected() {
    let err = ThresholdTable::new(vec![
        ThresholdRule::new(Severity::High, Predicate::AtLeast(10.0)),
        ThresholdRule::new(Severity::High, Predicate::AtLeast(20.0)),
    ])
    .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateSeverity(Severity::High)));
}

#[test]
fn test_non_finite_bound_rejected() {
    let err = ThresholdTable::new(vec![ThresholdRule::new(
        Severity::Warning,
        Predicate::AtLeast(f64::NEG_INFINITY),
    )])
    .unwrap_err();
    assert!(matches!(err, CoreError::NonFiniteBound(Severity::Warning)));

    let err = ThresholdTable::new(vec![ThresholdRule::new(
        Severity::Critical,
        Predicate::Above(f64::NAN),
    )])
    .unwrap_err();
    assert!(matches!(err, CoreError::NonFiniteBound(Severity::Critical)));
}

#[test]
fn test_non_monotonic_bounds_rejected() {
    // WARNING at 60 but CRITICAL at 30 would shadow CRITICAL entirely
    // under lowest-first reading; reject instead of guessing.
    let err = ThresholdTable::new(vec![
        ThresholdRule::new(Severity::Warning, Predicate::AtLeast(60.0)),
        ThresholdRule::new(Severity::Critical, Predicate::AtLeast(30.0)),
    ])
    .unwrap_err();
    assert!(matches!(
        err,
        CoreError::NonMonotonicBounds {
            lower: Severity::Warning,
            higher: Severity::Critical,
        }
    ));
}

#[test]
fn test_rules_sorted_highest_first() {
    let table = staleness_table();
    let severities: Vec<Severity> = table.rules().iter().map(|r| r.severity).collect();
    assert_eq!(
        severities,
        vec![Severity::Critical, Severity::High, Severity::Warning]
    );
}
