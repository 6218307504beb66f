//! # pollwatch-core
//!
//! The pure heart of pollwatch: severity ordering, threshold evaluation
//! and the alert decision engine. Nothing in this crate performs I/O;
//! fetching metrics, persisting state and dispatching notifications live
//! in the sibling crates and are injected at the seams.

pub mod decision;
pub mod entity;
pub mod error;
pub mod severity;
pub mod threshold;

pub use decision::{decide, AlertState, Decision, DecisionReason};
pub use entity::{MetricSample, MetricValue, MonitorType, MonitoredEntity};
pub use error::CoreError;
pub use severity::Severity;
pub use threshold::{Predicate, ThresholdRule, ThresholdTable};
