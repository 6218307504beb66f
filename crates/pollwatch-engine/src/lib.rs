//! # pollwatch-engine
//!
//! One poll cycle, end to end: fetch each configured entity's metric,
//! evaluate it against the monitor's threshold table, decide whether to
//! notify, fan the alert out, persist state, and report the worst
//! severity seen as the process exit code. Invoked once per scheduler
//! tick; everything remembered between ticks lives in the state store.

pub mod driver;
pub mod fetcher;

pub use driver::{CycleReport, EntityOutcome, RunDriver};
pub use fetcher::{FetchError, JsonFileFetcher, MetricFetcher};
