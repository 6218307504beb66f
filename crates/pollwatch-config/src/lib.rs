//! # pollwatch-config
//!
//! TOML configuration: which entities to watch, their threshold tables,
//! and which notification channels are enabled. Threshold tables are
//! compiled and validated at load time so a misconfigured monitor never
//! starts polling.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{CompiledMonitor, Config, MonitorConfig, ThresholdRuleConfig};
