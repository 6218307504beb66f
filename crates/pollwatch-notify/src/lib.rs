//! # pollwatch-notify
//!
//! Alert fan-out. One alert goes to every enabled channel; a channel
//! failure is logged and never blocks the others. Payloads use each
//! service's native webhook schema (Slack attachments, PagerDuty
//! Events v2, Teams MessageCard, generic JSON webhook).

pub mod alerts;
pub mod channels;
pub mod config;
pub mod dispatcher;
pub mod error;

pub use alerts::{Alert, AlertChannel, LogChannel};
pub use channels::{EmailChannel, PagerDutyChannel, SlackChannel, TeamsChannel, WebhookChannel};
pub use config::{ChannelsConfig, EmailConfig};
pub use dispatcher::Dispatcher;
pub use error::NotifyError;
