//! Tests for alert formatting and the dispatcher.

use std::collections::BTreeMap;

use pollwatch_core::Severity;

use super::*;
use crate::config::{ChannelsConfig, EmailConfig};
use crate::dispatcher::Dispatcher;

#[test]
fn test_alert_new() {
    let alert = Alert::new("Queue failures", "5 failed jobs", Severity::Warning);
    assert_eq!(alert.title, "Queue failures");
    assert_eq!(alert.severity, Severity::Warning);
    assert!(alert.entity.is_none());
}

#[test]
fn test_alert_format_text() {
    let mut metadata = BTreeMap::new();
    metadata.insert("workspace".to_string(), "Main Review".to_string());

    let alert = Alert::new("Agent stale", "No activity for 125 minutes", Severity::Critical)
        .with_entity("agent-health/telemetry-agent")
        .with_metadata(metadata);

    let text = alert.format_text();
    assert!(text.contains("[CRITICAL]"));
    assert!(text.contains("Agent stale"));
    assert!(text.contains("No activity for 125 minutes"));
    assert!(text.contains("Entity: agent-health/telemetry-agent"));
    assert!(text.contains("workspace: Main Review"));
}

#[test]
fn test_alert_format_markdown() {
    let alert = Alert::new("Recovered", "Back to normal", Severity::Ok)
        .with_entity("api-health/nia");

    let md = alert.format_markdown();
    assert!(md.contains("**Recovered**"));
    assert!(md.contains("Back to normal"));
    assert!(md.contains("_Entity: api-health/nia_"));
}

#[tokio::test]
async fn test_log_channel_never_fails() {
    let channel = LogChannel;
    let alert = Alert::new("Test", "Test message", Severity::High);
    assert!(channel.send(&alert).await.is_ok());
}

#[tokio::test]
async fn test_dispatcher_send_log_only() {
    let dispatcher = Dispatcher::new();
    let alert = Alert::new("Test", "Test message", Severity::Ok);

    let errors = dispatcher.send(&alert).await;
    assert!(errors.is_empty());
}

#[test]
fn test_dispatcher_from_config() {
    let config = ChannelsConfig {
        slack_webhook: Some("https://hooks.slack.com/test".to_string()),
        pagerduty_routing_key: Some("routing-key".to_string()),
        teams_webhook: Some("https://outlook.office.com/webhook/test".to_string()),
        webhook_url: Some("https://example.com/hook".to_string()),
        email: Some(EmailConfig {
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            from: "alerts@example.com".to_string(),
            to: vec!["oncall@example.com".to_string()],
            username: None,
            password: None,
        }),
    };

    let dispatcher = Dispatcher::from_config(&config);
    let names = dispatcher.channel_names();

    assert!(names.contains(&"log"));
    assert!(names.contains(&"slack"));
    assert!(names.contains(&"pagerduty"));
    assert!(names.contains(&"teams"));
    assert!(names.contains(&"webhook"));
    assert!(names.contains(&"email"));
}

#[test]
fn test_dispatcher_empty_strings_disable_channels() {
    let config = ChannelsConfig {
        slack_webhook: Some(String::new()),
        ..Default::default()
    };

    let dispatcher = Dispatcher::from_config(&config);
    assert_eq!(dispatcher.channel_names(), vec!["log"]);
}
