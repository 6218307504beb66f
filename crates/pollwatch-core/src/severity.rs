//! Alert severity levels.

use serde::{Deserialize, Serialize};

/// Alert severity level, ordered from healthy to critical.
///
/// The derived `Ord` drives escalation/de-escalation logic and the
/// process exit code contract (0/1/2/3).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Everything healthy.
    #[default]
    Ok,
    /// Worth watching.
    Warning,
    /// Needs prompt attention.
    High,
    /// Incident in progress.
    Critical,
}

impl Severity {
    /// Process exit code for this severity (0/1/2/3).
    pub fn exit_code(&self) -> i32 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::High => 2,
            Severity::Critical => 3,
        }
    }

    /// Get emoji for severity.
    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Ok => "\u{2705}",
            Severity::Warning => "\u{26a0}\u{fe0f}",
            Severity::High => "\u{274c}",
            Severity::Critical => "\u{1f6a8}",
        }
    }

    /// Get color for Slack/Teams attachments.
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Ok => "#36a64f",      // green
            Severity::Warning => "#f0ad4e", // yellow
            Severity::High => "#d9534f",    // red
            Severity::Critical => "#800000", // dark red
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Ok => write!(f, "OK"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Ok < Severity::Warning);
        assert!(Severity::Warning < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Severity::Ok.exit_code(), 0);
        assert_eq!(Severity::Warning.exit_code(), 1);
        assert_eq!(Severity::High.exit_code(), 2);
        assert_eq!(Severity::Critical.exit_code(), 3);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Ok.to_string(), "OK");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::High.to_string(), "HIGH");
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn test_severity_serde_roundtrip() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, "\"high\"");
        let back: Severity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Severity::High);
    }
}
