//! Alert decision engine: when does a severity change become a
//! notification?

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// Persisted alerting state for one entity.
///
/// Created on first observation, updated after every decision, never
/// deleted. Survives process restarts; this is what makes repeated
/// one-minute cron invocations stateful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertState {
    /// Severity recorded by the most recent completed evaluation.
    pub last_severity: Severity,
    /// When a notification was last sent for this entity. `None` iff no
    /// notification has ever been sent.
    pub last_notified_at: Option<DateTime<Utc>>,
    /// How many consecutive polls have seen this same severity.
    #[serde(default)]
    pub repeat_count: u32,
}

/// Why a decision went the way it did. Logged verbatim in verbose mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// First poll ever and the entity is healthy.
    FirstObservationClean,
    /// First poll ever already found a problem.
    FirstObservationAbnormal,
    /// Severity rose. Escalation is never suppressed.
    Escalated,
    /// Same abnormal severity as last poll; re-notified every cycle
    /// while the condition persists.
    Repeated,
    /// Severity dropped but the entity is still abnormal.
    StillAbnormal,
    /// Back to OK after an abnormal stretch; the one recovery notice.
    Recovered,
    /// Healthy last poll, healthy now.
    StillOk,
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DecisionReason::FirstObservationClean => "first observation, clean",
            DecisionReason::FirstObservationAbnormal => "first observation, abnormal",
            DecisionReason::Escalated => "severity escalated",
            DecisionReason::Repeated => "abnormal severity repeated",
            DecisionReason::StillAbnormal => "de-escalated but still abnormal",
            DecisionReason::Recovered => "recovered to OK",
            DecisionReason::StillOk => "still OK",
        };
        f.write_str(s)
    }
}

/// Outcome of one decision: whether to notify, and the state to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub notify: bool,
    pub reason: DecisionReason,
    pub state: AlertState,
}

/// Decide whether a freshly evaluated severity warrants a notification.
///
/// Rules, in order:
/// 1. never-seen entity: notify iff abnormal;
/// 2. severity increased: always notify;
/// 3. unchanged and abnormal: notify again (no debounce);
/// 4. dropped to OK from abnormal: notify once as recovery;
/// 5. unchanged at OK: stay silent.
/// A drop that is still abnormal (CRITICAL to WARNING) notifies: the
/// condition persists even though it softened.
///
/// The returned state always carries `last_severity = new_severity`;
/// `last_notified_at` moves to `now` only when notifying, and the repeat
/// counter increments on unchanged severity and resets otherwise.
pub fn decide(
    new_severity: Severity,
    prior: Option<&AlertState>,
    now: DateTime<Utc>,
) -> Decision {
    let (notify, reason, repeat_count) = match prior {
        None => {
            if new_severity > Severity::Ok {
                (true, DecisionReason::FirstObservationAbnormal, 0)
            } else {
                (false, DecisionReason::FirstObservationClean, 0)
            }
        }
        Some(prior) => {
            if new_severity > prior.last_severity {
                (true, DecisionReason::Escalated, 0)
            } else if new_severity == prior.last_severity {
                if new_severity == Severity::Ok {
                    (false, DecisionReason::StillOk, prior.repeat_count + 1)
                } else {
                    (true, DecisionReason::Repeated, prior.repeat_count + 1)
                }
            } else if new_severity == Severity::Ok {
                (true, DecisionReason::Recovered, 0)
            } else {
                (true, DecisionReason::StillAbnormal, 0)
            }
        }
    };

    let last_notified_at = if notify {
        Some(now)
    } else {
        prior.and_then(|p| p.last_notified_at)
    };

    Decision {
        notify,
        reason,
        state: AlertState {
            last_severity: new_severity,
            last_notified_at,
            repeat_count,
        },
    }
}
