//! Core errors.

use thiserror::Error;

use crate::severity::Severity;

/// Errors raised when compiling a threshold table from configuration.
///
/// All of these are fatal at startup: the engine never runs with an
/// ambiguous threshold table.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Threshold table has no rules.
    #[error("threshold table is empty")]
    EmptyThresholdTable,

    /// A rule was configured for the OK level. OK is the fall-through
    /// when nothing matches, never a rule of its own.
    #[error("threshold rule for OK is not allowed; OK is the default when no rule matches")]
    ThresholdForOk,

    /// Two rules claim the same severity.
    #[error("duplicate threshold rule for severity {0}")]
    DuplicateSeverity(Severity),

    /// A rule bound is NaN or infinite, which would swallow the entire
    /// value domain and make OK unreachable.
    #[error("threshold bound for severity {0} must be finite")]
    NonFiniteBound(Severity),

    /// Bounds must grow with severity; otherwise a higher severity is
    /// shadowed or a lower one covers the whole domain.
    #[error("threshold bound for {higher} must be above the bound for {lower}")]
    NonMonotonicBounds { lower: Severity, higher: Severity },
}
