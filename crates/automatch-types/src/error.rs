//! Error types for the AutoMatch engine.
//!
//! All errors use the `AM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Deal errors
//! - 2xx: Criteria / source errors
//! - 3xx: Matching errors
//! - 4xx: Intake / candidate pool errors
//! - 5xx: Outreach errors
//! - 9xx: General errors (config, I/O, serialization)

use thiserror::Error;

use crate::{DealId, RequestId, RequestStatus, SourceId, SponsorId};

/// Central error enum for all AutoMatch operations.
#[derive(Debug, Error)]
pub enum AutomatchError {
    // =================================================================
    // Deal Errors (1xx)
    // =================================================================
    /// The deal failed validation (missing fields, bad values, etc.).
    #[error("AM_ERR_100: Invalid deal {deal}: {reason}")]
    InvalidDeal { deal: DealId, reason: String },

    /// The sponsor exceeded its AutoMatch runs for the current window.
    #[error("AM_ERR_101: Run limit exceeded for {sponsor}: {count} runs this window")]
    RunLimitExceeded { sponsor: SponsorId, count: usize },

    // =================================================================
    // Criteria Errors (2xx)
    // =================================================================
    /// A capital source's criteria are inconsistent or out of range.
    #[error("AM_ERR_200: Invalid criteria for {source_id}: {reason}")]
    InvalidCriteria { source_id: SourceId, reason: String },

    // =================================================================
    // Matching Errors (3xx)
    // =================================================================
    /// The sealed request's input hash does not match its contents.
    #[error("AM_ERR_300: Input hash mismatch for sealed request: expected {expected}, got {actual}")]
    InputHashMismatch { expected: String, actual: String },

    /// Recomputed run root differs from the one recorded on the run.
    #[error("AM_ERR_301: Determinism violation: expected {expected}, got {actual}")]
    DeterminismViolation { expected: String, actual: String },

    // =================================================================
    // Intake Errors (4xx)
    // =================================================================
    /// The same source was added to a candidate pool twice.
    #[error("AM_ERR_400: Candidate already in pool: {0}")]
    DuplicateCandidate(SourceId),

    /// The candidate pool is at capacity.
    #[error("AM_ERR_401: Candidate pool full ({capacity} candidates)")]
    PoolFull { capacity: usize },

    /// The candidate pool has already been sealed.
    #[error("AM_ERR_402: Candidate pool already sealed")]
    PoolAlreadySealed,

    /// The candidate pool must be sealed before it is drained.
    #[error("AM_ERR_403: Candidate pool not sealed")]
    PoolNotSealed,

    /// The same deal was added to a pipeline pool twice.
    #[error("AM_ERR_404: Deal already in pool: {0}")]
    DuplicateDeal(DealId),

    // =================================================================
    // Outreach Errors (5xx)
    // =================================================================
    /// A match request with this ID does not exist.
    #[error("AM_ERR_500: Match request not found: {0}")]
    RequestNotFound(RequestId),

    /// A live request for this (deal, source) pair already exists.
    #[error("AM_ERR_501: Match request already open for {deal} -> {source_id}")]
    DuplicateRequest { deal: DealId, source_id: SourceId },

    /// The deal already has the maximum number of pending requests.
    #[error("AM_ERR_502: Open request limit reached for {deal}: {limit}")]
    RequestLimitExceeded { deal: DealId, limit: usize },

    /// The request is not in a state that allows this transition.
    #[error("AM_ERR_503: Request {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: RequestId,
        from: RequestStatus,
        to: RequestStatus,
    },

    /// Only eligible results can be turned into match requests.
    #[error("AM_ERR_504: {source_id} is ineligible for {deal}")]
    IneligibleRequest { deal: DealId, source_id: SourceId },

    // =================================================================
    // General (9xx)
    // =================================================================
    /// Serialization / deserialization error.
    #[error("AM_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, out-of-range values, etc.).
    #[error("AM_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (reading config or input files).
    #[error("AM_ERR_903: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AutomatchError>;

impl From<std::io::Error> for AutomatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AutomatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CdeId;

    #[test]
    fn error_display_contains_prefix() {
        let err = AutomatchError::InvalidDeal {
            deal: DealId::new(),
            reason: "no programs".into(),
        };
        let msg = format!("{err}");
        assert!(msg.starts_with("AM_ERR_100"), "Got: {msg}");
        assert!(msg.contains("no programs"));
    }

    #[test]
    fn invalid_transition_display() {
        let err = AutomatchError::InvalidTransition {
            id: RequestId::new(),
            from: RequestStatus::Declined,
            to: RequestStatus::Accepted,
        };
        let msg = format!("{err}");
        assert!(msg.contains("AM_ERR_503"));
        assert!(msg.contains("DECLINED"));
        assert!(msg.contains("ACCEPTED"));
    }

    #[test]
    fn all_errors_have_am_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(AutomatchError::PoolAlreadySealed),
            Box::new(AutomatchError::PoolFull { capacity: 3 }),
            Box::new(AutomatchError::DuplicateCandidate(SourceId::Cde(CdeId::new()))),
            Box::new(AutomatchError::DuplicateDeal(DealId::new())),
            Box::new(AutomatchError::IneligibleRequest {
                deal: DealId::new(),
                source_id: SourceId::Cde(CdeId::new()),
            }),
            Box::new(AutomatchError::Configuration("test".into())),
            Box::new(AutomatchError::DeterminismViolation {
                expected: "a".into(),
                actual: "b".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("AM_ERR_"),
                "Error missing AM_ERR_ prefix: {msg}"
            );
        }
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AutomatchError = io.into();
        assert!(matches!(err, AutomatchError::Io(ref m) if m.contains("gone")));
    }
}
