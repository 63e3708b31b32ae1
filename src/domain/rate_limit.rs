//! Rate-limit retry policy for content requests.

use std::time::Duration;

use crate::domain::FetchError;

/// Number of automatic retries allowed after a quota-exhausted response.
pub const MAX_QUOTA_RETRIES: u32 = 1;

/// How the remote answered a failed attempt, as far as the policy cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    QuotaExhausted { retry_after: Duration },
    AbuseDetected,
    Other,
}

impl ResponseKind {
    pub fn classify(error: &FetchError) -> Self {
        match error {
            FetchError::QuotaExhausted { retry_after } => {
                ResponseKind::QuotaExhausted { retry_after: *retry_after }
            }
            FetchError::AbuseDetected { .. } => ResponseKind::AbuseDetected,
            _ => ResponseKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry(Duration),
    Abort,
}

/// Decide whether the attempt that just failed should be retried.
///
/// `attempt` is 1-based. Quota exhaustion is retried once after the advised
/// wait; abuse detection and everything else abort immediately.
pub fn decide(attempt: u32, kind: ResponseKind) -> RetryDecision {
    match kind {
        ResponseKind::QuotaExhausted { retry_after } if attempt <= MAX_QUOTA_RETRIES => {
            RetryDecision::Retry(retry_after)
        }
        ResponseKind::QuotaExhausted { .. } | ResponseKind::AbuseDetected | ResponseKind::Other => {
            RetryDecision::Abort
        }
    }
}
