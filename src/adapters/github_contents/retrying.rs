//! Retry wrapper for network faults on content requests.
//!
//! Contents requests are idempotent GETs, so connection failures, timeouts,
//! and 5xx responses are re-attempted here. Rate-limit and client errors pass
//! straight through to the caller's policy.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::warn;

use crate::domain::{ContentEntry, FetchError, LoaderConfig};
use crate::ports::{ContentApi, ContentRequest};

const DEFAULT_BASE_DELAY_MS: u64 = 500;
const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
const MAX_LOG_ERROR_CHARS: usize = 512;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms: base_delay_ms.max(1),
            max_delay_ms: max_delay_ms.max(base_delay_ms),
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(config.transport_retries, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_DELAY_MS)
    }

    fn delay_for_retry(&self, failed_attempt: u32) -> Duration {
        // attempt=1 -> base, attempt=2 -> base*2, attempt=3 -> base*4, capped.
        let exponent = failed_attempt.saturating_sub(1).min(6);
        let multiplier = 1_u64 << exponent;
        let backoff_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        let jitter_ms = compute_jitter_ms(backoff_ms);
        Duration::from_millis(backoff_ms.saturating_add(jitter_ms).min(self.max_delay_ms))
    }
}

pub struct RetryingContentClient<C: ContentApi> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: ContentApi> RetryingContentClient<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<C: ContentApi> ContentApi for RetryingContentClient<C> {
    fn get_content(&self, request: &ContentRequest) -> Result<ContentEntry, FetchError> {
        let mut attempt = 1;
        loop {
            match self.inner.get_content(request) {
                Ok(entry) => return Ok(entry),
                Err(error) => {
                    if !error.is_transient() || attempt >= self.policy.max_attempts {
                        return Err(error);
                    }

                    let delay = self.policy.delay_for_retry(attempt);
                    warn!(
                        "GET {} failed (attempt {}/{}): {}. Retrying in {} ms.",
                        request.path,
                        attempt,
                        self.policy.max_attempts,
                        sanitize_and_truncate_for_log(&error.to_string()),
                        delay.as_millis()
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

fn compute_jitter_ms(backoff_ms: u64) -> u64 {
    let jitter_cap = backoff_ms / 4; // 25% jitter upper bound
    if jitter_cap == 0 {
        return 0;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.subsec_nanos() as u64)
        .unwrap_or(0);

    nanos % jitter_cap
}

fn sanitize_and_truncate_for_log(input: &str) -> String {
    let mut output: String = input
        .chars()
        .take(MAX_LOG_ERROR_CHARS)
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if input.chars().count() > MAX_LOG_ERROR_CHARS {
        output.push_str(" [truncated]");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeContentApi, ScriptedResponse};

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy { max_attempts, base_delay_ms: 1, max_delay_ms: 2 }
    }

    fn server_error() -> ScriptedResponse {
        Err(FetchError::Status { status: 502, message: "bad gateway".into() })
    }

    #[test]
    fn retries_transient_failures_and_succeeds() {
        let api = FakeContentApi::new().script(
            "groups",
            vec![
                server_error(),
                Err(FetchError::Transport("connection reset".into())),
                Ok(ContentEntry::Directory(vec![])),
            ],
        );
        let client = RetryingContentClient::new(api.clone(), policy(3));

        let entry = client.get_content(&ContentRequest::new("groups", None)).unwrap();
        assert_eq!(entry, ContentEntry::Directory(vec![]));
        assert_eq!(api.request_count(), 3);
    }

    #[test]
    fn stops_after_max_attempts() {
        let api = FakeContentApi::new()
            .script("groups", vec![server_error(), server_error(), server_error(), server_error()]);
        let client = RetryingContentClient::new(api.clone(), policy(3));

        let err = client.get_content(&ContentRequest::new("groups", None)).unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 502, .. }));
        assert_eq!(api.request_count(), 3);
    }

    #[test]
    fn does_not_retry_rate_limits_or_client_errors() {
        for error in [
            FetchError::QuotaExhausted { retry_after: Duration::ZERO },
            FetchError::AbuseDetected { message: "slow down".into() },
            FetchError::Status { status: 404, message: "Not Found".into() },
        ] {
            let api = FakeContentApi::new().script("groups", vec![Err(error)]);
            let client = RetryingContentClient::new(api.clone(), policy(3));

            assert!(client.get_content(&ContentRequest::new("groups", None)).is_err());
            assert_eq!(api.request_count(), 1);
        }
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy::new(5, 10, 25);
        assert!(policy.delay_for_retry(1) <= Duration::from_millis(25));
        assert_eq!(policy.delay_for_retry(6), Duration::from_millis(25));
    }

    #[test]
    fn log_format_sanitizes_control_characters() {
        let formatted = sanitize_and_truncate_for_log("bad\nerror\twith\rcontrols");
        assert_eq!(formatted, "bad error with controls");
    }
}
