//! Content fetcher applying the rate-limit retry policy.

use std::thread;

use log::{info, warn};

use crate::domain::{AppError, ContentEntry, ResponseKind, RetryDecision, decide};
use crate::ports::{ContentApi, ContentRequest};

/// Fetches repository content for the configured repository.
///
/// Each call blocks until the request and its bounded retry resolve.
pub struct ContentFetcher<C: ContentApi> {
    api: C,
}

impl<C: ContentApi> ContentFetcher<C> {
    pub fn new(api: C) -> Self {
        Self { api }
    }

    pub fn fetch(&self, path: &str, revision: Option<&str>) -> Result<ContentEntry, AppError> {
        let request = ContentRequest::new(path, revision);
        let mut attempt = 1;

        loop {
            let error = match self.api.get_content(&request) {
                Ok(entry) => return Ok(entry),
                Err(error) => error,
            };

            let kind = ResponseKind::classify(&error);
            match kind {
                ResponseKind::QuotaExhausted { .. } => {
                    warn!("Request quota exhausted for request GET {}", path)
                }
                ResponseKind::AbuseDetected => warn!("Abuse detected for request GET {}", path),
                ResponseKind::Other => {}
            }

            match decide(attempt, kind) {
                RetryDecision::Retry(wait) => {
                    info!("Retrying after {} seconds!", wait.as_secs());
                    thread::sleep(wait);
                    attempt += 1;
                }
                RetryDecision::Abort => return Err(AppError::fetch_failure(path, revision, error)),
            }
        }
    }
}
