//! GitHub contents API client implementation using reqwest.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, RETRY_AFTER};
use serde::Deserialize;
use url::Url;

use crate::domain::{
    AppError, ContentEntry, Credentials, DirectoryEntry, EntryKind, FetchError, LoaderConfig,
    RemoteFile,
};
use crate::ports::{ContentApi, ContentRequest};

const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATELIMIT_RESET: &str = "x-ratelimit-reset";
const DEFAULT_QUOTA_WAIT_SECS: u64 = 60;
const DEFAULT_STATUS_MESSAGE: &str = "GitHub API request failed";

/// HTTP transport for the repository contents endpoint.
///
/// This client performs a single request per call. Network-fault retries and
/// rate-limit policy live in wrappers around it.
#[derive(Clone)]
pub struct HttpContentClient {
    api_url: Url,
    owner: String,
    repository: String,
    token: Option<String>,
    client: Client,
}

impl std::fmt::Debug for HttpContentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpContentClient")
            .field("api_url", &self.api_url)
            .field("owner", &self.owner)
            .field("repository", &self.repository)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpContentClient {
    pub fn new(config: &LoaderConfig) -> Result<Self, AppError> {
        let token = match &config.credentials {
            Credentials::Anonymous => None,
            Credentials::Token(token) => Some(token.clone()),
            Credentials::App { .. } => {
                return Err(AppError::config_error(
                    "GitHub App credentials are not supported for content retrieval; provide a token",
                ));
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::config_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_url: config.api_url.clone(),
            owner: config.owner.clone(),
            repository: config.repository.clone(),
            token,
            client,
        })
    }

    fn contents_url(&self, request: &ContentRequest) -> Result<Url, FetchError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::Transport(format!("base url '{}' cannot carry a path", self.api_url))
            })?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repository.as_str(), "contents"])
            .extend(request.path.split('/').filter(|segment| !segment.is_empty()));

        if let Some(revision) = request.revision.as_deref().filter(|rev| !rev.is_empty()) {
            url.query_pairs_mut().append_pair("ref", revision);
        }
        Ok(url)
    }

    fn send_request(&self, request: &ContentRequest) -> Result<ContentEntry, FetchError> {
        let url = self.contents_url(request)?;
        debug!("GET {}", url);

        let mut builder = self
            .client
            .get(url)
            .header(ACCEPT, GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION);
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = builder
            .send()
            .map_err(|e| FetchError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body_text = response
            .text()
            .map_err(|e| FetchError::Transport(format!("Failed to read response body: {}", e)))?;

        if status.is_success() {
            let payload: ContentsPayload = serde_json::from_str(&body_text).map_err(|e| {
                FetchError::InvalidResponse(format!("Failed to parse response: {}", e))
            })?;
            return payload.into_entry();
        }

        let now = chrono::Utc::now().timestamp();
        Err(classify_failure(status.as_u16(), &headers, &body_text, now))
    }
}

impl ContentApi for HttpContentClient {
    fn get_content(&self, request: &ContentRequest) -> Result<ContentEntry, FetchError> {
        self.send_request(request)
    }
}

/// Body of a contents response: an object for a file, an array for a directory.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsPayload {
    Listing(Vec<ContentItem>),
    Single(ContentItem),
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    #[serde(rename = "type")]
    kind: String,
    path: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

impl ContentsPayload {
    fn into_entry(self) -> Result<ContentEntry, FetchError> {
        match self {
            ContentsPayload::Listing(items) => Ok(ContentEntry::Directory(
                items
                    .into_iter()
                    .map(|item| DirectoryEntry {
                        kind: EntryKind::from_api(&item.kind),
                        path: item.path,
                    })
                    .collect(),
            )),
            ContentsPayload::Single(item) => {
                if item.kind != "file" {
                    return Err(FetchError::InvalidResponse(format!(
                        "unsupported content type '{}' for {}",
                        item.kind, item.path
                    )));
                }
                let encoding = item.encoding.unwrap_or_default();
                match item.content.filter(|body| !body.trim().is_empty()) {
                    Some(encoded_body) => Ok(ContentEntry::File(RemoteFile {
                        path: item.path,
                        encoded_body,
                        encoding,
                    })),
                    None => Err(FetchError::EmptyFile { encoding }),
                }
            }
        }
    }
}

/// Map a non-success response to a fetch error, recognising GitHub's
/// primary and secondary rate-limit signals.
fn classify_failure(status: u16, headers: &HeaderMap, body: &str, now: i64) -> FetchError {
    let message = extract_error_message(body).unwrap_or_else(|| {
        if !body.trim().is_empty() {
            body.trim().to_string()
        } else {
            DEFAULT_STATUS_MESSAGE.to_string()
        }
    });

    if status == 403 || status == 429 {
        let lower = message.to_ascii_lowercase();
        if lower.contains("secondary rate limit") || lower.contains("abuse") {
            return FetchError::AbuseDetected { message };
        }

        let retry_after = header_u64(headers, RETRY_AFTER.as_str());
        let exhausted = headers
            .get(RATELIMIT_REMAINING)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.trim() == "0");

        if exhausted || status == 429 {
            let reset = header_u64(headers, RATELIMIT_RESET).map(|v| v as i64);
            return FetchError::QuotaExhausted { retry_after: quota_wait(retry_after, reset, now) };
        }
    }

    FetchError::Status { status, message }
}

/// Seconds to wait before retrying an exhausted quota.
///
/// An explicit `retry-after` wins; otherwise wait until the reset epoch.
fn quota_wait(retry_after: Option<u64>, reset_epoch: Option<i64>, now: i64) -> Duration {
    if let Some(secs) = retry_after {
        return Duration::from_secs(secs);
    }
    match reset_epoch {
        Some(reset) => Duration::from_secs(reset.saturating_sub(now).max(0) as u64),
        None => Duration::from_secs(DEFAULT_QUOTA_WAIT_SECS),
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse::<u64>().ok()
}

fn extract_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<serde_json::Value>(body).ok()?;
    parsed.get("message").and_then(|message| message.as_str()).map(ToOwned::to_owned)
}
