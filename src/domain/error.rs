use std::io;
use std::time::Duration;

use thiserror::Error;

/// Library-wide error type for envgroup operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration or input issue.
    #[error("{0}")]
    Configuration(String),

    /// Content for a group or file could not be retrieved.
    #[error("Fail to retrieve {}: {source}", describe_target(.path, .revision.as_deref()))]
    FetchFailure {
        path: String,
        revision: Option<String>,
        #[source]
        source: FetchError,
    },

    /// A variable document could not be decoded or does not match the schema.
    #[error("Malformed variable document '{path}': {reason}")]
    MalformedDocument { path: String, reason: String },

    /// Writing a variable to the environment sink failed.
    #[error("Failed to append variable {key} to environment: {source}")]
    AppendFailure {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// Failure of a single content request, after any retries.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request quota stayed exhausted after the allowed retry.
    #[error("request quota exhausted (retry advised after {}s)", .retry_after.as_secs())]
    QuotaExhausted { retry_after: Duration },

    /// The remote flagged the request pattern as abusive.
    #[error("abuse detected: {message}")]
    AbuseDetected { message: String },

    /// Non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Network-level failure (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A file entry came back without content.
    #[error("file has no content (encoding '{encoding}')")]
    EmptyFile { encoding: String },

    /// A file was expected but the path resolved to a directory.
    #[error("expected a file but found a directory")]
    UnexpectedDirectory,
}

impl FetchError {
    /// Whether a generic transport layer may safely re-attempt the GET.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Status { status, .. } => *status == 408 || *status >= 500,
            _ => false,
        }
    }
}

fn describe_target(path: &str, revision: Option<&str>) -> String {
    match revision {
        Some(rev) => format!("{}@{}", path, rev),
        None => path.to_string(),
    }
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn fetch_failure(path: &str, revision: Option<&str>, source: FetchError) -> Self {
        AppError::FetchFailure {
            path: path.to_string(),
            revision: revision.map(ToOwned::to_owned),
            source,
        }
    }

    pub fn malformed<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        AppError::MalformedDocument { path: path.into(), reason: reason.into() }
    }
}
