//! Loader configuration domain model.

use std::fmt;

use url::Url;

use crate::domain::AppError;
use crate::domain::group::GroupSpec;

/// How requests to the remote API authenticate.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Anonymous,
    Token(String),
    App { app_id: String, private_key: String },
}

impl Credentials {
    /// Resolve credentials from the optional token and app inputs.
    ///
    /// Empty strings count as absent. Token and app credentials are mutually
    /// exclusive, and app credentials need both halves.
    pub fn from_inputs(
        token: Option<&str>,
        app_id: Option<&str>,
        private_key: Option<&str>,
    ) -> Result<Self, AppError> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }

        match (present(token), present(app_id), present(private_key)) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(AppError::config_error(
                "token and app-id/private-key are mutually exclusive; supply only one",
            )),
            (Some(token), None, None) => Ok(Credentials::Token(token.to_string())),
            (None, Some(app_id), Some(private_key)) => Ok(Credentials::App {
                app_id: app_id.to_string(),
                private_key: private_key.to_string(),
            }),
            (None, Some(_), None) => {
                Err(AppError::config_error("app-id was given without private-key"))
            }
            (None, None, Some(_)) => {
                Err(AppError::config_error("private-key was given without app-id"))
            }
            (None, None, None) => Ok(Credentials::Anonymous),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Anonymous => f.write_str("Anonymous"),
            Credentials::Token(_) => f.debug_tuple("Token").field(&"[REDACTED]").finish(),
            Credentials::App { app_id, .. } => f
                .debug_struct("App")
                .field("app_id", app_id)
                .field("private_key", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Base URL of the REST API, e.g. `https://api.github.com`.
    pub api_url: Url,
    pub owner: String,
    pub repository: String,
    pub groups: Vec<GroupSpec>,
    pub credentials: Credentials,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Attempts per request for network faults, including the first.
    pub transport_retries: u32,
}

impl LoaderConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_TRANSPORT_RETRIES: u32 = 3;

    pub fn new(
        api_url: Url,
        owner: impl Into<String>,
        repository: impl Into<String>,
        groups: Vec<GroupSpec>,
        credentials: Credentials,
    ) -> Self {
        Self {
            api_url,
            owner: owner.into(),
            repository: repository.into(),
            groups,
            credentials,
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            transport_retries: Self::DEFAULT_TRANSPORT_RETRIES,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !matches!(self.api_url.scheme(), "http" | "https") {
            return Err(AppError::config_error(format!(
                "url must use http or https, got '{}'",
                self.api_url
            )));
        }
        if self.api_url.cannot_be_a_base() {
            return Err(AppError::config_error(format!("url '{}' cannot be a base", self.api_url)));
        }
        if self.owner.trim().is_empty() {
            return Err(AppError::config_error("org must not be empty"));
        }
        if self.repository.trim().is_empty() {
            return Err(AppError::config_error("repo must not be empty"));
        }
        if self.groups.is_empty() {
            return Err(AppError::config_error("groups must list at least one group"));
        }
        if let Some(group) = self.groups.iter().find(|group| group.path().is_empty()) {
            return Err(AppError::config_error(format!("group '{}' has an empty path", group)));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config_error("timeout_secs must be greater than 0"));
        }
        if self.transport_retries == 0 {
            return Err(AppError::config_error("transport_retries must be greater than 0"));
        }
        Ok(())
    }
}
