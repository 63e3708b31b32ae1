//! Remote repository content port definition.

use crate::domain::{ContentEntry, FetchError};

/// A single "get content" request against the configured repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    /// Repository-relative path.
    pub path: String,
    /// Ref to read from; `None` uses the repository's default branch.
    pub revision: Option<String>,
}

impl ContentRequest {
    pub fn new(path: impl Into<String>, revision: Option<&str>) -> Self {
        Self { path: path.into(), revision: revision.map(ToOwned::to_owned) }
    }
}

/// Port for reading repository content.
///
/// Implementations perform one logical request per call. Rate-limit policy is
/// applied by the caller.
pub trait ContentApi {
    fn get_content(&self, request: &ContentRequest) -> Result<ContentEntry, FetchError>;
}
