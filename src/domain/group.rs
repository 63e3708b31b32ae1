//! Group specifiers: `path` or `path@revision`.

use std::fmt;

const REVISION_SEPARATOR: char = '@';

/// A repository path to load variables from, optionally pinned to a revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    path: String,
    revision: Option<String>,
}

impl GroupSpec {
    /// Split a raw specifier on its first `@`.
    ///
    /// Never fails; path syntax problems surface when the path is fetched.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(REVISION_SEPARATOR) {
            Some((path, revision)) => {
                Self { path: path.to_string(), revision: Some(revision.to_string()) }
            }
            None => Self { path: raw.to_string(), revision: None },
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Requested ref; `None` means the repository's default branch.
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }
}

impl fmt::Display for GroupSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.revision {
            Some(rev) => write!(f, "{}{}{}", self.path, REVISION_SEPARATOR, rev),
            None => f.write_str(&self.path),
        }
    }
}

/// Parse a newline-separated group list.
///
/// The input and each line are trimmed; blank lines are skipped.
pub fn parse_group_list(raw: &str) -> Vec<GroupSpec> {
    raw.trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(GroupSpec::parse)
        .collect()
}
