//! Content returned by the remote repository.

/// Result of a successful content request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEntry {
    File(RemoteFile),
    Directory(Vec<DirectoryEntry>),
}

/// A single file with its transport-encoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub path: String,
    /// Body as sent by the remote; base64 with embedded line breaks on GitHub.
    pub encoded_body: String,
    pub encoding: String,
}

/// One child of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: String,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    /// A type this client does not know; fetched like a file.
    Other,
}

impl EntryKind {
    pub fn from_api(value: &str) -> Self {
        match value {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            "symlink" => EntryKind::Symlink,
            "submodule" => EntryKind::Submodule,
            _ => EntryKind::Other,
        }
    }
}

impl DirectoryEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self { path: path.into(), kind: EntryKind::File }
    }
}

impl RemoteFile {
    pub fn base64(path: impl Into<String>, encoded_body: impl Into<String>) -> Self {
        Self { path: path.into(), encoded_body: encoded_body.into(), encoding: "base64".into() }
    }
}
