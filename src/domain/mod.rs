pub mod configuration;
pub mod content;
pub mod error;
pub mod group;
pub mod rate_limit;
pub mod variables;

pub use configuration::{Credentials, LoaderConfig};
pub use content::{ContentEntry, DirectoryEntry, EntryKind, RemoteFile};
pub use error::{AppError, FetchError};
pub use group::{GroupSpec, parse_group_list};
pub use rate_limit::{ResponseKind, RetryDecision, decide};
pub use variables::{VariableDeclaration, parse_document, parse_file};
