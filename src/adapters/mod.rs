pub mod github_contents;
pub mod github_env_file;

pub use github_contents::{HttpContentClient, RetryPolicy, RetryingContentClient};
pub use github_env_file::GithubEnvFile;
