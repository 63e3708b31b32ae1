//! envgroup: load YAML variable groups from a GitHub repository into a CI job environment.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

use std::path::Path;

use log::info;

use adapters::{GithubEnvFile, HttpContentClient, RetryPolicy, RetryingContentClient};
use app::{ContentFetcher, Pipeline};

pub use app::RunSummary;
pub use domain::{AppError, Credentials, GroupSpec, LoaderConfig, VariableDeclaration};

/// Fetch every configured group and append its variables to `env_file`.
///
/// Groups are processed in order and the first failure aborts the run;
/// variables appended before the failure stay in the file.
pub fn load(config: &LoaderConfig, env_file: &Path) -> Result<RunSummary, AppError> {
    config.validate()?;

    let http = HttpContentClient::new(config)?;
    let api = RetryingContentClient::new(http, RetryPolicy::from_config(config));
    let mut pipeline = Pipeline::new(ContentFetcher::new(api), GithubEnvFile::new(env_file));

    let summary = pipeline.run(&config.groups)?;
    info!(
        "Loaded {} variable(s) from {} file(s) across {} group(s)",
        summary.variables, summary.files, summary.groups
    );
    Ok(summary)
}
