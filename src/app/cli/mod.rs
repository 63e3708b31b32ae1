//! CLI Adapter.
//!
//! Every option can also be supplied through the environment variable the
//! GitHub Actions runner sets for the matching action input.

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use crate::domain::{AppError, Credentials, LoaderConfig, parse_group_list};

const GITHUB_ACTIONS_VAR: &str = "GITHUB_ACTIONS";

#[derive(Parser)]
#[command(name = "envgroup")]
#[command(version)]
#[command(
    about = "Load YAML variable groups from a GitHub repository into the job environment",
    long_about = None
)]
struct Cli {
    /// Base URL of the GitHub REST API
    #[arg(long, env = "INPUT_URL")]
    url: String,
    /// Organization or user owning the configuration repository
    #[arg(long, env = "INPUT_ORG")]
    org: String,
    /// Configuration repository name
    #[arg(long, env = "INPUT_REPO")]
    repo: String,
    /// Newline-separated groups, each `path` or `path@ref`
    #[arg(long, env = "INPUT_GROUPS")]
    groups: String,
    /// Access token for the REST API
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// GitHub App id (mutually exclusive with --token). Accepted for
    /// compatibility but not supported for content retrieval: use --token
    /// instead.
    #[arg(long, env = "INPUT_APP-ID")]
    app_id: Option<String>,
    /// GitHub App private key; only meaningful with --app-id, which is not
    /// supported for content retrieval
    #[arg(long, env = "INPUT_PRIVATE-KEY", hide_env_values = true)]
    private_key: Option<String>,
    /// File that receives exported variables
    #[arg(long, env = "GITHUB_ENV")]
    env_file: PathBuf,
    /// Request timeout in seconds
    #[arg(long, env = "INPUT_TIMEOUT-SECS", default_value_t = LoaderConfig::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
    /// Log filter (error, warn, info, debug, trace)
    #[arg(long, env = "INPUT_LOG-LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> Result<(LoaderConfig, PathBuf), AppError> {
        let url = self.url.trim();
        let api_url = Url::parse(url)
            .map_err(|e| AppError::config_error(format!("Invalid url '{}': {}", url, e)))?;
        let credentials = Credentials::from_inputs(
            self.token.as_deref(),
            self.app_id.as_deref(),
            self.private_key.as_deref(),
        )?;

        let mut config = LoaderConfig::new(
            api_url,
            self.org.trim(),
            self.repo.trim(),
            parse_group_list(&self.groups),
            credentials,
        );
        config.timeout_secs = self.timeout_secs;
        config.validate()?;

        Ok((config, self.env_file))
    }
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = cli.into_config().and_then(|(config, env_file)| crate::load(&config, &env_file));

    if let Err(e) = result {
        report_failure(&e);
        std::process::exit(1);
    }
}

fn init_logging(filters: &str) {
    // A second init (tests embedding the CLI) is harmless.
    let _ = env_logger::Builder::new()
        .parse_filters(filters)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

fn report_failure(err: &AppError) {
    if std::env::var(GITHUB_ACTIONS_VAR).is_ok_and(|value| value == "true") {
        println!("::error::{}", escape_workflow_data(&err.to_string()));
    }
    eprintln!("Error: {}", err);
}

/// Escape a message for a workflow command payload.
fn escape_workflow_data(message: &str) -> String {
    message.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}
