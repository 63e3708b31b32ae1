//! `GITHUB_ENV` file sink.
//!
//! Each declaration is appended as `KEY=VALUE` followed by the host line
//! ending. Values spanning several lines use the runner's delimiter form:
//!
//! ```text
//! KEY<<ghadelimiter_<hex>
//! line one
//! line two
//! ghadelimiter_<hex>
//! ```

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::domain::{AppError, VariableDeclaration};
use crate::ports::EnvironmentSink;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

const DELIMITER_PREFIX: &str = "ghadelimiter_";

/// Appends variables to the file the runner reads back into later steps.
#[derive(Debug, Clone)]
pub struct GithubEnvFile {
    path: PathBuf,
}

impl GithubEnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EnvironmentSink for GithubEnvFile {
    fn append(&mut self, declaration: &VariableDeclaration) -> Result<(), AppError> {
        let append_failure =
            |source: io::Error| AppError::AppendFailure { key: declaration.key.clone(), source };

        let entry = format_entry(declaration).map_err(append_failure)?;
        let mut file =
            OpenOptions::new().create(true).append(true).open(&self.path).map_err(append_failure)?;
        file.write_all(entry.as_bytes()).map_err(append_failure)
    }
}

/// Render one declaration in the sink's line format.
pub fn format_entry(declaration: &VariableDeclaration) -> Result<String, io::Error> {
    let VariableDeclaration { key, value } = declaration;

    // The runner splits on the first `=` or `<<`, so either in a key would
    // rewrite the entry or open a heredoc that swallows later lines.
    if key.is_empty() || key.contains(['=', '\n', '\r']) || key.contains("<<") {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("key '{}' cannot be written to the env file", key.escape_debug()),
        ));
    }

    if !value.contains('\n') && !value.contains('\r') {
        return Ok(format!("{}={}{}", key, value, LINE_ENDING));
    }

    let delimiter = delimiter_for(key, value);
    if value.contains(&delimiter) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("value of {} contains its own delimiter", key),
        ));
    }
    Ok(format!(
        "{key}<<{delim}{eol}{value}{eol}{delim}{eol}",
        key = key,
        delim = delimiter,
        eol = LINE_ENDING,
        value = value
    ))
}

fn delimiter_for(key: &str, value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hasher.update([0u8]);
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().take(16).map(|byte| format!("{:02x}", byte)).collect();
    format!("{}{}", DELIMITER_PREFIX, hex)
}
