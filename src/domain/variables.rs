//! Variable documents: base64-wrapped YAML of the form
//!
//! ```yaml
//! variables:
//!   - key: DEPLOY_REGION
//!     value: eu-west-1
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_yaml::{Mapping, Value};

use crate::domain::AppError;
use crate::domain::content::RemoteFile;

const BASE64_ENCODING: &str = "base64";
const VARIABLES_FIELD: &str = "variables";
const KEY_FIELD: &str = "key";
const VALUE_FIELD: &str = "value";

/// A key/value pair destined for the job environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    pub key: String,
    pub value: String,
}

impl VariableDeclaration {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// Decode a fetched file and return its declarations in document order.
pub fn parse_file(file: &RemoteFile) -> Result<Vec<VariableDeclaration>, AppError> {
    let text = decode_content(&file.path, &file.encoding, &file.encoded_body)?;
    parse_document(&file.path, &text)
}

/// Decode a transport-encoded body to UTF-8 text.
pub fn decode_content(path: &str, encoding: &str, body: &str) -> Result<String, AppError> {
    if !encoding.eq_ignore_ascii_case(BASE64_ENCODING) {
        return Err(AppError::malformed(path, format!("unsupported encoding '{}'", encoding)));
    }

    // GitHub wraps base64 content at 60 columns.
    let compact: Vec<u8> = body.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| AppError::malformed(path, format!("invalid base64 content: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| AppError::malformed(path, format!("content is not UTF-8: {}", e)))
}

/// Parse decoded YAML text into declarations.
pub fn parse_document(path: &str, text: &str) -> Result<Vec<VariableDeclaration>, AppError> {
    let root: Value = serde_yaml::from_str(text)
        .map_err(|e| AppError::malformed(path, format!("invalid YAML: {}", e)))?;

    let entries = match root.get(VARIABLES_FIELD) {
        Some(Value::Sequence(entries)) => entries,
        Some(_) => {
            return Err(AppError::malformed(path, "top-level 'variables' must be a list"));
        }
        None => return Err(AppError::malformed(path, "missing top-level 'variables' list")),
    };

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| match entry {
            Value::Mapping(map) => parse_entry(path, idx, map),
            _ => Err(AppError::malformed(path, format!("variables[{}] must be a mapping", idx))),
        })
        .collect()
}

fn parse_entry(path: &str, idx: usize, map: &Mapping) -> Result<VariableDeclaration, AppError> {
    let key = match map.get(KEY_FIELD) {
        Some(Value::String(key)) => key,
        Some(_) => {
            return Err(AppError::malformed(
                path,
                format!("variables[{}].key must be a string", idx),
            ));
        }
        None => {
            return Err(AppError::malformed(path, format!("variables[{}].key is required", idx)));
        }
    };
    validate_key(path, idx, key)?;

    let value = match map.get(VALUE_FIELD) {
        Some(value) => scalar_text(value).ok_or_else(|| {
            AppError::malformed(path, format!("variables[{}].value must be a scalar", idx))
        })?,
        None => {
            return Err(AppError::malformed(
                path,
                format!("variables[{}].value is required", idx),
            ));
        }
    };

    Ok(VariableDeclaration { key: key.clone(), value })
}

/// Keys must be usable as environment variable names: ASCII letters, digits
/// and `_`, not starting with a digit. Anything else (`=`, `<<`, line breaks)
/// would change how the runner reads the env file.
fn validate_key(path: &str, idx: usize, key: &str) -> Result<(), AppError> {
    if key.is_empty() {
        return Err(AppError::malformed(
            path,
            format!("variables[{}].key must not be empty", idx),
        ));
    }
    if !is_env_name(key) {
        return Err(AppError::malformed(
            path,
            format!(
                "variables[{}].key '{}' is not a valid environment variable name",
                idx,
                key.escape_debug()
            ),
        ));
    }
    Ok(())
}

fn is_env_name(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Scalars are taken as written; numbers and booleans keep their YAML text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
