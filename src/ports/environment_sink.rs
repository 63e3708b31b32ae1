//! Environment sink port definition.

use crate::domain::{AppError, VariableDeclaration};

/// Append-only target for exported variables.
pub trait EnvironmentSink {
    /// Append one declaration. Earlier appends are never rewritten.
    fn append(&mut self, declaration: &VariableDeclaration) -> Result<(), AppError>;
}
