//! Environment exporter.

use log::info;

use crate::domain::{AppError, VariableDeclaration};
use crate::ports::EnvironmentSink;

/// Append declarations to the sink in order. Returns the number appended.
///
/// Nothing is rolled back if an append fails partway.
pub fn export<S: EnvironmentSink + ?Sized>(
    sink: &mut S,
    declarations: &[VariableDeclaration],
) -> Result<usize, AppError> {
    for declaration in declarations {
        info!("Appending variable {} to environment", declaration.key);
        sink.append(declaration)?;
    }
    Ok(declarations.len())
}
