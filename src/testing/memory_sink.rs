use std::io;

use crate::domain::{AppError, VariableDeclaration};
use crate::ports::EnvironmentSink;

use super::Journal;

/// In-memory sink that can be told to fail on a given key.
#[derive(Default)]
pub struct MemorySink {
    pub appended: Vec<VariableDeclaration>,
    journal: Journal,
    fail_on_key: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.fail_on_key = Some(key.to_string());
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.appended.iter().map(|decl| format!("{}={}", decl.key, decl.value)).collect()
    }
}

impl EnvironmentSink for MemorySink {
    fn append(&mut self, declaration: &VariableDeclaration) -> Result<(), AppError> {
        if self.fail_on_key.as_deref() == Some(declaration.key.as_str()) {
            return Err(AppError::AppendFailure {
                key: declaration.key.clone(),
                source: io::Error::other("test: sink rejected write"),
            });
        }
        self.journal.push(format!("append {}={}", declaration.key, declaration.value));
        self.appended.push(declaration.clone());
        Ok(())
    }
}
