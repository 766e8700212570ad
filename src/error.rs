//! Error kinds surfaced by the registry and the orchestrator.
//!
//! Function bodies report failures as [`anyhow::Error`]; the orchestrator
//! turns those into [`KernelError::Invocation`] before recording them in the
//! context. A cooperative stop is not an error and has no variant here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// (collection, name) is already taken. Fatal at startup.
    #[error("function {collection}.{name} is already registered")]
    DuplicateFunction { collection: String, name: String },

    #[error("function {collection}.{name} not found")]
    FunctionNotFound { collection: String, name: String },

    /// A function failed while running. Halts the pipeline.
    #[error("{collection}.{name} failed: {message}")]
    Invocation {
        collection: String,
        name: String,
        message: String,
    },

    #[error("invalid template: {0}")]
    Template(String),

    #[error("invalid name '{0}': use letters, digits and '_'")]
    InvalidName(String),
}

impl KernelError {
    pub fn invocation(collection: &str, name: &str, error: &anyhow::Error) -> Self {
        Self::Invocation {
            collection: collection.to_string(),
            name: name.to_string(),
            message: format!("{error:#}"),
        }
    }
}
