//! Workflow error types.

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur while driving the command loop.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A command in the chain could not be dispatched.
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DomainError),

    /// The policy history could not be rebuilt from the store.
    #[error("Failed to rebuild policy history: {0}")]
    History(#[source] DomainError),

    /// Policies kept emitting commands past the configured depth.
    #[error("Command {kind} at depth {depth} exceeds the cascade limit")]
    CascadeLimitExceeded { depth: usize, kind: &'static str },
}

/// Convenience type alias for workflow results.
pub type Result<T> = std::result::Result<T, WorkflowError>;
