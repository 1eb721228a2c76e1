//! Error types for the task list front end.
//!
//! Invalid input and unknown ids are not errors anywhere in this crate; they
//! are silent no-ops. What remains is the plumbing around the core.

use std::path::PathBuf;
use tasklist_runtime::StoreError;
use thiserror::Error;

/// Errors raised while driving the app
#[derive(Error, Debug)]
pub enum AppError {
    /// The view could not be written to a file
    #[error("Failed to write view to {path}: {source}")]
    Surface {
        /// Target file
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// The view could not be written to the terminal
    #[error("Failed to write to terminal: {0}")]
    Terminal(#[from] std::io::Error),

    /// The store rejected an action
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised while parsing a terminal command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The first word is not a command
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// A required argument is absent
    #[error("Usage: {0}")]
    MissingArgument(&'static str),

    /// A row reference names no visible task
    #[error("No task matches '{0}'")]
    UnknownTask(String),
}
