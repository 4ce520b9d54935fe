use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the model photometry pipeline.
///
/// Every failure bubbles up to the builder's top-level call; nothing is
/// swallowed on the way.
#[derive(Debug, Error)]
pub enum PhzError {
    /// Missing required option, invalid step, empty list expansion.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed dataset, filter or reddening curve file.
    #[error("parse error{}: {message}", context(.name))]
    Parse {
        message: String,
        name: Option<String>,
    },

    /// Inputs violating a numerical precondition.
    #[error("domain error{}: {message}", context(.name))]
    Domain {
        message: String,
        name: Option<String>,
    },

    /// Adaptive integration exceeded its maximum order.
    #[error("integration did not converge after order {order} (relative difference {relative_difference:e})")]
    Convergence { order: u32, relative_difference: f64 },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    /// Cooperative cancellation was requested while enumerating cells.
    #[error("photometry computation aborted after {completed} cells")]
    Aborted { completed: usize },
}

fn context(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" in '{name}'"),
        None => String::new(),
    }
}

impl PhzError {
    pub fn parse(message: impl Into<String>) -> Self {
        PhzError::Parse { message: message.into(), name: None }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        PhzError::Domain { message: message.into(), name: None }
    }

    pub fn config(message: impl Into<String>) -> Self {
        PhzError::Config(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PhzError::Io { path: path.into(), source }
    }

    /// Attach the qualified name of the offending dataset.
    ///
    /// Only `Parse` and `Domain` carry a name; an already attached name is kept
    /// since the innermost one is the most precise.
    #[must_use]
    pub fn with_name(self, qualified_name: impl ToString) -> Self {
        match self {
            PhzError::Parse { message, name: None } => PhzError::Parse {
                message,
                name: Some(qualified_name.to_string()),
            },
            PhzError::Domain { message, name: None } => PhzError::Domain {
                message,
                name: Some(qualified_name.to_string()),
            },
            other => other,
        }
    }
}

impl From<rmp_serde::encode::Error> for PhzError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        PhzError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for PhzError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        PhzError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for PhzError {
    fn from(e: csv::Error) -> Self {
        PhzError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PhzError>;
