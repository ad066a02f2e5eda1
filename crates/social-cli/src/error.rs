//! Social post demo — error types.

use social_core::error::DomainError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that end the demo run.
#[derive(Debug, Error)]
pub enum AppError {
    /// The environment holds invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A step that should have succeeded was rejected by the domain or store.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A step that should have been rejected was accepted.
    #[error("unexpected success: {0}")]
    UnexpectedSuccess(&'static str),
}
