//! Foundation error type.
//!
//! Sub-crates define their own error enums and wrap `NavError` as one
//! variant where they surface configuration problems.

use thiserror::Error;

/// Errors raised by `nav-core` types.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `nav-core`.
pub type NavResult<T> = Result<T, NavError>;
