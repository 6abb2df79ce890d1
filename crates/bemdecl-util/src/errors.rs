use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for bemdecl operations.
#[derive(Debug, Error, Diagnostic)]
pub enum BemError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable `bemdecl.toml`.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check bemdecl.toml for syntax errors"))]
    Config { message: String },

    /// A declaration file could not be read, decoded or written.
    #[error("Declaration error: {message}")]
    Declaration { message: String },

    /// Dependency resolution failed (cycles, provider failures, rollback policy).
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type BemResult<T> = miette::Result<T>;
