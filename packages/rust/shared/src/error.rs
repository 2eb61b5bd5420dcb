//! Error types for stagedoor.
//!
//! Library crates use [`CatalogError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching entity data.
    #[error("network error: {0}")]
    Network(String),

    /// CSV or JSON decoding error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Data validation error (duplicate ids, malformed table, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A requested entity id is absent from its table.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    /// A route/CLI parameter that should be a numeric id is not.
    #[error("invalid id: {value:?}")]
    InvalidId { value: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a not-found error for an entity id.
    pub fn not_found(entity: &'static str, id: u32) -> Self {
        Self::NotFound { entity, id }
    }

    /// Create an invalid-id error from the offending parameter.
    pub fn invalid_id(value: impl Into<String>) -> Self {
        Self::InvalidId {
            value: value.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = CatalogError::config("unknown source kind 'sqlite'");
        assert_eq!(err.to_string(), "config error: unknown source kind 'sqlite'");

        let err = CatalogError::not_found("actor", 7);
        assert_eq!(err.to_string(), "actor 7 not found");

        let err = CatalogError::invalid_id("seven");
        assert!(err.to_string().contains("seven"));
    }

    #[test]
    fn validation_error_carries_detail() {
        let err = CatalogError::validation("duplicate PlayId 2 in play.csv");
        assert!(err.to_string().contains("duplicate PlayId 2"));
    }
}
