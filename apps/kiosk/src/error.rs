//! # Kiosk Error Type
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Kiosk                              │
//! │                                                                         │
//! │  Startup (config, catalog)          Session (one command per line)      │
//! │  ─────────────────────────          ──────────────────────────────      │
//! │                                                                         │
//! │  KioskError ──► main ──► exit 1     KioskError ──► "error: ..." line    │
//! │                                                    session continues    │
//! │                                                                         │
//! │  Only I/O failures on stdin/stdout end a running session.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use bistro_core::{CoreError, ValidationError};
use thiserror::Error;

/// Everything that can go wrong in the kiosk.
#[derive(Debug, Error)]
pub enum KioskError {
    /// The engine refused the request.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration loaded but is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize order: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The first word of the line is not a command.
    #[error("Unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    /// The command is known but its arguments are not.
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// Cart positions start at 1.
    #[error("No cart line #{0}")]
    NoSuchLine(usize),
}

/// Result type for kiosk operations.
pub type KioskResult<T> = Result<T, KioskError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::ProductId;

    #[test]
    fn test_core_error_message_passes_through() {
        let err = KioskError::from(CoreError::ProductNotFound(ProductId::from("cake")));
        assert_eq!(err.to_string(), "Product not found: cake");
    }

    #[test]
    fn test_usage_message() {
        let err = KioskError::Usage("add <product>");
        assert_eq!(err.to_string(), "Usage: add <product>");
    }
}
