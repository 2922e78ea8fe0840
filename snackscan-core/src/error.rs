//! Error types for snackscan-core
//!
//! The normalizer and the wrap aggregator never fail; these errors come from
//! configuration loading, the record store and window construction.

use thiserror::Error;

/// Main error type for the snackscan-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Wrap window bounds are inverted
    #[error("invalid wrap window: {0}")]
    InvalidWindow(String),
}

/// Result type alias for snackscan-core
pub type Result<T> = std::result::Result<T, Error>;
