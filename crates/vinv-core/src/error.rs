//! Error types for the vinv-core library.
//!
//! Parsing itself never fails: malformed input degrades to a partial
//! [`ParseResult`](crate::models::invoice::ParseResult) with warnings. These
//! errors cover the operations around the parser (vendor selection,
//! configuration files).

use thiserror::Error;

/// Main error type for the vinv library.
#[derive(Error, Debug)]
pub enum VinvError {
    /// Vendor name not recognized by any registered parser.
    #[error("unknown vendor: {0}")]
    UnknownVendor(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the vinv library.
pub type Result<T> = std::result::Result<T, VinvError>;
