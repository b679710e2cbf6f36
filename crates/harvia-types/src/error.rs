//! Error types for value construction in harvia-types.

use thiserror::Error;

/// Errors that can occur when constructing Harvia domain values.
///
/// This error type is transport-agnostic and does not include
/// HTTP-specific errors (those belong in harvia-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// A required identifier was empty or whitespace.
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// A base URL did not use the http or https scheme.
    #[error("Invalid URL for {service}: {url}")]
    InvalidUrl {
        /// The service the URL belongs to.
        service: &'static str,
        /// The rejected URL.
        url: String,
    },
}

/// Result type alias using harvia-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
