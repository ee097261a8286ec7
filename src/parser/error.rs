//! Decode error taxonomy
//!
//! Every failure while decoding a single link is classified into one of these
//! kinds. Errors are line-local: the batch loop logs and counts them, then
//! moves on to the next line.

use thiserror::Error;

/// Error produced while decoding one link line
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The line's scheme prefix is not one of the four supported schemes
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// A base64 segment decoded to nothing usable
    #[error("base64 decode failed: {0}")]
    Base64DecodeFailure(String),

    /// A required field is absent or empty
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// The authority did not end in a `host:port` pair
    #[error("malformed host:port: {0}")]
    MalformedHostPort(String),

    /// The vmess payload is not a well-formed JSON object
    #[error("malformed JSON payload: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// The `user@authority` shape did not split as expected
    #[error("malformed authority: {0}")]
    MalformedAuthority(String),
}
