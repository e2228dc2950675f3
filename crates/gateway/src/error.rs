//! Typed error type for the gateway crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The configured host URL cannot be used as a base for endpoint paths.
    #[error("invalid host URL '{url}': {reason}")]
    InvalidHostUrl { url: String, reason: String },

    /// Connection, TLS, timeout or body-read failure.
    #[error("request to gateway failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status.
    #[error("gateway returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid header value for '{name}'")]
    InvalidHeader { name: &'static str },

    #[error("invalid mime type '{0}' for file upload")]
    InvalidMimeType(String),
}
