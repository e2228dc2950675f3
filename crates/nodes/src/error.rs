//! Node-level error type.

use gateway::GatewayError;
use thiserror::Error;

/// Errors returned by a node's `execute` method.
///
/// Everything except [`NodeError::Gateway`] is a configuration error raised
/// before any request leaves the process.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("unknown {resource} operation: {operation}")]
    UnknownOperation { resource: String, operation: String },

    /// A required parameter was not supplied and has no default.
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),

    #[error("invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The item carries no binary data under the named property.
    #[error("no binary data found for property '{0}'")]
    MissingBinary(String),

    #[error("binary property '{property}' is not valid binary data: {reason}")]
    InvalidBinary { property: String, reason: String },

    /// Failure reported by the gateway transport, passed through unmodified.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl NodeError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// `true` when the error was raised before any network call.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Gateway(_))
    }
}
