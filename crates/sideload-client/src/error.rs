//! Client error types.

use thiserror::Error;

/// Errors from session, entity, and seeding requests.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Message from the response body.
        message: String,
    },

    /// A response did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The configured base URL or a derived endpoint URL is invalid.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The login handshake was refused.
    #[error("login failed: {0}")]
    Login(String),
}

/// Errors from a single sideload upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Transport failure before a status was received.
    #[error("upload transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("upload rejected ({status}): {message}")]
    Rejected {
        status: u16,
        /// Identifier carried by the rejection body, if any.
        id: Option<i64>,
        message: String,
    },

    /// The service accepted the upload but the response had no usable id.
    #[error("malformed upload response: {0}")]
    MalformedResponse(String),

    /// The archive could not be read.
    #[error("failed to read archive: {0}")]
    Archive(#[from] std::io::Error),

    /// The payload could not be encoded as JSON.
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl UploadError {
    /// Identifier the service reported even though it rejected the upload.
    #[must_use]
    pub const fn rejected_id(&self) -> Option<i64> {
        match self {
            Self::Rejected { id, .. } => *id,
            _ => None,
        }
    }
}
