use thiserror::Error;
use vitrine_core::ErrorId;

/// Errors returned by the catalog API client.
///
/// Public client operations only ever surface [`ClientError::ExhaustedRetries`]
/// (wrapping the last underlying failure) or, at construction time,
/// [`ClientError::InvalidBaseUrl`]. The remaining variants describe single
/// attempts and are all treated as transient.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("unexpected HTTP status {status} for {action}")]
    UnexpectedStatus { action: &'static str, status: u16 },

    /// The response body did not match the `{"result": ...}` envelope.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// Every attempt failed. `error_id` correlates with the log line of the
    /// final attempt.
    #[error("{action} failed after {attempts} attempts (error id {error_id}): {source}")]
    ExhaustedRetries {
        action: &'static str,
        attempts: u32,
        error_id: ErrorId,
        #[source]
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// Correlation id of the final failed attempt, when there was one.
    #[must_use]
    pub fn error_id(&self) -> Option<ErrorId> {
        match self {
            ClientError::ExhaustedRetries { error_id, .. } => Some(*error_id),
            _ => None,
        }
    }
}
