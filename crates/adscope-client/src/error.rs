use adscope_core::FlowError;
use thiserror::Error;

/// Errors returned by the report service client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope said `success: false` or carried no usable `data`.
    #[error("unsuccessful response from {context}: {message}")]
    Unsuccessful { context: String, message: String },

    /// The configured base URL or endpoint path does not form a valid URL.
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl From<ClientError> for FlowError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(_) | ClientError::UnexpectedStatus { .. } => {
                FlowError::NetworkFailure(err.to_string())
            }
            ClientError::Deserialize { .. } | ClientError::Unsuccessful { .. } => {
                FlowError::MalformedResponse(err.to_string())
            }
            ClientError::InvalidUrl { .. } => FlowError::MissingPrecondition(err.to_string()),
        }
    }
}
