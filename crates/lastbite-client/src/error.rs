use thiserror::Error;

/// Errors returned by [`DashboardClient`](crate::DashboardClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure, or a non-2xx status from an endpoint that
    /// carries no error body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status whose body did not explain itself.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend answered but refused: `"success": false` or an `"error"`
    /// field. The message, when present, is meant for the user.
    #[error("rejected by backend: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The page was rendered without the endpoint this call needs.
    #[error("endpoint not configured: {0}")]
    MissingEndpoint(&'static str),

    #[error("backend returned invalid coordinates: {0}")]
    InvalidCoordinates(#[from] lastbite_core::CoreError),
}

impl ClientError {
    /// `true` for transport-level failures (the request never produced a
    /// usable answer), `false` for answers the backend gave on purpose.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::UnexpectedStatus { .. } | Self::Deserialize { .. }
        )
    }

    /// The user-facing message of a [`ClientError::Rejected`], if any.
    #[must_use]
    pub fn rejection_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}
