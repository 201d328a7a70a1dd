use thiserror::Error;

/// Errors surfaced by the API client and the cache.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The request did not complete (connection refused, timeout, DNS, …).
    #[error("Network failure: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The cache was asked about an item it does not hold.
    #[error("Unknown item: {0}")]
    UnknownItem(uuid::Uuid),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ClientError::Network("connection refused".into());
        assert!(err.to_string().contains("connection refused"));

        let err = ClientError::Rejected {
            status: 422,
            message: "invalid status transition".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("transition"));
    }
}
