#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("empty")]
    Empty,

    #[error("unsupported action")]
    UnsupportedAction,

    #[error("No template URL configured for custom provider")]
    MissingTemplate,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Settings error: {0}")]
    Store(#[from] StoreError),

    #[error("lookup deadline exceeded")]
    Deadline,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(err)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
