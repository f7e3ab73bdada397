use shared::error::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("invalid server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("malformed response from prediction service: {0}")]
    Decode(String),
    #[error("{0}")]
    Service(String),
}

impl PredictionError {
    /// Service errors are logical failures reported inside a 2xx body; everything
    /// else is a transport-level failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Service(_) => ErrorCode::Service,
            _ => ErrorCode::Network,
        }
    }

    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Service(message) => Some(message),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(*status),
            _ => None,
        }
    }
}
