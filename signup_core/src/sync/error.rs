use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Easy alias for error handling
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can happen while sending a registration to the server. None
/// of these mean the server looked at the registration and said no; that
/// comes back as a normal response.
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't parse a URL, for example if the base URL was invalid.
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// We couldn't reach the server or read its response.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The server took longer than we were willing to wait.
    #[error("Timed out waiting for the server")]
    Timeout,

    /// The server said we made a bad request (4xx) without a registration
    /// result in the body.
    #[error("Client error: {0}")]
    Client(String),

    /// The server had a problem (5xx).
    #[error("Server error")]
    Server,

    /// The server returned a status we don't know how to handle.
    #[error("Unexpected status: {0}")]
    Unexpected(StatusCode),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// The shape of error bodies the server returns alongside 4xx statuses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResp {
    /// What went wrong
    pub error: String,
}
