use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single backend round trip.
///
/// Every operation of the client fails with this one type, whether the
/// backend answered with an error status or the request never completed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The backend answered with a non-2xx status. `body` holds whatever
    /// diagnostic text it sent back.
    #[error("HTTP {status}: {}", .body.as_deref().unwrap_or("no details"))]
    Status { status: StatusCode, body: Option<String> },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("invalid server url: {0}")]
    InvalidUrl(String),
}

impl RequestError {
    pub(crate) fn status(status: StatusCode, body: String) -> Self {
        let body = if body.trim().is_empty() { None } else { Some(body) };
        RequestError::Status { status, body }
    }

    /// Diagnostic text supplied by the backend, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RequestError::Status { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RequestError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// The backend's text, or `fallback` when it supplied none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RequestError::Decode(e.to_string())
        } else {
            RequestError::Transport(e.to_string())
        }
    }
}

impl From<url::ParseError> for RequestError {
    fn from(e: url::ParseError) -> Self {
        RequestError::InvalidUrl(e.to_string())
    }
}
