//! Error types for flick-ai

use thiserror::Error;

/// Result type alias using flick-ai Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to a chat-completions endpoint
#[derive(Error, Debug)]
pub enum Error {
    /// No API key configured; the request is never attempted
    #[error("Invalid or missing API key")]
    MissingApiKey,

    /// Connection could not be established or was dropped mid-stream
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-2xx status
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// Provider answered 2xx but not with a stream we can decode
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl Error {
    /// Create an HTTP error from a status code and response body
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Stable snake_case classification surfaced to callers
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingApiKey => "missing_api_key",
            Error::Network(_) => "network_error",
            Error::Http { .. } => "http_error",
            Error::MalformedResponse(_) => "malformed_response",
        }
    }

    /// HTTP status code, if the provider answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return Error::http(status.as_u16(), e.to_string());
        }
        Error::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        assert_eq!(Error::MissingApiKey.kind(), "missing_api_key");
        assert_eq!(Error::Network("reset".into()).kind(), "network_error");
        assert_eq!(Error::http(401, "unauthorized").kind(), "http_error");
        assert_eq!(
            Error::MalformedResponse("not a stream".into()).kind(),
            "malformed_response"
        );
    }

    #[test]
    fn test_status_only_for_http() {
        assert_eq!(Error::http(503, "overloaded").status(), Some(503));
        assert_eq!(Error::Network("refused".into()).status(), None);
    }

    #[test]
    fn test_http_display_includes_status_and_body() {
        let e = Error::http(429, "rate limited");
        assert_eq!(e.to_string(), "HTTP error 429: rate limited");
    }
}
