//! Error types for flick-agent

use thiserror::Error;

/// Result type alias using flick-agent Error
pub type Result<T> = std::result::Result<T, Error>;

/// Terminal outcome of one exchange: the full accumulated response, or the
/// reason it ended early
pub type Outcome = Result<String>;

/// Errors that end an exchange
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the provider layer
    #[error(transparent)]
    Ai(#[from] flick_ai::Error),

    /// The caller cancelled the in-flight request
    #[error("Request cancelled")]
    Cancelled,
}

impl Error {
    /// Stable snake_case classification surfaced to callers
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Ai(e) => e.kind(),
            Error::Cancelled => "cancelled",
        }
    }

    /// Whether the caller should be sent to configuration
    pub fn needs_configuration(&self) -> bool {
        matches!(self, Error::Ai(flick_ai::Error::MissingApiKey))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_delegates_to_provider_error() {
        let e: Error = flick_ai::Error::http(500, "boom").into();
        assert_eq!(e.kind(), "http_error");
        assert_eq!(Error::Cancelled.kind(), "cancelled");
    }

    #[test]
    fn test_needs_configuration_only_for_missing_key() {
        assert!(Error::from(flick_ai::Error::MissingApiKey).needs_configuration());
        assert!(!Error::Cancelled.needs_configuration());
        assert!(!Error::from(flick_ai::Error::Network("x".into())).needs_configuration());
    }
}
