use crate::api::error::ApiError;
use crate::logging::LogLevel;

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_fetch_error(&self, error: &ApiError) -> LogLevel {
        match (error, error.status()) {
            // Critical: the server refuses us
            (_, Some(401 | 403)) => LogLevel::Error,

            // Non-critical: missing resources and temporary server issues
            (_, Some(404)) => LogLevel::Warn,
            (_, Some(500..=599)) => LogLevel::Warn,

            // The server speaks a different shape than we expect
            (ApiError::Decode(_), _) => LogLevel::Error,

            // Network issues - usually temporary
            _ => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn test_classify_fetch_error() {
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify_fetch_error(&http(401)), LogLevel::Error);
        assert_eq!(classifier.classify_fetch_error(&http(403)), LogLevel::Error);
        assert_eq!(classifier.classify_fetch_error(&http(404)), LogLevel::Warn);
        assert_eq!(classifier.classify_fetch_error(&http(503)), LogLevel::Warn);
        assert_eq!(classifier.classify_fetch_error(&http(418)), LogLevel::Warn);

        let decode: ApiError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert_eq!(classifier.classify_fetch_error(&decode), LogLevel::Error);
    }
}
