//! Custom error types for code translation

use std::fmt;
use thiserror::Error;

/// User-supplied input the pipeline cannot proceed without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    /// API key from configuration
    ApiKey,
    /// Language of the selected code
    SourceLanguage,
    /// Language to translate into
    TargetLanguage,
    /// Selected text in the active document
    Selection,
}

impl InputField {
    /// Notification shown when this input is missing
    pub fn missing_message(&self) -> &'static str {
        match self {
            InputField::ApiKey => {
                "API Key is missing. Please configure your Google Gemini API key in the settings."
            }
            InputField::SourceLanguage => "Source language is required!",
            InputField::TargetLanguage => "Target language is required!",
            InputField::Selection => "No code selected for translation.",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputField::ApiKey => write!(f, "api key"),
            InputField::SourceLanguage => write!(f, "source language"),
            InputField::TargetLanguage => write!(f, "target language"),
            InputField::Selection => write!(f, "selection"),
        }
    }
}

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// A required input was empty or absent
    #[error("Missing required input: {field}")]
    MissingInput {
        /// Which input was missing
        field: InputField,
    },

    /// API request was rejected by the service
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Message from the service's error body
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        /// Transport failure description
        message: String,
    },

    /// Response arrived but carried no usable text
    #[error("Invalid response from translation service: {message}")]
    InvalidResponseError {
        /// What was wrong with the body
        message: String,
    },

    /// Request timeout
    #[error("Request timeout")]
    TimeoutError,

    /// Target language has no known file extension
    #[error("Unsupported target language: {language}")]
    UnsupportedLanguage {
        /// Language as the user typed it
        language: String,
    },

    /// File operation error
    #[error("File error: {path} - {message}")]
    FileError {
        /// Path involved
        path: String,
        /// What went wrong
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What went wrong
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl TranslationError {
    /// Shorthand for a missing input
    pub fn missing(field: InputField) -> Self {
        TranslationError::MissingInput { field }
    }

    /// Whether the error was raised while talking to the generative service
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            TranslationError::ApiError { .. }
                | TranslationError::NetworkError { .. }
                | TranslationError::InvalidResponseError { .. }
                | TranslationError::TimeoutError
                | TranslationError::HttpError(_)
        )
    }

    /// Text shown to the user in an error notification
    pub fn user_message(&self) -> String {
        match self {
            TranslationError::MissingInput { field } => field.missing_message().to_string(),
            other => format!("Error translating code: {}", other),
        }
    }
}

impl From<config::ConfigError> for TranslationError {
    fn from(err: config::ConfigError) -> Self {
        TranslationError::ConfigError {
            message: err.to_string(),
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_messages() {
        let err = TranslationError::missing(InputField::ApiKey);
        assert!(err.user_message().starts_with("API Key is missing"));

        let err = TranslationError::missing(InputField::Selection);
        assert_eq!(err.user_message(), "No code selected for translation.");
    }

    #[test]
    fn test_service_error_message_includes_cause() {
        let err = TranslationError::ApiError {
            status: 403,
            message: "API key not valid".to_string(),
        };

        assert!(err.is_service_error());
        assert_eq!(
            err.user_message(),
            "Error translating code: API error: 403 - API key not valid"
        );
    }

    #[test]
    fn test_unsupported_language_is_not_service_error() {
        let err = TranslationError::UnsupportedLanguage {
            language: "rust".to_string(),
        };

        assert!(!err.is_service_error());
        assert!(err.user_message().contains("Unsupported target language: rust"));
    }
}
