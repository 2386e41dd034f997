//! Error types for GitLab API operations.

use thiserror::Error;

use crate::options::ValueType;

/// A request parameter rejected locally, before any request is issued.
///
/// These always indicate a mistake at the call site; they are never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The option is not declared by the operation's schema.
    #[error("The option \"{option}\" does not exist. Defined options are: {}", .defined.join(", "))]
    UnknownOption {
        option: String,
        defined: Vec<&'static str>,
    },

    /// The option value has a type the schema does not allow.
    #[error(
        "The option \"{option}\" is expected to be of type {}, but is of type {actual}",
        join_types(.expected)
    )]
    TypeMismatch {
        option: String,
        expected: Vec<ValueType>,
        actual: ValueType,
    },

    /// The option value fails the schema's value rule.
    #[error("The option \"{option}\" with value {value} is invalid: {reason}")]
    InvalidValue {
        option: String,
        value: serde_json::Value,
        reason: String,
    },

    /// A required option was not supplied.
    #[error("The required option \"{option}\" is missing")]
    MissingRequiredOption { option: &'static str },
}

impl ValidationError {
    /// Name of the offending option.
    pub fn option(&self) -> &str {
        match self {
            Self::UnknownOption { option, .. }
            | Self::TypeMismatch { option, .. }
            | Self::InvalidValue { option, .. } => option,
            Self::MissingRequiredOption { option } => option,
        }
    }
}

fn join_types(types: &[ValueType]) -> String {
    types
        .iter()
        .map(ValueType::as_str)
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Errors that can occur during GitLab API operations.
#[derive(Debug, Error)]
pub enum GitLabError {
    /// Configuration is missing or incomplete.
    #[error("GitLab configuration required: {0}")]
    ConfigMissing(String),

    /// Parameters could not be turned into a key/value mapping.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Parameters failed local validation; no request was sent.
    #[error("Invalid parameters: {0}")]
    Validation(#[from] ValidationError),

    /// API request failed.
    #[error("GitLab API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

impl GitLabError {
    /// Returns true if the error was raised by local parameter validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidParameters(_))
    }

    /// HTTP status code reported by the API, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => *status_code,
            Self::RateLimited { .. } => Some(429),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the API answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result type alias for GitLab operations.
pub type Result<T> = core::result::Result<T, GitLabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message_lists_expected_types() {
        let err = ValidationError::TypeMismatch {
            option: "iids".to_string(),
            expected: vec![ValueType::Array],
            actual: ValueType::String,
        };
        assert_eq!(
            err.to_string(),
            "The option \"iids\" is expected to be of type array, but is of type string"
        );
    }

    #[test]
    fn test_unknown_option_message_lists_defined_options() {
        let err = ValidationError::UnknownOption {
            option: "foo".to_string(),
            defined: vec!["search", "state"],
        };
        let msg = err.to_string();
        assert!(msg.contains("\"foo\""));
        assert!(msg.contains("search, state"));
        assert_eq!(err.option(), "foo");
    }

    #[test]
    fn test_validation_converts_into_crate_error() {
        let err: GitLabError = ValidationError::MissingRequiredOption { option: "title" }.into();
        assert!(err.is_validation());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_api_error_status() {
        let err = GitLabError::ApiError {
            message: "404 Not found".to_string(),
            status_code: Some(404),
        };
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }
}
