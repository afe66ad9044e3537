//! Error types for the HTTP adapter and gateways.
//!
//! The taxonomy follows what callers need to distinguish: network failures
//! (no response), HTTP failures (status + parsed server body), and decode
//! failures. Presentation code maps these onto user-facing copy via
//! [`ApiError::user_message`]; the gateways themselves never translate.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Result type alias for adapter and gateway operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Error body shape the server uses for 4xx/5xx responses.
#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    errors: Vec<String>,
}

/// Error taxonomy for API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a 4xx/5xx status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// Response status code.
        status: StatusCode,
        /// Server-provided message, or the canonical status reason.
        message: String,
        /// Field-level validation messages, when the server sent any.
        errors: Vec<String>,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode response body: {0}")]
    Decode(String),

    /// No refresh token is available to renew an expired session.
    #[error("No refresh token available")]
    NoCredentials,
}

impl ApiError {
    /// Build an [`ApiError::Http`] from a non-success response, parsing the
    /// `{message, errors?}` body when present.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let fallback = || {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        };

        match response.bytes().await {
            Ok(bytes) => match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(body) => Self::Http {
                    status,
                    message: body.message,
                    errors: body.errors,
                },
                Err(_) => Self::Http {
                    status,
                    message: fallback(),
                    errors: Vec::new(),
                },
            },
            Err(_) => Self::Http {
                status,
                message: fallback(),
                errors: Vec::new(),
            },
        }
    }

    /// Status code of an HTTP failure, if this is one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` for a 401 response.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// `true` for a 403 response.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
    }

    /// `true` for a 404 response.
    ///
    /// Detail and edit views render a dedicated not-found branch off this
    /// instead of a generic error banner.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// `true` for a 400 response carrying validation feedback.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.status() == Some(StatusCode::BAD_REQUEST)
    }

    /// User-facing message for this failure.
    ///
    /// Validation errors surface the server's field messages; everything
    /// else gets generic copy keyed on the taxonomy.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Please check your connection and try again.".into(),
            Self::Http {
                status,
                message,
                errors,
            } => {
                if *status == StatusCode::BAD_REQUEST {
                    if errors.is_empty() {
                        message.clone()
                    } else {
                        errors.join(", ")
                    }
                } else if *status == StatusCode::UNAUTHORIZED {
                    "Your session has expired. Please log in again.".into()
                } else if *status == StatusCode::FORBIDDEN {
                    "You don't have permission to perform this action.".into()
                } else if *status == StatusCode::NOT_FOUND {
                    "The requested resource was not found.".into()
                } else {
                    "Something went wrong. Please try again later.".into()
                }
            },
            Self::Decode(_) | Self::NoCredentials => {
                "Something went wrong. Please try again later.".into()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: StatusCode, message: &str, errors: Vec<String>) -> ApiError {
        ApiError::Http {
            status,
            message: message.to_string(),
            errors,
        }
    }

    #[test]
    fn test_validation_message_joins_field_errors() {
        let err = http(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            vec!["title is required".into(), "content is required".into()],
        );
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "title is required, content is required");
    }

    #[test]
    fn test_validation_message_falls_back_to_server_message() {
        let err = http(StatusCode::BAD_REQUEST, "Title too long", Vec::new());
        assert_eq!(err.user_message(), "Title too long");
    }

    #[test]
    fn test_not_found_is_distinct() {
        let err = http(StatusCode::NOT_FOUND, "Post not found", Vec::new());
        assert!(err.is_not_found());
        assert!(!err.is_validation());
        assert_eq!(err.user_message(), "The requested resource was not found.");
    }

    #[test]
    fn test_forbidden_message() {
        let err = http(StatusCode::FORBIDDEN, "Forbidden", Vec::new());
        assert!(err.is_forbidden());
        assert_eq!(
            err.user_message(),
            "You don't have permission to perform this action."
        );
    }

    #[test]
    fn test_server_error_is_generic() {
        let err = http(StatusCode::INTERNAL_SERVER_ERROR, "boom", Vec::new());
        assert_eq!(
            err.user_message(),
            "Something went wrong. Please try again later."
        );
    }
}
