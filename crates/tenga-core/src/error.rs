//! API error handling
//!
//! Provides typed errors for backend calls, mirroring the server's
//! error taxonomy: authentication failures, resource-level failures
//! with a structured body, and transport failures.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error body returned by the backend
///
/// Shape: `{timestamp, status, error, message, path}`, plus an optional
/// list of field-level validation messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    pub status: u16,
    pub error: String,
    pub message: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

/// Errors that can occur when talking to the backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend rejected the credentials (HTTP 401)
    ///
    /// The session is expired as a side effect before this is returned;
    /// the caller only needs to send the user back to login.
    #[error("Not authenticated: the API key was rejected")]
    Unauthorized,

    /// The backend reported a structured failure (validation,
    /// not-found, conflict, server error)
    #[error("{}", .body.message)]
    Backend { body: ErrorBody },

    /// Non-success response without a parseable error body
    #[error("Unexpected response from server (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response
    #[error("Request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body could not be decoded as the expected shape
    #[error("Invalid response from server: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    /// Classify a non-success response from its status and body text
    pub fn from_status(status: u16, body_text: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthorized;
        }

        match serde_json::from_str::<ErrorBody>(body_text) {
            Ok(body) => ApiError::Backend { body },
            Err(_) => {
                let message = body_text.trim();
                let message = if message.is_empty() {
                    "no response body".to_string()
                } else {
                    message.to_string()
                };
                ApiError::Http { status, message }
            }
        }
    }

    /// Whether this error is an authentication failure
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// The HTTP status associated with this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Backend { body } => Some(body.status),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOT_FOUND_BODY: &str = r#"{
        "timestamp": "2024-01-15T10:30:00",
        "status": 404,
        "error": "Not Found",
        "message": "Document not found with id: 99",
        "path": "/api/v1/documents/99"
    }"#;

    #[test]
    fn test_structured_body_classification() {
        let err = ApiError::from_status(404, NOT_FOUND_BODY);

        match &err {
            ApiError::Backend { body } => {
                assert_eq!(body.status, 404);
                assert_eq!(body.error, "Not Found");
                assert_eq!(body.path.as_deref(), Some("/api/v1/documents/99"));
            }
            other => panic!("expected Backend, got {:?}", other),
        }
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Document not found with id: 99");
    }

    #[test]
    fn test_validation_body_with_field_errors() {
        let body = r#"{
            "status": 400,
            "error": "Validation Error",
            "message": "Invalid request parameters",
            "path": "/api/v1/documents",
            "errors": ["Title cannot be blank"]
        }"#;

        let err = ApiError::from_status(400, body);
        match err {
            ApiError::Backend { body } => {
                assert_eq!(body.errors.unwrap(), vec!["Title cannot be blank"]);
            }
            other => panic!("expected Backend, got {:?}", other),
        }
    }

    #[test]
    fn test_unauthorized_classification() {
        let err = ApiError::from_status(401, "");
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));

        // 401 wins even when the body is a structured error
        let err = ApiError::from_status(401, NOT_FOUND_BODY);
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_unstructured_body_classification() {
        let err = ApiError::from_status(502, "Bad Gateway");
        match &err {
            ApiError::Http { status, message } => {
                assert_eq!(*status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("expected Http, got {:?}", other),
        }
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_empty_body_classification() {
        let err = ApiError::from_status(500, "  ");
        match err {
            ApiError::Http { message, .. } => assert_eq!(message, "no response body"),
            other => panic!("expected Http, got {:?}", other),
        }
    }
}
