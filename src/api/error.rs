use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized - credentials rejected or token expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body shape used by the backend for 4xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    /// Extract the backend's own message from an error body, if present.
    fn body_detail(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail.or(b.message))
            .filter(|s| !s.is_empty())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = Self::body_detail(body).unwrap_or_else(|| Self::truncate_body(body));
        match status.as_u16() {
            400 => ApiError::Validation(detail),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(detail),
            404 => ApiError::NotFound(detail),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(detail),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, detail)),
        }
    }

    /// Check if this error ends the session: credentials rejected with no way
    /// for a retry to succeed.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::SessionExpired(_))
    }

    /// A human-readable message for display. The technical detail stays in the
    /// `Display` impl; this mapping is what a UI shows the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(detail) => detail.clone(),
            ApiError::Unauthorized => {
                "Invalid credentials. Please check your email and password.".to_string()
            }
            ApiError::AccessDenied(_) => {
                "You do not have permission to perform this action.".to_string()
            }
            ApiError::NotFound(_) => "The requested resource was not found.".to_string(),
            ApiError::RateLimited => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            ApiError::ServerError(_) => "Server error. Please try again later.".to_string(),
            ApiError::SessionExpired(_) => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::NetworkError(_) => {
                "Connection error. Please check your network and try again.".to_string()
            }
            ApiError::InvalidResponse(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, ""),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_validation_prefers_backend_detail() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "password_confirm does not match password"}"#,
        );
        match err {
            ApiError::Validation(detail) => {
                assert_eq!(detail, "password_confirm does not match password")
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_falls_back_to_message_field() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message": "bad input"}"#);
        match err {
            ApiError::Validation(detail) => assert_eq!(detail, "bad input"),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_body_truncation() {
        let long_body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &long_body);
        match err {
            ApiError::ServerError(detail) => {
                assert!(detail.contains("truncated"));
                assert!(detail.len() < 600);
            }
            other => panic!("expected ServerError, got {:?}", other),
        }
    }

    #[test]
    fn test_user_message_uses_validation_detail() {
        let err = ApiError::Validation("Title must not be empty.".to_string());
        assert_eq!(err.user_message(), "Title must not be empty.");
    }

    #[test]
    fn test_is_auth_error() {
        assert!(ApiError::Unauthorized.is_auth_error());
        assert!(ApiError::SessionExpired("refresh rejected".to_string()).is_auth_error());
        assert!(!ApiError::RateLimited.is_auth_error());
    }
}
