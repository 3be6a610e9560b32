//! Protocol error types.
//!
//! This module provides:
//! - [`ErrorCode`]: The server's machine-readable error code (open set)
//! - [`ServiceError`]: A well-formed error response from the server
//! - [`DecodeError`]: A response body that could not be understood

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error code reported in the `error` field of a response.
///
/// The set of codes is open: the server may report codes this crate has never
/// seen, and they are kept verbatim. Well-known codes are provided as
/// constants for comparison.
///
/// # Example
///
/// ```
/// use ttrss_rpc_core::ErrorCode;
///
/// let code = ErrorCode::new("NOT_LOGGED_IN");
/// assert!(code.is_not_logged_in());
/// assert_eq!(code, ErrorCode::NOT_LOGGED_IN);
///
/// let other = ErrorCode::new("SOMETHING_NEW");
/// assert_eq!(other.as_str(), "SOMETHING_NEW");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(String);

impl ErrorCode {
    /// The API is disabled for this user.
    pub const API_DISABLED: &'static str = "API_DISABLED";
    /// Wrong username or password.
    pub const LOGIN_ERROR: &'static str = "LOGIN_ERROR";
    /// The session is missing, expired, or was logged out.
    pub const NOT_LOGGED_IN: &'static str = "NOT_LOGGED_IN";
    /// A required parameter was missing or invalid.
    pub const INCORRECT_USAGE: &'static str = "INCORRECT_USAGE";
    /// The operation name is not known to the server.
    pub const UNKNOWN_METHOD: &'static str = "UNKNOWN_METHOD";

    pub fn new<S: Into<String>>(code: S) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_api_disabled(&self) -> bool {
        self.0 == Self::API_DISABLED
    }

    pub fn is_login_error(&self) -> bool {
        self.0 == Self::LOGIN_ERROR
    }

    /// Whether the session token must be renewed by logging in again.
    pub fn is_not_logged_in(&self) -> bool {
        self.0 == Self::NOT_LOGGED_IN
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ErrorCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ErrorCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// A well-formed response in which the server refused the operation.
///
/// This is an expected outcome (expired session, disabled API, bad
/// credentials), so the protocol layer returns it as a value inside
/// [`Outcome`](crate::Outcome) rather than as an error. It still implements
/// [`std::error::Error`] so callers can propagate it with `?` after
/// [`Outcome::into_result`](crate::Outcome::into_result).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("service error {code}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct ServiceError {
    code: ErrorCode,
    message: Option<String>,
}

impl ServiceError {
    /// Create a service error with just a code.
    pub fn new<C: Into<ErrorCode>>(code: C) -> Self {
        Self {
            code: code.into(),
            message: None,
        }
    }

    /// Create a service error with a code and a human-readable message.
    pub fn with_message<C: Into<ErrorCode>, M: Into<String>>(code: C, message: M) -> Self {
        Self {
            code: code.into(),
            message: Some(message.into()),
        }
    }

    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// The response body could not be decoded into a protocol response.
///
/// This points at a protocol mismatch or a server fault page, never at a
/// business outcome.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The body is not valid JSON.
    #[error("response is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The body is JSON but not an object.
    #[error("response is a JSON {found}, expected an object")]
    NotAnObject { found: &'static str },

    /// The `error` field is present but does not hold a code string.
    #[error("response `error` field is a JSON {found}, expected a string code")]
    MalformedError { found: &'static str },

    /// A success payload lacks a field the operation always returns.
    #[error("response payload is missing field `{field}`")]
    MissingField { field: &'static str },

    /// A success payload does not have the shape requested by the caller.
    #[error("response payload has an unexpected shape: {0}")]
    Payload(#[source] serde_json::Error),
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_code_predicates() {
        assert!(ErrorCode::new("API_DISABLED").is_api_disabled());
        assert!(ErrorCode::new("LOGIN_ERROR").is_login_error());
        assert!(ErrorCode::new("NOT_LOGGED_IN").is_not_logged_in());
        assert!(!ErrorCode::new("LOGIN_ERROR").is_not_logged_in());
    }

    #[test]
    fn test_unknown_code_is_kept_verbatim() {
        let code = ErrorCode::from("feature_x_unavailable");
        assert_eq!(code.as_str(), "feature_x_unavailable");
        assert_eq!(code.to_string(), "feature_x_unavailable");
    }

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::new(ErrorCode::NOT_LOGGED_IN);
        assert_eq!(err.to_string(), "service error NOT_LOGGED_IN");

        let err = ServiceError::with_message("INCORRECT_USAGE", "feed_id is required");
        assert_eq!(
            err.to_string(),
            "service error INCORRECT_USAGE: feed_id is required"
        );
        assert_eq!(err.message(), Some("feed_id is required"));
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::NotAnObject { found: "array" };
        assert_eq!(err.to_string(), "response is a JSON array, expected an object");

        let err = DecodeError::MissingField { field: "session_id" };
        assert_eq!(err.to_string(), "response payload is missing field `session_id`");
    }
}
