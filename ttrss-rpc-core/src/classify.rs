//! Response decoding and classification.
//!
//! A response body is decoded once, after it has been read in full, and then
//! sorted into one of three results:
//!
//! - `Ok(Outcome::Success(payload))`: a JSON object without an `error` key
//! - `Ok(Outcome::ServiceError(err))`: a JSON object with an `error` code
//! - `Err(DecodeError)`: anything that is not such an object
//!
//! Only the presence of the `error` key decides between the first two. The
//! payload is returned as-is; its shape depends on the operation and is
//! interpreted by the caller.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{DecodeError, ErrorCode, ServiceError, json_kind};

/// Key whose presence marks an error response.
pub const ERROR_FIELD: &str = "error";

/// Optional human-readable text accompanying an error code.
pub const MESSAGE_FIELD: &str = "message";

/// Result of a well-formed exchange: the operation either succeeded or the
/// server refused it.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T = Payload> {
    Success(T),
    ServiceError(ServiceError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The service error, if the server refused the operation.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Outcome::Success(_) => None,
            Outcome::ServiceError(err) => Some(err),
        }
    }

    /// Whether the server reported that the session is no longer valid.
    pub fn is_not_logged_in(&self) -> bool {
        self.service_error()
            .is_some_and(|err| err.code().is_not_logged_in())
    }

    /// Transform the success value, keeping a service error untouched.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::ServiceError(err) => Outcome::ServiceError(err),
        }
    }

    /// Like [`map`](Self::map), for conversions that can fail to decode.
    pub fn try_map<U, F>(self, f: F) -> Result<Outcome<U>, DecodeError>
    where
        F: FnOnce(T) -> Result<U, DecodeError>,
    {
        match self {
            Outcome::Success(value) => f(value).map(Outcome::Success),
            Outcome::ServiceError(err) => Ok(Outcome::ServiceError(err)),
        }
    }

    /// Convert into a `Result` for callers that treat a service error as
    /// failure.
    pub fn into_result(self) -> Result<T, ServiceError> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::ServiceError(err) => Err(err),
        }
    }
}

/// The opaque success document of an operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// Decode the payload into a caller-defined type.
    ///
    /// # Example
    ///
    /// ```
    /// use serde::Deserialize;
    /// use ttrss_rpc_core::{Outcome, classify};
    ///
    /// #[derive(Deserialize)]
    /// struct Counters { unread: i64 }
    ///
    /// let Outcome::Success(payload) = classify(br#"{"unread":4}"#)? else {
    ///     unreachable!()
    /// };
    /// let counters: Counters = payload.deserialize()?;
    /// assert_eq!(counters.unread, 4);
    /// # Ok::<(), ttrss_rpc_core::DecodeError>(())
    /// ```
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, DecodeError> {
        serde_json::from_value(Value::Object(self.fields)).map_err(DecodeError::Payload)
    }
}

/// Decode and classify a complete response body.
///
/// # Errors
///
/// Returns [`DecodeError`] if the body is not JSON, is not a JSON object, or
/// carries an `error` field that is not a string.
pub fn classify(raw: &[u8]) -> Result<Outcome, DecodeError> {
    let value: Value = serde_json::from_slice(raw).map_err(DecodeError::Json)?;
    classify_value(value)
}

/// Classify an already decoded response document.
pub fn classify_value(value: Value) -> Result<Outcome, DecodeError> {
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(DecodeError::NotAnObject {
                found: json_kind(&other),
            });
        }
    };

    let Some(marker) = fields.remove(ERROR_FIELD) else {
        return Ok(Outcome::Success(Payload::new(fields)));
    };

    let code = match marker {
        Value::String(code) => ErrorCode::new(code),
        other => {
            return Err(DecodeError::MalformedError {
                found: json_kind(&other),
            });
        }
    };

    let err = match fields.remove(MESSAGE_FIELD) {
        Some(Value::String(message)) => ServiceError::with_message(code, message),
        _ => ServiceError::new(code),
    };
    Ok(Outcome::ServiceError(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_success() {
        let outcome = classify(br#"{"session_id":"abc123","api_level":15}"#).unwrap();
        let Outcome::Success(payload) = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(payload.get_str("session_id"), Some("abc123"));
        assert_eq!(payload.get_i64("api_level"), Some(15));
    }

    #[test]
    fn test_not_logged_in() {
        let outcome = classify(br#"{"error":"NOT_LOGGED_IN"}"#).unwrap();
        let err = outcome.service_error().expect("expected service error");
        assert_eq!(err.code(), &ErrorCode::new("NOT_LOGGED_IN"));
        assert_eq!(err.message(), None);
        assert!(outcome.is_not_logged_in());
    }

    #[test]
    fn test_not_json() {
        let err = classify(b"not-json-at-all").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_html_fault_page_is_decode_error() {
        let err = classify(b"<html><body>502 Bad Gateway</body></html>").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_empty_body_is_decode_error() {
        assert!(matches!(classify(b"").unwrap_err(), DecodeError::Json(_)));
    }

    #[test]
    fn test_unknown_code_and_message_pass_through() {
        let outcome =
            classify(br#"{"error":"PLUGIN_EXPLODED","message":"the plugin said no"}"#).unwrap();
        let err = outcome.into_result().unwrap_err();
        assert_eq!(err.code().as_str(), "PLUGIN_EXPLODED");
        assert_eq!(err.message(), Some("the plugin said no"));
    }

    #[test]
    fn test_non_object_is_decode_error() {
        let err = classify(b"[1,2,3]").unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject { found: "array" }));

        let err = classify(b"\"NOT_LOGGED_IN\"").unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject { found: "string" }));
    }

    #[test]
    fn test_non_string_error_marker_is_decode_error() {
        let err = classify(br#"{"error":{"code":5}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedError { found: "object" }));
    }

    #[test]
    fn test_field_named_like_error_inside_payload_is_success() {
        let outcome = classify(br#"{"status":"OK","errors":0,"content":{"error":"x"}}"#).unwrap();
        assert!(outcome.is_success());
    }

    #[test]
    fn test_payload_keeps_all_fields() {
        let outcome = classify(br#"{"a":1,"b":"two","c":[3],"d":{"e":null}}"#).unwrap();
        let Outcome::Success(payload) = outcome else {
            panic!("expected success");
        };
        assert_eq!(payload.as_map().len(), 4);
        assert_eq!(payload.get("c"), Some(&json!([3])));
        assert!(payload.contains("d"));
    }

    #[test]
    fn test_payload_deserialize_shape_mismatch() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Level {
            level: u32,
        }

        let payload = Payload::new(json!({"level": "high"}).as_object().unwrap().clone());
        assert!(matches!(
            payload.deserialize::<Level>().unwrap_err(),
            DecodeError::Payload(_)
        ));
    }

    #[test]
    fn test_outcome_map_and_try_map() {
        let ok: Outcome<i32> = Outcome::Success(2);
        assert_eq!(ok.map(|n| n * 2), Outcome::Success(4));

        let refused: Outcome<i32> = Outcome::ServiceError(ServiceError::new("API_DISABLED"));
        let mapped = refused.try_map(|n| Ok(n + 1)).unwrap();
        assert!(mapped.service_error().unwrap().code().is_api_disabled());

        let failed = Outcome::Success(1).try_map(|_: i32| -> Result<i32, DecodeError> {
            Err(DecodeError::MissingField { field: "level" })
        });
        assert!(failed.is_err());
    }
}
