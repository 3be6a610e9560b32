//! Request envelope building.
//!
//! A request is one JSON object:
//!
//! ```text
//! {"op": <operation>, "sid": <session token>, <name>: <value>, ...}
//! ```
//!
//! The envelope is assembled as a [`serde_json::Map`] and serialized by
//! `serde_json`, so parameter values are always escaped and can never change
//! the structure of the document.

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::session::SessionToken;
use crate::value::ParamValue;

/// Field holding the operation name.
pub const OP_FIELD: &str = "op";

/// Field holding the session token.
pub const SID_FIELD: &str = "sid";

/// The authentication operation, the only one sent without a session.
pub const LOGIN_OPERATION: &str = "login";

/// A request document ready to be posted to the API endpoint.
///
/// # Example
///
/// ```
/// use ttrss_rpc_core::{RequestEnvelope, SessionToken};
///
/// let sid = SessionToken::new("abc123");
/// let request = RequestEnvelope::new("updateArticle")
///     .session(&sid)
///     .param("article_ids", vec![12, 13])
///     .param("mode", 2)
///     .param("field", 0);
///
/// assert_eq!(request.operation(), "updateArticle");
/// assert_eq!(request.get("article_ids"), Some(&serde_json::json!("12,13")));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RequestEnvelope {
    fields: Map<String, Value>,
}

impl RequestEnvelope {
    /// Start an envelope for `operation` with no session and no parameters.
    ///
    /// # Panics
    ///
    /// Panics if `operation` is empty.
    pub fn new<S: Into<String>>(operation: S) -> Self {
        let operation = operation.into();
        assert!(!operation.is_empty(), "operation name must not be empty");

        let mut fields = Map::new();
        fields.insert(OP_FIELD.to_owned(), Value::String(operation));
        Self { fields }
    }

    /// Build an envelope in one step.
    ///
    /// `session` is embedded as `sid` when present and omitted otherwise.
    /// Every `(name, value)` pair becomes one field.
    ///
    /// # Panics
    ///
    /// Panics if `operation` is empty, or if a parameter name is empty,
    /// repeated, or one of the reserved `op`/`sid` fields.
    pub fn build<S, I, K, V>(operation: S, session: Option<&SessionToken>, params: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let mut envelope = Self::new(operation);
        if let Some(token) = session {
            envelope = envelope.session(token);
        }
        for (name, value) in params {
            envelope = envelope.param(name, value);
        }
        envelope
    }

    /// The authentication request. It carries credentials and never a session.
    pub fn login<U, P>(user: U, password: P) -> Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        Self::new(LOGIN_OPERATION)
            .param("user", user.into())
            .param("password", password.into())
    }

    /// Attach the session token as the `sid` field.
    pub fn session(mut self, token: &SessionToken) -> Self {
        self.fields.insert(
            SID_FIELD.to_owned(),
            Value::String(token.as_str().to_owned()),
        );
        self
    }

    /// Add a named parameter.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty, already present, or one of the reserved
    /// `op`/`sid` fields, or if `value` is a list that would not split back
    /// into the same items (see [`ParamValue::to_json`]).
    pub fn param<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let name = name.into();
        assert!(!name.is_empty(), "parameter name must not be empty");
        assert!(
            name != OP_FIELD && name != SID_FIELD,
            "parameter name `{name}` is reserved"
        );
        assert!(
            !self.fields.contains_key(&name),
            "parameter `{name}` given more than once"
        );

        let value = value.into().to_json();
        self.fields.insert(name, value);
        self
    }

    /// The operation name.
    pub fn operation(&self) -> &str {
        self.fields
            .get(OP_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Whether the envelope carries a session token.
    pub fn has_session(&self) -> bool {
        self.fields.contains_key(SID_FIELD)
    }

    /// Look up a field by name, including `op` and `sid`.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Number of fields, including `op` and `sid`.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always `false`: an envelope holds at least the operation.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Serialize the envelope to a UTF-8 JSON request body.
    pub fn to_bytes(&self) -> Bytes {
        // Serializing a map of string keys to JSON values cannot fail.
        Bytes::from(Value::Object(self.fields.clone()).to_string())
    }
}
