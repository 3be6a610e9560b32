//! The session token issued by a successful login.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque session identifier returned by `login`.
///
/// The token is passed back verbatim as the `sid` field of every later
/// request. It is a credential, so `Debug` does not print it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token string as issued by the server.
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self(token.into())
    }

    /// The raw token, for embedding in a request or persisting.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the raw token.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for SessionToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let token = SessionToken::new("s3cr3t");
        let debug = format!("{token:?}");
        assert!(!debug.contains("s3cr3t"));
        assert_eq!(token.as_str(), "s3cr3t");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let token = SessionToken::from("abc");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"abc\"");
        let back: SessionToken = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, token);
    }
}
