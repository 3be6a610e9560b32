//! Session context owned by the call site.

use ttrss_rpc_core::{RequestEnvelope, SessionToken};

use crate::endpoint::Endpoint;

/// An authenticated session: the endpoint it belongs to and its token.
///
/// Obtained from [`RpcClient::login`](crate::RpcClient::login), or rebuilt
/// from a persisted token with [`Session::new`]. The client keeps no copy;
/// whoever holds the `Session` decides when to drop or replace it, typically
/// after a call reports `NOT_LOGGED_IN`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    endpoint: Endpoint,
    token: SessionToken,
    api_level: Option<u32>,
}

impl Session {
    pub fn new(endpoint: Endpoint, token: SessionToken) -> Self {
        Self {
            endpoint,
            token,
            api_level: None,
        }
    }

    /// Record the API level the server reported at login.
    pub fn with_api_level(mut self, level: u32) -> Self {
        self.api_level = Some(level);
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// API level reported by login, if the server sent one.
    pub fn api_level(&self) -> Option<u32> {
        self.api_level
    }

    /// Start an envelope for `operation` bound to this session.
    ///
    /// # Panics
    ///
    /// Panics if `operation` is empty.
    pub fn request<S: Into<String>>(&self, operation: S) -> RequestEnvelope {
        RequestEnvelope::new(operation).session(&self.token)
    }
}
