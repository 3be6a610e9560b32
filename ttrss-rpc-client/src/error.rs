//! Client-side error types.
//!
//! - [`TransportError`]: the HTTP exchange itself failed
//! - [`ClientError`]: a call failed in transport or while decoding the reply
//!
//! A service-level refusal (`{"error": "NOT_LOGGED_IN"}`) is not an error here:
//! it arrives as [`Outcome::ServiceError`](ttrss_rpc_core::Outcome::ServiceError).

use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use ttrss_rpc_core::DecodeError;

/// Failure of one HTTP request/response cycle.
#[derive(Clone, Debug, thiserror::Error)]
pub enum TransportError {
    /// No response arrived: unreachable host, refused connection, TLS
    /// failure, or a reset before the status line.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The response did not complete. Either the deadline passed, or the
    /// peer closed the connection partway through the body. Carries the time
    /// spent waiting.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-success HTTP status.
    #[error("unexpected HTTP status {status}")]
    Status { status: StatusCode, body: Bytes },
}

impl TransportError {
    pub fn is_connect(&self) -> bool {
        matches!(self, TransportError::Connect(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }

    /// The HTTP status, for [`TransportError::Status`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error returned by [`RpcClient`](crate::RpcClient) calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ClientError {
    /// The transport error, if the exchange itself failed.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            ClientError::Transport(err) => Some(err),
            ClientError::Decode(_) => None,
        }
    }

    /// The decode error, if the response body could not be understood.
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            ClientError::Decode(err) => Some(err),
            ClientError::Transport(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.as_transport().is_some_and(TransportError::is_timeout)
    }

    /// Whether repeating the call may succeed.
    ///
    /// Only transport failures qualify. The client never retries on its own:
    /// several operations toggle state on the server, so a caller should only
    /// act on this for read-only operations.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use ttrss_rpc_client::{ClientError, TransportError};
    ///
    /// let err = ClientError::from(TransportError::Timeout(Duration::from_secs(5)));
    /// assert!(err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        self.as_transport().is_some()
    }
}
