//! Async client for the Tiny Tiny RSS JSON API.
//!
//! The API is a single HTTP endpoint. Every call posts one JSON object naming
//! an operation (`op`) together with the session token (`sid`) and the
//! operation's parameters, and receives one JSON object back.
//!
//! ## Features
//!
//! - Structured request building: parameter values are serialized, never
//!   spliced into text
//! - Complete, byte-exact response reads with a per-call deadline
//! - Distinct results for transport failures, undecodable replies and
//!   service-level refusals
//! - Explicit [`Session`] values: the client holds no login state
//!
//! ## Example
//!
//! ```ignore
//! use ttrss_rpc_client::{Outcome, ParamValue, RpcClient};
//!
//! let client = RpcClient::builder("https://rss.example.org/tt-rss/api/").build()?;
//!
//! let session = match client.login("admin", "password").await? {
//!     Outcome::Success(session) => session,
//!     Outcome::ServiceError(err) if err.code().is_login_error() => {
//!         return Err("wrong credentials".into());
//!     }
//!     Outcome::ServiceError(err) => return Err(err.into()),
//! };
//!
//! let headlines = client
//!     .call(&session, "getHeadlines", [
//!         ("feed_id", ParamValue::from(-4)),
//!         ("limit", ParamValue::from(20)),
//!     ])
//!     .await?;
//!
//! match headlines {
//!     Outcome::Success(payload) => println!("{:?}", payload.get("content")),
//!     Outcome::ServiceError(err) if err.code().is_not_logged_in() => {
//!         // The server expired the session: log in again.
//!     }
//!     Outcome::ServiceError(err) => eprintln!("refused: {err}"),
//! }
//!
//! client.logout(&session).await?;
//! ```
//!
//! ## Results
//!
//! Each call returns `Result<Outcome<T>, ClientError>`:
//!
//! | Result | Meaning |
//! |--------|---------|
//! | `Ok(Outcome::Success(_))` | The operation succeeded |
//! | `Ok(Outcome::ServiceError(_))` | The server refused it (`NOT_LOGGED_IN`, `API_DISABLED`, ...) |
//! | `Err(ClientError::Transport(_))` | Connection failure, timeout, or non-2xx HTTP status |
//! | `Err(ClientError::Decode(_))` | The reply was not a JSON object |
//!
//! ## Retries
//!
//! The client never retries. Operations such as `updateArticle` with
//! toggle mode change state on every call, so only the caller knows whether
//! repeating one is safe. [`ClientError::is_retryable`] reports whether a
//! failure happened in transport.
//!
//! ## Feature Flags
//!
//! | Feature | Description | Dependencies |
//! |---------|-------------|--------------|
//! | `tls` (default) | `tls-ring` + `tls-native-roots` | `rustls`, `rustls-native-certs` |
//! | `tls-aws-lc` | AWS LC crypto provider | `rustls` |
//! | `tls-webpki-roots` | Bundled Mozilla root certificates | `webpki-roots` |
//! | `tracing` (default) | Spans and events for each call | `tracing` |
//!
//! When `tracing` is enabled, each call runs in an `rpc.call` span with:
//! - `rpc.method`: the operation name
//! - `rpc.session`: whether the request carries a session token
//! - `otel.kind`: "client"
//!
//! Session tokens and passwords are never recorded.

mod builder;
mod client;
mod endpoint;
mod error;
mod options;
mod session;
pub mod transport;

pub use builder::{ClientBuildError, ClientBuilder, DEFAULT_TIMEOUT};
pub use client::RpcClient;
pub use endpoint::{Endpoint, EndpointError};
pub use error::{ClientError, TransportError};
pub use options::CallOptions;
pub use session::Session;

// Re-export transport types at the top level for convenience
pub use transport::{HyperTransport, HyperTransportBuilder, TlsClientConfig};

// Re-export core types that users need
pub use ttrss_rpc_core::{
    DecodeError, ErrorCode, Outcome, ParamValue, Payload, RequestEnvelope, Scalar, ServiceError,
    SessionToken, classify,
};
