//! API client implementation.
//!
//! This module provides the main [`RpcClient`] type for making API calls.

use std::time::Duration;

use http::header::{HeaderValue, USER_AGENT};
#[cfg(feature = "tracing")]
use tracing::{Instrument, info_span};
use ttrss_rpc_core::{
    DecodeError, Outcome, ParamValue, Payload, RequestEnvelope, SessionToken, classify,
};

use crate::builder::{ClientBuildError, ClientBuilder};
use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::options::CallOptions;
use crate::session::Session;
use crate::transport::HyperTransport;

/// Client for one Tiny Tiny RSS API endpoint.
///
/// The client holds configuration and a connection pool, never a session:
/// the token travels in the [`Session`] passed to each call. Cloning is cheap
/// and clones share the pool.
///
/// Calls return `Ok(Outcome::ServiceError(..))` when the server refuses an
/// operation and `Err` only when the exchange failed or the reply could not
/// be decoded. No call is retried.
///
/// # Example
///
/// ```ignore
/// use ttrss_rpc_client::{Outcome, RpcClient};
///
/// let client = RpcClient::builder("https://rss.example.org/tt-rss/api/").build()?;
///
/// let session = match client.login("admin", "password").await? {
///     Outcome::Success(session) => session,
///     Outcome::ServiceError(err) => return Err(err.into()),
/// };
///
/// let counters = client
///     .call(&session, "getUnread", Vec::<(&str, i64)>::new())
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct RpcClient {
    /// HTTP transport.
    transport: HyperTransport,
    /// API endpoint for calls that are not bound to a session.
    endpoint: Endpoint,
    /// Default timeout for API calls.
    default_timeout: Option<Duration>,
    /// `User-Agent` header value.
    user_agent: Option<HeaderValue>,
}

impl RpcClient {
    /// Create a new ClientBuilder for the given endpoint.
    pub fn builder<S: Into<String>>(endpoint: S) -> ClientBuilder {
        ClientBuilder::new(endpoint)
    }

    /// Create a client with default settings.
    pub fn new<S: Into<String>>(endpoint: S) -> Result<Self, ClientBuildError> {
        ClientBuilder::new(endpoint).build()
    }

    pub(crate) fn from_parts(
        transport: HyperTransport,
        endpoint: Endpoint,
        default_timeout: Option<Duration>,
        user_agent: Option<HeaderValue>,
    ) -> Self {
        Self {
            transport,
            endpoint,
            default_timeout,
            user_agent,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }

    /// Send a prebuilt envelope to the client's endpoint and classify the
    /// reply.
    pub async fn send(&self, envelope: &RequestEnvelope) -> Result<Outcome, ClientError> {
        self.send_to(&self.endpoint, envelope, CallOptions::default())
            .await
    }

    /// Send a prebuilt envelope to `endpoint` and classify the reply.
    ///
    /// This is the single path every call goes through.
    pub async fn send_to(
        &self,
        endpoint: &Endpoint,
        envelope: &RequestEnvelope,
        options: CallOptions,
    ) -> Result<Outcome, ClientError> {
        let exchange = self.exchange(endpoint, envelope, options);

        #[cfg(feature = "tracing")]
        let exchange = exchange.instrument(info_span!(
            "rpc.call",
            rpc.method = %envelope.operation(),
            rpc.session = envelope.has_session(),
            otel.kind = "client",
        ));

        exchange.await
    }

    async fn exchange(
        &self,
        endpoint: &Endpoint,
        envelope: &RequestEnvelope,
        options: CallOptions,
    ) -> Result<Outcome, ClientError> {
        let timeout = options.timeout.or(self.default_timeout);

        let mut headers = options.headers;
        if let Some(agent) = &self.user_agent {
            headers
                .entry(USER_AGENT)
                .or_insert_with(|| agent.clone());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(endpoint = %endpoint, ?timeout, "sending request");

        let body = match self.transport.send(endpoint, envelope, timeout, &headers).await {
            Ok(body) => body,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "transport failed");
                return Err(err.into());
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(body_len = body.len(), "response received");

        let outcome = classify(&body)?;

        #[cfg(feature = "tracing")]
        if let Outcome::ServiceError(err) = &outcome {
            tracing::debug!(code = %err.code(), "service refused operation");
        }

        Ok(outcome)
    }

    /// Invoke `operation` within `session`.
    ///
    /// The session token is attached as `sid` and each parameter becomes one
    /// field of the request.
    ///
    /// # Panics
    ///
    /// Panics if `operation` is empty or a parameter name is empty, repeated,
    /// or reserved (`op`, `sid`).
    ///
    /// # Example
    ///
    /// ```ignore
    /// use ttrss_rpc_client::ParamValue;
    ///
    /// let outcome = client
    ///     .call(&session, "updateArticle", [
    ///         ("article_ids", ParamValue::from(vec![12, 13])),
    ///         ("mode", ParamValue::from(0)),
    ///         ("field", ParamValue::from(2)),
    ///     ])
    ///     .await?;
    /// ```
    pub async fn call<I, K, V>(
        &self,
        session: &Session,
        operation: &str,
        params: I,
    ) -> Result<Outcome, ClientError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        self.call_with_options(session, operation, params, CallOptions::default())
            .await
    }

    /// Invoke `operation` within `session` with per-call options.
    pub async fn call_with_options<I, K, V>(
        &self,
        session: &Session,
        operation: &str,
        params: I,
        options: CallOptions,
    ) -> Result<Outcome, ClientError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let envelope = RequestEnvelope::build(operation, Some(session.token()), params);
        self.send_to(session.endpoint(), &envelope, options).await
    }

    /// Authenticate and open a session on the client's endpoint.
    ///
    /// On success the returned [`Session`] carries the token and, when the
    /// server reports it, the API level. Wrong credentials come back as
    /// `Outcome::ServiceError` with code `LOGIN_ERROR`, a disabled API as
    /// `API_DISABLED`.
    pub async fn login(&self, user: &str, password: &str) -> Result<Outcome<Session>, ClientError> {
        let envelope = RequestEnvelope::login(user, password);
        let outcome = self
            .send_to(&self.endpoint, &envelope, CallOptions::default())
            .await?;
        let endpoint = self.endpoint.clone();
        Ok(outcome.try_map(|payload| session_from_login(endpoint, &payload))?)
    }

    /// End `session` on the server.
    ///
    /// The token must not be used afterwards.
    pub async fn logout(&self, session: &Session) -> Result<Outcome<()>, ClientError> {
        let envelope = session.request("logout");
        let outcome = self
            .send_to(session.endpoint(), &envelope, CallOptions::default())
            .await?;
        Ok(outcome.map(|_| ()))
    }

    /// Ask the server for its API level.
    pub async fn api_level(&self, session: &Session) -> Result<Outcome<u32>, ClientError> {
        let envelope = session.request("getApiLevel");
        let outcome = self
            .send_to(session.endpoint(), &envelope, CallOptions::default())
            .await?;
        Ok(outcome.try_map(|payload| {
            payload
                .get("level")
                .and_then(as_level)
                .ok_or(DecodeError::MissingField { field: "level" })
        })?)
    }
}

/// Extract the session from a successful login payload.
fn session_from_login(endpoint: Endpoint, payload: &Payload) -> Result<Session, DecodeError> {
    let token = payload
        .get_str("session_id")
        .ok_or(DecodeError::MissingField { field: "session_id" })?;

    let session = Session::new(endpoint, SessionToken::new(token));
    Ok(match payload.get("api_level").and_then(as_level) {
        Some(level) => session.with_api_level(level),
        None => session,
    })
}

/// API levels arrive as numbers, and from some servers as numeric strings.
fn as_level(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
