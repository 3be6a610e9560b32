//! Hyper-based HTTP transport.
//!
//! This module provides [`HyperTransport`], which posts one request envelope
//! and reads one complete response body per call.

use std::error::Error as StdError;
use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::{Method, Request};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::{TokioExecutor, TokioTimer};
use rustls::ClientConfig;
use tokio::time::Instant;
use ttrss_rpc_core::RequestEnvelope;

use super::connector::{build_https_connector, danger_accept_invalid_certs_config};
use crate::builder::ClientBuildError;
use crate::endpoint::Endpoint;
use crate::error::TransportError;

/// Type alias for the hyper client with HTTPS connector.
type HyperClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Check if a header name is set by the transport itself.
///
/// Caller-supplied headers must not overwrite these.
fn is_reserved_header(name: &HeaderName) -> bool {
    name == CONTENT_TYPE || name == http::header::CONTENT_LENGTH || name == http::header::HOST
}

/// HTTP transport using hyper_util's legacy client.
///
/// Every [`send`](Self::send) is a single exchange: acquire a connection from
/// the pool, write the envelope, read the response body to completion, and
/// release the connection. Nothing is retried.
///
/// # Example
///
/// ```ignore
/// use ttrss_rpc_client::transport::HyperTransport;
///
/// let transport = HyperTransport::builder().build()?;
/// let client = RpcClient::builder("https://rss.example.org/tt-rss/api/")
///     .with_transport(transport)
///     .build()?;
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    client: HyperClient,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport").finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a new transport builder.
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::new()
    }

    /// Create a new transport with default settings.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::builder().build()
    }

    /// Post `envelope` to `endpoint` and return the complete response body.
    ///
    /// The body is collected frame by frame until the peer signals the end
    /// (declared `Content-Length` reached, final chunk, or EOF) and returned
    /// byte-for-byte; it is not decoded here.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Connect`] if no response head arrives: the host is
    ///   unreachable, TLS fails, or the connection drops before the status line
    /// - [`TransportError::Timeout`] if `timeout` elapses first, or if the peer
    ///   stops sending after the head and the body never completes; the
    ///   in-flight exchange is dropped with its connection
    /// - [`TransportError::Status`] for a non-2xx status
    pub async fn send(
        &self,
        endpoint: &Endpoint,
        envelope: &RequestEnvelope,
        timeout: Option<Duration>,
        headers: &HeaderMap,
    ) -> Result<Bytes, TransportError> {
        let body = envelope.to_bytes();

        #[cfg(feature = "tracing")]
        tracing::debug!(body_len = body.len(), "writing request");

        let request = build_request(endpoint, body, headers);
        let exchange = self.round_trip(request, Instant::now());

        match timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| TransportError::Timeout(limit))?,
            None => exchange.await,
        }
    }

    async fn round_trip(
        &self,
        request: Request<Full<Bytes>>,
        started: Instant,
    ) -> Result<Bytes, TransportError> {
        let response: http::Response<Incoming> = self
            .client
            .request(request)
            .await
            .map_err(|e| TransportError::Connect(format!("request failed: {}", error_chain(&e))))?;

        let status = response.status();

        #[cfg(feature = "tracing")]
        tracing::debug!(status = %status, "response headers received");

        // Past the head, a body that never completes is reported like a
        // deadline: the response did not arrive in full.
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|_err| {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %error_chain(&_err), "response body incomplete");
                TransportError::Timeout(started.elapsed())
            })?
            .to_bytes();

        if !status.is_success() {
            return Err(TransportError::Status { status, body });
        }

        Ok(body)
    }
}

/// Build the POST request. Every part is already validated, so this cannot
/// fail.
fn build_request(endpoint: &Endpoint, body: Bytes, headers: &HeaderMap) -> Request<Full<Bytes>> {
    let mut request = Request::new(Full::new(body));
    *request.method_mut() = Method::POST;
    *request.uri_mut() = endpoint.uri().clone();

    let request_headers = request.headers_mut();
    request_headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    request_headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
    for (name, value) in headers.iter() {
        if !is_reserved_header(name) {
            request_headers.insert(name.clone(), value.clone());
        }
    }

    request
}

/// Render an error with its sources, since hyper's top-level messages
/// ("client error (Connect)") hide the cause.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Builder for [`HyperTransport`].
///
/// # Example
///
/// ```ignore
/// use ttrss_rpc_client::transport::HyperTransportBuilder;
/// use std::time::Duration;
///
/// let transport = HyperTransportBuilder::new()
///     .pool_idle_timeout(Duration::from_secs(30))
///     .pool_max_idle_per_host(4)
///     .build()?;
/// ```
pub struct HyperTransportBuilder {
    /// Custom TLS configuration.
    tls_config: Option<ClientConfig>,
    /// Connection pool idle timeout.
    pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host.
    pool_max_idle_per_host: usize,
    /// Whether to accept invalid certificates (dangerous!).
    danger_accept_invalid_certs: bool,
}

impl Default for HyperTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperTransportBuilder {
    /// Create a new transport builder with default settings.
    pub fn new() -> Self {
        Self {
            tls_config: None,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
            danger_accept_invalid_certs: false,
        }
    }

    /// Set a custom TLS configuration, for private CAs or client
    /// certificates.
    pub fn tls_config(mut self, config: ClientConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Set the connection pool idle timeout.
    ///
    /// Default: 90 seconds.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Keep idle connections until the server closes them.
    pub fn pool_idle_timeout_none(mut self) -> Self {
        self.pool_idle_timeout = None;
        self
    }

    /// Set the maximum number of idle connections per host.
    ///
    /// `0` closes every connection as soon as its exchange completes.
    ///
    /// Default: 32.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Accept invalid TLS certificates.
    ///
    /// # Warning
    ///
    /// This is extremely dangerous and should only be used for development/testing!
    /// It makes the connection vulnerable to man-in-the-middle attacks.
    pub fn danger_accept_invalid_certs(mut self) -> Self {
        self.danger_accept_invalid_certs = true;
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<HyperTransport, ClientBuildError> {
        let tls_config = if self.danger_accept_invalid_certs {
            Some(danger_accept_invalid_certs_config()?)
        } else {
            self.tls_config
        };

        let https_connector = build_https_connector(tls_config)?;

        let mut builder = Client::builder(TokioExecutor::new());

        // Required for pool_idle_timeout to take effect
        builder.pool_timer(TokioTimer::new());
        builder.pool_idle_timeout(self.pool_idle_timeout);
        builder.pool_max_idle_per_host(self.pool_max_idle_per_host);

        Ok(HyperTransport {
            client: builder.build(https_connector),
        })
    }
}

impl std::fmt::Debug for HyperTransportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransportBuilder")
            .field("tls_config", &self.tls_config.is_some())
            .field("pool_idle_timeout", &self.pool_idle_timeout)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .field("danger_accept_invalid_certs", &self.danger_accept_invalid_certs)
            .finish()
    }
}
