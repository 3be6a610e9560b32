//! Client builder.
//!
//! Provides a fluent API for configuring and building an [`RpcClient`].

use std::time::Duration;

use http::HeaderValue;
use http::header::InvalidHeaderValue;
use rustls::ClientConfig;

use crate::client::RpcClient;
use crate::endpoint::{Endpoint, EndpointError};
use crate::transport::{HyperTransport, HyperTransportBuilder};

/// Default deadline for one API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error returned when a client or transport cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("invalid user agent: {0}")]
    UserAgent(#[from] InvalidHeaderValue),
}

/// Builder for creating an [`RpcClient`].
///
/// # Example
///
/// ```ignore
/// use ttrss_rpc_client::RpcClient;
/// use std::time::Duration;
///
/// let client = RpcClient::builder("https://rss.example.org/tt-rss/api/")
///     .timeout(Duration::from_secs(10))
///     .user_agent("my-reader/1.0")
///     .build()?;
/// ```
pub struct ClientBuilder {
    /// API endpoint URL, parsed at build time.
    endpoint: String,
    /// Pre-built transport, replacing every transport option below.
    transport: Option<HyperTransport>,
    /// Default deadline for each call.
    default_timeout: Option<Duration>,
    /// Value of the `User-Agent` header.
    user_agent: Option<String>,
    /// Custom TLS configuration.
    tls_config: Option<ClientConfig>,
    /// Whether to accept invalid certificates (dangerous!).
    danger_accept_invalid_certs: bool,
    /// Connection pool idle timeout.
    pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host.
    pool_max_idle_per_host: Option<usize>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("endpoint", &self.endpoint)
            .field("transport", &self.transport.is_some())
            .field("default_timeout", &self.default_timeout)
            .field("user_agent", &self.user_agent)
            .field("tls_config", &self.tls_config.is_some())
            .field("danger_accept_invalid_certs", &self.danger_accept_invalid_certs)
            .field("pool_idle_timeout", &self.pool_idle_timeout)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .finish()
    }
}

impl ClientBuilder {
    /// Create a new builder for the API at `endpoint`.
    ///
    /// The endpoint is the full URL of the API entry point, usually ending
    /// in `/api/`.
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport: None,
            default_timeout: Some(DEFAULT_TIMEOUT),
            user_agent: None,
            tls_config: None,
            danger_accept_invalid_certs: false,
            pool_idle_timeout: None,
            pool_max_idle_per_host: None,
        }
    }

    /// Use a pre-configured transport.
    ///
    /// TLS and pool settings on this builder are ignored when a transport is
    /// supplied.
    pub fn with_transport(mut self, transport: HyperTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the default deadline for each call.
    ///
    /// Default: 30 seconds. [`CallOptions::timeout`](crate::CallOptions::timeout)
    /// overrides it per call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Disable the default deadline.
    pub fn no_timeout(mut self) -> Self {
        self.default_timeout = None;
        self
    }

    /// Send a `User-Agent` header with every call.
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set a custom TLS configuration.
    pub fn tls_config(mut self, config: ClientConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Accept invalid TLS certificates.
    ///
    /// # Warning
    ///
    /// Only for development against servers with self-signed certificates.
    pub fn danger_accept_invalid_certs(mut self) -> Self {
        self.danger_accept_invalid_certs = true;
        self
    }

    /// Set the connection pool idle timeout.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Set the maximum number of idle connections kept per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = Some(max);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Fails if the endpoint is not an absolute http(s) URL, the user agent
    /// is not a valid header value, or TLS cannot be set up.
    pub fn build(self) -> Result<RpcClient, ClientBuildError> {
        let endpoint = Endpoint::parse(&self.endpoint)?;

        let user_agent = self
            .user_agent
            .as_deref()
            .map(HeaderValue::from_str)
            .transpose()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = HyperTransportBuilder::new();
                if let Some(config) = self.tls_config {
                    builder = builder.tls_config(config);
                }
                if self.danger_accept_invalid_certs {
                    builder = builder.danger_accept_invalid_certs();
                }
                if let Some(timeout) = self.pool_idle_timeout {
                    builder = builder.pool_idle_timeout(timeout);
                }
                if let Some(max) = self.pool_max_idle_per_host {
                    builder = builder.pool_max_idle_per_host(max);
                }
                builder.build()?
            }
        };

        Ok(RpcClient::from_parts(
            transport,
            endpoint,
            self.default_timeout,
            user_agent,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::new("http://localhost:8080/api/");
        assert_eq!(builder.default_timeout, Some(DEFAULT_TIMEOUT));
        assert!(builder.user_agent.is_none());
        assert!(builder.transport.is_none());
        assert!(!builder.danger_accept_invalid_certs);
    }

    #[test]
    fn test_builder_timeout() {
        let builder = ClientBuilder::new("http://localhost/api/").timeout(Duration::from_secs(5));
        assert_eq!(builder.default_timeout, Some(Duration::from_secs(5)));
        let builder = builder.no_timeout();
        assert!(builder.default_timeout.is_none());
    }

    #[test]
    fn test_build_rejects_bad_endpoint() {
        let err = ClientBuilder::new("not a url").build().unwrap_err();
        assert!(matches!(err, ClientBuildError::Endpoint(_)));

        let err = ClientBuilder::new("/relative/api/").build().unwrap_err();
        assert!(matches!(
            err,
            ClientBuildError::Endpoint(EndpointError::NotAbsolute(_))
        ));
    }

    #[cfg(feature = "tls")]
    #[test]
    fn test_build_rejects_bad_user_agent() {
        let err = ClientBuilder::new("http://localhost/api/")
            .user_agent("bad\nagent")
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientBuildError::UserAgent(_)));
    }

    #[cfg(feature = "tls")]
    #[test]
    fn test_build_client() {
        let client = ClientBuilder::new("https://rss.example.org/tt-rss/api/")
            .timeout(Duration::from_secs(3))
            .user_agent("ttrss-rpc-tests")
            .pool_max_idle_per_host(2)
            .build()
            .unwrap();
        assert_eq!(client.endpoint().to_string(), "https://rss.example.org/tt-rss/api/");
        assert_eq!(client.default_timeout(), Some(Duration::from_secs(3)));
    }
}
