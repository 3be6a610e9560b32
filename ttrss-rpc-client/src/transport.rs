//! HTTP transport layer.
//!
//! This module provides the [`HyperTransport`] type, which performs one HTTP
//! exchange per API call using hyper_util's legacy client. It supports:
//!
//! - HTTP/1.1 over plain TCP or TLS (rustls, feature-gated)
//! - Connection pooling, with connections released on every exit path
//! - A deadline covering connect, write and the complete body read
//!
//! # Feature Flags
//!
//! TLS support requires enabling the appropriate features:
//!
//! - `tls` (default) - Enables `tls-ring` + `tls-native-roots` for convenience
//! - `tls-ring` / `tls-aws-lc` - Crypto providers
//! - `tls-native-roots` / `tls-webpki-roots` - Root certificates
//!
//! # Example
//!
//! ```ignore
//! use ttrss_rpc_client::transport::HyperTransport;
//! use std::time::Duration;
//!
//! let transport = HyperTransport::builder()
//!     .pool_idle_timeout(Duration::from_secs(60))
//!     .build()?;
//!
//! let body = transport
//!     .send(&endpoint, &envelope, Some(Duration::from_secs(10)), &HeaderMap::new())
//!     .await?;
//! ```

mod connector;
mod hyper;

pub use connector::{
    DangerousAcceptAnyCertVerifier, build_https_connector, danger_accept_invalid_certs_config,
    default_tls_config, has_tls_support,
};
pub use hyper::{HyperTransport, HyperTransportBuilder};

// Re-export rustls types that users might need for TLS configuration
pub use rustls::ClientConfig as TlsClientConfig;
