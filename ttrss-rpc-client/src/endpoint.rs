//! The API entry point URL.

use std::fmt;
use std::str::FromStr;

use http::Uri;
use http::uri::InvalidUri;

/// Error returned when a string is not a usable API endpoint.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("invalid endpoint URL: {0}")]
    Invalid(#[from] InvalidUri),

    #[error("endpoint URL must be absolute (scheme and host): {0}")]
    NotAbsolute(String),

    #[error("unsupported endpoint scheme `{0}`, expected http or https")]
    UnsupportedScheme(String),
}

/// Absolute `http`/`https` URL of the JSON API, such as
/// `https://rss.example.org/tt-rss/api/`.
///
/// # Example
///
/// ```
/// use ttrss_rpc_client::Endpoint;
///
/// let endpoint: Endpoint = "https://rss.example.org/tt-rss/api/".parse()?;
/// assert!(endpoint.is_https());
///
/// assert!(Endpoint::parse("/tt-rss/api/").is_err());
/// assert!(Endpoint::parse("ftp://rss.example.org/").is_err());
/// # Ok::<(), ttrss_rpc_client::EndpointError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    uri: Uri,
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self, EndpointError> {
        let uri: Uri = url.parse()?;
        Self::from_uri(uri)
    }

    pub fn from_uri(uri: Uri) -> Result<Self, EndpointError> {
        let Some(scheme) = uri.scheme_str() else {
            return Err(EndpointError::NotAbsolute(uri.to_string()));
        };
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(EndpointError::UnsupportedScheme(scheme.to_owned()));
        }
        if uri.host().is_none_or(str::is_empty) {
            return Err(EndpointError::NotAbsolute(uri.to_string()));
        }
        Ok(Self { uri })
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn is_https(&self) -> bool {
        self.uri
            .scheme_str()
            .is_some_and(|s| s.eq_ignore_ascii_case("https"))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.uri.fmt(f)
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Endpoint {
    type Error = EndpointError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = EndpointError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let endpoint = Endpoint::parse("http://127.0.0.1:8080/api/").unwrap();
        assert!(!endpoint.is_https());
        assert_eq!(endpoint.uri().path(), "/api/");
        assert_eq!(endpoint.to_string(), "http://127.0.0.1:8080/api/");

        let endpoint = Endpoint::parse("https://rss.example.org/tt-rss/api/").unwrap();
        assert!(endpoint.is_https());
    }

    #[test]
    fn test_relative_rejected() {
        assert!(matches!(
            Endpoint::parse("/tt-rss/api/"),
            Err(EndpointError::NotAbsolute(_))
        ));
    }

    #[test]
    fn test_scheme_rejected() {
        assert!(matches!(
            Endpoint::parse("ftp://example.org/api/"),
            Err(EndpointError::UnsupportedScheme(s)) if s == "ftp"
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            Endpoint::parse("http://exa mple.org/"),
            Err(EndpointError::Invalid(_))
        ));
    }
}
