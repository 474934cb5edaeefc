//! Lookup origins.

use crate::base::lookuperror::LookupError;
use std::fmt;
use url::Url;

/// The service a lookup is made for: scheme, host and optional port.
///
/// The host is what gets SRV-resolved. [`Origin::key`] is the canonical
/// `scheme://host[:port]` form used to collapse concurrent lookups.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Origin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Parse an origin from a URL string such as `http://svc.example`.
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        let url = Url::parse(input).map_err(|e| LookupError::InvalidOrigin(format!("{input}: {e}")))?;
        Self::from_url(&url)
    }

    /// Build an origin from an already-parsed URL. Path and query are ignored.
    pub fn from_url(url: &Url) -> Result<Self, LookupError> {
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| LookupError::InvalidOrigin(format!("{url}: missing host")))?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            host: host.trim_end_matches('.').to_ascii_lowercase(),
            // `Url::port` already drops the scheme's default port.
            port: url.port(),
        })
    }

    /// Build an `http` origin for a bare hostname.
    pub fn http(host: &str) -> Self {
        Self {
            scheme: "http".to_string(),
            host: host.trim_end_matches('.').to_ascii_lowercase(),
            port: None,
        }
    }

    /// The hostname to SRV-resolve.
    pub fn hostname(&self) -> &str {
        &self.host
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The explicit, non-default port, if any.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Canonical string form, e.g. `https://svc.example:8443`.
    pub fn key(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme, self.host, port),
            None => format!("{}://{}", self.scheme, self.host),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl TryFrom<&str> for Origin {
    type Error = LookupError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Origin::parse(value)
    }
}

impl TryFrom<&Url> for Origin {
    type Error = LookupError;

    fn try_from(value: &Url) -> Result<Self, Self::Error> {
        Origin::from_url(value)
    }
}
