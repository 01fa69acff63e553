//! Host descriptor: an immutable, addressable endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An addressable endpoint (scheme, host, port). Pure value type — a
/// connection's identity is its host, so `Host` implements `Eq`/`Hash` and is
/// cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Host {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Host {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// Parses a `scheme://host:port` string, defaulting the scheme to
    /// `http` and the port to 9200 (the backend's conventional REST port)
    /// when omitted.
    pub fn parse(spec: &str) -> Result<Self, crate::error::DispatcherError> {
        let url = url::Url::parse(spec)
            .or_else(|_| url::Url::parse(&format!("http://{spec}")))
            .map_err(|e| crate::error::DispatcherError::InvalidArgument {
                message: format!("invalid host '{spec}': {e}"),
            })?;

        let host = url
            .host_str()
            .ok_or_else(|| crate::error::DispatcherError::InvalidArgument {
                message: format!("invalid host '{spec}': missing hostname"),
            })?
            .to_string();

        let port = url.port_or_known_default().unwrap_or(9200);

        Ok(Self::new(url.scheme(), host, port))
    }

    /// The base URL this host resolves to, e.g. `http://node-a:9200`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_url())
    }
}
