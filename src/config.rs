//! Client configuration: plain, `serde`-deserializable structs describing
//! how to construct a [`RestClient`]. The crate performs no file or
//! environment I/O of its own — callers load a `ClientConfig` however they
//! like (TOML, env, hardcoded) and hand it to [`RestClientBuilder`],
//! following the teacher's `config::ServerConfig` pattern of plain structs
//! with `#[serde(default = "...")]` fields.

use crate::dispatcher::RestClient;
use crate::error::DispatcherError;
use crate::host::Host;
use crate::pool::ConnectionPool;
use crate::transport::{HttpTransport, HttpTransportConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

fn default_max_retry_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_pool_max_idle_per_host() -> usize {
    10
}

fn default_keep_alive_ms() -> u64 {
    90_000
}

fn default_gzip() -> bool {
    true
}

/// Everything needed to build a wired [`RestClient`]. No connection pool or
/// transport state lives here — those are constructed by
/// [`RestClientBuilder::build`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Host specs, e.g. `"https://search-1.internal:9300"` or bare `"node-a"`.
    pub hosts: Vec<String>,

    #[serde(default = "default_max_retry_timeout_ms")]
    pub max_retry_timeout_ms: u64,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,

    #[serde(default = "default_keep_alive_ms")]
    pub keep_alive_ms: u64,

    #[serde(default = "default_gzip")]
    pub gzip: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            max_retry_timeout_ms: default_max_retry_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            keep_alive_ms: default_keep_alive_ms(),
            gzip: default_gzip(),
        }
    }
}

/// Builds a fully-wired `RestClient<HttpTransport>` from a [`ClientConfig`].
pub struct RestClientBuilder {
    config: ClientConfig,
}

impl RestClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Parses hosts, constructs the pool and the `reqwest`-backed transport,
    /// and wires them into a [`RestClient`]. Fails with `InvalidArgument` if
    /// `hosts` is empty or `max_retry_timeout_ms` is zero, or `InvalidArgument`
    /// wrapping a host-parse failure.
    pub fn build(self) -> Result<RestClient<HttpTransport>, DispatcherError> {
        let hosts: Vec<Host> =
            self.config.hosts.iter().map(|spec| Host::parse(spec)).collect::<Result<_, _>>()?;
        let pool = Arc::new(ConnectionPool::new(hosts)?);

        let transport_config = HttpTransportConfig {
            connect_timeout: Duration::from_millis(self.config.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.config.request_timeout_ms),
            pool_max_idle_per_host: self.config.pool_max_idle_per_host,
            keep_alive: Duration::from_millis(self.config.keep_alive_ms),
            gzip: self.config.gzip,
        };
        let transport = Arc::new(HttpTransport::new(transport_config)?);

        RestClient::new(
            transport,
            pool,
            Duration::from_millis(self.config.max_retry_timeout_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ClientConfig::default();
        assert_eq!(config.max_retry_timeout_ms, 30_000);
        assert_eq!(config.connect_timeout_ms, 5_000);
        assert!(config.gzip);
    }

    #[test]
    fn toml_missing_optional_fields_falls_back_to_defaults() {
        let config: ClientConfig = toml::from_str(r#"hosts = ["node-a", "node-b"]"#).unwrap();
        assert_eq!(config.hosts, vec!["node-a".to_string(), "node-b".to_string()]);
        assert_eq!(config.max_retry_timeout_ms, 30_000);
    }

    #[test]
    fn build_rejects_empty_host_list() {
        let config = ClientConfig {
            hosts: vec![],
            ..ClientConfig::default()
        };
        let err = RestClientBuilder::new(config).build().unwrap_err();
        assert!(matches!(err, DispatcherError::InvalidArgument { .. }));
    }

    #[test]
    fn build_rejects_zero_retry_timeout() {
        let config = ClientConfig {
            hosts: vec!["node-a".to_string()],
            max_retry_timeout_ms: 0,
            ..ClientConfig::default()
        };
        let err = RestClientBuilder::new(config).build().unwrap_err();
        assert!(matches!(err, DispatcherError::InvalidArgument { .. }));
    }

    #[test]
    fn build_wires_a_usable_client() {
        let config = ClientConfig {
            hosts: vec!["http://node-a:9200".to_string()],
            ..ClientConfig::default()
        };
        assert!(RestClientBuilder::new(config).build().is_ok());
    }
}
