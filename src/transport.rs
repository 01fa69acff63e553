//! Transport: the pluggable boundary between the dispatcher and the wire.
//!
//! spec.md treats the transport as an external collaborator reachable only
//! through `execute(host, request) -> response | transport-error`. This
//! module defines that boundary as a trait plus one concrete, production
//! implementation on top of `reqwest`, following the teacher's
//! `transport/http.rs` choice of client but dropping the `bb8` pooling layer
//! — `reqwest::Client` already pools connections per host internally, and
//! this crate's own `ConnectionPool` is a health-tracking layer above that,
//! not a second physical connection pool.

use crate::error::DispatcherError;
use crate::host::Host;
use crate::request::{Method, Request};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// A buffered HTTP response. `entity` is always fully read before this
/// value is constructed, so it may be inspected more than once.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub entity: Bytes,
}

impl Response {
    pub fn status_line(&self) -> String {
        format!("HTTP/1.1 {} {}", self.status, reason_phrase(self.status))
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        408 => "Request Timeout",
        409 => "Conflict",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}

/// The transport contract the dispatcher consumes. Implementations own
/// connection-level concerns (TLS, socket I/O, keep-alive) entirely outside
/// the dispatcher's responsibility.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, host: &Host, request: &Request) -> Result<Response, DispatcherError>;

    /// Releases any resources held by the transport (connection pools,
    /// background tasks). The default implementation is a no-op, which
    /// suits [`HttpTransport`]: `reqwest::Client` tears its connections
    /// down on drop and needs no explicit shutdown call.
    async fn close(&self) -> Result<(), DispatcherError> {
        Ok(())
    }
}

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub keep_alive: Duration,
    pub gzip: bool,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 10,
            keep_alive: Duration::from_secs(90),
            gzip: true,
        }
    }
}

/// A `reqwest`-backed [`Transport`].
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, DispatcherError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .tcp_keepalive(Some(config.keep_alive))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .gzip(config.gzip)
            .build()
            .map_err(|e| DispatcherError::InvalidArgument {
                message: format!("failed to build http client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, host: &Host, request: &Request) -> Result<Response, DispatcherError> {
        let url = format!("{}{}", host.base_url(), request.uri());
        let mut builder = self.client.request(reqwest_method(request.method), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body.clone() {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| DispatcherError::Transport {
            host: host.to_string(),
            message: e.to_string(),
            causes: vec![],
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_str().unwrap_or_default().to_string()))
            .collect();
        let entity = response.bytes().await.map_err(|e| DispatcherError::Transport {
            host: host.to_string(),
            message: format!("failed to buffer response body: {e}"),
            causes: vec![],
        })?;

        Ok(Response { status, headers, entity })
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}
