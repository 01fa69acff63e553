//! A resilient, node-pooled HTTP request dispatcher for clustered search
//! backends.
//!
//! Given a logical request (method, path, query parameters, optional body),
//! [`RestClient`] selects a live node from a [`ConnectionPool`], issues the
//! call through a pluggable [`transport::Transport`], and — on transport or
//! gateway failure — retries against successive nodes until the request
//! succeeds, the pool is exhausted, or the configured retry deadline
//! elapses. The pool's health bookkeeping (dead/alive, backoff,
//! rehabilitation) keeps the dispatcher's notion of "live" nodes accurate
//! across time.

pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod host;
pub mod metrics;
pub mod pool;
pub mod request;
pub mod trace;
pub mod transport;

pub use config::{ClientConfig, RestClientBuilder};
pub use dispatcher::RestClient;
pub use error::{DispatcherError, Result};
pub use host::Host;
pub use pool::ConnectionPool;
pub use request::{Method, Request};
pub use transport::{HttpTransport, HttpTransportConfig, Response, Transport};
