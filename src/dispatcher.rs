//! Dispatcher: orchestrates one logical request across retries.
//!
//! Builds the request, asks the pool for an iteration order, walks it
//! applying the retry policy, calls into the transport, classifies the
//! outcome, feeds the pool, and returns either a response or an error
//! carrying the full chronological chain of suppressed prior failures.

use crate::error::DispatcherError;
use crate::host::Host;
use crate::metrics;
use crate::pool::ConnectionPool;
use crate::request::{Method, Request};
use crate::trace;
use crate::transport::{Response, Transport};
use bytes::Bytes;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

enum Outcome {
    Success(Response),
    RetryableHttp(Response),
    TerminalHttp(Response),
}

fn classify(method: Method, response: Response) -> Outcome {
    let status = response.status;
    if (200..300).contains(&status) || (method == Method::Head && status == 404) {
        Outcome::Success(response)
    } else if matches!(status, 502 | 503 | 504) {
        Outcome::RetryableHttp(response)
    } else {
        Outcome::TerminalHttp(response)
    }
}

/// Executes requests against a pool of backend nodes through a pluggable
/// transport, retrying on transport or gateway failure until success, pool
/// exhaustion, or the retry deadline elapses.
pub struct RestClient<T: Transport> {
    transport: Arc<T>,
    pool: Arc<ConnectionPool>,
    max_retry_timeout: Duration,
}

impl<T: Transport> RestClient<T> {
    /// Requires `max_retry_timeout > 0`; rejects non-positive with
    /// `InvalidArgument`.
    pub fn new(
        transport: Arc<T>,
        pool: Arc<ConnectionPool>,
        max_retry_timeout: Duration,
    ) -> Result<Self, DispatcherError> {
        if max_retry_timeout.is_zero() {
            return Err(DispatcherError::InvalidArgument {
                message: "maxRetryTimeout must be positive".to_string(),
            });
        }
        Ok(Self {
            transport,
            pool,
            max_retry_timeout,
        })
    }

    /// Executes one logical request with retries across the pool.
    pub async fn perform_request(
        &self,
        method: &str,
        endpoint: &str,
        params: Vec<(String, String)>,
        entity: Option<Bytes>,
    ) -> Result<Response, DispatcherError> {
        self.perform_request_with_headers(method, endpoint, params, Vec::new(), entity).await
    }

    /// Same as [`Self::perform_request`] with an explicit ordered header list.
    pub async fn perform_request_with_headers(
        &self,
        method: &str,
        endpoint: &str,
        params: Vec<(String, String)>,
        headers: Vec<(String, String)>,
        entity: Option<Bytes>,
    ) -> Result<Response, DispatcherError> {
        let start = Instant::now();
        let request = Request::build(method, endpoint, params, headers, entity)?;
        let method_label = request.method.as_str();

        let mut hosts = self.pool.next_connection();
        if hosts.is_empty() {
            let fallback = self.pool.last_resort_connection();
            info!(host = %fallback, "no healthy nodes available, trying {}", fallback);
            hosts = vec![fallback];
        }

        let retry_deadline =
            Duration::from_millis((self.max_retry_timeout.as_millis() as f64 * 0.98).round() as u64);
        let mut causes: Vec<DispatcherError> = Vec::new();

        for host in hosts {
            if !causes.is_empty() {
                let elapsed = start.elapsed();
                if elapsed >= retry_deadline {
                    let err = DispatcherError::RetryTimeout {
                        elapsed_ms: elapsed.as_millis() as u64,
                        budget_ms: retry_deadline.as_millis() as u64,
                        causes,
                    };
                    metrics::record_request_duration(method_label, start.elapsed().as_secs_f64());
                    return Err(err);
                }
            }

            if let Ok(line) = trace::render_request(&host, &request) {
                tracing::trace!(%host, "{line}");
            } else {
                debug!(%host, "trace rendering failed, continuing without it");
            }

            match self.transport.execute(&host, &request).await {
                Err(transport_err) => {
                    debug!(%host, error = %transport_err, "attempt failed");
                    self.pool.on_failure(&host);
                    metrics::record_attempt(&host, "transport");
                    metrics::record_retry("transport");
                    causes.push(transport_err);
                    continue;
                }
                Ok(response) => {
                    if let Ok(line) = trace::render_response(&response) {
                        tracing::trace!(%host, "{line}");
                    }

                    match classify(request.method, response) {
                        Outcome::Success(response) => {
                            debug!(%host, status = response.status, "attempt succeeded");
                            self.pool.on_success(&host);
                            metrics::record_attempt(&host, "success");
                            metrics::record_request_duration(
                                method_label,
                                start.elapsed().as_secs_f64(),
                            );
                            return Ok(response);
                        }
                        Outcome::RetryableHttp(response) => {
                            debug!(%host, status = response.status, "retryable http error");
                            self.pool.on_failure(&host);
                            metrics::record_attempt(&host, "retryable_http");
                            metrics::record_retry("retryable_http");
                            causes.push(http_error(&host, response, vec![]));
                            continue;
                        }
                        Outcome::TerminalHttp(response) => {
                            debug!(%host, status = response.status, "terminal http error");
                            self.pool.on_success(&host);
                            metrics::record_attempt(&host, "terminal_http");
                            let err = http_error(&host, response, causes);
                            metrics::record_request_duration(
                                method_label,
                                start.elapsed().as_secs_f64(),
                            );
                            return Err(err);
                        }
                    }
                }
            }
        }

        metrics::record_request_duration(method_label, start.elapsed().as_secs_f64());
        let outer = causes.pop().expect("loop records a cause on every non-returning path");
        Err(outer.with_causes(causes))
    }

    /// Releases the pool and then the transport. Both releases are
    /// attempted even if the first fails; the first error is surfaced with
    /// the second chained onto it as a cause. `ConnectionPool::close` is
    /// infallible (an in-memory connection list has nothing that can fail
    /// to release), so in practice this reduces to surfacing the
    /// transport's result, but the pool release still always runs first.
    pub async fn close(&self) -> Result<(), DispatcherError> {
        self.pool.close();
        self.transport.close().await
    }
}

fn http_error(host: &Host, response: Response, causes: Vec<DispatcherError>) -> DispatcherError {
    DispatcherError::HttpError {
        host: host.to_string(),
        status: response.status,
        headers: response.headers,
        body: String::from_utf8_lossy(&response.entity).to_string(),
        causes,
    }
}
