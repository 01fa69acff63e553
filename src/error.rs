//! Error types for the resilient REST client.
//!
//! The taxonomy mirrors the failure modes a dispatcher actually produces:
//! construction-time argument errors, request-build errors, and the
//! per-attempt transport/HTTP errors that either get retried or become the
//! terminal error returned from `perform_request`. Every terminal variant
//! carries a `causes` field recording the suppressed errors from earlier
//! attempts, oldest first — the explicit re-expression of the suppressed-
//! exception chain called for in the design notes.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DispatcherError>;

/// The error type returned by the dispatcher and its collaborators.
#[derive(Error, Debug, Clone)]
pub enum DispatcherError {
    /// A constructor argument failed validation (e.g. empty pool, non-positive timeout).
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The endpoint path/query could not be turned into a URI.
    #[error("invalid uri '{path}': {reason}")]
    InvalidUri { path: String, reason: String },

    /// The method string did not map to one of the supported verbs.
    #[error("unsupported method: {method}")]
    UnsupportedMethod { method: String },

    /// The method/body combination is not allowed (e.g. HEAD with a body).
    #[error("unsupported operation: {reason}")]
    UnsupportedOperation { reason: String },

    /// A single attempt failed below the HTTP layer (connect, I/O, TLS).
    ///
    /// Retryable. Only ever surfaced to the caller directly when the pool
    /// was exhausted before the retry budget elapsed.
    #[error("transport error calling {host}: {message}")]
    Transport {
        host: String,
        message: String,
        causes: Vec<DispatcherError>,
    },

    /// The retry budget elapsed before another attempt could be issued.
    #[error("retry timeout after {elapsed_ms}ms (budget {budget_ms}ms)")]
    RetryTimeout {
        elapsed_ms: u64,
        budget_ms: u64,
        causes: Vec<DispatcherError>,
    },

    /// A terminal (non-retryable) HTTP status was returned by a node.
    #[error("http error {status} from {host}: {body}")]
    HttpError {
        host: String,
        status: u16,
        headers: Vec<(String, String)>,
        body: String,
        causes: Vec<DispatcherError>,
    },
}

impl DispatcherError {
    /// The ordered list of suppressed causes for a terminal error, oldest
    /// first, or an empty slice for errors outside a retry loop.
    pub fn causes(&self) -> &[DispatcherError] {
        match self {
            DispatcherError::Transport { causes, .. } => causes,
            DispatcherError::RetryTimeout { causes, .. } => causes,
            DispatcherError::HttpError { causes, .. } => causes,
            _ => &[],
        }
    }

    /// Whether this kind of failure should be retried against another node.
    ///
    /// Transport errors are retryable (as are the 502/503/504 gateway
    /// statuses, which the dispatcher represents as `Transport` once it has
    /// decided to retry them — see `dispatcher::classify_outcome`).
    /// Terminal HTTP statuses and construction/build errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DispatcherError::Transport { .. })
    }

    /// Attaches `causes` (oldest first) to a terminal variant, returning the
    /// error unchanged for variants that do not carry a chain.
    pub fn with_causes(self, causes: Vec<DispatcherError>) -> DispatcherError {
        match self {
            DispatcherError::Transport { host, message, .. } => DispatcherError::Transport {
                host,
                message,
                causes,
            },
            DispatcherError::RetryTimeout {
                elapsed_ms,
                budget_ms,
                ..
            } => DispatcherError::RetryTimeout {
                elapsed_ms,
                budget_ms,
                causes,
            },
            DispatcherError::HttpError {
                host,
                status,
                headers,
                body,
                ..
            } => DispatcherError::HttpError {
                host,
                status,
                headers,
                body,
                causes,
            },
            other => other,
        }
    }
}
