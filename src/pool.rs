//! Connection pool: health bookkeeping and node selection.
//!
//! A single `parking_lot::Mutex` guards the connection list, following the
//! teacher's preference for `parking_lot` over the `std` equivalents for its
//! uncontended-fast-path performance. `next_connection` takes a snapshot
//! under the lock and returns it without holding the lock, so the sequence
//! it yields may be slightly stale relative to a concurrent callback — the
//! tolerance spec.md §4.1 calls for explicitly.

use crate::connection::Connection;
use crate::error::DispatcherError;
use crate::host::Host;
use crate::metrics;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Manages the set of connections for a dispatcher and answers selection
/// queries. Always holds at least one connection; it is a constructor error
/// to build an empty pool.
pub struct ConnectionPool {
    connections: Mutex<Vec<Connection>>,
    rotation: AtomicUsize,
}

impl ConnectionPool {
    /// Builds a pool over the given hosts. Fails if `hosts` is empty.
    pub fn new(hosts: Vec<Host>) -> Result<Self, DispatcherError> {
        if hosts.is_empty() {
            return Err(DispatcherError::InvalidArgument {
                message: "connection pool requires at least one host".to_string(),
            });
        }
        Ok(Self {
            connections: Mutex::new(hosts.into_iter().map(Connection::new).collect()),
            rotation: AtomicUsize::new(0),
        })
    }

    /// Every alive connection first, in a deterministic order rotated
    /// across calls, followed by any dead connection whose backoff window
    /// has elapsed. May be empty if every connection is dead and none has
    /// rehabilitated yet.
    pub fn next_connection(&self) -> Vec<Host> {
        let now = Instant::now();
        let connections = self.connections.lock();
        let len = connections.len();
        let start = self.rotation.fetch_add(1, Ordering::Relaxed) % len;

        let mut ordered = Vec::with_capacity(len);
        for offset in 0..len {
            let idx = (start + offset) % len;
            if connections[idx].is_alive() {
                ordered.push(connections[idx].host().clone());
            }
        }

        let mut rehab: Vec<&Connection> = connections
            .iter()
            .filter(|c| c.has_elapsed_backoff(now))
            .collect();
        rehab.sort_by_key(|c| c.dead_until());
        ordered.extend(rehab.into_iter().map(|c| c.host().clone()));

        ordered
    }

    /// Returns some connection regardless of state, for use when
    /// `next_connection` is empty. Prefers the dead connection with the
    /// oldest `dead_until` (longest overdue), ties broken by stable order.
    pub fn last_resort_connection(&self) -> Host {
        let connections = self.connections.lock();
        connections
            .iter()
            .filter(|c| !c.is_alive())
            .min_by_key(|c| c.dead_until())
            .or_else(|| connections.first())
            .expect("pool is never empty")
            .host()
            .clone()
    }

    /// Transitions `host` to alive, resets its failure count.
    pub fn on_success(&self, host: &Host) {
        let mut connections = self.connections.lock();
        if let Some(conn) = connections.iter_mut().find(|c| c.host() == host) {
            conn.mark_success();
        }
        metrics::record_node_health(host, true);
    }

    /// Transitions `host` to dead and schedules its next rehabilitation
    /// attempt per the exponential backoff policy.
    pub fn on_failure(&self, host: &Host) {
        let now = Instant::now();
        let mut connections = self.connections.lock();
        if let Some(conn) = connections.iter_mut().find(|c| c.host() == host) {
            conn.mark_failure(now);
            metrics::record_dead_count(host, conn.dead_count());
        }
        metrics::record_node_health(host, false);
    }

    /// Number of hosts configured in the pool.
    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        false // invariant: pool is never empty past construction
    }

    /// Releases resources held by the pool. The in-memory pool has nothing
    /// to release beyond dropping its connection list, but the method
    /// exists so the dispatcher's `close()` has a symmetric counterpart to
    /// call alongside the transport's shutdown.
    pub fn close(&self) {
        self.connections.lock().clear();
    }
}
