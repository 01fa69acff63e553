//! Connection record: a host plus mutable health metadata, owned
//! exclusively by the [`crate::pool::ConnectionPool`].

use crate::host::Host;
use std::time::{Duration, Instant};

const BASE_BACKOFF: Duration = Duration::from_secs(60);
const MAX_BACKOFF: Duration = Duration::from_secs(30 * 60);

/// `backoff(k) = min(60s * 2^(k-1), 30min)`, monotonic in `k`.
pub fn backoff(dead_count: u32) -> Duration {
    debug_assert!(dead_count >= 1);
    let shift = dead_count.saturating_sub(1).min(31);
    let scaled = BASE_BACKOFF.checked_mul(1u32 << shift).unwrap_or(MAX_BACKOFF);
    scaled.min(MAX_BACKOFF)
}

/// Health state of a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Alive,
    Dead,
}

/// A host plus mutable health metadata. A connection's identity is its
/// host; the pool holds at most one record per distinct host.
#[derive(Debug, Clone)]
pub struct Connection {
    host: Host,
    state: ConnectionState,
    dead_count: u32,
    dead_until: Option<Instant>,
    last_failure: Option<Instant>,
}

impl Connection {
    pub fn new(host: Host) -> Self {
        Self {
            host,
            state: ConnectionState::Alive,
            dead_count: 0,
            dead_until: None,
            last_failure: None,
        }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == ConnectionState::Alive
    }

    pub fn dead_count(&self) -> u32 {
        self.dead_count
    }

    pub fn dead_until(&self) -> Option<Instant> {
        self.dead_until
    }

    pub fn last_failure(&self) -> Option<Instant> {
        self.last_failure
    }

    /// Whether a dead connection's backoff window has elapsed at `now`,
    /// making it a rehabilitation candidate.
    pub fn has_elapsed_backoff(&self, now: Instant) -> bool {
        match (self.state, self.dead_until) {
            (ConnectionState::Dead, Some(until)) => now >= until,
            _ => false,
        }
    }

    /// Transitions to alive, resets `dead_count` to zero, clears `dead_until`.
    pub fn mark_success(&mut self) {
        self.state = ConnectionState::Alive;
        self.dead_count = 0;
        self.dead_until = None;
    }

    /// Transitions to dead, saturating-increments `dead_count`, sets
    /// `last_failure = now` and `dead_until = now + backoff(dead_count)`.
    pub fn mark_failure(&mut self, now: Instant) {
        self.state = ConnectionState::Dead;
        self.dead_count = self.dead_count.saturating_add(1);
        self.last_failure = Some(now);
        self.dead_until = Some(now + backoff(self.dead_count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Host {
        Host::new("http", "node-a", 9200)
    }

    #[test]
    fn backoff_is_monotonic_and_capped() {
        let mut previous = Duration::ZERO;
        for k in 1..=40 {
            let delay = backoff(k);
            assert!(delay >= previous);
            assert!(delay <= MAX_BACKOFF);
            previous = delay;
        }
        assert_eq!(backoff(1), Duration::from_secs(60));
        assert_eq!(backoff(2), Duration::from_secs(120));
        assert_eq!(backoff(40), MAX_BACKOFF);
    }

    #[test]
    fn new_connection_is_alive_with_zero_failures() {
        let conn = Connection::new(host());
        assert!(conn.is_alive());
        assert_eq!(conn.dead_count(), 0);
        assert!(conn.dead_until().is_none());
    }

    #[test]
    fn success_resets_health() {
        let mut conn = Connection::new(host());
        let now = Instant::now();
        conn.mark_failure(now);
        conn.mark_failure(now);
        assert_eq!(conn.dead_count(), 2);

        conn.mark_success();
        assert!(conn.is_alive());
        assert_eq!(conn.dead_count(), 0);
        assert!(conn.dead_until().is_none());
    }

    #[test]
    fn failure_sets_dead_until_after_last_failure() {
        let mut conn = Connection::new(host());
        let now = Instant::now();
        conn.mark_failure(now);
        assert_eq!(conn.state(), ConnectionState::Dead);
        assert!(conn.dead_until().unwrap() >= conn.last_failure().unwrap());
    }

    #[test]
    fn rehabilitation_candidate_only_after_elapsed_backoff() {
        let mut conn = Connection::new(host());
        let now = Instant::now();
        conn.mark_failure(now);
        assert!(!conn.has_elapsed_backoff(now));
        assert!(conn.has_elapsed_backoff(now + backoff(1) + Duration::from_millis(1)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_backoff_is_monotonic_and_capped(k in 1u32..10_000u32) {
                let delay = backoff(k);
                prop_assert!(delay <= MAX_BACKOFF);
                if k > 1 {
                    prop_assert!(backoff(k) >= backoff(k - 1));
                }
            }

            #[test]
            fn prop_failure_count_rises_until_success_resets_it(failures in 1u32..50u32) {
                let mut conn = Connection::new(host());
                let now = Instant::now();
                for _ in 0..failures {
                    conn.mark_failure(now);
                }
                prop_assert_eq!(conn.dead_count(), failures);
                conn.mark_success();
                prop_assert_eq!(conn.dead_count(), 0);
                prop_assert!(conn.is_alive());
            }
        }
    }
}
