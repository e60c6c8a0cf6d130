//! Sliding-window admission control.
//!
//! Per client IP, the limiter keeps the timestamps of admitted requests
//! inside a trailing window. Entries older than the window are pruned on
//! every access — there is no background timer, so the map is bounded by
//! live traffic.
//!
//! State is process-local and lost on restart. The guarantee is "slow
//! down abuse", not "enforce an exact global quota": deployed behind
//! multiple worker processes, each worker enforces its own window, so the
//! effective global limit is `max_requests × worker_count`. Horizontal
//! scaling that needs one global limit must promote this state to a
//! shared, atomically-updatable store.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionDecision {
    /// Whether the request is admitted.
    pub allowed: bool,
    /// Seconds the client must wait before retrying. Zero when admitted,
    /// at least one when rejected.
    pub retry_after_secs: u64,
    /// Requests the client has left in the current window (after this
    /// one, when admitted).
    pub remaining: u32,
}

/// Sliding-window request counter keyed by client IP.
///
/// # Examples
///
/// ```
/// use olympia_gateway::limiter::SlidingWindowLimiter;
/// use std::time::Duration;
///
/// let limiter = SlidingWindowLimiter::new(2, Duration::from_secs(60));
/// let ip = "203.0.113.1".parse().unwrap();
///
/// assert!(limiter.check(ip).allowed);
/// assert!(limiter.check(ip).allowed);
/// let rejected = limiter.check(ip);
/// assert!(!rejected.allowed);
/// assert!(rejected.retry_after_secs > 0);
/// ```
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    /// Maximum admitted requests per window.
    max_requests: u32,
    /// Trailing window size.
    window: Duration,
    /// Per-client admitted-request timestamps, newest last.
    windows: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl SlidingWindowLimiter {
    /// Create a limiter admitting `max_requests` per `window`.
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Configured per-window limit.
    #[must_use]
    pub const fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Configured window size.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Check and record an admission attempt for `key` at the current
    /// instant.
    pub fn check(&self, key: IpAddr) -> AdmissionDecision {
        self.check_at(key, Instant::now())
    }

    /// Check and record an admission attempt for `key` at `now`.
    ///
    /// Prunes expired timestamps, then either appends `now` and admits,
    /// or rejects with the seconds remaining until the oldest recorded
    /// request leaves the window. Pruning and the admit decision happen
    /// under one lock so concurrent callers never over-admit a key.
    pub fn check_at(&self, key: IpAddr, now: Instant) -> AdmissionDecision {
        let mut windows = lock_unpoisoned(&self.windows);
        let timestamps = windows.entry(key).or_default();
        Self::prune(timestamps, now, self.window);

        if timestamps.len() >= self.max_requests as usize {
            // Oldest entry is the next to expire; newest-last ordering
            // makes it the front.
            let oldest = timestamps.first().copied().unwrap_or(now);
            let wait = self.window.saturating_sub(now.duration_since(oldest));
            tracing::warn!(
                client = %key,
                limit = self.max_requests,
                retry_after_secs = wait.as_secs().max(1),
                "admission rejected"
            );
            return AdmissionDecision {
                allowed: false,
                // Never tell a rejected client to wait zero seconds.
                retry_after_secs: wait.as_secs().max(1),
                remaining: 0,
            };
        }

        timestamps.push(now);
        #[allow(clippy::cast_possible_truncation)]
        let used = timestamps.len() as u32;
        AdmissionDecision {
            allowed: true,
            retry_after_secs: 0,
            remaining: self.max_requests.saturating_sub(used),
        }
    }

    /// Requests `key` has left in the window ending at the current
    /// instant.
    #[must_use]
    pub fn remaining(&self, key: IpAddr) -> u32 {
        self.remaining_at(key, Instant::now())
    }

    /// Requests `key` has left in the window ending at `now`.
    ///
    /// Pure query: counts live entries without recording anything.
    #[must_use]
    pub fn remaining_at(&self, key: IpAddr, now: Instant) -> u32 {
        let windows = lock_unpoisoned(&self.windows);
        let live = windows.get(&key).map_or(0, |timestamps| {
            timestamps
                .iter()
                .filter(|t| now.duration_since(**t) < self.window)
                .count()
        });
        #[allow(clippy::cast_possible_truncation)]
        self.max_requests.saturating_sub(live as u32)
    }

    /// Drop timestamps that have left the trailing window.
    fn prune(timestamps: &mut Vec<Instant>, now: Instant, window: Duration) {
        timestamps.retain(|t| now.duration_since(*t) < window);
    }
}

/// Lock a mutex, recovering the guard if a previous holder panicked.
///
/// The windows map holds only timestamps; a poisoned guard is still
/// internally consistent, and admission control failing closed here would
/// take the whole edge down.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([203, 0, 113, last])
    }

    #[test]
    fn admits_up_to_limit_within_window() {
        let limiter = SlidingWindowLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();

        for i in 0..3 {
            let decision = limiter.check_at(ip(1), now);
            assert!(decision.allowed, "request {i} should be admitted");
            assert_eq!(decision.remaining, 2 - i);
        }
    }

    #[test]
    fn rejects_over_limit_with_positive_retry_after() {
        let limiter = SlidingWindowLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at(ip(1), now).allowed);
        assert!(limiter.check_at(ip(1), now).allowed);

        let rejected = limiter.check_at(ip(1), now + Duration::from_secs(10));
        assert!(!rejected.allowed);
        assert_eq!(rejected.remaining, 0);
        // Oldest entry expires 60s after it was recorded; 50s remain.
        assert_eq!(rejected.retry_after_secs, 50);
    }

    #[test]
    fn admits_again_after_window_expiry() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at(ip(1), now).allowed);
        assert!(!limiter.check_at(ip(1), now + Duration::from_secs(30)).allowed);
        assert!(limiter.check_at(ip(1), now + Duration::from_secs(61)).allowed);
    }

    #[test]
    fn retry_after_is_never_zero() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at(ip(1), now).allowed);
        // Just shy of expiry: the exact remainder truncates to zero
        // seconds, which must be reported as one.
        let rejected = limiter.check_at(ip(1), now + Duration::from_millis(59_900));
        assert!(!rejected.allowed);
        assert_eq!(rejected.retry_after_secs, 1);
    }

    #[test]
    fn client_keys_are_independent() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at(ip(1), now).allowed);
        assert!(!limiter.check_at(ip(1), now).allowed);
        assert!(limiter.check_at(ip(2), now).allowed);
    }

    #[test]
    fn remaining_is_a_pure_query() {
        let limiter = SlidingWindowLimiter::new(5, Duration::from_secs(60));
        let now = Instant::now();

        limiter.check_at(ip(1), now);
        limiter.check_at(ip(1), now);

        assert_eq!(limiter.remaining_at(ip(1), now), 3);
        // Querying repeatedly must not consume budget.
        assert_eq!(limiter.remaining_at(ip(1), now), 3);
        assert_eq!(limiter.remaining_at(ip(9), now), 5);
    }

    #[test]
    fn remaining_floors_at_zero() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        limiter.check_at(ip(1), now);
        assert_eq!(limiter.remaining_at(ip(1), now), 0);
    }

    #[test]
    fn pruned_entries_free_budget() {
        let limiter = SlidingWindowLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();

        limiter.check_at(ip(1), now);
        limiter.check_at(ip(1), now + Duration::from_secs(30));

        // First entry has expired by now + 61s; one slot is free again.
        let decision = limiter.check_at(ip(1), now + Duration::from_secs(61));
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[test]
    fn concurrent_checks_never_over_admit() {
        use std::sync::Arc;

        let limiter = Arc::new(SlidingWindowLimiter::new(10, Duration::from_secs(60)));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let limiter = Arc::clone(&limiter);
            handles.push(std::thread::spawn(move || {
                let mut admitted = 0u32;
                for _ in 0..10 {
                    if limiter.check(ip(1)).allowed {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }

        let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 10, "exactly the configured limit may be admitted");
    }
}
