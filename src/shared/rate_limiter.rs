use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter as GovernorRateLimiter,
};
use std::{num::NonZeroU32, sync::Arc, time::Duration};

type KeyedLimiter = GovernorRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Rate limiter for contact lookups
///
/// Tracks lookups per identification value so a single phone number or
/// email cannot be probed repeatedly.
/// Default: 20 lookups per 60 seconds.
#[derive(Clone)]
pub struct LookupRateLimiter {
    limiter: Arc<KeyedLimiter>,
}

impl LookupRateLimiter {
    pub fn new() -> Self {
        Self::with_config(20, Duration::from_secs(60))
    }

    pub fn with_config(max_attempts: u32, window: Duration) -> Self {
        let window = if window.is_zero() {
            Duration::from_secs(1)
        } else {
            window
        };

        Self {
            limiter: Arc::new(GovernorRateLimiter::keyed(quota(max_attempts, window))),
        }
    }

    /// Consume one lookup for `key`
    ///
    /// Returns Ok(()) if the request is allowed, Err(duration) if rate limited.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        let key = key.trim().to_lowercase();

        self.limiter
            .check_key(&key)
            .map_err(|negative| negative.wait_time_from(DefaultClock::default().now()))
    }

    /// Forget keys whose budget has fully refilled
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    pub fn tracked_keys(&self) -> usize {
        self.limiter.len()
    }
}

impl Default for LookupRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

fn quota(max_attempts: u32, window: Duration) -> Quota {
    let burst = NonZeroU32::new(max_attempts).unwrap_or(NonZeroU32::MIN);
    let period = window / burst.get();
    Quota::with_period(period)
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_within_limit() {
        let limiter = LookupRateLimiter::with_config(3, Duration::from_secs(60));
        let key = "0612345678";

        assert!(limiter.check(key).is_ok());
        assert!(limiter.check(key).is_ok());
        assert!(limiter.check(key).is_ok());
        assert!(limiter.check(key).is_err());
    }

    #[test]
    fn test_case_insensitive_keys() {
        let limiter = LookupRateLimiter::with_config(2, Duration::from_secs(60));

        assert!(limiter.check("Client@Example.fr").is_ok());
        assert!(limiter.check("client@example.fr").is_ok());
        assert!(limiter.check("CLIENT@EXAMPLE.FR").is_err());
    }

    #[test]
    fn test_independent_keys() {
        let limiter = LookupRateLimiter::with_config(1, Duration::from_secs(60));

        assert!(limiter.check("a@example.fr").is_ok());
        assert!(limiter.check("a@example.fr").is_err());
        assert!(limiter.check("b@example.fr").is_ok());
    }

    #[test]
    fn test_cleanup_keeps_partially_used_budget() {
        let limiter = LookupRateLimiter::with_config(3, Duration::from_secs(60));
        let key = "0612345678";
        assert!(limiter.check(key).is_ok());
        assert!(limiter.check(key).is_ok());

        limiter.cleanup();

        assert_eq!(limiter.tracked_keys(), 1);
        assert!(limiter.check(key).is_ok());
        assert!(limiter.check(key).is_err());
    }

    #[test]
    fn test_retry_after_reported() {
        let limiter = LookupRateLimiter::with_config(1, Duration::from_secs(60));
        let _ = limiter.check("a@example.fr");

        let wait = limiter.check("a@example.fr").unwrap_err();
        assert!(wait > Duration::from_secs(50));
        assert!(wait <= Duration::from_secs(60));
    }
}
