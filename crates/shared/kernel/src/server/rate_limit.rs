//! Sliding-window limiter for archive downloads.

use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Allows `limit` hits per key inside any `window`-long interval.
#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    hits: Mutex<FxHashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit: usize::try_from(limit).unwrap_or(usize::MAX),
            window,
            hits: Mutex::new(FxHashMap::default()),
        }
    }

    /// Records a hit for `key`.
    ///
    /// # Errors
    /// Returns how long to wait until the oldest hit leaves the window when `key` is over
    /// the limit. Rejected hits are not recorded.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut hits = self.hits.lock();

        // Drop keys whose whole history has expired so the map stays bounded.
        hits.retain(|_, times| times.back().is_some_and(|last| now.duration_since(*last) < self.window));

        let times = hits.entry(key.to_owned()).or_default();
        while times.front().is_some_and(|first| now.duration_since(*first) >= self.window) {
            times.pop_front();
        }

        if times.len() >= self.limit {
            let oldest = times.front().copied().unwrap_or(now);
            return Err(self.window.saturating_sub(now.duration_since(oldest)));
        }

        times.push_back(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_after_limit_and_recovers() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("1.2.3.4", start).is_ok());
        assert!(limiter.check_at("1.2.3.4", start + Duration::from_secs(1)).is_ok());

        let wait = limiter.check_at("1.2.3.4", start + Duration::from_secs(2)).unwrap_err();
        assert_eq!(wait, Duration::from_secs(58));

        assert!(limiter.check_at("1.2.3.4", start + Duration::from_secs(61)).is_ok());
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a", now).is_ok());
        assert!(limiter.check_at("b", now).is_ok());
        assert!(limiter.check_at("a", now).is_err());
    }

    #[test]
    fn zero_limit_rejects_everything() {
        let limiter = RateLimiter::new(0, Duration::from_secs(1));
        assert!(limiter.check("x").is_err());
    }
}
