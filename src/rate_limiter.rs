// rate_limiter.rs
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Reject,
}

/// Sliding-window message counter keyed by user id.
///
/// Timestamps are seconds since the Unix epoch. A user's stale timestamps are
/// dropped only when that user sends again.
#[derive(Debug)]
pub struct RateLimiter {
    user_messages: HashMap<u64, Vec<f64>>,
    limit: usize,
    interval: f64,
}

impl RateLimiter {
    pub fn new(limit: usize, interval: f64) -> Self {
        Self {
            user_messages: HashMap::new(),
            limit,
            interval,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Records an arrival at `now` and decides whether it stays within the limit.
    ///
    /// Only timestamps with `now - t < interval` survive. `now` is not checked
    /// against earlier arrivals, so a timestamp newer than `now` is kept.
    pub fn check_and_record(&mut self, user_id: u64, now: f64) -> Decision {
        let interval = self.interval;
        let messages = self.user_messages.entry(user_id).or_default();
        messages.retain(|&t| now - t < interval);
        messages.push(now);
        log::debug!(
            "User {} has {} requests in last {}s",
            user_id,
            messages.len(),
            interval
        );
        if messages.len() > self.limit {
            Decision::Reject
        } else {
            Decision::Allow
        }
    }

    /// Number of stored timestamps for a user, without pruning.
    pub fn recent(&self, user_id: u64) -> usize {
        self.user_messages.get(&user_id).map_or(0, Vec::len)
    }
}
