use std::num::NonZeroU32;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

/// Injectable request-rate policy, keyed by client (IP). Decoupled from the
/// fetch/extract logic so tests can swap in an always-allow policy.
pub trait RatePolicy: Send + Sync {
    fn allow(&self, key: &str) -> bool;
}

/// Keyed token-bucket policy backed by governor
pub struct GovernorRatePolicy {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl GovernorRatePolicy {
    pub fn per_minute(limit: u32) -> Self {
        let limit = NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(limit)),
        }
    }
}

impl RatePolicy for GovernorRatePolicy {
    fn allow(&self, key: &str) -> bool {
        self.limiter.check_key(&key.to_string()).is_ok()
    }
}
