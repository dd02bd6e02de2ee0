use std::time::Duration;

use rand::Rng;

use crate::import::api::ImportJobError;

/// Bounded exponential backoff with jitter for failed import job requests
///
/// `max_attempts` counts the first request, so `max_attempts = 1` never retries.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    /// Extra random delay, as a fraction of the backoff (0.0 - 1.0)
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            multiplier: 2.0,
            max_delay: Duration::from_secs(5),
            jitter: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Give up on the first failure
    pub fn none() -> RetryPolicy {
        RetryPolicy { max_attempts: 1, ..Default::default() }
    }

    /// Should a request that failed on attempt `attempt` (1-based) be sent again?
    pub fn should_retry(&self, err: &ImportJobError, attempt: u32) -> bool {
        err.is_retryable() && attempt < self.max_attempts
    }

    /// Delay before the attempt after `attempt`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let mut secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);

        if self.jitter > 0.0 {
            let jitter = rand::thread_rng().gen::<f64>() * self.jitter;
            secs *= 1.0 + jitter;
        }

        // clamp before converting, an overflowing exponent gives inf
        Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
    }
}
