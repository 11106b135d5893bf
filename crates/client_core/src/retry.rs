//! Bounded exponential backoff.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_BASE: f64 = 2.0;
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// How many times to try and how long to wait in between.
///
/// The wait after failed attempt `n` (1-indexed) is `backoff_unit * backoff_base^n`,
/// so with the defaults a fetch sleeps 2s, then 4s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: f64,
    backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        backoff_base: f64,
        backoff_unit: Duration,
    ) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if !backoff_base.is_finite() || backoff_base <= 1.0 {
            return Err(ConfigError::NonGrowingBackoff(backoff_base));
        }
        if backoff_unit.is_zero() {
            return Err(ConfigError::ZeroBackoffUnit);
        }
        let policy = Self {
            max_attempts,
            backoff_base,
            backoff_unit,
        };
        // Nanosecond truncation and saturation at `Duration::MAX` can flatten the schedule.
        let mut previous = policy.delay_before(1);
        for attempt in 2..=max_attempts {
            let delay = policy.delay_before(attempt);
            if delay <= previous {
                return Err(ConfigError::NonGrowingBackoff(backoff_base));
            }
            previous = delay;
        }
        Ok(policy)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_base(&self) -> f64 {
        self.backoff_base
    }

    pub fn backoff_unit(&self) -> Duration {
        self.backoff_unit
    }

    /// Delay to wait before starting `attempt` (1-indexed). Zero for the first attempt.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let factor = self.backoff_base.powi(exponent);
        Duration::try_from_secs_f64(self.backoff_unit.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX)
    }

    pub(crate) fn context(&self) -> RetryContext {
        RetryContext {
            attempt: 0,
            max_attempts: self.max_attempts,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

/// Attempt bookkeeping for one logical fetch.
#[derive(Debug)]
pub(crate) struct RetryContext {
    attempt: u32,
    max_attempts: u32,
}

impl RetryContext {
    /// Starts the next attempt and returns its 1-indexed number.
    pub(crate) fn begin_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    pub(crate) fn attempts_made(&self) -> u32 {
        self.attempt
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}

#[cfg(test)]
#[path = "tests/retry_tests.rs"]
mod tests;
