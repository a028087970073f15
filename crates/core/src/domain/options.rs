// Wait Options (client-side polling configuration)

use crate::application::constants::{DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};
use crate::error::{ClientError, Result};
use std::time::Duration;

/// How long to wait for a task and how often to ask about it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Wall-clock budget for the whole wait
    pub timeout: Duration,
    /// Delay between two status fetches
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitOptions {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Build from fractional seconds, as most callers think about it
    ///
    /// # Errors
    /// `InvalidConfig` if either value is negative or not finite.
    pub fn from_secs_f64(timeout_secs: f64, interval_secs: f64) -> Result<Self> {
        let timeout = secs_to_duration("timeout", timeout_secs)?;
        let interval = secs_to_duration("interval", interval_secs)?;
        let options = Self::new(timeout, interval);
        options.validate()?;
        Ok(options)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// A zero timeout is fine (one fetch, then timeout); a zero interval
    /// would turn the wait into a busy loop.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(ClientError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn secs_to_duration(name: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| ClientError::InvalidConfig(format!("invalid {} {}: {}", name, secs, e)))
}
