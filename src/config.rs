// src/config.rs

//! Configuration types for the admission controller

// dependencies
use crate::errors::AdmissionError;
use serde::Deserialize;
use std::time::Duration;

/// Default refill rate, in requests per second.
pub const DEFAULT_REFILL_RATE: f64 = 2.0;
/// Default bucket size.
pub const DEFAULT_BURST: u32 = 5;
/// How often idle clients are swept from the registry.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
/// How long a client may stay silent before its entry is evicted.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// Configuration for admission controller behavior.
///
/// Set once at startup; the controller takes ownership and never mutates it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    pub(crate) enabled: bool,
    pub(crate) refill_rate: f64,
    pub(crate) burst: u32,
    #[serde(rename = "sweep_interval_secs", deserialize_with = "secs")]
    pub(crate) sweep_interval: Duration,
    #[serde(rename = "idle_timeout_secs", deserialize_with = "secs")]
    pub(crate) idle_timeout: Duration,
}

fn secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refill_rate: DEFAULT_REFILL_RATE,
            burst: DEFAULT_BURST,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl AdmissionConfig {
    /// Create a new, enabled configuration with rate and burst settings
    pub fn new(refill_rate: f64, burst: u32) -> Self {
        Self {
            refill_rate,
            burst,
            ..Self::default()
        }
    }

    /// Configuration for pass-through mode: every request is admitted and
    /// no client state is recorded.
    pub fn disabled() -> Self {
        Self::default().enabled(false)
    }

    /// Builder-style: turn admission control on or off
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder-style: set refill rate in tokens per second
    pub fn rate(mut self, refill_rate: f64) -> Self {
        self.refill_rate = refill_rate;
        self
    }

    /// Builder-style: set burst capacity
    pub fn burst(mut self, burst: u32) -> Self {
        self.burst = burst;
        self
    }

    /// Builder-style: set how often the sweeper runs
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Builder-style: set how long an idle client is retained
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    pub fn burst_capacity(&self) -> u32 {
        self.burst
    }

    pub fn sweep_every(&self) -> Duration {
        self.sweep_interval
    }

    pub fn idle_after(&self) -> Duration {
        self.idle_timeout
    }

    /// Validate the configuration.
    ///
    /// Rate and burst are checked even when disabled so that flipping the
    /// switch on later cannot surface a bad value.
    pub fn validate(&self) -> Result<(), AdmissionError> {
        if !self.refill_rate.is_finite() || self.refill_rate <= 0.0 {
            return Err(AdmissionError::InvalidRate(self.refill_rate));
        }
        if self.burst < 1 {
            return Err(AdmissionError::InvalidBurst(self.burst));
        }
        if self.sweep_interval.is_zero() {
            return Err(AdmissionError::InvalidDuration("sweep interval"));
        }
        if self.idle_timeout.is_zero() {
            return Err(AdmissionError::InvalidDuration("idle timeout"));
        }
        Ok(())
    }
}
