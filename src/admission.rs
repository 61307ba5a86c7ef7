// src/admission.rs

// flux-admission: per-client token bucket admission control.

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::AdmissionConfig;
use crate::entry::ClientLimiterEntry;
use crate::errors::AdmissionError;
use dashmap::DashMap;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant as TokioInstant, MissedTickBehavior};

/// The AdmissionController decides whether an inbound request may proceed.
/// K is the type used to identify clients (typically the peer IP as a String).
/// C is the clock type, defaulting to SystemClock.
///
/// The registry is a sharded `DashMap`: an `admit` call holds the write lock of
/// the one shard owning its key for the find-or-insert and the token update,
/// and the sweep holds each shard's write lock while it evicts. Calls on the
/// same key are therefore linearizable with each other and with eviction.
#[derive(Debug)]
pub struct AdmissionController<K, C = SystemClock>
where
    K: Hash + Eq,
    C: Clock,
{
    config: AdmissionConfig,
    clients: DashMap<K, ClientLimiterEntry>,
    clock: C,
}

impl<K> AdmissionController<K, SystemClock>
where
    K: Hash + Eq,
{
    /// Build a controller on the monotonic system clock.
    pub fn new(config: AdmissionConfig) -> Result<Self, AdmissionError> {
        Self::with_config(config, SystemClock::new())
    }
}

impl<K, C> AdmissionController<K, C>
where
    K: Hash + Eq,
    C: Clock,
{
    /// Create a new controller from a config object and a clock.
    pub fn with_config(config: AdmissionConfig, clock: C) -> Result<Self, AdmissionError> {
        config.validate()?;
        tracing::info!(
            enabled = config.enabled,
            refill_rate = config.refill_rate,
            burst = config.burst,
            idle_timeout_secs = config.idle_timeout.as_secs(),
            "admission controller configured"
        );
        Ok(Self {
            config,
            clients: DashMap::new(),
            clock,
        })
    }

    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Number of client keys currently holding limiter state.
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    /// Whether `key` currently holds limiter state.
    pub fn is_tracked<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.clients.contains_key(key)
    }

    /// Snapshot of the limiter state for `key`, if any.
    pub fn entry<Q>(&self, key: &Q) -> Option<ClientLimiterEntry>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.clients.get(key).map(|entry| entry.value().clone())
    }

    /// Admit or deny one request from `client`.
    ///
    /// `false` means the caller must answer with a rate-limit-exceeded
    /// response and do no further work for the request.
    pub fn admit(&self, client: K) -> bool {
        self.check(client).allowed
    }

    /// Admission check returning metadata suitable for response headers.
    pub fn check(&self, client: K) -> AdmissionDecision {
        if !self.config.enabled {
            return AdmissionDecision::pass_through();
        }

        let now = self.clock.now();
        // the shard lock is held until `entry` drops at the end of this scope
        let mut entry = self.clients.entry(client).or_insert_with(|| {
            ClientLimiterEntry::new(self.config.refill_rate, self.config.burst, now)
        });

        entry.touch(now);
        entry.refill(now);

        if entry.try_debit() {
            AdmissionDecision {
                allowed: true,
                remaining: entry.whole_tokens(),
                retry_after: None,
            }
        } else {
            let retry_after = Duration::from_nanos(entry.nanos_until_token());
            tracing::debug!(
                retry_after_ms = retry_after.as_millis() as u64,
                "admission denied"
            );
            AdmissionDecision {
                allowed: false,
                remaining: 0,
                retry_after: Some(retry_after),
            }
        }
    }

    /// Evict every client idle for longer than the configured timeout.
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        self.sweep_idle(self.config.idle_timeout)
    }

    /// Evict every client idle for longer than `max_idle`.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let now = self.clock.now();
        // a timeout beyond the clock's range means nothing is ever idle enough
        let max_idle_nanos = u64::try_from(max_idle.as_nanos()).unwrap_or(u64::MAX);
        let before = self.clients.len();
        self.clients
            .retain(|_, entry| entry.idle_for(now) <= max_idle_nanos);
        let removed = before.saturating_sub(self.clients.len());
        if removed > 0 {
            tracing::debug!(removed, remaining = self.clients.len(), "swept idle clients");
        }
        removed
    }
}

impl<K, C> AdmissionController<K, C>
where
    K: Hash + Eq + Send + Sync + 'static,
    C: Clock + 'static,
{
    /// Start the periodic sweep on the current tokio runtime.
    ///
    /// The task runs every `sweep_interval` for as long as the controller is
    /// alive: it holds only a weak reference and exits after the last `Arc`
    /// is dropped. Abort the returned handle to stop it earlier.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let controller: Weak<Self> = Arc::downgrade(self);
        let period = self.config.sweep_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(TokioInstant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(interval_secs = period.as_secs(), "admission sweeper started");
            loop {
                interval.tick().await;
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                controller.sweep();
            }
            tracing::info!("admission sweeper stopped");
        })
    }
}

/// Result of an admission check with metadata for HTTP responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionDecision {
    /// Whether the request should be processed
    pub allowed: bool,
    /// Whole tokens left in the client's bucket after this decision
    pub remaining: u32,
    /// How long until the client can expect to be admitted again (when denied)
    pub retry_after: Option<Duration>,
}

impl AdmissionDecision {
    fn pass_through() -> Self {
        Self {
            allowed: true,
            remaining: u32::MAX,
            retry_after: None,
        }
    }
}
