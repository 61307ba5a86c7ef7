// src/entry.rs

// per-client token bucket state

/// Bucket arithmetic runs in nano-tokens: one token is 10^9 units.
const UNITS_PER_TOKEN: u64 = 1_000_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Token bucket state for a single client key.
///
/// Entries live only inside the AdmissionController registry; every mutation
/// happens while the registry shard holding the entry is write-locked.
/// Invariant: `0 <= tokens <= burst`.
///
/// Tokens are integers (nano-tokens) and the sub-unit remainder of each refill
/// is carried forward, so refilling in many small steps adds exactly what a
/// single refill over the same span would.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientLimiterEntry {
    units: u64,
    // fractional units owed from earlier refills, scaled by NANOS_PER_SEC
    carry: u128,
    refill_rate: f64,
    units_per_sec: u64,
    burst_units: u64,
    last_seen: u64,
    last_refill: u64,
}

impl ClientLimiterEntry {
    /// A fresh entry starts with a full bucket.
    pub(crate) fn new(refill_rate: f64, burst: u32, now: u64) -> Self {
        let burst_units = u64::from(burst) * UNITS_PER_TOKEN;
        // rounding up keeps `floor(rate * t)` whole tokens reachable after `t` seconds
        let units_per_sec = (refill_rate * UNITS_PER_TOKEN as f64).ceil().max(1.0) as u64;
        Self {
            units: burst_units,
            carry: 0,
            refill_rate,
            units_per_sec,
            burst_units,
            last_seen: now,
            last_refill: now,
        }
    }

    pub fn tokens(&self) -> f64 {
        self.units as f64 / UNITS_PER_TOKEN as f64
    }

    /// Tokens available right now, rounded down.
    pub fn whole_tokens(&self) -> u32 {
        (self.units / UNITS_PER_TOKEN) as u32
    }

    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    pub fn burst(&self) -> f64 {
        (self.burst_units / UNITS_PER_TOKEN) as f64
    }

    pub fn last_seen(&self) -> u64 {
        self.last_seen
    }

    pub fn last_refill(&self) -> u64 {
        self.last_refill
    }

    /// Record activity. A reading older than the stored one is ignored so
    /// `last_seen` never moves backwards when callers race on the clock.
    pub(crate) fn touch(&mut self, now: u64) {
        self.last_seen = self.last_seen.max(now);
    }

    /// Add tokens for the time elapsed since the last refill, capped at `burst`.
    pub(crate) fn refill(&mut self, now: u64) {
        if now <= self.last_refill {
            return;
        }
        let elapsed = u128::from(now - self.last_refill);
        self.last_refill = now;

        let owed = elapsed * u128::from(self.units_per_sec) + self.carry;
        let gained = owed / NANOS_PER_SEC;
        let room = u128::from(self.burst_units - self.units);
        if gained >= room {
            self.units = self.burst_units;
            self.carry = 0;
        } else {
            // gained < room <= u64::MAX
            self.units += gained as u64;
            self.carry = owed % NANOS_PER_SEC;
        }
    }

    /// Take one token if a whole one is available.
    pub(crate) fn try_debit(&mut self) -> bool {
        if self.units >= UNITS_PER_TOKEN {
            self.units -= UNITS_PER_TOKEN;
            true
        } else {
            false
        }
    }

    /// Time until a whole token will be available, zero if one already is.
    pub(crate) fn nanos_until_token(&self) -> u64 {
        if self.units >= UNITS_PER_TOKEN {
            return 0;
        }
        let deficit = u128::from(UNITS_PER_TOKEN - self.units) * NANOS_PER_SEC - self.carry;
        let rate = u128::from(self.units_per_sec);
        u64::try_from(deficit.div_ceil(rate)).unwrap_or(u64::MAX)
    }

    /// Idle time as of `now`, in nanoseconds.
    pub(crate) fn idle_for(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_seen)
    }
}
