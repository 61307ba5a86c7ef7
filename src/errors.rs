// src/errors.rs

// error handling for admission control and filter configuration

// dependencies
use thiserror::Error;

/// Error type for AdmissionController configuration and client key extraction.
///
/// A denied request is not an error: `admit` reports it as `false`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdmissionError {
    /// refill rate must be a finite, positive number of tokens per second
    #[error("refill rate must be positive, got {0}")]
    InvalidRate(f64),
    /// burst must allow at least one request
    #[error("burst must be at least 1, got {0}")]
    InvalidBurst(u32),
    /// sweep interval and idle timeout must be non-zero
    #[error("{0} must be greater than zero")]
    InvalidDuration(&'static str),
    /// the transport address could not be turned into a client key
    #[error("unable to derive client key from peer address {addr:?}: {reason}")]
    ClientKey { addr: String, reason: &'static str },
}

/// Error type for per-endpoint filter configuration.
///
/// These are programming errors in how an endpoint declares its safelist,
/// caught once at startup rather than on every request.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterConfigError {
    #[error("sort safelist must not be empty")]
    EmptySafelist,
    #[error("sort key {0:?} does not name a column")]
    InvalidSortKey(&'static str),
    #[error("default sort {0:?} is not in the safelist")]
    DefaultSortNotAllowed(String),
    #[error("default page must be at least 1, got {0}")]
    InvalidDefaultPage(i64),
    #[error("default page size must be between 1 and 100, got {0}")]
    InvalidDefaultPageSize(i64),
}
