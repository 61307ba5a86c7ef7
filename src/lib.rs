// src/lib.rs

//! # Flux Admission
//!
//! The admission and query-shaping layer every inbound request passes through
//! before it reaches domain logic:
//!
//! - [`AdmissionController`]: a per-client token bucket with a periodic sweep
//!   that evicts clients idle for longer than the configured timeout.
//! - [`QueryFilterSpec`]: validated paging and sorting for list endpoints,
//!   with the sort key resolved against a per-endpoint [`SortSafelist`], and
//!   [`Metadata`] describing the returned page.
//!
//! ## Quick Example
//!
//! ```rust
//! use flux_admission::{
//!     client_key_from_peer, AdmissionConfig, AdmissionController, FilterDefaults,
//!     QueryFilterSpec, QueryParams, SortSafelist,
//! };
//!
//! let limiter = AdmissionController::new(AdmissionConfig::new(2.0, 5)).unwrap();
//! let client = client_key_from_peer("203.0.113.7:51234").unwrap();
//! assert!(limiter.admit(client));
//!
//! let books = FilterDefaults::new(SortSafelist::symmetric(&["id", "title", "author"]).unwrap());
//! let params = QueryParams::from_pairs([("page", "2"), ("sort", "-title")]);
//! let filters = QueryFilterSpec::parse(&params, &books).validate().unwrap();
//!
//! assert_eq!(filters.order_by_clause(), "title DESC, id ASC");
//! assert_eq!((filters.limit(), filters.offset()), (10, 10));
//! assert_eq!(filters.metadata(25).last_page, 3);
//! ```

// private modules
mod admission;
mod client_key;
mod clock;
mod config;
mod entry;
mod errors;
mod filters;
mod metadata;
mod query;
mod validator;

// public API exports
pub use admission::{AdmissionController, AdmissionDecision};
pub use client_key::{client_key_from_peer, client_key_from_socket};
pub use clock::{Clock, SystemClock};
pub use config::{
    AdmissionConfig, DEFAULT_BURST, DEFAULT_IDLE_TIMEOUT, DEFAULT_REFILL_RATE,
    DEFAULT_SWEEP_INTERVAL,
};
pub use entry::ClientLimiterEntry;
pub use errors::{AdmissionError, FilterConfigError};
pub use filters::{
    FilterDefaults, QueryFilterSpec, SortDirection, SortOption, SortSafelist, ValidatedFilters,
    MAX_PAGE, MAX_PAGE_SIZE,
};
pub use metadata::Metadata;
pub use query::QueryParams;
pub use validator::ValidationErrors;
