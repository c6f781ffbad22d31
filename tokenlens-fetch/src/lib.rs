//! # Tokenlens Fetch
//!
//! Coordinates token-metadata fetches around a shared TTL cache: one
//! coordinator per subject address, owning loading/error state, forced
//! refresh, write-through caching, and stale-completion protection.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod fetcher;

pub use fetcher::{FetchConfig, FetchState, MetadataFetcher};
