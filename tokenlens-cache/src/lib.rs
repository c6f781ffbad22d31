//! # Tokenlens Cache
//!
//! Generic in-memory TTL cache with lazy eviction.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;

pub use cache::{CacheConfig, TtlCache};
