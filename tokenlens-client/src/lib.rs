//! # Tokenlens Client
//!
//! HTTP client for the token metadata API.
//!
//! A confirmed "not found" (HTTP 404) is surfaced as `Ok(None)`, never as
//! an error; transport failures, timeouts, and unexpected statuses map to
//! the distinct variants of `TokenLensError`.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;

pub use client::{ClientConfig, MetadataClient};
