//! # Tokenlens Core
//!
//! Core types, errors, and traits shared by the Tokenlens crates.
//!
//! This crate provides the foundational building blocks used by the cache,
//! client, and fetch-coordinator crates:
//!
//! - **Types**: the [`TokenMetadata`] record returned by the metadata API
//! - **Errors**: the [`TokenLensError`] hierarchy with context
//! - **Constants**: default TTL, timeout, and API endpoint
//! - **Traits**: the [`MetadataSource`] seam for pluggable fetch clients
//!
//! ## Example
//!
//! ```rust
//! use tokenlens_core::TokenMetadata;
//!
//! let meta = TokenMetadata::new("So11111111111111111111111111111111111111112");
//! let json = serde_json::to_string(&meta).unwrap();
//! assert!(json.contains("address"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, TokenLensError};
pub use traits::*;
pub use types::*;
