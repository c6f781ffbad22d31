//! Common traits for Tokenlens.
//!
//! These traits define the interfaces that different implementations can
//! satisfy, enabling modularity and testing.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::TokenMetadata;

// ═══════════════════════════════════════════════════════════════════════════════
// METADATA SOURCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for fetching token metadata.
///
/// Implementations might use:
/// - The HTTP metadata API (production)
/// - A canned in-memory map (testing)
///
/// A confirmed "not found" is a successful `Ok(None)`, never an error.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetches metadata for a token by its on-chain address.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::TokenLensError::Validation`] for an empty
    /// address, [`crate::TokenLensError::Timeout`] when the deadline is
    /// exceeded, and [`crate::TokenLensError::Http`] or
    /// [`crate::TokenLensError::UnexpectedStatus`] on transport failure.
    async fn token_metadata(&self, address: &str) -> Result<Option<TokenMetadata>>;
}
