//! Shared defaults for the Tokenlens crates.

use std::time::Duration;

/// Default time-to-live for cached metadata entries (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Default request timeout for the metadata client, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default base URL of the metadata API.
pub const DEFAULT_API_URL: &str = "https://api.bullx.io/v1";

/// Environment variable overriding the metadata API base URL.
pub const ENV_API_URL: &str = "TOKENLENS_API_URL";

/// Environment variable overriding the client timeout (milliseconds).
pub const ENV_TIMEOUT_MS: &str = "TOKENLENS_TIMEOUT_MS";
