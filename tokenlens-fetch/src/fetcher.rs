//! Metadata-fetch coordinator.
//!
//! Turns a token address into metadata with caching, observable
//! loading/error state, and forced-refresh support. One coordinator
//! instance serves one subject address; the cache is injected and may be
//! shared process-wide, so independent coordinators observe each other's
//! cached results.
//!
//! Caching policy: only positive results are memoized. A confirmed
//! "not found" and any failure leave the cache untouched, so a transient
//! failure never evicts a previously cached good value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use tokenlens_cache::TtlCache;
use tokenlens_client::MetadataClient;
use tokenlens_core::error::TokenLensError;
use tokenlens_core::traits::MetadataSource;
use tokenlens_core::types::TokenMetadata;
use tokenlens_core::DEFAULT_CACHE_TTL;

/// Observable state of a coordinator instance.
///
/// After a settled attempt, at most one of `data`/`error` is populated.
/// Both absent with `loading = false` is the valid "not requested" state
/// (address absent or fetching disabled).
#[derive(Clone, Debug, Default)]
pub struct FetchState {
    /// Metadata from the last settled successful attempt.
    pub data: Option<TokenMetadata>,
    /// True while a request is in flight.
    pub loading: bool,
    /// Normalized error from the last settled failed attempt.
    pub error: Option<Arc<TokenLensError>>,
}

/// Coordinator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// TTL in seconds applied when writing fetched metadata to the cache
    pub cache_ttl_seconds: u64,
    /// Whether fetching is enabled at all
    pub enabled: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: DEFAULT_CACHE_TTL.as_secs(),
            enabled: true,
        }
    }
}

impl FetchConfig {
    /// Sets the cache TTL in seconds.
    pub fn with_cache_ttl_seconds(mut self, seconds: u64) -> Self {
        self.cache_ttl_seconds = seconds;
        self
    }

    /// Disables fetching entirely.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Coordinates metadata fetches for a single token address.
///
/// Concurrent fetches for the same address are NOT deduplicated here:
/// each call issues its own request, and the cache is the only dedup
/// mechanism once a prior request has completed and written a value.
pub struct MetadataFetcher {
    address: Option<String>,
    source: Arc<dyn MetadataSource>,
    cache: Arc<TtlCache<TokenMetadata>>,
    config: FetchConfig,
    state: RwLock<FetchState>,
    // Sequence of the most recently issued request; completions carrying
    // an older sequence are discarded (stale-completion guard).
    seq: AtomicU64,
}

impl MetadataFetcher {
    /// Creates a coordinator with an injected source and shared cache.
    pub fn new(
        address: Option<String>,
        source: Arc<dyn MetadataSource>,
        cache: Arc<TtlCache<TokenMetadata>>,
        config: FetchConfig,
    ) -> Self {
        Self {
            address,
            source,
            cache,
            config,
            state: RwLock::new(FetchState::default()),
            seq: AtomicU64::new(0),
        }
    }

    /// Creates a coordinator backed by a default `MetadataClient`.
    pub fn with_defaults(address: Option<String>, cache: Arc<TtlCache<TokenMetadata>>) -> Self {
        Self::new(
            address,
            Arc::new(MetadataClient::new()),
            cache,
            FetchConfig::default(),
        )
    }

    /// Returns the subject address, if any.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> FetchState {
        self.state.read().clone()
    }

    /// Fetches metadata, consulting the cache first.
    ///
    /// With an absent/empty address or fetching disabled, performs no
    /// network activity and leaves the state untouched. On a cache hit
    /// the cached value is adopted without invoking the source.
    ///
    /// Returns a snapshot of the state after settling.
    #[instrument(skip(self), fields(address = self.address.as_deref()))]
    pub async fn fetch(&self) -> FetchState {
        self.run(false).await
    }

    /// Fetches metadata unconditionally, bypassing the cache read.
    ///
    /// Still writes through on success, so a forced refresh refreshes or
    /// extends an existing cache entry.
    #[instrument(skip(self), fields(address = self.address.as_deref()))]
    pub async fn refetch(&self) -> FetchState {
        self.run(true).await
    }

    async fn run(&self, force: bool) -> FetchState {
        let address = match self.address.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => a,
            _ => return self.state(),
        };
        if !self.config.enabled {
            return self.state();
        }

        if !force {
            if let Some(cached) = self.cache.get(address) {
                debug!(address, "Cache hit");
                let mut state = self.state.write();
                state.data = Some(cached);
                state.loading = false;
                state.error = None;
                return state.clone();
            }
        }

        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }
        debug!(address, force, "Cache miss, fetching");

        let result = self.source.token_metadata(address).await;

        // Write-through happens regardless of staleness: the guard below
        // protects this instance's state, not the shared cache.
        if let Ok(Some(meta)) = &result {
            self.cache.set_with_ttl(
                address,
                meta.clone(),
                Duration::from_secs(self.config.cache_ttl_seconds),
            );
        }

        let mut state = self.state.write();
        if self.seq.load(Ordering::SeqCst) != seq {
            debug!(address, seq, "Discarding stale completion");
            return state.clone();
        }

        match result {
            Ok(Some(meta)) => {
                debug!(address, "Fetched metadata");
                state.data = Some(meta);
                state.error = None;
            }
            Ok(None) => {
                debug!(address, "Token not found, nothing cached");
                state.data = None;
                state.error = None;
            }
            Err(e) => {
                warn!(address, error = %e, "Metadata fetch failed");
                state.data = None;
                state.error = Some(Arc::new(e));
            }
        }
        state.loading = false;
        state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// What a scripted source should do for one invocation.
    enum Step {
        Reply(Option<TokenMetadata>),
        Fail,
        DelayedReply(Duration, TokenMetadata),
    }

    /// Mock source that replays a script, one step per call, repeating the
    /// last step once exhausted.
    struct ScriptedSource {
        steps: Vec<Step>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataSource for ScriptedSource {
        async fn token_metadata(
            &self,
            _address: &str,
        ) -> tokenlens_core::Result<Option<TokenMetadata>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let step = &self.steps[n.min(self.steps.len() - 1)];
            match step {
                Step::Reply(meta) => Ok(meta.clone()),
                Step::Fail => Err(TokenLensError::Http("connection reset".into())),
                Step::DelayedReply(delay, meta) => {
                    tokio::time::sleep(*delay).await;
                    Ok(Some(meta.clone()))
                }
            }
        }
    }

    fn meta(name: &str) -> TokenMetadata {
        let mut m = TokenMetadata::new("TokenAddr1111111111111111111111111111111111");
        m.name = Some(name.into());
        m
    }

    fn shared_cache() -> Arc<TtlCache<TokenMetadata>> {
        Arc::new(TtlCache::default())
    }

    fn fetcher(
        address: Option<&str>,
        source: Arc<ScriptedSource>,
        cache: Arc<TtlCache<TokenMetadata>>,
    ) -> MetadataFetcher {
        MetadataFetcher::new(
            address.map(String::from),
            source,
            cache,
            FetchConfig::default(),
        )
    }

    const ADDR: &str = "TokenAddr1111111111111111111111111111111111";

    #[tokio::test]
    async fn absent_address_performs_no_fetch() {
        let source = ScriptedSource::new(vec![Step::Reply(Some(meta("SOL")))]);
        let f = fetcher(None, source.clone(), shared_cache());

        let state = f.fetch().await;

        assert!(state.data.is_none());
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn empty_address_performs_no_fetch() {
        let source = ScriptedSource::new(vec![Step::Reply(Some(meta("SOL")))]);
        let f = fetcher(Some("   "), source.clone(), shared_cache());

        let state = f.fetch().await;

        assert!(state.data.is_none());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn disabled_performs_no_fetch() {
        let source = ScriptedSource::new(vec![Step::Reply(Some(meta("SOL")))]);
        let f = MetadataFetcher::new(
            Some(ADDR.into()),
            source.clone(),
            shared_cache(),
            FetchConfig::default().disabled(),
        );

        let state = f.fetch().await;

        assert!(state.data.is_none());
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn success_populates_data_and_cache() {
        let source = ScriptedSource::new(vec![Step::Reply(Some(meta("SOL")))]);
        let cache = shared_cache();
        let f = fetcher(Some(ADDR), source.clone(), cache.clone());

        let state = f.fetch().await;

        assert_eq!(state.data.as_ref().unwrap().name.as_deref(), Some("SOL"));
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(source.calls(), 1);
        assert!(cache.has(ADDR));
    }

    #[tokio::test]
    async fn second_fetcher_hits_cache_with_zero_extra_calls() {
        let source = ScriptedSource::new(vec![Step::Reply(Some(meta("SOL")))]);
        let cache = shared_cache();

        let first = fetcher(Some(ADDR), source.clone(), cache.clone());
        first.fetch().await;
        assert_eq!(source.calls(), 1);

        let second = fetcher(Some(ADDR), source.clone(), cache.clone());
        let state = second.fetch().await;

        assert_eq!(state.data.as_ref().unwrap().name.as_deref(), Some("SOL"));
        assert!(state.error.is_none());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn not_found_is_not_cached_and_requeries() {
        let source = ScriptedSource::new(vec![Step::Reply(None)]);
        let cache = shared_cache();
        let f = fetcher(Some(ADDR), source.clone(), cache.clone());

        let state = f.fetch().await;
        assert!(state.data.is_none());
        assert!(state.error.is_none());
        assert!(!cache.has(ADDR));

        // Negative results are not memoized, so a second lookup re-queries.
        f.fetch().await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn failure_surfaces_error_and_leaves_cache_untouched() {
        let source = ScriptedSource::new(vec![Step::Fail, Step::Reply(Some(meta("SOL")))]);
        let cache = shared_cache();
        let f = fetcher(Some(ADDR), source.clone(), cache.clone());

        let state = f.fetch().await;
        assert!(state.data.is_none());
        assert!(matches!(
            state.error.as_deref(),
            Some(TokenLensError::Http(_))
        ));
        assert!(!cache.has(ADDR));

        // A retry re-invokes the source and clears the error on success.
        let state = f.fetch().await;
        assert_eq!(source.calls(), 2);
        assert!(state.error.is_none());
        assert_eq!(state.data.as_ref().unwrap().name.as_deref(), Some("SOL"));
    }

    #[tokio::test]
    async fn failure_does_not_evict_previous_good_value() {
        let source = ScriptedSource::new(vec![Step::Reply(Some(meta("SOL"))), Step::Fail]);
        let cache = shared_cache();
        let f = fetcher(Some(ADDR), source.clone(), cache.clone());

        f.fetch().await;
        assert!(cache.has(ADDR));

        let state = f.refetch().await;
        assert!(state.error.is_some());
        // The cached value from the first fetch survives the failure.
        assert_eq!(
            cache.get(ADDR).unwrap().name.as_deref(),
            Some("SOL")
        );
    }

    #[tokio::test]
    async fn refetch_bypasses_cache_and_overwrites_entry() {
        let source = ScriptedSource::new(vec![
            Step::Reply(Some(meta("SOL"))),
            Step::Reply(Some(meta("SOL v2"))),
        ]);
        let cache = shared_cache();
        let f = fetcher(Some(ADDR), source.clone(), cache.clone());

        f.fetch().await;
        assert_eq!(source.calls(), 1);

        let state = f.refetch().await;
        assert_eq!(source.calls(), 2);
        assert_eq!(state.data.as_ref().unwrap().name.as_deref(), Some("SOL v2"));
        assert_eq!(cache.get(ADDR).unwrap().name.as_deref(), Some("SOL v2"));
    }

    #[tokio::test]
    async fn later_ttl_does_not_retroactively_change_stored_expiry() {
        let source = ScriptedSource::new(vec![Step::Reply(Some(meta("SOL")))]);
        let cache = shared_cache();

        let long = MetadataFetcher::new(
            Some(ADDR.into()),
            source.clone(),
            cache.clone(),
            FetchConfig::default().with_cache_ttl_seconds(3600),
        );
        long.fetch().await;
        assert_eq!(source.calls(), 1);

        // A second fetcher with a zero TTL hits the cache; the hit path
        // has no write-through, so the stored entry keeps its expiry.
        let short = MetadataFetcher::new(
            Some(ADDR.into()),
            source.clone(),
            cache.clone(),
            FetchConfig::default().with_cache_ttl_seconds(0),
        );
        let state = short.fetch().await;
        assert_eq!(state.data.as_ref().unwrap().name.as_deref(), Some("SOL"));
        assert_eq!(source.calls(), 1);

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(cache.has(ADDR));
    }

    #[tokio::test]
    async fn zero_ttl_write_through_does_not_dedup() {
        let source = ScriptedSource::new(vec![Step::Reply(Some(meta("SOL")))]);
        let cache = shared_cache();
        let f = MetadataFetcher::new(
            Some(ADDR.into()),
            source.clone(),
            cache,
            FetchConfig::default().with_cache_ttl_seconds(0),
        );

        f.fetch().await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        f.fetch().await;

        // The zero-TTL entry expired before the second fetch could hit it.
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn loading_is_observable_while_in_flight() {
        let source = ScriptedSource::new(vec![Step::DelayedReply(
            Duration::from_millis(100),
            meta("SOL"),
        )]);
        let f = Arc::new(fetcher(Some(ADDR), source, shared_cache()));

        let handle = {
            let f = Arc::clone(&f);
            tokio::spawn(async move { f.fetch().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(f.state().loading);

        let settled = handle.await.unwrap();
        assert!(!settled.loading);
        assert!(settled.data.is_some());
    }

    #[tokio::test]
    async fn stale_completion_does_not_overwrite_newer_result() {
        let source = ScriptedSource::new(vec![
            Step::DelayedReply(Duration::from_millis(200), meta("stale")),
            Step::DelayedReply(Duration::from_millis(10), meta("fresh")),
        ]);
        let f = Arc::new(fetcher(Some(ADDR), source, shared_cache()));

        let slow = {
            let f = Arc::clone(&f);
            tokio::spawn(async move { f.fetch().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let fast = {
            let f = Arc::clone(&f);
            tokio::spawn(async move { f.refetch().await })
        };

        fast.await.unwrap();
        slow.await.unwrap();

        // The earlier-initiated request completed last; its result was
        // discarded in favor of the newer one.
        let state = f.state();
        assert_eq!(state.data.as_ref().unwrap().name.as_deref(), Some("fresh"));
        assert!(!state.loading);
        assert!(state.error.is_none());
    }
}
