//! Time-bounded cache in front of a [`BlockSource`].
//!
//! The whole block list is cached as one snapshot with one fetch timestamp.
//! A snapshot younger than the TTL (24 hours by default) is served as-is;
//! anything older, or no snapshot at all, triggers a fresh fetch.
//!
//! # Concurrency
//!
//! The snapshot sits behind an async `RwLock` that is never held across the
//! fetch. Two requests missing the cache at the same time will both fetch;
//! whichever finishes last wins. A failed fetch leaves the previous snapshot
//! untouched, so the next request retries.

use crate::errors::BlockError;
use crate::models::Block;
use crate::scrapers::BlockSource;
use crate::selection::select_index;
use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// How long a fetched block list stays fresh.
pub const DEFAULT_TTL: TimeDelta = TimeDelta::hours(24);

/// Source of wall-clock time and the calendar date used for selection.
pub trait Clock: Send + Sync {
    /// Current wall-clock instant.
    fn now(&self) -> DateTime<Utc>;

    /// Today's calendar date, as used for the selection seed.
    fn today(&self) -> NaiveDate;
}

/// The system clock; the selection date follows the server's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A fetched list together with the instant it was fetched.
#[derive(Debug, Clone)]
struct Snapshot {
    blocks: Arc<Vec<Block>>,
    fetched_at: DateTime<Utc>,
}

/// Caches the block list produced by `S` and picks the block of the day.
#[derive(Debug)]
pub struct BlockCache<S, C = SystemClock> {
    source: S,
    clock: C,
    ttl: TimeDelta,
    snapshot: RwLock<Option<Snapshot>>,
}

impl<S: BlockSource> BlockCache<S, SystemClock> {
    /// Create an empty cache over `source` using the system clock.
    pub fn new(source: S) -> Self {
        Self::with_clock(source, SystemClock)
    }
}

impl<S: BlockSource, C: Clock> BlockCache<S, C> {
    /// Create an empty cache over `source` with a custom clock.
    pub fn with_clock(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            ttl: DEFAULT_TTL,
            snapshot: RwLock::new(None),
        }
    }

    /// Override the freshness window.
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    /// The configured freshness window.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Whether a snapshot exists and is younger than the TTL.
    pub async fn is_valid(&self) -> bool {
        let guard = self.snapshot.read().await;
        guard
            .as_ref()
            .is_some_and(|snapshot| self.is_fresh(snapshot))
    }

    fn is_fresh(&self, snapshot: &Snapshot) -> bool {
        self.clock.now() - snapshot.fetched_at < self.ttl
    }

    /// Return the cached block list, fetching a new one if the cache is stale.
    ///
    /// Fetch errors are returned unchanged and leave the cache as it was.
    #[instrument(level = "debug", skip_all)]
    pub async fn entries(&self) -> Result<Arc<Vec<Block>>, BlockError> {
        {
            let guard = self.snapshot.read().await;
            if let Some(snapshot) = guard.as_ref().filter(|s| self.is_fresh(s)) {
                debug!(
                    count = snapshot.blocks.len(),
                    fetched_at = %snapshot.fetched_at,
                    "Serving cached block list"
                );
                return Ok(Arc::clone(&snapshot.blocks));
            }
        }

        info!("Block cache stale or empty; fetching");
        let blocks = match self.source.fetch().await {
            Ok(blocks) => Arc::new(blocks),
            Err(e) => {
                warn!(error = %e, "Block fetch failed; cache left unchanged");
                return Err(e);
            }
        };

        let fetched_at = self.clock.now();
        *self.snapshot.write().await = Some(Snapshot {
            blocks: Arc::clone(&blocks),
            fetched_at,
        });
        info!(count = blocks.len(), %fetched_at, "Block cache refreshed");

        Ok(blocks)
    }

    /// Drop the cached snapshot; the next call to [`entries`](Self::entries) fetches.
    pub async fn clear(&self) {
        *self.snapshot.write().await = None;
        info!("Block cache cleared");
    }

    /// The block of the day: today's date-seeded pick from the cached list.
    #[instrument(level = "info", skip_all)]
    pub async fn todays_block(&self) -> Result<Block, BlockError> {
        let blocks = self.entries().await?;
        let today = self.clock.today();
        let index = select_index(today, blocks.len())?;
        let block = blocks[index].clone();

        info!(%today, index, name = %block.name, "Selected block of the day");
        Ok(block)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Clock that only moves when told to.
    #[derive(Debug)]
    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub fn at(rfc3339: &str) -> Self {
            Self {
                now: Mutex::new(DateTime::parse_from_rfc3339(rfc3339).unwrap().to_utc()),
            }
        }

        pub fn advance(&self, by: TimeDelta) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for Arc<ManualClock> {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }

        fn today(&self) -> NaiveDate {
            self.now().date_naive()
        }
    }

    /// Source returning canned results and counting fetches.
    #[derive(Debug, Default)]
    pub struct StubSource {
        pub fetches: AtomicUsize,
        pub results: Mutex<Vec<Result<Vec<Block>, BlockError>>>,
        pub fallback: Vec<Block>,
    }

    impl StubSource {
        pub fn returning(blocks: Vec<Block>) -> Self {
            Self {
                fallback: blocks,
                ..Default::default()
            }
        }

        /// Queue a one-off result served before falling back to the default list.
        pub fn then(self, result: Result<Vec<Block>, BlockError>) -> Self {
            self.results.lock().unwrap().push(result);
            self
        }

        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl BlockSource for Arc<StubSource> {
        async fn fetch(&self) -> Result<Vec<Block>, BlockError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let queued = {
                let mut results = self.results.lock().unwrap();
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            };
            queued.unwrap_or_else(|| Ok(self.fallback.clone()))
        }
    }

    pub fn blocks(n: usize) -> Vec<Block> {
        (0..n)
            .map(|i| Block {
                name: format!("Block {i}"),
                image: format!("https://minecraft.wiki/images/Block_{i}.png"),
            })
            .collect()
    }

    fn cache_with(
        source: StubSource,
        at: &str,
    ) -> (BlockCache<Arc<StubSource>, Arc<ManualClock>>, Arc<StubSource>, Arc<ManualClock>) {
        let source = Arc::new(source);
        let clock = Arc::new(ManualClock::at(at));
        let cache = BlockCache::with_clock(Arc::clone(&source), Arc::clone(&clock));
        (cache, source, clock)
    }

    #[tokio::test]
    async fn test_empty_cache_is_invalid() {
        let (cache, source, _) = cache_with(StubSource::returning(blocks(3)), "2024-01-01T12:00:00Z");
        assert!(!cache.is_valid().await);
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_repeated_calls_fetch_once() {
        let (cache, source, clock) =
            cache_with(StubSource::returning(blocks(50)), "2024-01-01T08:00:00Z");

        let first = cache.todays_block().await.unwrap();
        for _ in 0..10 {
            clock.advance(TimeDelta::minutes(30));
            assert_eq!(cache.todays_block().await.unwrap(), first);
        }

        assert_eq!(source.fetch_count(), 1);
        assert!(cache.is_valid().await);
        // seed 20240101 with 50 entries picks index 48
        assert_eq!(first.name, "Block 48");
    }

    #[tokio::test]
    async fn test_refetch_after_ttl() {
        let (cache, source, clock) =
            cache_with(StubSource::returning(blocks(5)), "2024-01-01T00:00:00Z");

        cache.entries().await.unwrap();
        clock.advance(TimeDelta::hours(24) - TimeDelta::milliseconds(1));
        assert!(cache.is_valid().await);
        cache.entries().await.unwrap();
        assert_eq!(source.fetch_count(), 1);

        clock.advance(TimeDelta::milliseconds(1));
        assert!(!cache.is_valid().await);
        cache.entries().await.unwrap();
        cache.entries().await.unwrap();
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_custom_ttl() {
        let source = Arc::new(StubSource::returning(blocks(2)));
        let clock = Arc::new(ManualClock::at("2024-01-01T00:00:00Z"));
        let cache = BlockCache::with_clock(Arc::clone(&source), Arc::clone(&clock))
            .with_ttl(TimeDelta::hours(1));
        assert_eq!(cache.ttl(), TimeDelta::hours(1));

        cache.entries().await.unwrap();
        clock.advance(TimeDelta::hours(1));
        cache.entries().await.unwrap();
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_stale_snapshot_and_retries() {
        let stub = StubSource::returning(blocks(3))
            .then(Ok(blocks(3)))
            .then(Err(BlockError::Transport {
                message: "HTTP error: Bad Gateway".to_string(),
                code: 502,
            }));
        let (cache, source, clock) = cache_with(stub, "2024-01-01T00:00:00Z");

        cache.entries().await.unwrap();
        clock.advance(TimeDelta::hours(25));

        let err = cache.entries().await.unwrap_err();
        assert_eq!(err.code(), Some(502));
        assert!(!cache.is_valid().await);

        let again = cache.entries().await.unwrap();
        assert_eq!(again.len(), 3);
        assert_eq!(source.fetch_count(), 3);
        assert!(cache.is_valid().await);
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let (cache, source, _) = cache_with(StubSource::returning(blocks(3)), "2024-01-01T00:00:00Z");

        cache.entries().await.unwrap();
        cache.clear().await;
        assert!(!cache.is_valid().await);

        cache.entries().await.unwrap();
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_selection_changes_with_date() {
        let (cache, _, clock) = cache_with(StubSource::returning(blocks(50)), "2024-01-01T12:00:00Z");

        assert_eq!(cache.todays_block().await.unwrap().name, "Block 48");
        clock.advance(TimeDelta::days(1));
        assert_eq!(cache.todays_block().await.unwrap().name, "Block 37");
    }

    #[tokio::test]
    async fn test_empty_list_fails_selection() {
        let (cache, _, _) = cache_with(StubSource::returning(Vec::new()), "2024-01-01T00:00:00Z");

        let err = cache.todays_block().await.unwrap_err();
        assert!(matches!(err, BlockError::EmptySource));
        assert_eq!(err.code(), Some(500));
    }
}
