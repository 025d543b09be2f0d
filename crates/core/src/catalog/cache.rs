use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{Catalog, CatalogSource};
use crate::errors::CatalogError;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: StdMutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: StdMutex::new(start) }
    }

    pub fn advance(&self, by: Duration) {
        let by = TimeDelta::from_std(by).unwrap_or(TimeDelta::MAX);
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now = now.checked_add_signed(by).unwrap_or(DateTime::<Utc>::MAX_UTC);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    snapshot: Arc<Catalog>,
}

/// Memoizes a [`CatalogSource`] for `ttl`.
///
/// Snapshots are immutable and shared; a reload swaps in a new snapshot and
/// never touches one a reader already holds. Failed loads are not cached.
pub struct CachedCatalog {
    source: Arc<dyn CatalogSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl CachedCatalog {
    pub fn new(source: Arc<dyn CatalogSource>, ttl: Duration) -> Self {
        Self::with_clock(source, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(source: Arc<dyn CatalogSource>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock, ttl, entry: Mutex::new(None) }
    }

    pub async fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.lock().await.as_ref().map(|entry| entry.fetched_at)
    }

    pub async fn invalidate(&self) {
        self.entry.lock().await.take();
    }

    /// Current snapshot, reloading from the source when the cached one is older
    /// than the TTL.
    pub async fn snapshot(&self) -> Result<Arc<Catalog>, CatalogError> {
        let mut entry = self.entry.lock().await;
        let now = self.clock.now();

        if let Some(cached) = entry.as_ref() {
            if self.is_fresh(cached.fetched_at, now) {
                debug!(
                    event_name = "catalog.cache.hit",
                    location = %self.source.location(),
                    fetched_at = %cached.fetched_at,
                    "serving cached catalog snapshot"
                );
                return Ok(Arc::clone(&cached.snapshot));
            }
        }

        let snapshot = Arc::new(self.source.load_all().await?);
        info!(
            event_name = "catalog.cache.reloaded",
            location = %self.source.location(),
            product_count = snapshot.len(),
            ttl_secs = self.ttl.as_secs(),
            "catalog snapshot loaded"
        );
        *entry = Some(CacheEntry { fetched_at: now, snapshot: Arc::clone(&snapshot) });
        Ok(snapshot)
    }

    fn is_fresh(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let ttl = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX);
        now.signed_duration_since(fetched_at) < ttl
    }
}

#[async_trait]
impl CatalogSource for CachedCatalog {
    fn location(&self) -> String {
        format!("cache({})", self.source.location())
    }

    async fn load_all(&self) -> Result<Catalog, CatalogError> {
        self.snapshot().await.map(|snapshot| snapshot.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use super::{CachedCatalog, Clock, ManualClock};
    use crate::catalog::{Catalog, CatalogSource};
    use crate::domain::product::Product;
    use crate::errors::CatalogError;

    const HOUR: Duration = Duration::from_secs(3600);

    /// Returns the queued results in order, then repeats the last one.
    struct ScriptedSource {
        calls: AtomicUsize,
        results: Mutex<Vec<Result<Catalog, CatalogError>>>,
    }

    impl ScriptedSource {
        fn new(results: Vec<Result<Catalog, CatalogError>>) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), results: Mutex::new(results) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogSource for ScriptedSource {
        fn location(&self) -> String {
            "scripted".to_string()
        }

        async fn load_all(&self) -> Result<Catalog, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut results = self.results.lock().expect("lock");
            if results.len() > 1 {
                results.remove(0)
            } else {
                results[0].clone()
            }
        }
    }

    fn catalog(name: &str) -> Catalog {
        Catalog::new(vec![Product::new("yd1", name)])
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()))
    }

    #[tokio::test]
    async fn serves_same_snapshot_within_ttl() {
        let source = ScriptedSource::new(vec![Ok(catalog("first")), Ok(catalog("second"))]);
        let clock = clock();
        let cache = CachedCatalog::with_clock(source.clone(), HOUR, clock.clone());

        let first = cache.snapshot().await.expect("load");
        clock.advance(Duration::from_secs(3599));
        let second = cache.snapshot().await.expect("cached");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn reloads_once_ttl_has_elapsed() {
        let source = ScriptedSource::new(vec![Ok(catalog("first")), Ok(catalog("second"))]);
        let clock = clock();
        let cache = CachedCatalog::with_clock(source.clone(), HOUR, clock.clone());

        cache.snapshot().await.expect("load");
        clock.advance(HOUR);
        let reloaded = cache.snapshot().await.expect("reload");

        assert_eq!(reloaded.names(), vec!["second"]);
        assert_eq!(source.calls(), 2);
        assert_eq!(cache.last_fetched_at().await, Some(clock.now()));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let failure = CatalogError::NotFound { location: "scripted".to_string() };
        let source = ScriptedSource::new(vec![Err(failure.clone()), Ok(catalog("recovered"))]);
        let cache = CachedCatalog::with_clock(source.clone(), HOUR, clock());

        assert_eq!(cache.snapshot().await.expect_err("first load fails"), failure);
        assert!(cache.last_fetched_at().await.is_none());

        let recovered = cache.snapshot().await.expect("second load succeeds");
        assert_eq!(recovered.names(), vec!["recovered"]);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let source = ScriptedSource::new(vec![Ok(catalog("first")), Ok(catalog("second"))]);
        let cache = CachedCatalog::with_clock(source.clone(), HOUR, clock());

        cache.snapshot().await.expect("load");
        cache.invalidate().await;
        let reloaded = cache.snapshot().await.expect("reload");

        assert_eq!(reloaded.names(), vec!["second"]);
    }

    #[tokio::test]
    async fn zero_ttl_always_reloads() {
        let source = ScriptedSource::new(vec![Ok(catalog("only"))]);
        let cache = CachedCatalog::with_clock(source.clone(), Duration::ZERO, clock());

        cache.snapshot().await.expect("load");
        cache.snapshot().await.expect("load");

        assert_eq!(source.calls(), 2);
    }
}
