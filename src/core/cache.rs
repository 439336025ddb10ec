use crate::core::rates::{RateError, RateProvider, RateTable};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Default validity window for a fetched table.
pub const DEFAULT_TTL_MINUTES: i64 = 60;

/// Source of the current time, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A table together with the moment it was fetched. Always replaced whole.
struct CacheEntry {
    table: Arc<RateTable>,
    fetched_at: DateTime<Utc>,
}

/// Process-wide cache of the latest rate table.
///
/// Readers clone an `Arc` to a complete table, so a concurrent refresh can
/// never expose a half-written table. The lock is never held across the
/// network call; concurrent refreshes are allowed and the last write wins.
pub struct RateCache {
    provider: Arc<dyn RateProvider>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: RwLock<Option<CacheEntry>>,
}

impl RateCache {
    pub fn new(provider: Arc<dyn RateProvider>, ttl: Duration) -> Self {
        Self::with_clock(provider, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(provider: Arc<dyn RateProvider>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            clock,
            ttl,
            state: RwLock::new(None),
        }
    }

    /// Returns the cached table while it is fresh, otherwise fetches a new one.
    ///
    /// A failed fetch leaves the previous entry untouched and hands the error
    /// back to the caller.
    #[instrument(name = "RateCacheGet", skip(self))]
    pub async fn get_rates(&self) -> Result<Arc<RateTable>, RateError> {
        if let Some(table) = self.fresh().await {
            debug!("Cache HIT");
            return Ok(table);
        }
        debug!("Cache MISS");

        match self.provider.fetch_latest().await {
            Ok(table) => {
                let table = Arc::new(table);
                let fetched_at = self.clock.now();
                *self.state.write().await = Some(CacheEntry {
                    table: Arc::clone(&table),
                    fetched_at,
                });
                info!(entries = table.len(), %fetched_at, "Cache PUT");
                Ok(table)
            }
            Err(e) => {
                warn!(error = %e, "Rate refresh failed, cache left unchanged");
                Err(e)
            }
        }
    }

    async fn fresh(&self) -> Option<Arc<RateTable>> {
        let state = self.state.read().await;
        let entry = state.as_ref()?;
        let age = self.clock.now().signed_duration_since(entry.fetched_at);
        (age < self.ttl).then(|| Arc::clone(&entry.table))
    }
}
