use crate::core::cache::RateCache;
use crate::core::fallback;
use crate::core::rates::RateTable;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Live,
    Fallback,
}

/// The table a conversion will use, plus the error that forced a fallback.
#[derive(Debug, Clone)]
pub struct RateResolution {
    pub table: Arc<RateTable>,
    pub source: RateSource,
    pub error: Option<String>,
}

/// Asks the cache for rates and substitutes the static table on failure.
pub async fn resolve_rates(cache: &RateCache) -> RateResolution {
    match cache.get_rates().await {
        Ok(table) => RateResolution {
            table,
            source: RateSource::Live,
            error: None,
        },
        Err(e) => {
            debug!(error = %e, "Using fallback rates");
            RateResolution {
                table: Arc::new(fallback::rates()),
                source: RateSource::Fallback,
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::tests::{ScriptedProvider, table};
    use crate::core::rates::RateError;
    use chrono::Duration;

    #[tokio::test]
    async fn test_live_rates_pass_through() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(table(&[
            ("USD", 1.0),
            ("EUR", 0.92),
        ]))]));
        let cache = RateCache::new(provider, Duration::minutes(60));

        let resolution = resolve_rates(&cache).await;
        assert_eq!(resolution.source, RateSource::Live);
        assert!(resolution.error.is_none());
        assert_eq!(resolution.table.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_falls_back_with_error_text() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(RateError::RemoteStatus(500))]));
        let cache = RateCache::new(provider, Duration::minutes(60));

        let resolution = resolve_rates(&cache).await;
        assert_eq!(resolution.source, RateSource::Fallback);
        assert_eq!(*resolution.table, fallback::rates());
        assert_eq!(
            resolution.error.as_deref(),
            Some("rate provider returned status 500")
        );
    }
}
