//! Cache-fronted POI fetching.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cafefinder_core::{Coordinate, PoiElement, PoiSource, Radius, ResultSet};

use crate::cache::{CacheKey, QueryCache};
use crate::messages;
use crate::presentation::StatusSink;
use crate::rank::rank;

/// Fetches cafes from a [`PoiSource`], remembering every successful response
/// for the lifetime of the fetcher.
///
/// Concurrent misses for the same key are not coalesced: each one reaches
/// the source, and the last to complete overwrites the cache entry.
pub struct PoiFetcher<S> {
    source: S,
    cache: Mutex<QueryCache>,
}

impl<S: PoiSource> PoiFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: Mutex::new(QueryCache::new()),
        }
    }

    /// Returns the ranked cafes around `center`.
    ///
    /// 1. A cache hit is re-ranked against `center` and returned without
    ///    contacting the source or touching `status`.
    /// 2. On a miss, `status` receives the searching message, the source is
    ///    queried, and the raw elements are cached before ranking.
    ///
    /// # Errors
    ///
    /// Propagates the source error unchanged. The cache is not modified.
    pub async fn fetch(
        &self,
        center: Coordinate,
        radius: Radius,
        status: &dyn StatusSink,
    ) -> Result<ResultSet, S::Error> {
        let key = CacheKey::new(center, radius);
        let cached = self.lock_cache().get(&key);
        if let Some(elements) = cached {
            tracing::debug!(%key, count = elements.len(), "cache hit");
            return Ok(rank(&elements, center));
        }

        status.set_status(messages::SEARCHING);
        let elements: Arc<[PoiElement]> = self.source.cafes_around(center, radius).await?.into();
        tracing::info!(%key, count = elements.len(), "fetched cafes");

        self.lock_cache().put(key, Arc::clone(&elements));
        Ok(rank(&elements, center))
    }

    /// Number of distinct searches held in the cache.
    pub fn cached_searches(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn lock_cache(&self) -> MutexGuard<'_, QueryCache> {
        // Cache writes are single inserts; a panicked writer cannot leave it half-updated.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
