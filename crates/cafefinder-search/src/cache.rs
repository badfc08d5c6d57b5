//! Session-lifetime cache of raw POI responses.
//!
//! Keys quantize the center to four decimal places (roughly 11 m) so repeated
//! searches from almost the same spot reuse one response. Entries are never
//! evicted.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cafefinder_core::{Coordinate, PoiElement, Radius};

/// `"<lat:.4>:<lon:.4>:<radius>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    #[must_use]
    pub fn new(center: Coordinate, radius: Radius) -> Self {
        Self(format!(
            "{:.4}:{:.4}:{radius}",
            quantize(center.lat()),
            quantize(center.lon())
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rounds to four decimals, halves away from zero. `{:.4}` alone rounds
/// exact binary ties to even.
fn quantize(degrees: f64) -> f64 {
    (degrees * 1e4).round() / 1e4
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unbounded map from [`CacheKey`] to the element list fetched for it.
///
/// Values are shared so a hit hands out the stored list without copying it.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<CacheKey, Arc<[PoiElement]>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<[PoiElement]>> {
        self.entries.get(key).cloned()
    }

    /// Stores `elements` under `key`, replacing any previous entry.
    pub fn put(&mut self, key: CacheKey, elements: Arc<[PoiElement]>) {
        self.entries.insert(key, elements);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
