//! Seams between the search pipeline and the outside world.
//!
//! The HTTP clients in `cafefinder-osm` implement [`PoiSource`] and
//! [`AddressLookup`]; the CLI supplies a [`LocationProvider`]. Tests swap in
//! in-memory fakes.

use std::future::Future;

use thiserror::Error;

use crate::geo::{Coordinate, Radius};
use crate::place::PoiElement;

/// Query service returning cafe elements around a point.
pub trait PoiSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches every cafe element within `radius` of `center`.
    ///
    /// An absent element list in the response is reported as an empty `Vec`.
    fn cafes_around(
        &self,
        center: Coordinate,
        radius: Radius,
    ) -> impl Future<Output = Result<Vec<PoiElement>, Self::Error>> + Send;
}

/// Free-text address resolution.
pub trait AddressLookup: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolves `query` to its best match, or `None` when nothing matched.
    fn lookup(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, Self::Error>> + Send;
}

/// Why the device position could not be obtained.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocateError {
    #[error("geolocation is not supported")]
    Unsupported,

    #[error("geolocation permission denied")]
    Denied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("geolocation timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },
}

/// Device geolocation.
pub trait LocationProvider: Send + Sync {
    /// Whether this device can report a position at all.
    fn is_supported(&self) -> bool;

    fn current_position(&self) -> impl Future<Output = Result<Coordinate, LocateError>> + Send;
}
