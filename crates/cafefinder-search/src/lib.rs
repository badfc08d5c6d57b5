//! Location search and ranking pipeline.
//!
//! A [`Session`] ties together the [`PoiFetcher`] (cache + POI source), the
//! [`Geocoder`] and the injected presentation sinks. Every user action
//! (start, locate, find, clear, select) is a `Session` method; failures are
//! turned into status messages at that boundary and logged with `tracing`.

pub mod cache;
pub mod fetcher;
pub mod geocoder;
pub mod messages;
pub mod presentation;
pub mod rank;
pub mod session;

#[cfg(test)]
mod test_support;

pub use cache::{CacheKey, QueryCache};
pub use fetcher::PoiFetcher;
pub use geocoder::{GeocodeError, Geocoder};
pub use presentation::{
    escape_html, MapDisplay, PlaceEntry, PlaceMarker, Popup, Presentation, ResultsPanel,
    StatusSink,
};
pub use rank::rank;
pub use session::{SearchOutcome, Session, SessionSettings, SessionState};
