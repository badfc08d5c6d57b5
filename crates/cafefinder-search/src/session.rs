//! One user's search session.
//!
//! A [`Session`] owns the cache-fronted fetcher, the geocoder, the currently
//! displayed results and the presentation sinks. Each public `async` method is
//! one user action; it drives the state machine
//!
//! ```text
//! Idle -> Locating | Geocoding -> Fetching -> Ranked | Empty | Error
//! ```
//!
//! and turns every failure into a status message plus a `tracing` event. The
//! message takes the place of the results list; markers stay on the map.
//!
//! Actions may overlap. Each one takes a ticket from a generation counter and
//! only the holder of the newest ticket may draw into the presentation; older
//! actions finish their network work (a fetch still fills the cache) and
//! report [`SearchOutcome::Superseded`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use cafefinder_core::{
    AddressLookup, AppConfig, Coordinate, LocateError, LocationProvider, PlaceId, PoiSource,
    Radius, ResultSet,
};

use crate::fetcher::PoiFetcher;
use crate::geocoder::{GeocodeError, Geocoder};
use crate::messages;
use crate::presentation::{PlaceEntry, PlaceMarker, Presentation};

/// Zoom used for the initial view.
pub const STARTUP_ZOOM: u8 = 13;

/// Zoom used after locating the device or resolving an address.
pub const FOCUS_ZOOM: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Locating,
    Geocoding,
    Fetching,
    Ranked,
    Empty,
    Error,
}

/// How a single action ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// At least one cafe was found and rendered.
    Ranked(ResultSet),
    Empty,
    FetchFailed,
    /// Blank address; nothing was sent.
    EmptyQuery,
    AddressNotFound,
    GeocodeFailed,
    LocationUnavailable(LocateError),
    /// A newer action started before this one finished.
    Superseded,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub default_center: Coordinate,
    pub default_radius: Radius,
    pub locate_timeout: Duration,
    pub startup_locate_timeout: Duration,
}

impl From<&AppConfig> for SessionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            default_center: config.default_center,
            default_radius: config.default_radius,
            locate_timeout: Duration::from_millis(config.locate_timeout_ms),
            startup_locate_timeout: Duration::from_millis(config.startup_locate_timeout_ms),
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: SessionState,
    radius: Radius,
    displayed: ResultSet,
}

pub struct Session<S, L> {
    fetcher: PoiFetcher<S>,
    geocoder: Geocoder<L>,
    ui: Presentation,
    settings: SessionSettings,
    inner: Mutex<Inner>,
    generation: AtomicU64,
}

impl<S: PoiSource, L: AddressLookup> Session<S, L> {
    pub fn new(source: S, lookup: L, ui: Presentation, settings: SessionSettings) -> Self {
        let inner = Inner {
            state: SessionState::Idle,
            radius: settings.default_radius,
            displayed: ResultSet::default(),
        };
        Self {
            fetcher: PoiFetcher::new(source),
            geocoder: Geocoder::new(lookup),
            ui,
            settings,
            inner: Mutex::new(inner),
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn radius(&self) -> Radius {
        self.lock().radius
    }

    /// Radius used by every later search. Does not re-run the current one.
    pub fn set_radius(&self, radius: Radius) {
        tracing::debug!(radius_m = radius.meters(), "radius changed");
        self.lock().radius = radius;
    }

    /// Results currently on screen, nearest first.
    pub fn displayed(&self) -> ResultSet {
        self.lock().displayed.clone()
    }

    pub fn fetcher(&self) -> &PoiFetcher<S> {
        &self.fetcher
    }

    pub fn geocoder(&self) -> &Geocoder<L> {
        &self.geocoder
    }

    /// Initial auto-locate.
    ///
    /// With a position, the map opens there at [`STARTUP_ZOOM`] and cafes are
    /// fetched. Otherwise the map opens at the configured default center and
    /// the user is told how to search manually.
    pub async fn start<P: LocationProvider>(&self, location: &P) -> SearchOutcome {
        let default_center = self.settings.default_center;
        if !location.is_supported() {
            tracing::info!("geolocation unsupported, opening at default center");
            self.ui.map.set_view(default_center, STARTUP_ZOOM);
            self.fail(messages::STARTUP_UNSUPPORTED, SessionState::Idle);
            return SearchOutcome::LocationUnavailable(LocateError::Unsupported);
        }

        let ticket = self.begin(SessionState::Locating);
        match current_position(location, self.settings.startup_locate_timeout).await {
            Ok(center) => {
                if !self.is_current(ticket) {
                    return SearchOutcome::Superseded;
                }
                self.ui.map.set_view(center, STARTUP_ZOOM);
                self.fetch_and_render(ticket, center, self.radius()).await
            }
            Err(e) => {
                tracing::info!(error = %e, "startup geolocation failed, opening at default center");
                if !self.is_current(ticket) {
                    return SearchOutcome::Superseded;
                }
                self.ui.map.set_view(default_center, STARTUP_ZOOM);
                self.fail(messages::STARTUP_FALLBACK, SessionState::Idle);
                SearchOutcome::LocationUnavailable(e)
            }
        }
    }

    /// "My location": searches around the device position.
    pub async fn locate<P: LocationProvider>(&self, location: &P) -> SearchOutcome {
        if !location.is_supported() {
            self.fail(messages::LOCATE_UNSUPPORTED, SessionState::Error);
            return SearchOutcome::LocationUnavailable(LocateError::Unsupported);
        }

        let ticket = self.begin(SessionState::Locating);
        self.ui.status.set_status(messages::LOCATING);
        match current_position(location, self.settings.locate_timeout).await {
            Ok(center) => self.search_from(ticket, center).await,
            Err(e) => {
                tracing::warn!(error = %e, "geolocation failed");
                if !self.is_current(ticket) {
                    return SearchOutcome::Superseded;
                }
                self.fail(messages::LOCATE_FAILED, SessionState::Error);
                SearchOutcome::LocationUnavailable(e)
            }
        }
    }

    /// Resolves `address` and searches around the match.
    ///
    /// Blank input is rejected before any request.
    pub async fn find_address(&self, address: &str) -> SearchOutcome {
        if address.trim().is_empty() {
            self.fail(messages::EMPTY_ADDRESS, SessionState::Idle);
            return SearchOutcome::EmptyQuery;
        }

        let ticket = self.begin(SessionState::Geocoding);
        self.ui.status.set_status(messages::GEOCODING);
        match self.geocoder.geocode(address).await {
            Ok(center) => self.search_from(ticket, center).await,
            // Blank input returned early above.
            Err(GeocodeError::EmptyQuery) => {
                self.set_state(SessionState::Idle);
                SearchOutcome::EmptyQuery
            }
            Err(GeocodeError::NotFound(query)) => {
                tracing::info!(%query, "address not found");
                if !self.is_current(ticket) {
                    return SearchOutcome::Superseded;
                }
                self.fail(messages::ADDRESS_NOT_FOUND, SessionState::Error);
                SearchOutcome::AddressNotFound
            }
            Err(e @ GeocodeError::Lookup(_)) => {
                tracing::error!(error = %e, "geocoding failed");
                if !self.is_current(ticket) {
                    return SearchOutcome::Superseded;
                }
                self.fail(messages::GEOCODING_FAILED, SessionState::Error);
                SearchOutcome::GeocodeFailed
            }
        }
    }

    /// Searches around a known coordinate, recentering the map at
    /// [`FOCUS_ZOOM`].
    pub async fn search_at(&self, center: Coordinate) -> SearchOutcome {
        let ticket = self.begin(SessionState::Fetching);
        self.search_from(ticket, center).await
    }

    /// Removes all markers and list entries and supersedes any in-flight
    /// action.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        {
            let mut inner = self.lock();
            inner.state = SessionState::Idle;
            inner.displayed = ResultSet::default();
        }
        self.ui.map.clear_markers();
        self.ui.panel.clear();
        self.ui.status.set_status(messages::CLEARED);
    }

    /// Focuses a displayed place: pans to it and opens its popup.
    ///
    /// Returns `false` when `id` is not among the displayed results.
    pub fn select(&self, id: PlaceId) -> bool {
        let position = self.lock().displayed.get(&id).map(|place| place.position);
        let Some(position) = position else {
            tracing::debug!(%id, "selected place is not displayed");
            return false;
        };
        self.ui.map.pan_to(position);
        self.ui.map.open_popup(id);
        true
    }

    async fn search_from(&self, ticket: u64, center: Coordinate) -> SearchOutcome {
        if !self.is_current(ticket) {
            return SearchOutcome::Superseded;
        }
        self.ui.map.set_view(center, FOCUS_ZOOM);
        self.fetch_and_render(ticket, center, self.radius()).await
    }

    async fn fetch_and_render(
        &self,
        ticket: u64,
        center: Coordinate,
        radius: Radius,
    ) -> SearchOutcome {
        self.set_state(SessionState::Fetching);
        let result = self
            .fetcher
            .fetch(center, radius, &*self.ui.status)
            .await;

        if !self.is_current(ticket) {
            tracing::debug!(ticket, "discarding superseded search result");
            return SearchOutcome::Superseded;
        }

        match result {
            Ok(places) => self.render(places),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    %center,
                    radius_m = radius.meters(),
                    "cafe fetch failed"
                );
                self.fail(messages::FETCH_FAILED, SessionState::Error);
                SearchOutcome::FetchFailed
            }
        }
    }

    fn render(&self, places: ResultSet) -> SearchOutcome {
        self.ui.map.clear_markers();
        self.ui.panel.clear();

        if places.is_empty() {
            self.ui.status.set_status(messages::NO_RESULTS);
            let mut inner = self.lock();
            inner.state = SessionState::Empty;
            inner.displayed = places;
            return SearchOutcome::Empty;
        }

        for place in &places {
            self.ui.map.add_marker(&PlaceMarker::from(place));
        }
        let entries: Vec<PlaceEntry> = places.iter().map(PlaceEntry::from).collect();
        self.ui.panel.show_places(&entries);

        let mut inner = self.lock();
        inner.state = SessionState::Ranked;
        inner.displayed = places.clone();
        SearchOutcome::Ranked(places)
    }

    /// Ends an action with `message` in place of the results list. Markers
    /// and the map view are left as they are.
    fn fail(&self, message: &str, state: SessionState) {
        {
            let mut inner = self.lock();
            inner.state = state;
            inner.displayed = ResultSet::default();
        }
        self.ui.panel.clear();
        self.ui.status.set_status(message);
    }

    /// Starts a new action and returns its ticket.
    fn begin(&self, state: SessionState) -> u64 {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(state);
        ticket
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    fn set_state(&self, state: SessionState) {
        self.lock().state = state;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Asks `location` for the device position, giving up after `limit`.
async fn current_position<P: LocationProvider>(
    location: &P,
    limit: Duration,
) -> Result<Coordinate, LocateError> {
    match tokio::time::timeout(limit, location.current_position()).await {
        Ok(position) => position,
        Err(_) => Err(LocateError::Timeout {
            after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
