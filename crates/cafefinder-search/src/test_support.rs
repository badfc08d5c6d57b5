//! In-memory sources and a recording UI for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cafefinder_core::{
    AddressLookup, Coordinate, LocateError, LocationProvider, PlaceId, PoiElement, PoiSource,
    Radius,
};
use tokio::sync::Notify;

use crate::presentation::{MapDisplay, PlaceEntry, PlaceMarker, ResultsPanel, StatusSink};

#[derive(Debug, thiserror::Error)]
#[error("fake service unavailable")]
pub struct FakeError;

pub fn node(id: i64, name: &str, lat: f64, lon: f64) -> PoiElement {
    serde_json::from_value(serde_json::json!({
        "type": "node", "id": id, "lat": lat, "lon": lon, "tags": { "name": name }
    }))
    .expect("valid node json")
}

/// POI source with canned responses keyed by request latitude.
pub struct FakeSource {
    responses: Vec<(f64, Vec<PoiElement>)>,
    fallback: Option<Vec<PoiElement>>,
    /// Requests at this latitude wait for `Notify::notify_one` before answering.
    gate: Option<(f64, Arc<Notify>)>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn returning(elements: Vec<PoiElement>) -> Self {
        Self {
            responses: Vec::new(),
            fallback: Some(elements),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            responses: Vec::new(),
            fallback: None,
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn by_latitude(responses: Vec<(f64, Vec<PoiElement>)>) -> Self {
        Self {
            responses,
            fallback: None,
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn gated_at(mut self, lat: f64, gate: Arc<Notify>) -> Self {
        self.gate = Some((lat, gate));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PoiSource for FakeSource {
    type Error = FakeError;

    async fn cafes_around(
        &self,
        center: Coordinate,
        _radius: Radius,
    ) -> Result<Vec<PoiElement>, FakeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((lat, gate)) = &self.gate {
            if (center.lat() - lat).abs() < 1e-9 {
                gate.notified().await;
            }
        }
        self.responses
            .iter()
            .find(|(lat, _)| (center.lat() - lat).abs() < 1e-9)
            .map(|(_, elements)| elements.clone())
            .or_else(|| self.fallback.clone())
            .ok_or(FakeError)
    }
}

/// Address lookup with a single canned answer.
pub struct FakeLookup {
    answer: Result<Option<(f64, f64)>, FakeError>,
    calls: AtomicUsize,
    last_query: Mutex<Option<String>>,
}

impl FakeLookup {
    fn with(answer: Result<Option<(f64, f64)>, FakeError>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn found(lat: f64, lon: f64) -> Self {
        Self::with(Ok(Some((lat, lon))))
    }

    pub fn not_found() -> Self {
        Self::with(Ok(None))
    }

    pub fn failing() -> Self {
        Self::with(Err(FakeError))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }
}

impl AddressLookup for FakeLookup {
    type Error = FakeError;

    async fn lookup(&self, query: &str) -> Result<Option<Coordinate>, FakeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.to_owned());
        match &self.answer {
            Ok(Some((lat, lon))) => Ok(Some(Coordinate::new(*lat, *lon).unwrap())),
            Ok(None) => Ok(None),
            Err(_) => Err(FakeError),
        }
    }
}

/// Device location stand-in.
pub enum FakeLocation {
    Unsupported,
    At(Coordinate),
    Fails(LocateError),
    /// Never answers; exercises the timeout.
    Hangs,
}

impl LocationProvider for FakeLocation {
    fn is_supported(&self) -> bool {
        !matches!(self, FakeLocation::Unsupported)
    }

    async fn current_position(&self) -> Result<Coordinate, LocateError> {
        match self {
            FakeLocation::Unsupported => Err(LocateError::Unsupported),
            FakeLocation::At(c) => Ok(*c),
            FakeLocation::Fails(e) => Err(e.clone()),
            FakeLocation::Hangs => std::future::pending::<Result<Coordinate, LocateError>>().await,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Status(String),
    ShowPlaces(Vec<String>),
    ClearPanel,
    SetView(Coordinate, u8),
    AddMarker(PlaceId),
    ClearMarkers,
    PanTo(Coordinate),
    OpenPopup(PlaceId),
}

/// Records every sink call in order.
#[derive(Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingUi {
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn last_status(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            UiEvent::Status(s) => Some(s),
            _ => None,
        })
    }

    pub fn marker_count(&self) -> usize {
        let mut count = 0;
        for event in self.events() {
            match event {
                UiEvent::AddMarker(_) => count += 1,
                UiEvent::ClearMarkers => count = 0,
                _ => {}
            }
        }
        count
    }

    fn push(&self, event: UiEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl StatusSink for RecordingUi {
    fn set_status(&self, message: &str) {
        self.push(UiEvent::Status(message.to_owned()));
    }
}

impl ResultsPanel for RecordingUi {
    fn show_places(&self, entries: &[PlaceEntry]) {
        self.push(UiEvent::ShowPlaces(
            entries.iter().map(|e| e.name.clone()).collect(),
        ));
    }

    fn clear(&self) {
        self.push(UiEvent::ClearPanel);
    }
}

impl MapDisplay for RecordingUi {
    fn set_view(&self, center: Coordinate, zoom: u8) {
        self.push(UiEvent::SetView(center, zoom));
    }

    fn add_marker(&self, marker: &PlaceMarker) {
        self.push(UiEvent::AddMarker(marker.id));
    }

    fn clear_markers(&self) {
        self.push(UiEvent::ClearMarkers);
    }

    fn pan_to(&self, at: Coordinate) {
        self.push(UiEvent::PanTo(at));
    }

    fn open_popup(&self, id: PlaceId) {
        self.push(UiEvent::OpenPopup(id));
    }
}
