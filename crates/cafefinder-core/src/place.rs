//! POI element and ranked-result model.
//!
//! [`PoiElement`] mirrors one entry of the POI service's `elements` array.
//! [`PlaceResult`] is the presentation-ready record the ranking stage builds
//! from it, and [`ResultSet`] is the ordered collection handed to the UI.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Display name used when an element carries no `name` tag.
pub const DEFAULT_PLACE_NAME: &str = "Unnamed Cafe";

/// Geometry class of a POI element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Node => write!(f, "node"),
            ElementKind::Way => write!(f, "way"),
            ElementKind::Relation => write!(f, "relation"),
        }
    }
}

/// Bare lat/lon pair as it appears in the `center` sub-object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// One raw element returned by the POI service.
///
/// Points carry `lat`/`lon` directly; ways and relations carry a precomputed
/// `center` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<LatLon>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl PoiElement {
    #[must_use]
    pub fn place_id(&self) -> PlaceId {
        PlaceId {
            kind: self.kind,
            id: self.id,
        }
    }

    /// Representative coordinate: the node itself, or the centroid for
    /// ways and relations. `None` when the relevant fields are missing or
    /// out of range.
    #[must_use]
    pub fn position(&self) -> Option<Coordinate> {
        let (lat, lon) = match self.kind {
            ElementKind::Node => (self.lat?, self.lon?),
            ElementKind::Way | ElementKind::Relation => {
                let center = self.center?;
                (center.lat, center.lon)
            }
        };
        Coordinate::new(lat, lon).ok()
    }

    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// Identity of a place: element kind plus source id (`node/123`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlaceId {
    pub kind: ElementKind,
    pub id: i64,
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// A ranked place: the element's display fields plus its resolved position
/// and distance from the search center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceResult {
    pub id: PlaceId,
    pub name: String,
    pub street: Option<String>,
    pub opening_hours: Option<String>,
    pub position: Coordinate,
    pub distance_m: f64,
}

impl PlaceResult {
    /// Builds a result from a raw element whose position has already been
    /// resolved and measured.
    #[must_use]
    pub fn from_element(element: &PoiElement, position: Coordinate, distance_m: f64) -> Self {
        Self {
            id: element.place_id(),
            name: element
                .tag("name")
                .unwrap_or(DEFAULT_PLACE_NAME)
                .to_owned(),
            street: element.tag("addr:street").map(str::to_owned),
            opening_hours: element.tag("opening_hours").map(str::to_owned),
            position,
            distance_m,
        }
    }

    /// Distance rounded to whole meters, as shown to users.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn rounded_distance_m(&self) -> i64 {
        self.distance_m.round() as i64
    }
}

/// Places ordered ascending by distance. An empty set is a valid outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    places: Vec<PlaceResult>,
}

impl ResultSet {
    /// Wraps places that the caller has already sorted by distance.
    #[must_use]
    pub fn from_sorted(places: Vec<PlaceResult>) -> Self {
        debug_assert!(places
            .windows(2)
            .all(|w| w[0].distance_m <= w[1].distance_m));
        Self { places }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlaceResult> {
        self.places.iter()
    }

    #[must_use]
    pub fn get(&self, id: &PlaceId) -> Option<&PlaceResult> {
        self.places.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PlaceResult] {
        &self.places
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a PlaceResult;
    type IntoIter = std::slice::Iter<'a, PlaceResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.places.iter()
    }
}
