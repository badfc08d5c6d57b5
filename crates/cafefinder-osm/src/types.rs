//! Wire types for the Overpass and Nominatim JSON responses.

use cafefinder_core::PoiElement;
use serde::Deserialize;

/// Overpass interpreter response. Only `elements` is read; a missing array
/// is treated as empty.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<PoiElement>,
}

/// One Nominatim search match. Coordinates arrive string-encoded.
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}
