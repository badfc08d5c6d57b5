//! HTTP clients for the OpenStreetMap services the cafe finder talks to.
//!
//! [`OverpassClient`] runs the cafe query against an Overpass interpreter and
//! [`NominatimClient`] resolves free-text addresses. Both implement the
//! source traits from `cafefinder-core` so the search pipeline never sees
//! `reqwest` directly.

pub mod error;
pub mod nominatim;
pub mod overpass;
pub mod types;

pub use error::OsmError;
pub use nominatim::NominatimClient;
pub use overpass::{build_cafe_query, OverpassClient};
pub use types::{NominatimPlace, OverpassResponse};
