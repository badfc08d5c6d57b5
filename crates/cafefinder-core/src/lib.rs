//! Shared domain types for the cafe finder workspace.
//!
//! Holds the geographic primitives, the POI element and ranked result model,
//! the traits that data sources implement, and the environment-driven
//! application config.

pub mod app_config;
pub mod config;
pub mod error;
pub mod geo;
pub mod place;
pub mod source;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, GeoError};
pub use geo::{distance_m, Coordinate, Radius, EARTH_RADIUS_M};
pub use place::{
    ElementKind, LatLon, PlaceId, PlaceResult, PoiElement, ResultSet, DEFAULT_PLACE_NAME,
};
pub use source::{AddressLookup, LocateError, LocationProvider, PoiSource};
