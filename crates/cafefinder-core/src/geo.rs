//! Geographic primitives: validated coordinates, search radius, and the
//! haversine great-circle distance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// Mean Earth radius used by [`distance_m`].
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 latitude/longitude pair in decimal degrees.
///
/// Deserialization goes through [`Coordinate::new`], so out-of-range input is
/// rejected there too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self, GeoError> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    /// Builds a coordinate, rejecting values outside the valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidLatitude`] or [`GeoError::InvalidLongitude`]
    /// for out-of-range or non-finite input.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` in meters.
    #[must_use]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_m(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Parses `"lat,lon"` (whitespace around either number is ignored).
impl FromStr for Coordinate {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || GeoError::Unparseable {
            input: s.to_owned(),
        };
        let (lat, lon) = s.split_once(',').ok_or_else(unparseable)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| unparseable())?;
        let lon = lon.trim().parse::<f64>().map_err(|_| unparseable())?;
        Coordinate::new(lat, lon)
    }
}

/// Search radius in whole meters. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Radius(u32);

impl Radius {
    pub const DEFAULT: Radius = Radius(1500);

    /// # Errors
    ///
    /// Returns [`GeoError::InvalidRadius`] when `meters` is zero.
    pub fn new(meters: u32) -> Result<Self, GeoError> {
        if meters == 0 {
            return Err(GeoError::InvalidRadius(0));
        }
        Ok(Self(meters))
    }

    #[must_use]
    pub fn meters(self) -> u32 {
        self.0
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Radius {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().parse::<i64>().map_err(|_| GeoError::Unparseable {
            input: s.to_owned(),
        })?;
        let meters = u32::try_from(raw).map_err(|_| GeoError::InvalidRadius(raw))?;
        Radius::new(meters)
    }
}

/// Haversine great-circle distance between two coordinates, in meters.
#[must_use]
pub fn distance_m(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}
