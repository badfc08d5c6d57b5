//! Client for the Nominatim free-text search endpoint.

use std::time::Duration;

use cafefinder_core::{AddressLookup, Coordinate};
use reqwest::{header, Client, Url};

use crate::error::OsmError;
use crate::types::NominatimPlace;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Client for Nominatim address search, limited to the single best match.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`OsmError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, OsmError> {
        Self::with_base_url(DEFAULT_BASE_URL, user_agent, timeout_secs)
    }

    /// # Errors
    ///
    /// Returns [`OsmError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`OsmError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        user_agent: &str,
        timeout_secs: u64,
    ) -> Result<Self, OsmError> {
        // Nominatim's usage policy rejects requests without an identifying UA.
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let base_url = Url::parse(base_url).map_err(|e| OsmError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { client, base_url })
    }

    /// Resolves `query` to the coordinate of its best match.
    ///
    /// Returns `Ok(None)` when the service answers with an empty list.
    ///
    /// # Errors
    ///
    /// - [`OsmError::Http`] on network failure.
    /// - [`OsmError::UnexpectedStatus`] on a non-2xx response.
    /// - [`OsmError::Deserialize`] if the body is not a JSON array of matches.
    /// - [`OsmError::InvalidCoordinate`] if the match's coordinates do not parse.
    pub async fn search(&self, query: &str) -> Result<Option<Coordinate>, OsmError> {
        let url = self.build_url(query);
        tracing::debug!(query, "querying nominatim");

        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OsmError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let places: Vec<NominatimPlace> =
            serde_json::from_str(&body).map_err(|e| OsmError::Deserialize {
                context: format!("nominatim(q={query})"),
                source: e,
            })?;

        let Some(best) = places.into_iter().next() else {
            return Ok(None);
        };
        if let Some(name) = best.display_name.as_deref() {
            tracing::debug!(query, display_name = name, "nominatim match");
        }
        place_coordinate(&best).map(Some)
    }

    fn build_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query)
            .append_pair("limit", "1");
        url
    }
}

fn place_coordinate(place: &NominatimPlace) -> Result<Coordinate, OsmError> {
    let parse = |field: &'static str, raw: &str| {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| OsmError::InvalidCoordinate {
                field,
                value: raw.to_owned(),
            })
    };
    let lat = parse("lat", &place.lat)?;
    let lon = parse("lon", &place.lon)?;
    Coordinate::new(lat, lon).map_err(|e| OsmError::InvalidCoordinate {
        field: "lat/lon",
        value: e.to_string(),
    })
}

impl AddressLookup for NominatimClient {
    type Error = OsmError;

    async fn lookup(&self, query: &str) -> Result<Option<Coordinate>, OsmError> {
        self.search(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(lat: &str, lon: &str) -> NominatimPlace {
        NominatimPlace {
            lat: lat.to_owned(),
            lon: lon.to_owned(),
            display_name: None,
        }
    }

    #[test]
    fn build_url_sets_format_query_and_limit() {
        let client = NominatimClient::with_base_url("https://geo.example/search", "test", 5)
            .expect("client construction should not fail");
        let url = client.build_url("Bandra West, Mumbai");
        assert_eq!(
            url.as_str(),
            "https://geo.example/search?format=json&q=Bandra+West%2C+Mumbai&limit=1"
        );
    }

    #[test]
    fn string_encoded_coordinates_are_parsed() {
        let c = place_coordinate(&place("19.0596", "72.8295")).unwrap();
        assert!((c.lat() - 19.0596).abs() < 1e-9);
        assert!((c.lon() - 72.8295).abs() < 1e-9);
    }

    #[test]
    fn non_numeric_latitude_is_reported() {
        let err = place_coordinate(&place("north", "72.8")).unwrap_err();
        assert!(matches!(err, OsmError::InvalidCoordinate { field: "lat", .. }));
    }

    #[test]
    fn out_of_range_coordinates_are_reported() {
        let err = place_coordinate(&place("123.0", "72.8")).unwrap_err();
        assert!(matches!(err, OsmError::InvalidCoordinate { .. }));
    }
}
