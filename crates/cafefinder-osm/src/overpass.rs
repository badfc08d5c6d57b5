//! Client for an Overpass API interpreter endpoint.
//!
//! Sends the fixed `amenity=cafe` query as a `data` query parameter and
//! decodes the `elements` array. Ways and relations are requested with
//! `out center;` so every element carries a single representative point.

use std::time::Duration;

use cafefinder_core::{Coordinate, PoiElement, PoiSource, Radius};
use reqwest::{Client, Url};

use crate::error::OsmError;
use crate::types::OverpassResponse;

const DEFAULT_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

/// Server-side evaluation limit embedded in the query header, in seconds.
const QUERY_TIMEOUT_SECS: u32 = 25;

/// Builds the Overpass QL query selecting cafe nodes, ways and relations
/// within `radius` meters of `center`.
#[must_use]
pub fn build_cafe_query(center: Coordinate, radius: Radius) -> String {
    let around = format!("(around:{radius},{},{})", center.lat(), center.lon());
    format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];(\
         node[\"amenity\"=\"cafe\"]{around};\
         way[\"amenity\"=\"cafe\"]{around};\
         relation[\"amenity\"=\"cafe\"]{around};\
         );out center;"
    )
}

/// Client for the Overpass interpreter.
///
/// Use [`OverpassClient::new`] for the public instance or
/// [`OverpassClient::with_base_url`] to point at a mirror or a mock server.
pub struct OverpassClient {
    client: Client,
    base_url: Url,
}

impl OverpassClient {
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

    /// Fetches every cafe element around `center`.
    ///
    /// # Errors
    ///
    /// - [`OsmError::Http`] on network failure.
    /// - [`OsmError::UnexpectedStatus`] on a non-2xx response.
    /// - [`OsmError::Deserialize`] if the body is not the expected JSON.
    pub async fn fetch_cafes(
        &self,
        center: Coordinate,
        radius: Radius,
    ) -> Result<Vec<PoiElement>, OsmError> {
        let url = self.build_url(&build_cafe_query(center, radius));
        tracing::debug!(%center, radius_m = radius.meters(), "querying overpass");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OsmError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: OverpassResponse =
            serde_json::from_str(&body).map_err(|e| OsmError::Deserialize {
                context: format!("overpass(center={center}, radius={radius})"),
                source: e,
            })?;

        tracing::debug!(count = parsed.elements.len(), "overpass returned elements");
        Ok(parsed.elements)
    }

    fn build_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("data", query);
        url
    }
}

impl PoiSource for OverpassClient {
    type Error = OsmError;

    async fn cafes_around(
        &self,
        center: Coordinate,
        radius: Radius,
    ) -> Result<Vec<PoiElement>, OsmError> {
        self.fetch_cafes(center, radius).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> Coordinate {
        Coordinate::new(19.076, 72.8777).unwrap()
    }

    #[test]
    fn cafe_query_covers_all_geometry_kinds() {
        let q = build_cafe_query(center(), Radius::new(1500).unwrap());
        assert_eq!(
            q,
            "[out:json][timeout:25];(\
             node[\"amenity\"=\"cafe\"](around:1500,19.076,72.8777);\
             way[\"amenity\"=\"cafe\"](around:1500,19.076,72.8777);\
             relation[\"amenity\"=\"cafe\"](around:1500,19.076,72.8777);\
             );out center;"
        );
    }

    #[test]
    fn build_url_encodes_query_as_data_param() {
        let client =
            OverpassClient::with_base_url("https://overpass.example/api/interpreter", "test", 5)
                .expect("client construction should not fail");
        let url = client.build_url("[out:json];node(around:10,1,2);out;");
        assert!(url.as_str().starts_with("https://overpass.example/api/interpreter?data="));
        let data = url
            .query_pairs()
            .find(|(k, _)| k == "data")
            .map(|(_, v)| v.into_owned());
        assert_eq!(data.as_deref(), Some("[out:json];node(around:10,1,2);out;"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = OverpassClient::with_base_url("not a url", "test", 5);
        assert!(matches!(result, Err(OsmError::InvalidBaseUrl { .. })));
    }
}
