use crate::geo::{Coordinate, Radius};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub overpass_url: String,
    pub nominatim_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub default_radius: Radius,
    /// Map center shown when no device position is available.
    pub default_center: Coordinate,
    /// Fixed device position, when the host can provide one.
    pub device_location: Option<Coordinate>,
    pub locate_timeout_ms: u64,
    pub startup_locate_timeout_ms: u64,
    pub log_level: String,
}
