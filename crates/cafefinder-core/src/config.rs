use crate::app_config::AppConfig;
use crate::geo::{Coordinate, Radius};
use crate::ConfigError;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_coordinate = |var: &str, raw: &str| -> Result<Coordinate, ConfigError> {
        raw.parse::<Coordinate>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let overpass_url = or_default("CAFEFINDER_OVERPASS_URL", DEFAULT_OVERPASS_URL);
    let nominatim_url = or_default("CAFEFINDER_NOMINATIM_URL", DEFAULT_NOMINATIM_URL);
    let user_agent = or_default("CAFEFINDER_USER_AGENT", "cafefinder/0.1 (poi-search)");
    let request_timeout_secs = parse_u64("CAFEFINDER_REQUEST_TIMEOUT_SECS", "30")?;

    let default_radius = or_default("CAFEFINDER_DEFAULT_RADIUS_M", "1500")
        .parse::<Radius>()
        .map_err(|e| invalid("CAFEFINDER_DEFAULT_RADIUS_M", e.to_string()))?;

    let default_center = parse_coordinate(
        "CAFEFINDER_DEFAULT_CENTER",
        &or_default("CAFEFINDER_DEFAULT_CENTER", "19.0760,72.8777"),
    )?;

    let device_location = match lookup("CAFEFINDER_DEVICE_LOCATION") {
        Ok(raw) if !raw.trim().is_empty() => {
            Some(parse_coordinate("CAFEFINDER_DEVICE_LOCATION", &raw)?)
        }
        _ => None,
    };

    let locate_timeout_ms = parse_u64("CAFEFINDER_LOCATE_TIMEOUT_MS", "10000")?;
    let startup_locate_timeout_ms = parse_u64("CAFEFINDER_STARTUP_LOCATE_TIMEOUT_MS", "8000")?;
    let log_level = or_default("CAFEFINDER_LOG_LEVEL", "info");

    Ok(AppConfig {
        overpass_url,
        nominatim_url,
        user_agent,
        request_timeout_secs,
        default_radius,
        default_center,
        device_location,
        locate_timeout_ms,
        startup_locate_timeout_ms,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
