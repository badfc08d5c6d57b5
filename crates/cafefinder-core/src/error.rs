use thiserror::Error;

/// Errors produced while loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors produced when constructing geographic values from untrusted input.
#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("radius must be a positive number of meters, got {0}")]
    InvalidRadius(i64),

    #[error("cannot parse coordinate from \"{input}\": expected \"lat,lon\"")]
    Unparseable { input: String },
}
