use cafefinder_core::{Coordinate, LocateError, LocationProvider};

/// Device position known up front, from `--location` or
/// `CAFEFINDER_DEVICE_LOCATION`. A terminal has no geolocation of its own, so
/// without one the provider reports itself unsupported.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(Option<Coordinate>);

impl FixedLocation {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self(position)
    }
}

impl LocationProvider for FixedLocation {
    fn is_supported(&self) -> bool {
        self.0.is_some()
    }

    async fn current_position(&self) -> Result<Coordinate, LocateError> {
        self.0.ok_or(LocateError::Unsupported)
    }
}
