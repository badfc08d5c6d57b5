//! User-facing status strings.

pub const SEARCHING: &str = "Searching for cafes...";
pub const FETCH_FAILED: &str = "Error fetching data. Try again later.";
pub const NO_RESULTS: &str = "No cafes found in this area. Try increasing the radius.";

pub const EMPTY_ADDRESS: &str = "Type an address or use My Location.";
pub const GEOCODING: &str = "Geocoding address...";
pub const ADDRESS_NOT_FOUND: &str = "Address not found";
pub const GEOCODING_FAILED: &str = "Geocoding failed.";

pub const LOCATING: &str = "Requesting location...";
pub const LOCATE_UNSUPPORTED: &str = "Geolocation not supported.";
pub const LOCATE_FAILED: &str = "Failed to get location. You can type an address instead.";
pub const STARTUP_UNSUPPORTED: &str = "Geolocation not supported. Type an address and press Find.";
pub const STARTUP_FALLBACK: &str = "Allow location or type an address and press Find.";

pub const CLEARED: &str = "Results cleared.";
