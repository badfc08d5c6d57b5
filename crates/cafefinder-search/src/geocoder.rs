//! Free-text address resolution with input validation.

use cafefinder_core::{AddressLookup, Coordinate};
use thiserror::Error;

/// Why an address could not be turned into a coordinate.
#[derive(Debug, Error)]
pub enum GeocodeError<E: std::error::Error + 'static> {
    /// The query was blank after trimming; nothing was sent.
    #[error("address query is empty")]
    EmptyQuery,

    #[error("no match for address \"{0}\"")]
    NotFound(String),

    #[error("address lookup failed: {0}")]
    Lookup(#[source] E),
}

pub struct Geocoder<L> {
    lookup: L,
}

impl<L: AddressLookup> Geocoder<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Resolves `address` to the coordinate of its best match.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::EmptyQuery`] for blank input, without any request.
    /// - [`GeocodeError::NotFound`] when the service has no match.
    /// - [`GeocodeError::Lookup`] on transport or parse failure.
    pub async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError<L::Error>> {
        let query = address.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        match self.lookup.lookup(query).await {
            Ok(Some(coordinate)) => Ok(coordinate),
            Ok(None) => Err(GeocodeError::NotFound(query.to_owned())),
            Err(e) => Err(GeocodeError::Lookup(e)),
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }
}
