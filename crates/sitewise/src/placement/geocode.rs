use crate::geo::Coordinate;

/// Outbound address-to-coordinate resolution (e.g. an ArcGIS or Nominatim
/// adapter). Consulted only when a submission arrives without coordinates;
/// no retry or caching policy is imposed here.
pub trait AddressResolver: Send + Sync {
    fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError>;
}

/// Geocoding failure.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("no coordinates found for address '{0}'")]
    Unresolved(String),
    #[error("geocoding backend unavailable: {0}")]
    Unavailable(String),
}
