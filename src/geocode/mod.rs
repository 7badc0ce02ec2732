//! Address-to-coordinate lookup.
//!
//! [`resolve_address`] wraps any [`Geocoder`] with the lookup policy: blank
//! addresses are rejected up front, and a timeout is retried exactly once.

mod nominatim;

pub use nominatim::{NominatimGeocoder, parse_places};

use crate::gps::Coordinate;

/// Geocoding failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    #[error("address is empty")]
    EmptyAddress,

    #[error("geocoding service timed out")]
    Timeout,

    #[error("geocoding service error: {0}")]
    Service(String),
}

/// Trait for geocoding services.
///
/// Implement this trait to add a custom backend. The library ships with
/// [`NominatimGeocoder`].
///
/// # Example
///
/// ```rust,no_run
/// use geotag::config::GeocoderConfig;
/// use geotag::geocode::{NominatimGeocoder, resolve_address};
///
/// # async fn example() -> anyhow::Result<()> {
/// let geocoder = NominatimGeocoder::new(&GeocoderConfig::default())?;
/// match resolve_address(&geocoder, "Champ de Mars, Paris").await? {
///     Some(coordinate) => println!("{coordinate}"),
///     None => println!("not found"),
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// The display name of this service (e.g., "Nominatim").
    fn name(&self) -> &str;
    /// Look up `address`. `Ok(None)` means the service found nothing.
    async fn lookup(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError>;
}

/// Resolve `address` through `geocoder`, retrying once on timeout.
///
/// A failure on the retry is reported as [`GeocodeError::Service`].
pub async fn resolve_address<G>(
    geocoder: &G,
    address: &str,
) -> Result<Option<Coordinate>, GeocodeError>
where
    G: Geocoder + ?Sized,
{
    let address = address.trim();
    if address.is_empty() {
        return Err(GeocodeError::EmptyAddress);
    }

    log::debug!("Looking up {address:?} via {}", geocoder.name());
    match geocoder.lookup(address).await {
        Err(GeocodeError::Timeout) => {
            log::warn!("{} timed out, retrying once", geocoder.name());
            geocoder.lookup(address).await.map_err(|e| match e {
                GeocodeError::Service(message) => GeocodeError::Service(message),
                other => GeocodeError::Service(format!("{other} on retry")),
            })
        }
        result => result,
    }
}
