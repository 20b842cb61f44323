use std::error::Error;

use crate::error::ErrorKind;
use crate::lookup::{LookupRequest, LookupResponse};
use crate::records::{CategoryRecord, CityRecord};

/// The error type for a listing backend.
pub trait BackendError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents the listing backend, which serves the site
/// configuration, the city list and the listing lookups.
///
/// Once the backend is created, it should behave like a stateless object.
/// It can still have internal state (connection pools, counters), but
/// callers should not rely on it, and the backend should be prepared for
/// being dropped anytime. Every returned future must be independent of
/// `self` so that callers can move it into a spawned task and abort it.
pub trait ListingBackend: Send + Sync {
    /// The error type that may be returned by the backend.
    type Error: BackendError;

    /// Fetches the categories published in the site configuration.
    fn fetch_categories(
        &self,
    ) -> impl Future<Output = Result<Vec<CategoryRecord>, Self::Error>>
    + Send
    + 'static;

    /// Fetches the list of known cities.
    fn fetch_cities(
        &self,
    ) -> impl Future<Output = Result<Vec<CityRecord>, Self::Error>> + Send + 'static;

    /// Looks up the vendors listed for a category in a location.
    fn lookup_listings(
        &self,
        req: &LookupRequest,
    ) -> impl Future<Output = Result<LookupResponse, Self::Error>> + Send + 'static;
}
