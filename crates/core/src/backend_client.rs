use std::pin::Pin;
use std::sync::Arc;

use listing_bot_backend::{
    BackendError, CityRecord, ListingBackend, LookupRequest, LookupResponse,
};
use tracing::Instrument;

pub(crate) type BackendResult<T> = Result<T, Box<dyn BackendError>>;
type BoxedFuture<T> = Pin<Box<dyn Future<Output = BackendResult<T>> + Send>>;
type FetchCitiesFn = Arc<dyn Fn() -> BoxedFuture<Vec<CityRecord>> + Send + Sync>;
type LookupFn = Arc<dyn Fn(LookupRequest) -> BoxedFuture<LookupResponse> + Send + Sync>;

/// A wrapper around a listing backend that provides a type-erased
/// interface for the controller, so that the controller doesn't need a
/// generic parameter.
#[derive(Clone)]
pub struct BackendClient {
    fetch_cities_fn: FetchCitiesFn,
    lookup_fn: LookupFn,
}

impl BackendClient {
    pub fn new<B: ListingBackend + 'static>(backend: B) -> Self {
        let backend = Arc::new(backend);

        let fetch_cities_fn: FetchCitiesFn = {
            let backend = Arc::clone(&backend);
            Arc::new(move || {
                let fut = backend.fetch_cities();
                let fut: BoxedFuture<Vec<CityRecord>> = Box::pin(
                    async move {
                        let cities = fut.await.map_err(boxed_error)?;
                        trace!("got {} cities", cities.len());
                        Ok::<_, Box<dyn BackendError>>(cities)
                    }
                    .instrument(trace_span!("fetch cities")),
                );
                fut
            })
        };

        let lookup_fn: LookupFn = Arc::new(move |req: LookupRequest| {
            trace!("sending a lookup: {req:?}");
            let fut = backend.lookup_listings(&req);
            let fut: BoxedFuture<LookupResponse> = Box::pin(
                async move { fut.await.map_err(boxed_error) }
                    .instrument(trace_span!("lookup")),
            );
            fut
        });

        Self {
            fetch_cities_fn,
            lookup_fn,
        }
    }

    /// Fetches the city list.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe, dropping the future abandons the request.
    #[inline]
    pub async fn fetch_cities(&self) -> BackendResult<Vec<CityRecord>> {
        (self.fetch_cities_fn)().await
    }

    /// Sends a listing lookup.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe, dropping the future abandons the request.
    #[inline]
    pub async fn lookup(&self, req: LookupRequest) -> BackendResult<LookupResponse> {
        (self.lookup_fn)(req).await
    }
}

fn boxed_error<E: BackendError>(err: E) -> Box<dyn BackendError> {
    error!("got an error: {err:?}");
    Box::new(err)
}
