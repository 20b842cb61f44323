use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;

use listing_bot_backend::{
    BackendError, CategoryRecord, CityRecord, ErrorKind, ListingBackend,
    ListingGroup, LookupRequest, LookupResponse, VendorRecord,
};

#[derive(Debug)]
struct InlineBackendError(ErrorKind);

impl Display for InlineBackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for InlineBackendError {}

impl BackendError for InlineBackendError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Answers every lookup with one vendor per requested location, and
/// refuses lookups without a category.
struct InlineBackend;

impl ListingBackend for InlineBackend {
    type Error = InlineBackendError;

    fn fetch_categories(
        &self,
    ) -> impl Future<Output = Result<Vec<CategoryRecord>, Self::Error>>
    + Send
    + 'static {
        ready(Ok(vec![CategoryRecord::new("1", "Laptop Rental", "laptop-rental")]))
    }

    fn fetch_cities(
        &self,
    ) -> impl Future<Output = Result<Vec<CityRecord>, Self::Error>> + Send + 'static
    {
        ready(Ok(vec![CityRecord::named("Mumbai")]))
    }

    fn lookup_listings(
        &self,
        req: &LookupRequest,
    ) -> impl Future<Output = Result<LookupResponse, Self::Error>> + Send + 'static
    {
        let result = 'blk: {
            if req.category.is_empty() {
                break 'blk Err(InlineBackendError(ErrorKind::Status));
            }
            let vendor = VendorRecord::new(
                format!("{} Vendor", req.location),
                req.mobile_number.clone(),
            );
            Ok(LookupResponse {
                data: vec![ListingGroup::standard([vendor])],
            })
        };
        ready(result)
    }
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup() {
        let backend = InlineBackend;
        let req = LookupRequest {
            mobile_number: "9876543210".to_owned(),
            location: "Mumbai".to_owned(),
            category: "1".to_owned(),
        };
        let resp = backend.lookup_listings(&req).await.unwrap();
        assert_eq!(resp.data.len(), 1);
        assert_eq!(resp.data[0].listing_id[0].name, "Mumbai Vendor");
    }

    #[tokio::test]
    async fn test_error() {
        let backend = InlineBackend;
        let req = LookupRequest {
            mobile_number: "9876543210".to_owned(),
            location: "Mumbai".to_owned(),
            category: String::new(),
        };
        let err = backend.lookup_listings(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Status);
    }

    #[tokio::test]
    async fn test_fetch_lists() {
        let backend = InlineBackend;
        let categories = backend.fetch_categories().await.unwrap();
        let cities = backend.fetch_cities().await.unwrap();
        assert_eq!(categories[0].slug, "laptop-rental");
        assert_eq!(cities[0].name, "Mumbai");
    }
}
