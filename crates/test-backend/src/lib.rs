//! A local fake listing backend for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use listing_bot_backend::{
    BackendError, CategoryRecord, CityRecord, ErrorKind, ListingBackend,
    LookupRequest, LookupResponse,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl BackendError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    categories: Vec<CategoryRecord>,
    cities: Option<Vec<CityRecord>>,
    lookups: VecDeque<PresetLookup>,
    lookup_requests: Vec<LookupRequest>,
    city_fetches: usize,
}

/// A local fake backend for testing purpose.
///
/// Before sending requests, you need to setup the script: the categories,
/// the cities and how each lookup should be answered. Lookups consume the
/// presets in the order they were added. If there are no presets left, or
/// the cities were never set, an error is returned.
///
/// Clones share the same script, so a test can keep one clone to inspect
/// the recorded requests after handing another one to the code under test.
///
/// # Note
///
/// This type is not optimized for production use, the records are copied
/// on every request. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestBackend {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestBackend {
    #[inline]
    pub fn set_categories(&mut self, categories: impl Into<Vec<CategoryRecord>>) {
        self.script().categories = categories.into();
    }

    #[inline]
    pub fn set_cities(&mut self, cities: impl Into<Vec<CityRecord>>) {
        self.script().cities = Some(cities.into());
    }

    #[inline]
    pub fn add_lookup(&mut self, preset: PresetLookup) {
        self.script().lookups.push_back(preset);
    }

    /// Delays every answer by `duration`.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the lookups received so far.
    pub fn lookup_requests(&self) -> Vec<LookupRequest> {
        self.script().lookup_requests.clone()
    }

    /// Returns how many times the city list was requested.
    pub fn city_fetch_count(&self) -> usize {
        self.script().city_fetches
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn answer<T>(delay: Option<Duration>, result: Result<T, Error>) -> Result<T, Error> {
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        result
    }
}

impl ListingBackend for TestBackend {
    type Error = crate::Error;

    fn fetch_categories(
        &self,
    ) -> impl Future<Output = Result<Vec<CategoryRecord>, Self::Error>>
    + Send
    + 'static {
        let categories = self.script().categories.clone();
        Self::answer(self.delay, Ok(categories))
    }

    fn fetch_cities(
        &self,
    ) -> impl Future<Output = Result<Vec<CityRecord>, Self::Error>> + Send + 'static
    {
        let result = {
            let mut script = self.script();
            script.city_fetches += 1;
            script.cities.clone().ok_or(Error {
                message: "no cities in the script",
                kind: ErrorKind::Status,
            })
        };
        Self::answer(self.delay, result)
    }

    fn lookup_listings(
        &self,
        req: &LookupRequest,
    ) -> impl Future<Output = Result<LookupResponse, Self::Error>> + Send + 'static
    {
        let result = {
            let mut script = self.script();
            script.lookup_requests.push(req.clone());
            match script.lookups.pop_front() {
                Some(PresetLookup::Respond(resp)) => Ok(resp),
                Some(PresetLookup::Fail(kind)) => Err(Error {
                    message: "preset failure",
                    kind,
                }),
                None => Err(Error {
                    message: "no enough lookups",
                    kind: ErrorKind::Other,
                }),
            }
        };
        Self::answer(self.delay, result)
    }
}
