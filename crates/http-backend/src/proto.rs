use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::Error;
use listing_bot_backend::ErrorKind;

// ---------------------------
// Endpoints the backend serves
// ---------------------------

pub const CITY_LIST_PATH: &str = "get-form-city-list";
pub const LOOKUP_PATH: &str = "get-chatboat-listing";

// ------------------------------
// Types received from the server
// ------------------------------

/// List endpoints answer either with a bare array or with the array wrapped
/// in the usual `{ "data": [...] }` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(default = "Vec::new")]
        data: Vec<T>,
    },
}

impl<T> ListPayload<T> {
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Bare(items) => items,
            ListPayload::Wrapped { data } => data,
        }
    }
}

// -----------
// Conversions
// -----------

pub fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|err| {
        Error::new(
            format!("failed to decode response of `{endpoint}`: {err}"),
            ErrorKind::InvalidResponse,
        )
    })
}

pub fn decode_list<T: DeserializeOwned>(
    endpoint: &str,
    body: &str,
) -> Result<Vec<T>, Error> {
    decode::<ListPayload<T>>(endpoint, body).map(ListPayload::into_vec)
}
