use listing_bot_backend::{ErrorKind, ListingGroup, LookupResponse};
use serde::{Deserialize, Serialize};

/// The preset outcome of one listing lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetLookup {
    #[serde(rename = "respond")]
    Respond(LookupResponse),
    #[serde(rename = "fail")]
    Fail(ErrorKind),
}

impl PresetLookup {
    /// Creates a successful preset with the specified groups.
    #[inline]
    pub fn with_groups(groups: impl Into<Vec<ListingGroup>>) -> Self {
        Self::Respond(LookupResponse {
            data: groups.into(),
        })
    }

    /// Creates a successful preset without any vendor.
    #[inline]
    pub fn empty() -> Self {
        Self::Respond(LookupResponse::default())
    }
}
