use serde::{Deserialize, Serialize};

use crate::de;
use crate::records::VendorRecord;

/// A listing lookup to be sent to the backend.
///
/// Field names follow the form fields of the lookup endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupRequest {
    /// The visitor's 10-digit mobile number.
    pub mobile_number: String,
    /// The city name, either from the city list or as typed.
    pub location: String,
    /// The identifier of the selected category.
    pub category: String,
}

impl LookupRequest {
    /// Returns the request as `(field, value)` pairs, in the order the
    /// endpoint documents them.
    #[inline]
    pub fn form_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("mobile_number", &self.mobile_number),
            ("location", &self.location),
            ("category", &self.category),
        ]
    }
}

/// The answer of a listing lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupResponse {
    /// Vendor groups, in the order the backend returned them.
    #[serde(default, deserialize_with = "de::list_or_null")]
    pub data: Vec<ListingGroup>,
}

/// A group of vendors sharing the same promotion scope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingGroup {
    /// Whether the group is promoted across all cities.
    #[serde(default, deserialize_with = "de::flag")]
    pub is_city_select_all: bool,
    /// Vendors of this group.
    #[serde(default, deserialize_with = "de::list_or_null")]
    pub listing_id: Vec<VendorRecord>,
}

impl ListingGroup {
    /// Creates a group promoted in the requested city only.
    #[inline]
    pub fn standard(vendors: impl Into<Vec<VendorRecord>>) -> Self {
        Self {
            is_city_select_all: false,
            listing_id: vendors.into(),
        }
    }

    /// Creates a group promoted across all cities.
    #[inline]
    pub fn premium(vendors: impl Into<Vec<VendorRecord>>) -> Self {
        Self {
            is_city_select_all: true,
            listing_id: vendors.into(),
        }
    }
}
