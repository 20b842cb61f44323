use serde::{Deserialize, Serialize};

use crate::de;

/// A listing category from the site configuration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// The unique identifier, sent back to the backend on lookup.
    #[serde(rename = "unique_id", deserialize_with = "de::id")]
    pub id: String,
    /// The display name, which is what visitors type or click.
    pub name: String,
    /// The URL slug of the category.
    #[serde(default, deserialize_with = "de::string_or_null")]
    pub slug: String,
}

impl CategoryRecord {
    /// Creates a category record.
    #[inline]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// A city known to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityRecord {
    /// The identifier of the city, if the backend sends one.
    #[serde(default, deserialize_with = "de::optional_id")]
    pub id: Option<String>,
    /// The display name.
    pub name: String,
}

impl CityRecord {
    /// Creates a city record without an identifier.
    #[inline]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// A vendor returned by a listing lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VendorRecord {
    /// The vendor's business name.
    pub name: String,
    /// The vendor's contact number.
    #[serde(default, deserialize_with = "de::string_or_null")]
    pub phone_number: String,
}

impl VendorRecord {
    /// Creates a vendor record.
    #[inline]
    pub fn new(name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone_number: phone_number.into(),
        }
    }
}
