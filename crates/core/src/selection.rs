use std::fmt::{self, Display};

use listing_bot_backend::{CategoryRecord, CityRecord, LookupRequest};
use serde::{Deserialize, Serialize};

/// The city slot: either a city from the backend's list, or whatever the
/// visitor typed when nothing matched.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CitySelection {
    /// A city from the city list.
    Listed(CityRecord),
    /// Unmatched free text, accepted as is.
    FreeText(String),
}

impl CitySelection {
    /// Returns the location sent to the backend.
    #[inline]
    pub fn location(&self) -> &str {
        match self {
            CitySelection::Listed(city) => &city.name,
            CitySelection::FreeText(text) => text,
        }
    }
}

/// A mobile number made of exactly 10 ASCII digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parses a phone number. The input must match `^[0-9]{10}$`, no
    /// separators or surrounding spaces are accepted.
    pub fn parse(input: &str) -> Option<Self> {
        let valid = input.len() == 10 && input.bytes().all(|b| b.is_ascii_digit());
        valid.then(|| Self(input.to_owned()))
    }

    /// Returns the digits.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid phone number: {value:?}"))
    }
}

impl From<PhoneNumber> for String {
    #[inline]
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// The three slots a conversation collects before a lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionState {
    category: Option<CategoryRecord>,
    city: Option<CitySelection>,
    phone_number: Option<PhoneNumber>,
}

impl SelectionState {
    /// Returns the selected category.
    #[inline]
    pub fn category(&self) -> Option<&CategoryRecord> {
        self.category.as_ref()
    }

    /// Returns the selected city.
    #[inline]
    pub fn city(&self) -> Option<&CitySelection> {
        self.city.as_ref()
    }

    /// Returns the phone number.
    #[inline]
    pub fn phone_number(&self) -> Option<&PhoneNumber> {
        self.phone_number.as_ref()
    }

    /// Returns `true` if no slot is filled.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.city.is_none() && self.phone_number.is_none()
    }

    /// Returns `true` if all slots are filled.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.lookup_request().is_some()
    }

    /// Builds the lookup for this selection, or `None` while a slot is
    /// still missing.
    pub fn lookup_request(&self) -> Option<LookupRequest> {
        let category = self.category.as_ref()?;
        let city = self.city.as_ref()?;
        let phone_number = self.phone_number.as_ref()?;
        Some(LookupRequest {
            mobile_number: phone_number.as_str().to_owned(),
            location: city.location().to_owned(),
            category: category.id.clone(),
        })
    }

    pub(crate) fn set_category(&mut self, category: CategoryRecord) {
        self.category = Some(category);
    }

    pub(crate) fn set_city(&mut self, city: CitySelection) {
        self.city = Some(city);
    }

    pub(crate) fn set_phone_number(&mut self, phone_number: PhoneNumber) {
        self.phone_number = Some(phone_number);
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_number() {
        assert_eq!(PhoneNumber::parse("9876543210").unwrap().as_str(), "9876543210");
        for invalid in [
            "12345",
            "98765432100",
            "98765 43210",
            " 9876543210",
            "987654321a",
            "+919876543",
            "٩٨٧٦٥٤٣٢١٠",
            "",
        ] {
            assert!(PhoneNumber::parse(invalid).is_none(), "{invalid:?}");
        }
    }

    #[test]
    fn test_lookup_request_needs_all_slots() {
        let mut selection = SelectionState::default();
        assert!(selection.is_empty());

        selection.set_category(CategoryRecord::new("17", "Laptop Rental", "laptop-rental"));
        assert!(!selection.is_complete());
        selection.set_city(CitySelection::FreeText("Nowhereville".to_owned()));
        assert!(selection.lookup_request().is_none());
        selection.set_phone_number(PhoneNumber::parse("9876543210").unwrap());

        assert_eq!(
            selection.lookup_request(),
            Some(LookupRequest {
                mobile_number: "9876543210".to_owned(),
                location: "Nowhereville".to_owned(),
                category: "17".to_owned(),
            })
        );

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_listed_city_location() {
        let city = CitySelection::Listed(CityRecord {
            id: Some("4".to_owned()),
            name: "Mumbai".to_owned(),
        });
        assert_eq!(city.location(), "Mumbai");
    }
}
