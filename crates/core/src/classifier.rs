//! Decides which slot an utterance fills.
//!
//! The classifier is a pure function of the current [`Stage`], the
//! utterance and the known categories and cities. It doesn't touch the
//! conversation; applying the outcome is up to the caller.

use listing_bot_backend::{CategoryRecord, CityRecord};

use crate::catalog::{Catalog, same_name};
use crate::conversation::Stage;
use crate::selection::{CitySelection, PhoneNumber};

/// The outcome of classifying one utterance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    /// The first utterance of a conversation; the category list should be
    /// presented.
    Greeting,
    /// A new search after a completed lookup; the selection should be
    /// cleared and the category list presented again.
    FollowUp,
    /// The utterance names a known category.
    Category(CategoryRecord),
    /// The utterance names no known category.
    UnknownCategory,
    /// The utterance fills the city slot, matched or not.
    City(CitySelection),
    /// The utterance is a valid phone number.
    Phone(PhoneNumber),
    /// The utterance is not a valid phone number.
    InvalidPhone,
    /// A lookup is in flight and the utterance can't be handled yet.
    Busy,
}

/// Classifies `input` for a conversation in `stage`.
///
/// `input` is expected to be trimmed and non-empty.
pub fn classify(
    stage: Stage,
    input: &str,
    catalog: &Catalog,
    cities: &[CityRecord],
) -> Classification {
    match stage {
        Stage::AwaitingFirstMessage => Classification::Greeting,
        Stage::AwaitingFollowUp => Classification::FollowUp,
        Stage::AwaitingCategory => match catalog.find_by_name(input) {
            Some(category) => Classification::Category(category.clone()),
            None => Classification::UnknownCategory,
        },
        Stage::AwaitingCity => {
            let city = match cities.iter().find(|city| same_name(&city.name, input)) {
                Some(city) => CitySelection::Listed(city.clone()),
                None => CitySelection::FreeText(input.to_owned()),
            };
            Classification::City(city)
        }
        Stage::AwaitingPhone => match PhoneNumber::parse(input) {
            Some(phone) => Classification::Phone(phone),
            None => Classification::InvalidPhone,
        },
        Stage::Dispatching => Classification::Busy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new([
            CategoryRecord::new("1", "Printer Rental", "printer-rental"),
            CategoryRecord::new("2", "Laptop Rental", "laptop-rental"),
        ])
    }

    fn cities() -> Vec<CityRecord> {
        vec![
            CityRecord {
                id: Some("10".to_owned()),
                name: "Mumbai".to_owned(),
            },
            CityRecord::named("Pune"),
        ]
    }

    #[test]
    fn test_any_input_starts_the_flow() {
        for input in ["hi", "Laptop Rental", "9876543210"] {
            assert_eq!(
                classify(Stage::AwaitingFirstMessage, input, &catalog(), &[]),
                Classification::Greeting
            );
            assert_eq!(
                classify(Stage::AwaitingFollowUp, input, &catalog(), &cities()),
                Classification::FollowUp
            );
        }
    }

    #[test]
    fn test_category() {
        let expected = Classification::Category(CategoryRecord::new(
            "2",
            "Laptop Rental",
            "laptop-rental",
        ));
        for input in ["Laptop Rental", "laptop rental", "LAPTOP RENTAL"] {
            assert_eq!(
                classify(Stage::AwaitingCategory, input, &catalog(), &[]),
                expected
            );
        }
        for input in ["Laptop", "Laptop Rentals", "2"] {
            assert_eq!(
                classify(Stage::AwaitingCategory, input, &catalog(), &[]),
                Classification::UnknownCategory
            );
        }
    }

    #[test]
    fn test_city() {
        assert_eq!(
            classify(Stage::AwaitingCity, "mumbai", &catalog(), &cities()),
            Classification::City(CitySelection::Listed(cities()[0].clone()))
        );
        assert_eq!(
            classify(Stage::AwaitingCity, "Nowhereville", &catalog(), &cities()),
            Classification::City(CitySelection::FreeText("Nowhereville".to_owned()))
        );
        // Cities that haven't been loaded yet can't match.
        assert_eq!(
            classify(Stage::AwaitingCity, "Mumbai", &catalog(), &[]),
            Classification::City(CitySelection::FreeText("Mumbai".to_owned()))
        );
    }

    #[test]
    fn test_phone() {
        assert_eq!(
            classify(Stage::AwaitingPhone, "9876543210", &catalog(), &[]),
            Classification::Phone(PhoneNumber::parse("9876543210").unwrap())
        );
        assert_eq!(
            classify(Stage::AwaitingPhone, "12345", &catalog(), &[]),
            Classification::InvalidPhone
        );
    }

    #[test]
    fn test_busy() {
        assert_eq!(
            classify(Stage::Dispatching, "hello?", &catalog(), &cities()),
            Classification::Busy
        );
    }
}
