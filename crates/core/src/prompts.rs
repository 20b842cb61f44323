//! Texts the bot says.

/// The first message of every conversation.
pub const GREETING: &str = "Hi there! Tell me what you are looking for and I will find listings for you.";
/// Presents the category list.
pub const SELECT_CATEGORY: &str = "Please select category to get listing.";
/// Re-presents the category list after an unknown category.
pub const INVALID_CATEGORY: &str = "Invalid category. Please select a category from the list.";
/// Asks for the city.
pub const ENTER_CITY: &str = "Please enter the city to get a listing of that city.";
/// Asks for the phone number.
pub const ENTER_PHONE: &str = "Please enter the mobile number.";
/// Re-asks for the phone number.
pub const INVALID_PHONE: &str = "Please enter a valid 10-digit mobile number.";
/// Introduces the vendors found.
pub const LISTINGS_FOUND: &str = "Here are the listings we found.";
/// The lookup returned no vendor.
pub const NO_LISTING: &str = "No listing found.";
/// The lookup failed.
pub const LOOKUP_FAILED: &str = "Sorry, something went wrong. Please try again later.";
