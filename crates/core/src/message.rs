use listing_bot_backend::{CategoryRecord, VendorRecord};
use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The bot.
    Bot,
    /// The visitor.
    User,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Body {
    Text,
    OptionList {
        list_items: Vec<CategoryRecord>,
    },
    FinalResult {
        standard_vendors: Vec<VendorRecord>,
        premium_vendors: Vec<VendorRecord>,
    },
}

/// One transcript entry.
///
/// Messages are immutable once created. Besides the text, a bot message may
/// carry a list of categories to pick from, or the vendors found by a
/// lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    sender: Sender,
    text: String,
    #[serde(flatten)]
    body: Body,
}

impl Message {
    pub(crate) fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            body: Body::Text,
        }
    }

    pub(crate) fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            body: Body::Text,
        }
    }

    pub(crate) fn option_list(
        text: impl Into<String>,
        list_items: Vec<CategoryRecord>,
    ) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            body: Body::OptionList { list_items },
        }
    }

    pub(crate) fn final_result(
        text: impl Into<String>,
        standard_vendors: Vec<VendorRecord>,
        premium_vendors: Vec<VendorRecord>,
    ) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            body: Body::FinalResult {
                standard_vendors,
                premium_vendors,
            },
        }
    }

    /// Returns who wrote this message.
    #[inline]
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Returns the display text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the message carries categories to pick from.
    #[inline]
    pub fn is_option_list(&self) -> bool {
        matches!(self.body, Body::OptionList { .. })
    }

    /// Returns `true` if the message carries lookup results.
    #[inline]
    pub fn is_final_result(&self) -> bool {
        matches!(self.body, Body::FinalResult { .. })
    }

    /// Returns the attached categories, empty unless this is an option list.
    pub fn list_items(&self) -> &[CategoryRecord] {
        match &self.body {
            Body::OptionList { list_items } => list_items,
            _ => &[],
        }
    }

    /// Returns the vendors promoted in the requested city only.
    pub fn standard_vendors(&self) -> &[VendorRecord] {
        match &self.body {
            Body::FinalResult {
                standard_vendors, ..
            } => standard_vendors,
            _ => &[],
        }
    }

    /// Returns the vendors promoted across all cities.
    pub fn premium_vendors(&self) -> &[VendorRecord] {
        match &self.body {
            Body::FinalResult {
                premium_vendors, ..
            } => premium_vendors,
            _ => &[],
        }
    }
}
