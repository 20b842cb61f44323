//! The guided conversation behind the listing chat widget.
//!
//! A visitor is walked through picking a category, a city and a phone
//! number, after which a listing lookup is sent to the backend and the
//! vendors found are shown. The pieces, from the leaves up:
//!
//! - [`ConversationStore`] keeps the transcript, the collected
//!   [`SelectionState`] and the current [`Stage`].
//! - [`classifier`] decides which slot an utterance fills.
//! - [`dispatcher`] turns a complete selection into one lookup and maps the
//!   answer into a bot message.
//! - [`Chat`] runs all of the above as a background task and publishes the
//!   messages to the host.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod backend_client;
mod catalog;
pub mod classifier;
mod controller;
mod conversation;
pub mod dispatcher;
mod flow;
mod message;
pub mod prompts;
mod selection;

pub use catalog::{Catalog, topic_slug_from_path};
pub use controller::{Chat, ChatBuilder, ChatSnapshot};
pub use conversation::{ConversationStore, Stage};
pub use flow::{Advance, Flow};
pub use message::{Message, Sender};
pub use selection::{CitySelection, PhoneNumber, SelectionState};

/// Re-exports of [`listing_bot_backend`] crate.
pub mod backend {
    pub use listing_bot_backend::*;
}
