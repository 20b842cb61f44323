//! The contract between the conversation flow and the listing backend.
//!
//! The listing site exposes a handful of REST endpoints: the category list
//! (part of the site configuration), the city list and the chatbot listing
//! lookup. This crate describes the records exchanged with those endpoints
//! and the [`ListingBackend`] trait that concrete transports implement.
//!
//! Types in this crate don't perform any I/O. They only fix the shape of
//! the data so that the conversation logic can be tested against a scripted
//! backend and run against the real one without changes.

#![deny(missing_docs)]

mod de;
mod error;
mod lookup;
mod provider;
mod records;

pub use error::*;
pub use lookup::*;
pub use provider::*;
pub use records::*;
